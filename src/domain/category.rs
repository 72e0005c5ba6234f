use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{BusinessCount, CategoryIcon, CategoryId, CategoryName, Slug};

/// Browsable grouping of businesses, optionally nested under a parent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub slug: Slug,
    pub icon: CategoryIcon,
    pub description: Option<String>,
    pub parent_id: Option<CategoryId>,
    /// Number of active businesses in the category. Advisory for fallback data.
    pub count: BusinessCount,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to insert a new [`Category`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCategory {
    pub id: CategoryId,
    pub name: CategoryName,
    pub slug: Slug,
    pub icon: CategoryIcon,
    pub description: Option<String>,
    pub parent_id: Option<CategoryId>,
    pub sort_order: i32,
    pub created_at: NaiveDateTime,
}

impl From<Category> for NewCategory {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
            icon: category.icon,
            description: category.description,
            parent_id: category.parent_id,
            sort_order: category.sort_order,
            created_at: category.created_at,
        }
    }
}

impl Category {
    /// Walks the parent chain of `parent` and reports whether making it the
    /// parent of `self` would close a loop.
    ///
    /// `lookup` resolves a category id to its current parent id.
    pub fn would_cycle<F>(&self, parent: &CategoryId, mut lookup: F) -> bool
    where
        F: FnMut(&CategoryId) -> Option<Option<CategoryId>>,
    {
        let mut current = Some(parent.clone());
        let mut steps = 0usize;
        while let Some(id) = current {
            if id == self.id {
                return true;
            }
            steps += 1;
            // A chain longer than any sane tree already contains a loop.
            if steps > 1024 {
                return true;
            }
            current = lookup(&id).flatten();
        }
        false
    }
}
