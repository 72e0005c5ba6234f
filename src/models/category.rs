use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category::{Category as DomainCategory, NewCategory as DomainNewCategory};
use crate::domain::types::{
    BusinessCount, CategoryIcon, CategoryId, CategoryName, Slug, TypeConstraintError,
};

/// Diesel model representing the `categories` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::categories)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub icon: String,
    pub description: Option<String>,
    pub parent_id: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Category`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub icon: String,
    pub description: Option<String>,
    pub parent_id: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A category row with the number of active businesses filed under it.
pub type CategoryWithCount = (Category, i64);

impl TryFrom<CategoryWithCount> for DomainCategory {
    type Error = TypeConstraintError;

    fn try_from((category, count): CategoryWithCount) -> Result<Self, Self::Error> {
        let count = i32::try_from(count)
            .map_err(|_| TypeConstraintError::InvalidValue(format!("business count {count}")))?;
        Ok(Self {
            id: CategoryId::new(category.id)?,
            name: CategoryName::new(category.name)?,
            slug: Slug::new(category.slug)?,
            icon: CategoryIcon::new(category.icon)?,
            description: category.description,
            parent_id: category.parent_id.map(CategoryId::new).transpose()?,
            count: BusinessCount::new(count)?,
            is_active: category.is_active,
            sort_order: category.sort_order,
            created_at: category.created_at,
            updated_at: category.updated_at,
        })
    }
}

impl From<DomainNewCategory> for NewCategory {
    fn from(category: DomainNewCategory) -> Self {
        Self {
            id: category.id.into_inner(),
            name: category.name.into_inner(),
            slug: category.slug.into_inner(),
            icon: category.icon.into_inner(),
            description: category.description,
            parent_id: category.parent_id.map(CategoryId::into_inner),
            is_active: true,
            sort_order: category.sort_order,
            created_at: category.created_at,
            updated_at: category.created_at,
        }
    }
}
