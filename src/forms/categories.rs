use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{CategoryIcon, CategoryId, CategoryName, Slug, TypeConstraintError};
use crate::forms::non_blank;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddCategoryForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub slug: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub icon: String,
    pub description: Option<String>,
    pub parent_id: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddCategoryFormPayload {
    pub name: CategoryName,
    /// Explicit slug; derived from the name when absent.
    pub slug: Option<Slug>,
    pub icon: CategoryIcon,
    pub description: Option<String>,
    pub parent_id: Option<CategoryId>,
    pub sort_order: i32,
}

#[derive(Debug, Error)]
pub enum AddCategoryFormError {
    #[error("Add category form validation failed: {0}")]
    Validation(String),
    #[error("Add category form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for AddCategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for AddCategoryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<AddCategoryForm> for AddCategoryFormPayload {
    type Error = AddCategoryFormError;

    fn try_from(value: AddCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            name: CategoryName::new(value.name)?,
            slug: non_blank(value.slug).map(Slug::new).transpose()?,
            icon: CategoryIcon::new(value.icon)?,
            description: non_blank(value.description),
            parent_id: non_blank(value.parent_id).map(CategoryId::new).transpose()?,
            sort_order: value.sort_order,
        })
    }
}

/// Moves a category in the tree; a missing `parentId` makes it top level.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetCategoryParentForm {
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetCategoryParentFormPayload {
    pub parent_id: Option<CategoryId>,
}

#[derive(Debug, Error)]
pub enum SetCategoryParentFormError {
    #[error("Set parent form validation failed: {0}")]
    Validation(String),
    #[error("Set parent form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for SetCategoryParentFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for SetCategoryParentFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<SetCategoryParentForm> for SetCategoryParentFormPayload {
    type Error = SetCategoryParentFormError;

    fn try_from(value: SetCategoryParentForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            parent_id: non_blank(value.parent_id).map(CategoryId::new).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_category_trims_and_keeps_optional_slug() {
        let form = AddCategoryForm {
            name: " Food Trucks ".to_string(),
            slug: Some(String::new()),
            icon: "truck".to_string(),
            description: None,
            parent_id: Some("restaurants".to_string()),
            sort_order: 7,
        };

        let payload: AddCategoryFormPayload = form.try_into().unwrap();
        assert_eq!(payload.name.as_str(), "Food Trucks");
        assert!(payload.slug.is_none());
        assert_eq!(payload.parent_id.unwrap().as_str(), "restaurants");
    }

    #[test]
    fn add_category_rejects_malformed_slug() {
        let form = AddCategoryForm {
            name: "Food Trucks".to_string(),
            slug: Some("Food Trucks".to_string()),
            icon: "truck".to_string(),
            description: None,
            parent_id: None,
            sort_order: 0,
        };

        let payload: Result<AddCategoryFormPayload, _> = form.try_into();
        assert!(matches!(
            payload,
            Err(AddCategoryFormError::TypeConstraint(_))
        ));
    }

    #[test]
    fn set_parent_accepts_blank_as_top_level() {
        let form = SetCategoryParentForm {
            parent_id: Some(" ".to_string()),
        };
        let payload: SetCategoryParentFormPayload = form.try_into().unwrap();
        assert!(payload.parent_id.is_none());
    }
}
