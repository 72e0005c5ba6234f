use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{
    BlogTitle, BusinessId, ImagePath, PersonName, Slug, TypeConstraintError, UserId,
};
use crate::forms::non_blank;

fn default_published() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogPostForm {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub slug: Option<String>,
    #[validate(length(max = 500))]
    #[serde(default)]
    pub excerpt: String,
    #[validate(length(min = 1))]
    pub content: String,
    pub featured_image: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[validate(length(min = 1))]
    pub author: String,
    pub author_id: Option<String>,
    #[validate(length(min = 1))]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub business_id: Option<String>,
    #[serde(default = "default_published")]
    pub is_published: bool,
    #[serde(default)]
    pub is_featured: bool,
    pub publish_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateBlogPostPayload {
    pub title: BlogTitle,
    /// Explicit slug; derived from the title when absent.
    pub slug: Option<Slug>,
    pub excerpt: String,
    pub content: String,
    pub featured_image: Option<ImagePath>,
    pub images: Vec<ImagePath>,
    pub author: PersonName,
    pub author_id: Option<UserId>,
    pub category: String,
    pub tags: BTreeSet<String>,
    pub business_id: Option<BusinessId>,
    pub is_published: bool,
    pub is_featured: bool,
    pub publish_date: Option<NaiveDateTime>,
}

#[derive(Debug, Error)]
pub enum CreateBlogPostFormError {
    #[error("Blog post form validation failed: {0}")]
    Validation(String),
    #[error("Blog post form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for CreateBlogPostFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CreateBlogPostFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<CreateBlogPostForm> for CreateBlogPostPayload {
    type Error = CreateBlogPostFormError;

    fn try_from(value: CreateBlogPostForm) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            title: BlogTitle::new(value.title)?,
            slug: non_blank(value.slug).map(Slug::new).transpose()?,
            excerpt: value.excerpt.trim().to_string(),
            content: value.content,
            featured_image: non_blank(value.featured_image)
                .map(ImagePath::new)
                .transpose()?,
            images: value
                .images
                .into_iter()
                .map(ImagePath::new)
                .collect::<Result<Vec<_>, _>>()?,
            author: PersonName::new(value.author)?,
            author_id: non_blank(value.author_id).map(UserId::new).transpose()?,
            category: value.category.trim().to_string(),
            tags: value
                .tags
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            business_id: non_blank(value.business_id)
                .map(BusinessId::new)
                .transpose()?,
            is_published: value.is_published,
            is_featured: value.is_featured,
            publish_date: value.publish_date,
        })
    }
}
