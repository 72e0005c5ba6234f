use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::review::ReviewMetadata;
use crate::domain::types::{
    ImagePath, PersonName, ReviewContent, ReviewRating, TypeConstraintError, UserId,
};
use crate::forms::non_blank;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewForm {
    #[validate(length(min = 1))]
    pub user_id: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub metadata: Option<ReviewMetadata>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateReviewPayload {
    pub user_id: UserId,
    pub rating: ReviewRating,
    pub title: Option<String>,
    pub content: ReviewContent,
    pub images: Vec<ImagePath>,
    pub metadata: Option<ReviewMetadata>,
}

#[derive(Debug, Error)]
pub enum CreateReviewFormError {
    #[error("Review form validation failed: {0}")]
    Validation(String),
    #[error("Review form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for CreateReviewFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CreateReviewFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<CreateReviewForm> for CreateReviewPayload {
    type Error = CreateReviewFormError;

    fn try_from(value: CreateReviewForm) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            user_id: UserId::new(value.user_id)?,
            rating: ReviewRating::new(value.rating)?,
            title: non_blank(value.title),
            content: ReviewContent::new(value.content)?,
            images: value
                .images
                .into_iter()
                .map(ImagePath::new)
                .collect::<Result<Vec<_>, _>>()?,
            metadata: value.metadata.filter(|m| !m.is_empty()),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponseForm {
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
    #[validate(length(min = 1))]
    pub author_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewResponsePayload {
    pub content: String,
    pub author_name: PersonName,
}

#[derive(Debug, Error)]
pub enum ReviewResponseFormError {
    #[error("Response form validation failed: {0}")]
    Validation(String),
    #[error("Response form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for ReviewResponseFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ReviewResponseFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<ReviewResponseForm> for ReviewResponsePayload {
    type Error = ReviewResponseFormError;

    fn try_from(value: ReviewResponseForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let content = value.content.trim().to_string();
        if content.is_empty() {
            return Err(TypeConstraintError::EmptyString("response").into());
        }

        Ok(Self {
            content,
            author_name: PersonName::new(value.author_name)?,
        })
    }
}
