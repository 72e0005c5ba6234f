use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    BusinessId, HelpfulVotes, ImagePath, PersonName, ReviewContent, ReviewId, ReviewRating, UserId,
};

/// Reply left by the business on a review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub content: String,
    pub author_name: PersonName,
    pub date_created: NaiveDateTime,
}

/// Optional structured details attached to a review.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewMetadata {
    #[serde(default)]
    pub visit_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub recommended_for: Vec<String>,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
}

impl ReviewMetadata {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// A user's review of a business.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub business_id: BusinessId,
    pub user_id: UserId,
    pub user_name: PersonName,
    pub rating: ReviewRating,
    pub title: Option<String>,
    pub content: ReviewContent,
    pub images: Vec<ImagePath>,
    pub is_verified: bool,
    pub is_helpful: HelpfulVotes,
    pub response: Option<ReviewResponse>,
    pub metadata: Option<ReviewMetadata>,
    pub date_created: NaiveDateTime,
    pub date_updated: Option<NaiveDateTime>,
}

/// Data required to insert a new [`Review`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewReview {
    pub id: ReviewId,
    pub business_id: BusinessId,
    pub user_id: UserId,
    pub user_name: PersonName,
    pub rating: ReviewRating,
    pub title: Option<String>,
    pub content: ReviewContent,
    pub images: Vec<ImagePath>,
    pub metadata: Option<ReviewMetadata>,
    pub date_created: NaiveDateTime,
}
