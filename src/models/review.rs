use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::review::{NewReview as DomainNewReview, Review as DomainReview};
use crate::domain::types::{
    BusinessId, HelpfulVotes, PersonName, ReviewContent, ReviewId, ReviewRating,
    TypeConstraintError, UserId,
};
use crate::models::{from_json, from_json_opt, to_json};

/// Diesel model representing the `reviews` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::reviews)]
pub struct Review {
    pub id: String,
    pub business_id: String,
    pub user_id: String,
    pub user_name: String,
    pub rating: i32,
    pub title: Option<String>,
    pub content: String,
    pub images: String,
    pub is_verified: bool,
    pub is_helpful: i32,
    pub response: Option<String>,
    pub metadata: Option<String>,
    pub date_created: NaiveDateTime,
    pub date_updated: Option<NaiveDateTime>,
}

/// Insertable form of [`Review`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::reviews)]
pub struct NewReview {
    pub id: String,
    pub business_id: String,
    pub user_id: String,
    pub user_name: String,
    pub rating: i32,
    pub title: Option<String>,
    pub content: String,
    pub images: String,
    pub metadata: Option<String>,
    pub date_created: NaiveDateTime,
}

impl TryFrom<Review> for DomainReview {
    type Error = TypeConstraintError;

    fn try_from(review: Review) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ReviewId::new(review.id)?,
            business_id: BusinessId::new(review.business_id)?,
            user_id: UserId::new(review.user_id)?,
            user_name: PersonName::new(review.user_name)?,
            rating: ReviewRating::new(review.rating)?,
            title: review.title,
            content: ReviewContent::new(review.content)?,
            images: from_json("images", &review.images)?,
            is_verified: review.is_verified,
            is_helpful: HelpfulVotes::new(review.is_helpful)?,
            response: from_json_opt("response", review.response.as_deref())?,
            metadata: from_json_opt("metadata", review.metadata.as_deref())?,
            date_created: review.date_created,
            date_updated: review.date_updated,
        })
    }
}

impl TryFrom<&DomainNewReview> for NewReview {
    type Error = serde_json::Error;

    fn try_from(review: &DomainNewReview) -> Result<Self, Self::Error> {
        Ok(Self {
            id: review.id.to_string(),
            business_id: review.business_id.to_string(),
            user_id: review.user_id.to_string(),
            user_name: review.user_name.to_string(),
            rating: review.rating.get(),
            title: review.title.clone(),
            content: review.content.to_string(),
            images: to_json(&review.images)?,
            metadata: review
                .metadata
                .as_ref()
                .filter(|m| !m.is_empty())
                .map(to_json)
                .transpose()?,
            date_created: review.date_created,
        })
    }
}
