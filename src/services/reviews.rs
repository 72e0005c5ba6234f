use chrono::Utc;

use crate::domain::analytics::{AnalyticsEvent, EntityType, EventType};
use crate::domain::review::{NewReview, Review, ReviewResponse};
use crate::domain::types::{BusinessId, ReviewId};
use crate::forms::reviews::{CreateReviewPayload, ReviewResponsePayload};
use crate::repository::{
    AnalyticsWriter, BusinessReader, ReviewReader, ReviewWriter, UserReader,
};
use crate::services::analytics::track_event;

use super::{ServiceError, ServiceResult, repository_failure};

fn load_review<R>(id: &ReviewId, repo: &R) -> ServiceResult<Review>
where
    R: ReviewReader,
{
    match repo.get_review_by_id(id) {
        Ok(Some(review)) => Ok(review),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => Err(repository_failure("load review", e)),
    }
}

/// Reviews of a business, newest first.
pub fn list_reviews<R>(business_id: &str, repo: &R) -> ServiceResult<Vec<Review>>
where
    R: BusinessReader + ReviewReader,
{
    let business_id = BusinessId::new(business_id).map_err(|_| ServiceError::NotFound)?;
    match repo.get_business_by_id(&business_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => return Err(repository_failure("load business", e)),
    }

    repo.list_reviews_for_business(&business_id)
        .map_err(|e| repository_failure("list reviews", e))
}

/// Stores a review and returns it; the business rating is recomputed by the
/// store in the same write.
pub fn create_review<R>(
    business_id: &str,
    payload: CreateReviewPayload,
    repo: &R,
) -> ServiceResult<Review>
where
    R: BusinessReader + ReviewReader + ReviewWriter + UserReader + AnalyticsWriter,
{
    let business_id = BusinessId::new(business_id).map_err(|_| ServiceError::NotFound)?;
    let business = match repo.get_business_by_id(&business_id) {
        Ok(Some(business)) => business,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => return Err(repository_failure("load business", e)),
    };
    if !business.is_active {
        return Err(ServiceError::Form(
            "Inactive businesses cannot be reviewed".to_string(),
        ));
    }

    let user = match repo.get_user_by_id(&payload.user_id) {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Err(ServiceError::Form(format!(
                "User {} does not exist",
                payload.user_id
            )));
        }
        Err(e) => return Err(repository_failure("load user", e)),
    };

    let now = Utc::now().naive_utc();
    let review = NewReview {
        id: ReviewId::generate(),
        business_id: business.id,
        user_id: user.id,
        user_name: user.name,
        rating: payload.rating,
        title: payload.title,
        content: payload.content,
        images: payload.images,
        metadata: payload.metadata,
        date_created: now,
    };

    repo.create_review(&review)
        .map_err(|e| repository_failure("create review", e))?;

    let event = AnalyticsEvent::new(
        EntityType::Business,
        review.business_id.as_str(),
        EventType::Update,
        now,
    )
    .with_user(review.user_id.clone())
    .with_metadata("reviewId", review.id.as_str())
    .with_metadata("action", "review_created");
    track_event(&event, repo);

    load_review(&review.id, repo)
}

pub fn delete_review<R>(id: &str, repo: &R) -> ServiceResult<()>
where
    R: ReviewReader + ReviewWriter + AnalyticsWriter,
{
    let id = ReviewId::new(id).map_err(|_| ServiceError::NotFound)?;
    let review = load_review(&id, repo)?;

    match repo.delete_review(&id) {
        Ok(0) => return Err(ServiceError::NotFound),
        Ok(_) => {}
        Err(e) => return Err(repository_failure("delete review", e)),
    }

    let event = AnalyticsEvent::new(
        EntityType::Business,
        review.business_id.as_str(),
        EventType::Update,
        Utc::now().naive_utc(),
    )
    .with_metadata("reviewId", id.as_str())
    .with_metadata("action", "review_deleted");
    track_event(&event, repo);

    Ok(())
}

/// Adds one helpful vote and returns the updated review.
pub fn mark_review_helpful<R>(id: &str, repo: &R) -> ServiceResult<Review>
where
    R: ReviewReader + ReviewWriter,
{
    let id = ReviewId::new(id).map_err(|_| ServiceError::NotFound)?;
    match repo.mark_review_helpful(&id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => load_review(&id, repo),
        Err(e) => Err(repository_failure("mark review helpful", e)),
    }
}

/// Attaches the business's reply, replacing any earlier one.
pub fn respond_to_review<R>(
    id: &str,
    payload: ReviewResponsePayload,
    repo: &R,
) -> ServiceResult<Review>
where
    R: ReviewReader + ReviewWriter + AnalyticsWriter,
{
    let id = ReviewId::new(id).map_err(|_| ServiceError::NotFound)?;
    let now = Utc::now().naive_utc();
    let response = ReviewResponse {
        content: payload.content,
        author_name: payload.author_name,
        date_created: now,
    };

    match repo.set_review_response(&id, &response) {
        Ok(0) => return Err(ServiceError::NotFound),
        Ok(_) => {}
        Err(e) => return Err(repository_failure("respond to review", e)),
    }

    let review = load_review(&id, repo)?;
    let event = AnalyticsEvent::new(
        EntityType::Business,
        review.business_id.as_str(),
        EventType::Update,
        now,
    )
    .with_metadata("reviewId", id.as_str())
    .with_metadata("action", "review_response");
    track_event(&event, repo);

    Ok(review)
}
