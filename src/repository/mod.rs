use chrono::NaiveDateTime;

use crate::db::{DbConnection, DbPool};
use crate::domain::analytics::{AnalyticsEvent, AnalyticsSummary, EntityType};
use crate::domain::blog_post::BlogPost;
use crate::domain::business::Business;
use crate::domain::category::{Category, NewCategory};
use crate::domain::custom_field::{CustomFieldDefinition, CustomFieldEntity};
use crate::domain::review::{NewReview, Review, ReviewResponse};
use crate::domain::types::{BlogPostId, BusinessId, CategoryId, ReviewId, Slug, UserId};
use crate::domain::user::User;
use crate::pagination::Pagination;
use crate::repository::errors::RepositoryResult;

pub mod analytics;
pub mod blog_post;
pub mod business;
pub mod category;
pub mod custom_field;
pub mod errors;
pub mod review;
#[cfg(test)]
pub mod test;
pub mod user;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Query parameters for listing blog posts.
#[derive(Debug, Clone, Default)]
pub struct BlogPostListQuery {
    /// Only posts whose category equals this label.
    pub category: Option<String>,
    /// Include drafts as well as published posts.
    pub include_unpublished: bool,
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl BlogPostListQuery {
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
    pub fn include_unpublished(mut self) -> Self {
        self.include_unpublished = true;
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination::new(page, per_page));
        self
    }
}

/// Read-only operations for business entities.
pub trait BusinessReader {
    /// List every business, active or not, in insertion order.
    fn list_businesses(&self) -> RepositoryResult<Vec<Business>>;
    /// Retrieve a business by its identifier regardless of its active flag.
    fn get_business_by_id(&self, id: &BusinessId) -> RepositoryResult<Option<Business>>;
    /// Retrieve a business by its slug.
    fn get_business_by_slug(&self, slug: &Slug) -> RepositoryResult<Option<Business>>;
    /// Number of stored businesses.
    fn count_businesses(&self) -> RepositoryResult<usize>;
}

/// Write operations for business entities.
pub trait BusinessWriter {
    /// Persist a new business.
    fn create_business(&self, business: &Business) -> RepositoryResult<usize>;
    /// Overwrite every mutable column of an existing business.
    fn update_business(&self, business: &Business) -> RepositoryResult<usize>;
    /// Add one to the view counter.
    fn increment_business_views(&self, id: &BusinessId) -> RepositoryResult<usize>;
    /// Soft delete: clear the active flag and touch `last_updated`.
    fn deactivate_business(&self, id: &BusinessId, now: NaiveDateTime) -> RepositoryResult<usize>;
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List categories by sort order with live counts of active businesses.
    fn list_categories(&self, include_inactive: bool) -> RepositoryResult<Vec<Category>>;
    /// Retrieve a category by its identifier.
    fn get_category_by_id(&self, id: &CategoryId) -> RepositoryResult<Option<Category>>;
    /// Retrieve a category by its slug.
    fn get_category_by_slug(&self, slug: &Slug) -> RepositoryResult<Option<Category>>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    /// Persist a new category.
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<usize>;
    /// Move a category under `parent_id`, or to the top level when `None`.
    fn set_category_parent(
        &self,
        id: &CategoryId,
        parent_id: Option<&CategoryId>,
        now: NaiveDateTime,
    ) -> RepositoryResult<usize>;
}

/// Read-only operations for review entities.
pub trait ReviewReader {
    /// List reviews of a business, newest first.
    fn list_reviews_for_business(&self, business_id: &BusinessId)
    -> RepositoryResult<Vec<Review>>;
    /// Retrieve a review by its identifier.
    fn get_review_by_id(&self, id: &ReviewId) -> RepositoryResult<Option<Review>>;
}

/// Write operations for review entities.
///
/// Creating or deleting a review recomputes the business rating and review
/// count in the same transaction.
pub trait ReviewWriter {
    /// Persist a new review.
    fn create_review(&self, review: &NewReview) -> RepositoryResult<usize>;
    /// Remove a review.
    fn delete_review(&self, id: &ReviewId) -> RepositoryResult<usize>;
    /// Add one helpful vote.
    fn mark_review_helpful(&self, id: &ReviewId) -> RepositoryResult<usize>;
    /// Attach or replace the business response.
    fn set_review_response(
        &self,
        id: &ReviewId,
        response: &ReviewResponse,
    ) -> RepositoryResult<usize>;
}

/// Read-only operations for blog posts.
pub trait BlogPostReader {
    /// List posts matching the query, newest publish date first.
    fn list_blog_posts(&self, query: BlogPostListQuery)
    -> RepositoryResult<(usize, Vec<BlogPost>)>;
    /// Retrieve a post by its slug.
    fn get_blog_post_by_slug(&self, slug: &Slug) -> RepositoryResult<Option<BlogPost>>;
}

/// Write operations for blog posts.
pub trait BlogPostWriter {
    /// Persist a new post.
    fn create_blog_post(&self, post: &BlogPost) -> RepositoryResult<usize>;
    /// Add one to the view counter.
    fn increment_blog_post_views(&self, id: &BlogPostId) -> RepositoryResult<usize>;
}

/// Read-only operations for users.
pub trait UserReader {
    /// Retrieve a user by identifier.
    fn get_user_by_id(&self, id: &UserId) -> RepositoryResult<Option<User>>;
}

/// Write operations for users.
pub trait UserWriter {
    /// Persist a new user.
    fn create_user(&self, user: &User) -> RepositoryResult<usize>;
}

/// Read-only operations for saved businesses.
pub trait SavedBusinessReader {
    /// Businesses saved by a user, most recently saved first.
    fn list_saved_businesses(&self, user_id: &UserId) -> RepositoryResult<Vec<Business>>;
}

/// Write operations for saved businesses.
pub trait SavedBusinessWriter {
    /// Save a business for a user. Returns 0 when it was already saved.
    fn save_business(
        &self,
        user_id: &UserId,
        business_id: &BusinessId,
        now: NaiveDateTime,
    ) -> RepositoryResult<usize>;
    /// Remove a saved business. Returns 0 when it was not saved.
    fn unsave_business(&self, user_id: &UserId, business_id: &BusinessId)
    -> RepositoryResult<usize>;
}

/// Read-only operations for analytics.
pub trait AnalyticsReader {
    /// Totals of the summarized event types for one entity.
    fn analytics_summary(
        &self,
        entity_type: EntityType,
        entity_id: &str,
    ) -> RepositoryResult<AnalyticsSummary>;
}

/// Write operations for analytics.
pub trait AnalyticsWriter {
    /// Append an event.
    fn record_event(&self, event: &AnalyticsEvent) -> RepositoryResult<usize>;
}

/// Read-only operations for custom field definitions.
pub trait CustomFieldReader {
    /// Definitions for an entity type ordered by display order.
    fn list_custom_fields(
        &self,
        entity_type: CustomFieldEntity,
    ) -> RepositoryResult<Vec<CustomFieldDefinition>>;
}

/// Write operations for custom field definitions.
pub trait CustomFieldWriter {
    /// Persist a new definition.
    fn create_custom_field(&self, definition: &CustomFieldDefinition) -> RepositoryResult<usize>;
}
