use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDateTime;

use crate::domain::analytics::{AnalyticsEvent, AnalyticsSummary, EntityType};
use crate::domain::blog_post::BlogPost;
use crate::domain::business::{Business, UNCATEGORIZED};
use crate::domain::category::{Category, NewCategory};
use crate::domain::custom_field::{CustomFieldDefinition, CustomFieldEntity};
use crate::domain::review::{NewReview, Review, ReviewResponse};
use crate::domain::types::{
    BlogPostId, BusinessCount, BusinessId, CategoryId, HelpfulVotes, Rating, ReviewCount, ReviewId,
    Slug, UserId,
};
use crate::domain::user::{SavedBusiness, User};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    AnalyticsReader, AnalyticsWriter, BlogPostListQuery, BlogPostReader, BlogPostWriter,
    BusinessReader, BusinessWriter, CategoryReader, CategoryWriter, CustomFieldReader,
    CustomFieldWriter, ReviewReader, ReviewWriter, SavedBusinessReader, SavedBusinessWriter,
    UserReader, UserWriter,
};
use crate::sample::{SampleDirectory, seed_store};

#[derive(Default)]
struct State {
    businesses: Vec<Business>,
    categories: Vec<Category>,
    reviews: Vec<Review>,
    blog_posts: Vec<BlogPost>,
    users: Vec<User>,
    saved: Vec<SavedBusiness>,
    events: Vec<AnalyticsEvent>,
    custom_fields: Vec<CustomFieldDefinition>,
}

impl State {
    fn category_label(&self, id: &CategoryId) -> String {
        self.categories
            .iter()
            .find(|c| &c.id == id)
            .map(|c| c.name.to_string())
            .unwrap_or_else(|| UNCATEGORIZED.to_string())
    }

    fn with_count(&self, category: &Category) -> Category {
        let count = self
            .businesses
            .iter()
            .filter(|b| b.is_active && b.category_id == category.id)
            .count();
        let mut category = category.clone();
        category.count = BusinessCount::new(count as i32).unwrap_or_default();
        category
    }

    fn resolve(&self, business: &Business) -> Business {
        let mut business = business.clone();
        business.category = self.category_label(&business.category_id);
        business
    }

    fn recompute_rating(&mut self, business_id: &BusinessId) {
        let scores: Vec<_> = self
            .reviews
            .iter()
            .filter(|r| &r.business_id == business_id)
            .map(|r| r.rating)
            .collect();
        if let Some(business) = self.businesses.iter_mut().find(|b| &b.id == business_id) {
            business.rating = Rating::average_of(&scores);
            business.review_count = ReviewCount::new(scores.len() as i32).unwrap_or_default();
        }
    }
}

/// Simple in-memory repository used for unit tests.
///
/// Mirrors the uniqueness rules of the SQLite schema so that services see the
/// same `Conflict` errors they would in production.
#[derive(Default)]
pub struct TestRepository {
    state: Mutex<State>,
    failing: bool,
}

impl TestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-populated with the sample directory.
    pub fn with_sample() -> Self {
        let repo = Self::new();
        let sample = SampleDirectory::load().expect("sample directory is valid");
        seed_store(&repo, &sample).expect("empty test repository accepts the sample");
        repo
    }

    /// Repository whose every call fails, for error-path tests.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Events recorded so far.
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.state().events.clone()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check(&self) -> RepositoryResult<()> {
        if self.failing {
            return Err(RepositoryError::Migration("test repository failure".into()));
        }
        Ok(())
    }
}

impl BusinessReader for TestRepository {
    fn list_businesses(&self) -> RepositoryResult<Vec<Business>> {
        self.check()?;
        let state = self.state();
        Ok(state.businesses.iter().map(|b| state.resolve(b)).collect())
    }

    fn get_business_by_id(&self, id: &BusinessId) -> RepositoryResult<Option<Business>> {
        self.check()?;
        let state = self.state();
        Ok(state
            .businesses
            .iter()
            .find(|b| &b.id == id)
            .map(|b| state.resolve(b)))
    }

    fn get_business_by_slug(&self, slug: &Slug) -> RepositoryResult<Option<Business>> {
        self.check()?;
        let state = self.state();
        Ok(state
            .businesses
            .iter()
            .find(|b| &b.slug == slug)
            .map(|b| state.resolve(b)))
    }

    fn count_businesses(&self) -> RepositoryResult<usize> {
        self.check()?;
        Ok(self.state().businesses.len())
    }
}

impl BusinessWriter for TestRepository {
    fn create_business(&self, business: &Business) -> RepositoryResult<usize> {
        self.check()?;
        let mut state = self.state();
        if state
            .businesses
            .iter()
            .any(|b| b.id == business.id || b.slug == business.slug)
        {
            return Err(RepositoryError::Conflict("businesses.slug".into()));
        }
        state.businesses.push(business.clone());
        Ok(1)
    }

    fn update_business(&self, business: &Business) -> RepositoryResult<usize> {
        self.check()?;
        let mut state = self.state();
        match state.businesses.iter_mut().find(|b| b.id == business.id) {
            Some(stored) => {
                *stored = business.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn increment_business_views(&self, id: &BusinessId) -> RepositoryResult<usize> {
        self.check()?;
        let mut state = self.state();
        match state.businesses.iter_mut().find(|b| &b.id == id) {
            Some(stored) => {
                stored.view_count = stored.view_count.incremented();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn deactivate_business(&self, id: &BusinessId, now: NaiveDateTime) -> RepositoryResult<usize> {
        self.check()?;
        let mut state = self.state();
        match state.businesses.iter_mut().find(|b| &b.id == id) {
            Some(stored) => {
                stored.is_active = false;
                stored.is_pending = false;
                stored.last_updated = now;
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

impl CategoryReader for TestRepository {
    fn list_categories(&self, include_inactive: bool) -> RepositoryResult<Vec<Category>> {
        self.check()?;
        let state = self.state();
        let mut items: Vec<Category> = state
            .categories
            .iter()
            .filter(|c| include_inactive || c.is_active)
            .map(|c| state.with_count(c))
            .collect();
        items.sort_by_key(|c| c.sort_order);
        Ok(items)
    }

    fn get_category_by_id(&self, id: &CategoryId) -> RepositoryResult<Option<Category>> {
        self.check()?;
        let state = self.state();
        Ok(state
            .categories
            .iter()
            .find(|c| &c.id == id)
            .map(|c| state.with_count(c)))
    }

    fn get_category_by_slug(&self, slug: &Slug) -> RepositoryResult<Option<Category>> {
        self.check()?;
        let state = self.state();
        Ok(state
            .categories
            .iter()
            .find(|c| &c.slug == slug)
            .map(|c| state.with_count(c)))
    }
}

impl CategoryWriter for TestRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<usize> {
        self.check()?;
        let mut state = self.state();
        if state
            .categories
            .iter()
            .any(|c| c.id == category.id || c.slug == category.slug)
        {
            return Err(RepositoryError::Conflict("categories.slug".into()));
        }
        state.categories.push(Category {
            id: category.id.clone(),
            name: category.name.clone(),
            slug: category.slug.clone(),
            icon: category.icon.clone(),
            description: category.description.clone(),
            parent_id: category.parent_id.clone(),
            count: BusinessCount::default(),
            is_active: true,
            sort_order: category.sort_order,
            created_at: category.created_at,
            updated_at: category.created_at,
        });
        Ok(1)
    }

    fn set_category_parent(
        &self,
        id: &CategoryId,
        parent_id: Option<&CategoryId>,
        now: NaiveDateTime,
    ) -> RepositoryResult<usize> {
        self.check()?;
        let mut state = self.state();
        match state.categories.iter_mut().find(|c| &c.id == id) {
            Some(stored) => {
                stored.parent_id = parent_id.cloned();
                stored.updated_at = now;
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

impl ReviewReader for TestRepository {
    fn list_reviews_for_business(
        &self,
        business_id: &BusinessId,
    ) -> RepositoryResult<Vec<Review>> {
        self.check()?;
        let mut items: Vec<Review> = self
            .state()
            .reviews
            .iter()
            .filter(|r| &r.business_id == business_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.date_created.cmp(&a.date_created));
        Ok(items)
    }

    fn get_review_by_id(&self, id: &ReviewId) -> RepositoryResult<Option<Review>> {
        self.check()?;
        Ok(self.state().reviews.iter().find(|r| &r.id == id).cloned())
    }
}

impl ReviewWriter for TestRepository {
    fn create_review(&self, review: &NewReview) -> RepositoryResult<usize> {
        self.check()?;
        let mut state = self.state();
        if state
            .reviews
            .iter()
            .any(|r| r.business_id == review.business_id && r.user_id == review.user_id)
        {
            return Err(RepositoryError::Conflict(
                "reviews.business_id, reviews.user_id".into(),
            ));
        }
        state.reviews.push(Review {
            id: review.id.clone(),
            business_id: review.business_id.clone(),
            user_id: review.user_id.clone(),
            user_name: review.user_name.clone(),
            rating: review.rating,
            title: review.title.clone(),
            content: review.content.clone(),
            images: review.images.clone(),
            is_verified: false,
            is_helpful: HelpfulVotes::default(),
            response: None,
            metadata: review.metadata.clone(),
            date_created: review.date_created,
            date_updated: None,
        });
        state.recompute_rating(&review.business_id);
        Ok(1)
    }

    fn delete_review(&self, id: &ReviewId) -> RepositoryResult<usize> {
        self.check()?;
        let mut state = self.state();
        let Some(position) = state.reviews.iter().position(|r| &r.id == id) else {
            return Ok(0);
        };
        let removed = state.reviews.remove(position);
        state.recompute_rating(&removed.business_id);
        Ok(1)
    }

    fn mark_review_helpful(&self, id: &ReviewId) -> RepositoryResult<usize> {
        self.check()?;
        let mut state = self.state();
        match state.reviews.iter_mut().find(|r| &r.id == id) {
            Some(stored) => {
                stored.is_helpful = stored.is_helpful.incremented();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn set_review_response(
        &self,
        id: &ReviewId,
        response: &ReviewResponse,
    ) -> RepositoryResult<usize> {
        self.check()?;
        let mut state = self.state();
        match state.reviews.iter_mut().find(|r| &r.id == id) {
            Some(stored) => {
                stored.response = Some(response.clone());
                stored.date_updated = Some(response.date_created);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

impl BlogPostReader for TestRepository {
    fn list_blog_posts(
        &self,
        query: BlogPostListQuery,
    ) -> RepositoryResult<(usize, Vec<BlogPost>)> {
        self.check()?;
        let mut items: Vec<BlogPost> = self
            .state()
            .blog_posts
            .iter()
            .filter(|p| query.include_unpublished || p.is_published)
            .filter(|p| query.category.as_ref().is_none_or(|c| &p.category == c))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));
        let total = items.len();
        let items = match query.pagination {
            Some(pagination) => pagination.slice(items),
            None => items,
        };
        Ok((total, items))
    }

    fn get_blog_post_by_slug(&self, slug: &Slug) -> RepositoryResult<Option<BlogPost>> {
        self.check()?;
        Ok(self
            .state()
            .blog_posts
            .iter()
            .find(|p| &p.slug == slug)
            .cloned())
    }
}

impl BlogPostWriter for TestRepository {
    fn create_blog_post(&self, post: &BlogPost) -> RepositoryResult<usize> {
        self.check()?;
        let mut state = self.state();
        if state
            .blog_posts
            .iter()
            .any(|p| p.id == post.id || p.slug == post.slug)
        {
            return Err(RepositoryError::Conflict("blog_posts.slug".into()));
        }
        state.blog_posts.push(post.clone());
        Ok(1)
    }

    fn increment_blog_post_views(&self, id: &BlogPostId) -> RepositoryResult<usize> {
        self.check()?;
        let mut state = self.state();
        match state.blog_posts.iter_mut().find(|p| &p.id == id) {
            Some(stored) => {
                stored.view_count = stored.view_count.incremented();
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

impl UserReader for TestRepository {
    fn get_user_by_id(&self, id: &UserId) -> RepositoryResult<Option<User>> {
        self.check()?;
        Ok(self.state().users.iter().find(|u| &u.id == id).cloned())
    }
}

impl UserWriter for TestRepository {
    fn create_user(&self, user: &User) -> RepositoryResult<usize> {
        self.check()?;
        let mut state = self.state();
        if state
            .users
            .iter()
            .any(|u| u.id == user.id || u.email == user.email)
        {
            return Err(RepositoryError::Conflict("users.email".into()));
        }
        state.users.push(user.clone());
        Ok(1)
    }
}

impl SavedBusinessReader for TestRepository {
    fn list_saved_businesses(&self, user_id: &UserId) -> RepositoryResult<Vec<Business>> {
        self.check()?;
        let state = self.state();
        let mut saved: Vec<&SavedBusiness> =
            state.saved.iter().filter(|s| &s.user_id == user_id).collect();
        saved.sort_by(|a, b| b.date_added.cmp(&a.date_added));
        Ok(saved
            .into_iter()
            .filter_map(|s| state.businesses.iter().find(|b| b.id == s.business_id))
            .map(|b| state.resolve(b))
            .collect())
    }
}

impl SavedBusinessWriter for TestRepository {
    fn save_business(
        &self,
        user_id: &UserId,
        business_id: &BusinessId,
        now: NaiveDateTime,
    ) -> RepositoryResult<usize> {
        self.check()?;
        let mut state = self.state();
        if state
            .saved
            .iter()
            .any(|s| &s.user_id == user_id && &s.business_id == business_id)
        {
            return Ok(0);
        }
        state.saved.push(SavedBusiness {
            user_id: user_id.clone(),
            business_id: business_id.clone(),
            date_added: now,
        });
        Ok(1)
    }

    fn unsave_business(
        &self,
        user_id: &UserId,
        business_id: &BusinessId,
    ) -> RepositoryResult<usize> {
        self.check()?;
        let mut state = self.state();
        let before = state.saved.len();
        state
            .saved
            .retain(|s| !(&s.user_id == user_id && &s.business_id == business_id));
        Ok(before - state.saved.len())
    }
}

impl AnalyticsReader for TestRepository {
    fn analytics_summary(
        &self,
        entity_type: EntityType,
        entity_id: &str,
    ) -> RepositoryResult<AnalyticsSummary> {
        self.check()?;
        let mut summary = AnalyticsSummary::default();
        for event in self
            .state()
            .events
            .iter()
            .filter(|e| e.entity_type == entity_type && e.entity_id == entity_id)
        {
            summary.add(event.event_type, 1);
        }
        Ok(summary)
    }
}

impl AnalyticsWriter for TestRepository {
    fn record_event(&self, event: &AnalyticsEvent) -> RepositoryResult<usize> {
        self.check()?;
        self.state().events.push(event.clone());
        Ok(1)
    }
}

impl CustomFieldReader for TestRepository {
    fn list_custom_fields(
        &self,
        entity_type: CustomFieldEntity,
    ) -> RepositoryResult<Vec<CustomFieldDefinition>> {
        self.check()?;
        let mut items: Vec<CustomFieldDefinition> = self
            .state()
            .custom_fields
            .iter()
            .filter(|d| d.entity_type == entity_type)
            .cloned()
            .collect();
        items.sort_by_key(|d| d.display_order);
        Ok(items)
    }
}

impl CustomFieldWriter for TestRepository {
    fn create_custom_field(&self, definition: &CustomFieldDefinition) -> RepositoryResult<usize> {
        self.check()?;
        let mut state = self.state();
        if state
            .custom_fields
            .iter()
            .any(|d| d.id == definition.id || d.key == definition.key)
        {
            return Err(RepositoryError::Conflict("custom_field_definitions.key".into()));
        }
        state.custom_fields.push(definition.clone());
        Ok(1)
    }
}
