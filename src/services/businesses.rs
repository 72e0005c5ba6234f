use std::collections::BTreeMap;

use chrono::Utc;
use serde_json::Value;

use crate::domain::analytics::{AnalyticsEvent, EntityType, EventType};
use crate::domain::business::Business;
use crate::domain::custom_field::{CustomFieldEntity, CustomFields};
use crate::domain::query::SearchRequest;
use crate::domain::types::{BusinessId, CategoryId, Slug};
use crate::forms::businesses::{
    ClaimBusinessPayload, CreateBusinessPayload, UpdateBusinessPayload,
};
use crate::pagination::Page;
use crate::repository::{
    AnalyticsWriter, BusinessReader, BusinessWriter, CategoryReader, CustomFieldReader,
    UserReader,
};
use crate::search;
use crate::services::analytics::track_event;

use super::{ServiceError, ServiceResult, repository_failure, unique_slug};

/// Checks loose custom field values against the stored business definitions.
fn checked_custom_fields<R>(raw: BTreeMap<String, Value>, repo: &R) -> ServiceResult<CustomFields>
where
    R: CustomFieldReader,
{
    let definitions = repo
        .list_custom_fields(CustomFieldEntity::Business)
        .map_err(|e| repository_failure("list custom fields", e))?;
    Ok(CustomFields::from_loose(raw, &definitions)?)
}

/// Display label of an existing category; unknown ids are a form error.
fn category_label<R>(repo: &R, category_id: &CategoryId) -> ServiceResult<String>
where
    R: CategoryReader,
{
    match repo.get_category_by_id(category_id) {
        Ok(Some(category)) => Ok(category.name.into_inner()),
        Ok(None) => Err(ServiceError::Form(format!(
            "Category {category_id} does not exist"
        ))),
        Err(e) => Err(repository_failure("load category", e)),
    }
}

fn load_business<R>(id: &BusinessId, repo: &R) -> ServiceResult<Business>
where
    R: BusinessReader,
{
    match repo.get_business_by_id(id) {
        Ok(Some(business)) => Ok(business),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => Err(repository_failure("load business", e)),
    }
}

/// Filters, orders and pages the active businesses in the store.
pub fn search_businesses<R>(
    request: &SearchRequest,
    default_limit: usize,
    repo: &R,
) -> ServiceResult<Page<Business>>
where
    R: BusinessReader,
{
    let businesses = repo
        .list_businesses()
        .map_err(|e| repository_failure("list businesses", e))?;
    Ok(search::search_businesses(&businesses, request, default_limit))
}

/// Counts a view of `business` and returns it with the new counter.
fn record_view<R>(mut business: Business, repo: &R) -> Business
where
    R: BusinessWriter + AnalyticsWriter,
{
    match repo.increment_business_views(&business.id) {
        Ok(affected) if affected > 0 => business.view_count = business.view_count.incremented(),
        Ok(_) => {}
        Err(e) => log::warn!("Failed to count view of business {}: {e}", business.id),
    }

    let event = AnalyticsEvent::new(
        EntityType::Business,
        business.id.as_str(),
        EventType::View,
        Utc::now().naive_utc(),
    );
    track_event(&event, repo);
    business
}

/// Returns a business by id, including inactive ones, and counts the view.
pub fn get_business<R>(id: &str, repo: &R) -> ServiceResult<Business>
where
    R: BusinessReader + BusinessWriter + AnalyticsWriter,
{
    let id = BusinessId::new(id).map_err(|_| ServiceError::NotFound)?;
    let business = load_business(&id, repo)?;
    Ok(record_view(business, repo))
}

/// Returns a business by slug and counts the view.
pub fn get_business_by_slug<R>(slug: &str, repo: &R) -> ServiceResult<Business>
where
    R: BusinessReader + BusinessWriter + AnalyticsWriter,
{
    let slug = Slug::new(slug).map_err(|_| ServiceError::NotFound)?;
    let business = match repo.get_business_by_slug(&slug) {
        Ok(Some(business)) => business,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => return Err(repository_failure("load business", e)),
    };
    Ok(record_view(business, repo))
}

pub fn create_business<R>(payload: CreateBusinessPayload, repo: &R) -> ServiceResult<Business>
where
    R: BusinessReader + BusinessWriter + CategoryReader + CustomFieldReader + AnalyticsWriter,
{
    let CreateBusinessPayload {
        mut business,
        custom_fields,
    } = payload;

    let category = category_label(repo, &business.category_id)?;
    business.custom_fields = checked_custom_fields(custom_fields, repo)?;

    let id = BusinessId::generate();
    let base = Slug::from_text_or_id(business.name.as_str(), "business", id.as_str())?;
    let slug = unique_slug(base, |candidate| {
        Ok(repo.get_business_by_slug(candidate)?.is_some())
    })
    .map_err(|e| repository_failure("check business slug", e))?;

    let now = Utc::now().naive_utc();
    let business = business.into_business(id, slug, category, now);

    repo.create_business(&business)
        .map_err(|e| repository_failure("create business", e))?;

    let event = AnalyticsEvent::new(
        EntityType::Business,
        business.id.as_str(),
        EventType::Create,
        now,
    );
    track_event(&event, repo);

    log::info!("Created business {} ({})", business.name, business.id);
    Ok(business)
}

/// Shallow-merges `payload` into the stored business.
pub fn update_business<R>(
    id: &str,
    payload: UpdateBusinessPayload,
    repo: &R,
) -> ServiceResult<Business>
where
    R: BusinessReader + BusinessWriter + CategoryReader + CustomFieldReader + AnalyticsWriter,
{
    let id = BusinessId::new(id).map_err(|_| ServiceError::NotFound)?;
    let mut business = load_business(&id, repo)?;

    let UpdateBusinessPayload {
        mut patch,
        custom_fields,
    } = payload;

    let category = match &patch.category_id {
        Some(category_id) => Some(category_label(repo, category_id)?),
        None => None,
    };
    if let Some(raw) = custom_fields {
        patch.custom_fields = Some(checked_custom_fields(raw, repo)?);
    }

    let now = Utc::now().naive_utc();
    patch.apply(&mut business, now);
    if let Some(category) = category {
        business.category = category;
    }

    match repo.update_business(&business) {
        Ok(0) => return Err(ServiceError::NotFound),
        Ok(_) => {}
        Err(e) => return Err(repository_failure("update business", e)),
    }

    let event = AnalyticsEvent::new(
        EntityType::Business,
        business.id.as_str(),
        EventType::Update,
        now,
    );
    track_event(&event, repo);

    Ok(business)
}

/// Hides a business from listings; it stays reachable by id.
pub fn soft_delete_business<R>(id: &str, repo: &R) -> ServiceResult<()>
where
    R: BusinessReader + BusinessWriter + AnalyticsWriter,
{
    let id = BusinessId::new(id).map_err(|_| ServiceError::NotFound)?;
    let now = Utc::now().naive_utc();

    match repo.deactivate_business(&id, now) {
        Ok(0) => return Err(ServiceError::NotFound),
        Ok(_) => {}
        Err(e) => return Err(repository_failure("deactivate business", e)),
    }

    let event = AnalyticsEvent::new(EntityType::Business, id.as_str(), EventType::Delete, now);
    track_event(&event, repo);

    Ok(())
}

/// Marks a business as claimed by a user.
///
/// Claiming again by the same user is a no-op; a business claimed by someone
/// else is a conflict.
pub fn claim_business<R>(
    id: &str,
    payload: ClaimBusinessPayload,
    repo: &R,
) -> ServiceResult<Business>
where
    R: BusinessReader + BusinessWriter + UserReader + AnalyticsWriter,
{
    let id = BusinessId::new(id).map_err(|_| ServiceError::NotFound)?;
    let mut business = load_business(&id, repo)?;

    match repo.get_user_by_id(&payload.user_id) {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Err(ServiceError::Form(format!(
                "User {} does not exist",
                payload.user_id
            )));
        }
        Err(e) => return Err(repository_failure("load user", e)),
    }

    match &business.claimed_by {
        Some(owner) if owner == &payload.user_id => return Ok(business),
        Some(_) => {
            return Err(ServiceError::Conflict(
                "business is already claimed".to_string(),
            ));
        }
        None => {}
    }

    let now = Utc::now().naive_utc();
    business.claimed_by = Some(payload.user_id.clone());
    business.claimed_at = Some(now);
    if business.owner_id.is_none() {
        business.owner_id = Some(payload.user_id.clone());
    }
    business.last_updated = now.max(business.date_added);

    repo.update_business(&business)
        .map_err(|e| repository_failure("claim business", e))?;

    let event = AnalyticsEvent::new(
        EntityType::Business,
        business.id.as_str(),
        EventType::Update,
        now,
    )
    .with_user(payload.user_id)
    .with_metadata("action", "claim");
    track_event(&event, repo);

    Ok(business)
}
