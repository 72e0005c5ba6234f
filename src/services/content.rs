//! Content API facade. Every call answers, from the remote source or from
//! the sample directory.

use crate::client::DirectoryClient;
use crate::domain::business::{Business, BusinessFilters, SubmittedBusiness};
use crate::domain::category::Category;
use crate::domain::custom_field::CustomFields;
use crate::domain::query::SearchRequest;
use crate::forms::businesses::CreateBusinessPayload;
use crate::pagination::Page;

use super::ServiceResult;

pub async fn content_categories(client: &DirectoryClient) -> Vec<Category> {
    client.get_categories().await
}

pub async fn content_businesses(
    filters: &BusinessFilters,
    client: &DirectoryClient,
) -> Vec<Business> {
    client.get_businesses(filters).await
}

pub async fn content_search(request: &SearchRequest, client: &DirectoryClient) -> Page<Business> {
    client.search_businesses(request).await
}

/// Checks custom fields against the directory definitions, then submits the
/// listing for moderation.
pub async fn submit_business(
    payload: CreateBusinessPayload,
    client: &DirectoryClient,
) -> ServiceResult<SubmittedBusiness> {
    let CreateBusinessPayload {
        mut business,
        custom_fields,
    } = payload;
    business.custom_fields =
        CustomFields::from_loose(custom_fields, client.custom_field_definitions())?;

    let submitted = client.submit_business(&business).await;
    log::info!(
        "Submitted business {} as {}",
        submitted.submission.name,
        submitted.id
    );
    Ok(submitted)
}
