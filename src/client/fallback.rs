use async_trait::async_trait;

use crate::domain::business::{Business, BusinessFilters, NewBusiness, SubmittedBusiness};
use crate::domain::category::Category;
use crate::domain::custom_field::CustomFieldDefinition;
use crate::domain::query::SearchRequest;
use crate::domain::types::{BusinessId, BusinessStatus};
use crate::pagination::Page;
use crate::sample::SampleDirectory;
use crate::search;

use super::{FetchResult, FetchStrategy};

/// Serves the built-in sample directory. Never fails.
#[derive(Debug, Clone)]
pub struct LocalFallback {
    sample: SampleDirectory,
    default_limit: usize,
}

impl LocalFallback {
    pub fn new(sample: SampleDirectory, default_limit: usize) -> Self {
        Self {
            sample,
            default_limit,
        }
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    pub fn custom_field_definitions(&self) -> &[CustomFieldDefinition] {
        &self.sample.custom_fields
    }

    /// Sample categories with their advisory counts.
    pub fn categories(&self) -> Vec<Category> {
        self.sample.categories.clone()
    }

    pub fn businesses(&self, filters: &BusinessFilters) -> Vec<Business> {
        let matching = self
            .sample
            .businesses
            .iter()
            .filter(|b| filters.matches(b))
            .cloned();
        match filters.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }

    pub fn search(&self, request: &SearchRequest) -> Page<Business> {
        search::search_businesses(&self.sample.businesses, request, self.default_limit)
    }

    /// Accepts the submission locally under a fresh id, pending moderation.
    pub fn submit(&self, business: &NewBusiness) -> SubmittedBusiness {
        SubmittedBusiness {
            id: BusinessId::generate(),
            submission: business.clone(),
            status: BusinessStatus::Pending,
        }
    }
}

#[async_trait]
impl FetchStrategy for LocalFallback {
    fn name(&self) -> &'static str {
        "sample directory"
    }

    async fn get_categories(&self) -> FetchResult<Vec<Category>> {
        Ok(self.categories())
    }

    async fn get_businesses(&self, filters: &BusinessFilters) -> FetchResult<Vec<Business>> {
        Ok(self.businesses(filters))
    }

    async fn search_businesses(&self, request: &SearchRequest) -> FetchResult<Page<Business>> {
        Ok(self.search(request))
    }

    async fn submit_business(&self, business: &NewBusiness) -> FetchResult<SubmittedBusiness> {
        Ok(self.submit(business))
    }
}
