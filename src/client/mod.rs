//! Remote-or-fallback access to the content API.
//!
//! [`DirectoryClient`] asks the remote WordPress source first and answers from
//! the built-in sample directory whenever that fails, so callers always get
//! data back and cannot tell which source produced it.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::business::{Business, BusinessFilters, NewBusiness, SubmittedBusiness};
use crate::domain::category::Category;
use crate::domain::custom_field::CustomFieldDefinition;
use crate::domain::query::SearchRequest;
use crate::models::config::ContentApiConfig;
use crate::pagination::Page;

pub mod fallback;
pub mod remote;

pub use fallback::LocalFallback;
pub use remote::RemoteStrategy;

/// Why a remote fetch produced no usable data.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("request timed out")]
    Timeout,
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("empty response")]
    Empty,
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else if let Some(status) = error.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Transport(error.to_string())
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

/// A source of directory content.
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    async fn get_categories(&self) -> FetchResult<Vec<Category>>;

    async fn get_businesses(&self, filters: &BusinessFilters) -> FetchResult<Vec<Business>>;

    async fn search_businesses(&self, request: &SearchRequest) -> FetchResult<Page<Business>>;

    /// Sends a listing for moderation.
    async fn submit_business(&self, business: &NewBusiness) -> FetchResult<SubmittedBusiness>;
}

/// Tries the remote source once and falls back to local data on any error.
pub struct DirectoryClient {
    remote: Option<Box<dyn FetchStrategy>>,
    fallback: LocalFallback,
}

impl DirectoryClient {
    pub fn new(remote: Option<Box<dyn FetchStrategy>>, fallback: LocalFallback) -> Self {
        Self { remote, fallback }
    }

    /// Builds the client described by `config`. A disabled content API leaves
    /// only the fallback.
    pub fn from_config(config: &ContentApiConfig, fallback: LocalFallback) -> FetchResult<Self> {
        let remote: Option<Box<dyn FetchStrategy>> = if config.enabled {
            Some(Box::new(RemoteStrategy::from_config(
                config,
                fallback.default_limit(),
            )?))
        } else {
            log::info!("Content API disabled, serving sample data only");
            None
        };
        Ok(Self::new(remote, fallback))
    }

    /// Custom field definitions applied to submissions.
    pub fn custom_field_definitions(&self) -> &[CustomFieldDefinition] {
        self.fallback.custom_field_definitions()
    }

    fn fall_back(&self, strategy: &dyn FetchStrategy, operation: &str, error: &FetchError) {
        log::warn!(
            "{} {operation} failed ({error}), using fallback data",
            strategy.name()
        );
    }

    pub async fn get_categories(&self) -> Vec<Category> {
        if let Some(remote) = &self.remote {
            match remote.get_categories().await {
                Ok(categories) => return categories,
                Err(e) => self.fall_back(remote.as_ref(), "categories", &e),
            }
        }
        self.fallback.categories()
    }

    pub async fn get_businesses(&self, filters: &BusinessFilters) -> Vec<Business> {
        if let Some(remote) = &self.remote {
            match remote.get_businesses(filters).await {
                Ok(businesses) => return businesses,
                Err(e) => self.fall_back(remote.as_ref(), "businesses", &e),
            }
        }
        self.fallback.businesses(filters)
    }

    pub async fn search_businesses(&self, request: &SearchRequest) -> Page<Business> {
        if let Some(remote) = &self.remote {
            match remote.search_businesses(request).await {
                Ok(page) => return page,
                Err(e) => self.fall_back(remote.as_ref(), "search", &e),
            }
        }
        self.fallback.search(request)
    }

    pub async fn submit_business(&self, business: &NewBusiness) -> SubmittedBusiness {
        if let Some(remote) = &self.remote {
            match remote.submit_business(business).await {
                Ok(submitted) => return submitted,
                Err(e) => self.fall_back(remote.as_ref(), "submission", &e),
            }
        }
        self.fallback.submit(business)
    }
}
