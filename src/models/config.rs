use serde::Deserialize;

use crate::pagination::DEFAULT_ITEMS_PER_PAGE;

/// Settings for the remote content API (a WordPress REST endpoint).
#[derive(Clone, Debug, Deserialize)]
pub struct ContentApiConfig {
    /// Base URL up to and including `/wp-json`.
    pub base_url: String,
    /// Disables the remote source entirely; the fallback answers every call.
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
    #[serde(default = "default_write_timeout")]
    pub write_timeout_secs: u64,
}

/// Configuration options specific to the directory service.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_address: String,
    pub port: u16,
    /// Load the built-in sample directory when the store is empty.
    #[serde(default)]
    pub seed_sample_data: bool,
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    pub content_api: ContentApiConfig,
}

fn default_true() -> bool {
    true
}

fn default_read_timeout() -> u64 {
    5
}

fn default_write_timeout() -> u64 {
    10
}

fn default_page_size() -> usize {
    DEFAULT_ITEMS_PER_PAGE
}
