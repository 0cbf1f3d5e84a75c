//! shardcrawl: a shard-partitioned, near-duplicate aware web crawler
//!
//! This crate implements a crawler whose output (one JSON document per page)
//! feeds a downstream search index. Work is distributed through a durable,
//! shard-partitioned frontier, and pages that are near-duplicates of already
//! admitted content are dropped before they reach disk.

pub mod config;
pub mod crawler;
pub mod dedup;
pub mod eligibility;
pub mod fingerprint;
pub mod hash;
pub mod pages;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Frontier error: {0}")]
    Frontier(#[from] storage::StorageError),

    #[error("Page store error: {0}")]
    PageStore(#[from] pages::PageStoreError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Worker task failed: {0}")]
    Worker(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{shard_of, Crawler};
pub use dedup::{DedupCoordinator, FingerprintIndex};
pub use fingerprint::{generate_fingerprints, similarity, FingerprintSet};
pub use storage::{Frontier, SqliteFrontier};
pub use url::{normalize_url, UrlValidator};
