//! Page store gateway
//!
//! Admitted pages are written once to a page directory, one JSON document
//! per URL. The store is also the source of truth for "has this URL already
//! been fetched", which keeps the frontier free of obviously redundant work.

mod fs;

pub use fs::{page_file_name, FsPageStore};

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while reading or writing the page store
#[derive(Debug, Error)]
pub enum PageStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize page: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for page store operations
pub type PageStoreResult<T> = Result<T, PageStoreError>;

/// A fetched page as written to disk
#[derive(Debug, Clone, Serialize)]
pub struct StoredPage {
    pub url: String,
    /// Unix timestamp (seconds) of the fetch
    pub fetched_at: i64,
    pub status: u16,
    pub body: String,
    /// Fingerprints in ascending order
    pub fingerprints: Vec<u64>,
}

/// Durable, write-once store of admitted pages
pub trait PageStore: Send + Sync {
    /// Whether a page for `url` has already been persisted
    fn is_fetched(&self, url: &str) -> PageStoreResult<bool>;

    /// Writes a page unless one already exists for its URL
    ///
    /// Returns `Ok(false)` when the page was already stored; the existing
    /// file is left untouched.
    fn persist(&self, page: &StoredPage) -> PageStoreResult<bool>;

    /// Number of stored pages
    fn count(&self) -> PageStoreResult<u64>;
}
