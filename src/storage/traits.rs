//! Frontier trait and error types

use thiserror::Error;

/// Errors that can occur during frontier operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Shard {shard} is out of range for a frontier with {num_shards} shards")]
    InvalidShard { shard: usize, num_shards: usize },

    #[error(
        "Frontier was created with {stored} shards but {requested} were requested; \
         start a fresh crawl to reset it"
    )]
    ShardCountMismatch { stored: usize, requested: usize },

    #[error("Corrupt frontier metadata: {0}")]
    CorruptMetadata(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for frontier operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable multi-shard URL queue
///
/// Any worker may insert into any shard; each shard is popped by exactly one
/// worker. Implementations must be safe to share between threads.
pub trait Frontier: Send + Sync {
    /// Number of shards this frontier was opened with
    fn num_shards(&self) -> usize;

    /// Appends a URL to a shard's queue
    ///
    /// No deduplication happens here: inserting the same URL twice queues
    /// it twice.
    fn insert_url(&self, url: &str, shard: usize) -> StorageResult<()>;

    /// Removes and returns the oldest URL queued for a shard
    ///
    /// Returns `Ok(None)` immediately when the shard is empty.
    fn pop_url(&self, shard: usize) -> StorageResult<Option<String>>;

    /// Number of URLs queued for a shard
    fn pending(&self, shard: usize) -> StorageResult<u64>;

    /// Removes every queued URL
    fn clear(&self) -> StorageResult<()>;
}
