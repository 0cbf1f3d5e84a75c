//! Durable, shard-partitioned URL frontier
//!
//! This module handles all database operations for the crawl queue:
//! - SQLite database initialization and schema management
//! - Per-shard FIFO insertion and atomic pop
//! - Shard count bookkeeping across restarts

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteFrontier;
pub use traits::{Frontier, StorageError, StorageResult};

use std::path::Path;

/// Opens a frontier database for `num_shards` workers
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
/// * `num_shards` - Number of shards (one per worker)
/// * `fresh` - Discard queued URLs and record `num_shards` anew
///
/// # Returns
///
/// * `Ok(SqliteFrontier)` - Successfully opened frontier
/// * `Err(StorageError)` - Failed to open, or the stored shard count differs
pub fn open_frontier(path: &Path, num_shards: usize, fresh: bool) -> StorageResult<SqliteFrontier> {
    SqliteFrontier::open(path, num_shards, fresh)
}
