//! SQLite frontier implementation
//!
//! This module provides a SQLite-based implementation of the Frontier trait.

use crate::storage::schema::{initialize_schema, META_NUM_SHARDS};
use crate::storage::traits::{Frontier, StorageError, StorageResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// SQLite frontier backend
///
/// A single connection guarded by a mutex: inserts from any worker and pops
/// from each shard's owner are serialized, which keeps pop atomic.
pub struct SqliteFrontier {
    conn: Mutex<Connection>,
    num_shards: usize,
}

impl SqliteFrontier {
    /// Opens (or creates) a frontier database
    ///
    /// The shard count is recorded on first use. Reopening with a different
    /// count fails with [`StorageError::ShardCountMismatch`] because queued
    /// URLs would be left on shards no worker polls; pass `fresh = true` to
    /// drop the queue and record the new count.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    /// * `num_shards` - Number of shards (workers)
    /// * `fresh` - Clear any queued URLs before use
    pub fn open(path: &Path, num_shards: usize, fresh: bool) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        Self::from_connection(conn, num_shards, fresh)
    }

    /// Creates an in-memory frontier (for testing)
    #[cfg(test)]
    pub fn new_in_memory(num_shards: usize) -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, num_shards, false)
    }

    fn from_connection(conn: Connection, num_shards: usize, fresh: bool) -> StorageResult<Self> {
        if num_shards == 0 {
            return Err(StorageError::InvalidShard {
                shard: 0,
                num_shards,
            });
        }

        initialize_schema(&conn)?;

        if fresh {
            conn.execute_batch("DELETE FROM frontier; DELETE FROM frontier_meta;")?;
        }

        let stored: Option<String> = conn
            .query_row(
                "SELECT value FROM frontier_meta WHERE key = ?1",
                params![META_NUM_SHARDS],
                |row| row.get(0),
            )
            .optional()?;

        match stored {
            Some(value) => {
                let stored: usize = value.parse().map_err(|_| {
                    StorageError::CorruptMetadata(format!("num_shards = {:?}", value))
                })?;
                if stored != num_shards {
                    return Err(StorageError::ShardCountMismatch {
                        stored,
                        requested: num_shards,
                    });
                }
            }
            None => {
                conn.execute(
                    "INSERT INTO frontier_meta (key, value) VALUES (?1, ?2)",
                    params![META_NUM_SHARDS, num_shards.to_string()],
                )?;
            }
        }

        Ok(Self {
            conn: Mutex::new(conn),
            num_shards,
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_shard(&self, shard: usize) -> StorageResult<()> {
        if shard >= self.num_shards {
            return Err(StorageError::InvalidShard {
                shard,
                num_shards: self.num_shards,
            });
        }
        Ok(())
    }
}

impl Frontier for SqliteFrontier {
    fn num_shards(&self) -> usize {
        self.num_shards
    }

    fn insert_url(&self, url: &str, shard: usize) -> StorageResult<()> {
        self.check_shard(shard)?;
        let now = Utc::now().to_rfc3339();
        self.conn().execute(
            "INSERT INTO frontier (url, shard, queued_at) VALUES (?1, ?2, ?3)",
            params![url, shard as i64, now],
        )?;
        Ok(())
    }

    fn pop_url(&self, shard: usize) -> StorageResult<Option<String>> {
        self.check_shard(shard)?;

        // Select and delete in one statement so a row is handed out exactly once
        let url = self
            .conn()
            .query_row(
                "DELETE FROM frontier
                 WHERE id = (SELECT id FROM frontier WHERE shard = ?1 ORDER BY id LIMIT 1)
                 RETURNING url",
                params![shard as i64],
                |row| row.get(0),
            )
            .optional()?;

        Ok(url)
    }

    fn pending(&self, shard: usize) -> StorageResult<u64> {
        self.check_shard(shard)?;
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM frontier WHERE shard = ?1",
            params![shard as i64],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn clear(&self) -> StorageResult<()> {
        self.conn().execute("DELETE FROM frontier", [])?;
        Ok(())
    }
}
