//! Frontier schema definitions
//!
//! This module contains the SQL schema of the frontier database.

/// SQL schema for the frontier database
pub const SCHEMA_SQL: &str = r#"
-- Queued URLs, one row per insertion
CREATE TABLE IF NOT EXISTS frontier (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    shard INTEGER NOT NULL,
    queued_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_frontier_shard ON frontier(shard, id);

-- Settings fixed at creation time (shard count)
CREATE TABLE IF NOT EXISTS frontier_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Metadata key holding the shard count
pub const META_NUM_SHARDS: &str = "num_shards";

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
