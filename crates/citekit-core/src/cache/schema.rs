//! SQLite schema for the metadata cache

/// Schema version for migrations
pub const SCHEMA_VERSION: u32 = 1;

pub struct Schema;

impl Schema {
    pub fn create_tables() -> &'static str {
        r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- One opaque JSON document per (identifier, type)
CREATE TABLE IF NOT EXISTS metadata_cache (
    identifier TEXT NOT NULL,
    type TEXT NOT NULL,
    metadata TEXT NOT NULL,
    cached_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (identifier, type)
);
"#
    }
}
