//! SQLite-backed metadata cache

use std::path::Path;
use std::sync::Mutex;

use citekit_domain::{BibliographicRecord, CacheKey};
use rusqlite::{params, Connection, OptionalExtension};

use super::schema::{Schema, SCHEMA_VERSION};
use super::MetadataCache;
use crate::error::CacheError;

/// Persistent cache that survives restarts.
///
/// Records are stored as JSON documents. The connection sits behind a mutex
/// so the cache can be shared across request tasks.
pub struct SqliteCache {
    conn: Mutex<Connection>,
}

impl SqliteCache {
    /// Open (or create) a cache database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| CacheError::Database(format!("{}: {}", parent.display(), e)))?;
        }
        let conn = Connection::open(path)?;
        Self::initialize(conn)
    }

    /// Create an in-memory cache database (for testing)
    pub fn in_memory() -> Result<Self, CacheError> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(conn: Connection) -> Result<Self, CacheError> {
        let current_version: u32 = conn
            .query_row(
                "SELECT version FROM schema_version ORDER BY applied_at DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0);

        if current_version == 0 {
            conn.execute_batch(Schema::create_tables())?;
            conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                [SCHEMA_VERSION],
            )?;
        }

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, CacheError> {
        self.conn
            .lock()
            .map_err(|_| CacheError::Database("connection lock poisoned".to_string()))
    }
}

impl MetadataCache for SqliteCache {
    fn get(&self, key: &CacheKey) -> Result<Option<BibliographicRecord>, CacheError> {
        let conn = self.lock()?;
        let json: Option<String> = conn
            .query_row(
                "SELECT metadata FROM metadata_cache WHERE identifier = ?1 AND type = ?2",
                params![key.identifier, key.kind.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn put(&self, key: &CacheKey, record: &BibliographicRecord) -> Result<(), CacheError> {
        let json = serde_json::to_string(record)?;
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO metadata_cache (identifier, type, metadata, cached_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            "#,
            params![key.identifier, key.kind.as_str(), json],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use citekit_domain::{Author, SourceKind};
    use tempfile::TempDir;

    fn sample_record() -> BibliographicRecord {
        BibliographicRecord::new(SourceKind::Doi, "10.1000/xyz", "A Paper", "2020")
            .with_authors(vec![Author::structured("Smith", Some("Jane".to_string()))])
            .with_month(6)
            .with_venue("Journal of Tests")
    }

    #[test]
    fn test_in_memory_roundtrip() {
        let cache = SqliteCache::in_memory().unwrap();
        let key = CacheKey::doi("10.1000/xyz");

        assert!(cache.get(&key).unwrap().is_none());
        cache.put(&key, &sample_record()).unwrap();
        assert_eq!(cache.get(&key).unwrap(), Some(sample_record()));
    }

    #[test]
    fn test_type_is_part_of_key() {
        let cache = SqliteCache::in_memory().unwrap();
        cache.put(&CacheKey::doi("10.1000/xyz"), &sample_record()).unwrap();
        assert!(cache.get(&CacheKey::isbn("10.1000/xyz")).unwrap().is_none());
    }

    #[test]
    fn test_replace_existing_entry() {
        let cache = SqliteCache::in_memory().unwrap();
        let key = CacheKey::doi("10.1000/xyz");
        cache.put(&key, &sample_record()).unwrap();

        let updated = BibliographicRecord {
            title: "Revised".to_string(),
            ..sample_record()
        };
        cache.put(&key, &updated).unwrap();

        assert_eq!(cache.get(&key).unwrap().map(|r| r.title), Some("Revised".to_string()));
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("cache.sqlite3");
        let key = CacheKey::doi("10.1000/xyz");

        {
            let cache = SqliteCache::open(&path).unwrap();
            cache.put(&key, &sample_record()).unwrap();
        }

        let reopened = SqliteCache::open(&path).unwrap();
        assert_eq!(reopened.get(&key).unwrap(), Some(sample_record()));
    }

    #[test]
    fn test_corrupt_document_is_an_error() {
        let cache = SqliteCache::in_memory().unwrap();
        cache
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO metadata_cache (identifier, type, metadata) VALUES ('x', 'doi', 'not json')",
                [],
            )
            .unwrap();

        let result = cache.get(&CacheKey::doi("x"));
        assert!(matches!(result, Err(CacheError::Serialization(_))));
    }
}
