//! Metadata cache gateway
//!
//! Records are keyed by (identifier, type) and never expire: an entry is
//! whatever the last successful fetch produced.

mod memory;
#[cfg(feature = "sqlite")]
mod schema;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use memory::InMemoryCache;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteCache;

use citekit_domain::{BibliographicRecord, CacheKey};

use crate::error::CacheError;

/// Key-value store for fetched records.
///
/// Implementations must be safe to share between concurrent requests.
/// Concurrent writes for the same key are allowed; the last one wins.
pub trait MetadataCache: Send + Sync {
    /// Look up a cached record
    fn get(&self, key: &CacheKey) -> Result<Option<BibliographicRecord>, CacheError>;

    /// Store a record under its key, replacing any previous entry
    fn put(&self, key: &CacheKey, record: &BibliographicRecord) -> Result<(), CacheError>;
}
