//! Process-local cache, used in tests and when no cache path is configured

use std::collections::HashMap;
use std::sync::RwLock;

use citekit_domain::{BibliographicRecord, CacheKey};

use super::MetadataCache;
use crate::error::CacheError;

#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<CacheKey, BibliographicRecord>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached records
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MetadataCache for InMemoryCache {
    fn get(&self, key: &CacheKey) -> Result<Option<BibliographicRecord>, CacheError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| CacheError::Database("cache lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &CacheKey, record: &BibliographicRecord) -> Result<(), CacheError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CacheError::Database("cache lock poisoned".to_string()))?;
        entries.insert(key.clone(), record.clone());
        Ok(())
    }
}
