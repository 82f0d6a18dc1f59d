//! Cache-first metadata fetching
//!
//! A miss calls the provider for the identifier type and writes the record
//! back before returning it. Two concurrent misses on the same key both reach
//! the provider; whichever finishes last owns the cache entry.

use std::sync::Arc;
use std::time::Duration;

use citekit_domain::{BibliographicRecord, CacheKey};
use citekit_identifiers::{ClassifiedIdentifier, IdentifierKind};
use tokio::sync::Semaphore;

use crate::cache::MetadataCache;
use crate::config::FetchConfig;
use crate::error::{CacheError, CiteError, FetchError};
use crate::http::HttpClient;
use crate::sources::{CrossrefProvider, MetadataProvider, OpenLibraryProvider};

pub struct MetadataFetcher {
    cache: Arc<dyn MetadataCache>,
    doi_provider: Arc<dyn MetadataProvider>,
    isbn_provider: Arc<dyn MetadataProvider>,
    /// Bounds simultaneous provider calls; cache hits never take a permit
    fetch_gate: Semaphore,
}

impl MetadataFetcher {
    pub fn new(
        cache: Arc<dyn MetadataCache>,
        doi_provider: Arc<dyn MetadataProvider>,
        isbn_provider: Arc<dyn MetadataProvider>,
        max_concurrent: usize,
    ) -> Self {
        tracing::debug!(
            doi = %doi_provider.kind(),
            doi_provider = doi_provider.name(),
            isbn = %isbn_provider.kind(),
            isbn_provider = isbn_provider.name(),
            max_concurrent,
            "Metadata fetcher ready"
        );
        Self {
            cache,
            doi_provider,
            isbn_provider,
            fetch_gate: Semaphore::new(max_concurrent.max(1)),
        }
    }

    /// Build a fetcher with the Crossref and Open Library providers
    pub fn from_config(config: &FetchConfig, cache: Arc<dyn MetadataCache>) -> Result<Self, CiteError> {
        let client = HttpClient::new(&config.user_agent, Duration::from_secs(config.timeout_secs))?;
        let crossref = CrossrefProvider::new(client.clone(), config.crossref_base_url.clone());
        let openlibrary = OpenLibraryProvider::new(client, config.openlibrary_base_url.clone());

        Ok(Self::new(
            cache,
            Arc::new(crossref),
            Arc::new(openlibrary),
            config.max_concurrent_fetches,
        ))
    }

    pub async fn fetch_by_doi(&self, doi: &str) -> Result<BibliographicRecord, FetchError> {
        self.fetch_cached(CacheKey::doi(doi), self.doi_provider.as_ref()).await
    }

    pub async fn fetch_by_isbn(&self, isbn: &str) -> Result<BibliographicRecord, FetchError> {
        self.fetch_cached(CacheKey::isbn(isbn), self.isbn_provider.as_ref()).await
    }

    /// Fetch the record for a classified identifier
    pub async fn fetch(&self, id: &ClassifiedIdentifier) -> Result<BibliographicRecord, CiteError> {
        match id.kind {
            IdentifierKind::Doi => Ok(self.fetch_by_doi(&id.value).await?),
            IdentifierKind::Isbn => {
                if !id.has_valid_checksum() {
                    tracing::debug!(isbn = %id.value, "ISBN check digit does not match, fetching anyway");
                }
                Ok(self.fetch_by_isbn(&id.value).await?)
            }
            IdentifierKind::Unrecognized => Err(CiteError::Unrecognized(id.value.clone())),
        }
    }

    async fn fetch_cached(
        &self,
        key: CacheKey,
        provider: &dyn MetadataProvider,
    ) -> Result<BibliographicRecord, FetchError> {
        match self.cache_get(&key).await {
            Ok(Some(record)) => {
                tracing::debug!(identifier = %key.identifier, kind = %key.kind, "Cache hit");
                return Ok(record);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(identifier = %key.identifier, error = %e, "Cache read failed, treating as miss");
            }
        }

        let record = {
            // Closed only if the semaphore is dropped, which cannot happen while &self lives
            let _permit = self.fetch_gate.acquire().await.map_err(|_| FetchError::Transport {
                kind: key.kind,
                identifier: key.identifier.clone(),
                message: "fetch gate closed".to_string(),
            })?;
            tracing::debug!(identifier = %key.identifier, provider = provider.name(), "Fetching metadata");
            provider.fetch(&key.identifier).await
        };

        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::info!(identifier = %key.identifier, error = %e, "Metadata lookup failed");
                return Err(e);
            }
        };

        if let Err(e) = self.cache_put(&key, &record).await {
            tracing::warn!(identifier = %key.identifier, error = %e, "Cache write failed");
        }

        Ok(record)
    }

    // Cache backends may do file I/O, so they run on the blocking pool
    async fn cache_get(&self, key: &CacheKey) -> Result<Option<BibliographicRecord>, CacheError> {
        let cache = Arc::clone(&self.cache);
        let key = key.clone();
        tokio::task::spawn_blocking(move || cache.get(&key))
            .await
            .map_err(|e| CacheError::Task(e.to_string()))?
    }

    async fn cache_put(&self, key: &CacheKey, record: &BibliographicRecord) -> Result<(), CacheError> {
        let cache = Arc::clone(&self.cache);
        let key = key.clone();
        let record = record.clone();
        tokio::task::spawn_blocking(move || cache.put(&key, &record))
            .await
            .map_err(|e| CacheError::Task(e.to_string()))?
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeProvider;
    use super::*;
    use crate::cache::InMemoryCache;
    use citekit_domain::SourceKind;
    use citekit_identifiers::classify;
    use std::sync::atomic::Ordering;

    fn paper(doi: &str) -> BibliographicRecord {
        BibliographicRecord::new(SourceKind::Doi, doi, "A Paper", "2020")
    }

    fn book(isbn: &str) -> BibliographicRecord {
        BibliographicRecord::new(SourceKind::Isbn, isbn, "A Book", "1988")
    }

    fn fetcher_with(
        doi: Arc<FakeProvider>,
        isbn: Arc<FakeProvider>,
        cache: Arc<InMemoryCache>,
    ) -> MetadataFetcher {
        MetadataFetcher::new(cache, doi, isbn, 8)
    }

    #[tokio::test]
    async fn test_second_fetch_hits_cache() {
        let doi = Arc::new(FakeProvider::new(SourceKind::Doi).with_record(paper("10.1000/a")));
        let isbn = Arc::new(FakeProvider::new(SourceKind::Isbn));
        let cache = Arc::new(InMemoryCache::new());
        let fetcher = fetcher_with(doi.clone(), isbn, cache.clone());

        let first = fetcher.fetch_by_doi("10.1000/a").await.unwrap();
        let second = fetcher.fetch_by_doi("10.1000/a").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(doi.calls(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_not_found_is_not_cached() {
        let doi = Arc::new(FakeProvider::new(SourceKind::Doi));
        let isbn = Arc::new(FakeProvider::new(SourceKind::Isbn));
        let cache = Arc::new(InMemoryCache::new());
        let fetcher = fetcher_with(doi.clone(), isbn, cache.clone());

        for _ in 0..2 {
            let err = fetcher.fetch_by_doi("10.1000/missing").await.unwrap_err();
            assert_eq!(err.user_message(), "DOI not found: 10.1000/missing");
        }
        assert_eq!(doi.calls(), 2);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_dispatches_by_kind() {
        let doi = Arc::new(FakeProvider::new(SourceKind::Doi).with_record(paper("10.1000/a")));
        let isbn = Arc::new(FakeProvider::new(SourceKind::Isbn).with_record(book("9780131101630")));
        let fetcher = fetcher_with(doi.clone(), isbn.clone(), Arc::new(InMemoryCache::new()));

        let record = fetcher.fetch(&classify("978-0-13-110163-0")).await.unwrap();
        assert_eq!(record.title, "A Book");
        assert_eq!(isbn.calls(), 1);
        assert_eq!(doi.calls(), 0);

        let err = fetcher.fetch(&classify("nope")).await.unwrap_err();
        assert!(matches!(err, CiteError::Unrecognized(v) if v == "nope"));
    }

    #[tokio::test]
    async fn test_doi_and_isbn_keys_do_not_collide() {
        let doi = Arc::new(FakeProvider::new(SourceKind::Doi));
        let isbn = Arc::new(FakeProvider::new(SourceKind::Isbn).with_record(book("0306406152")));
        let cache = Arc::new(InMemoryCache::new());
        cache
            .put(&CacheKey::doi("0306406152"), &paper("0306406152"))
            .unwrap();
        let fetcher = fetcher_with(doi, isbn.clone(), cache);

        let record = fetcher.fetch_by_isbn("0306406152").await.unwrap();
        assert_eq!(record.source, SourceKind::Isbn);
        assert_eq!(isbn.calls(), 1);
    }

    struct BrokenCache;

    impl MetadataCache for BrokenCache {
        fn get(&self, _key: &CacheKey) -> Result<Option<BibliographicRecord>, CacheError> {
            Err(CacheError::Database("disk full".to_string()))
        }

        fn put(&self, _key: &CacheKey, _record: &BibliographicRecord) -> Result<(), CacheError> {
            Err(CacheError::Database("disk full".to_string()))
        }
    }

    #[tokio::test]
    async fn test_cache_failure_falls_back_to_provider() {
        let doi = Arc::new(FakeProvider::new(SourceKind::Doi).with_record(paper("10.1000/a")));
        let isbn = Arc::new(FakeProvider::new(SourceKind::Isbn));
        let fetcher = MetadataFetcher::new(Arc::new(BrokenCache), doi.clone(), isbn, 8);

        let record = fetcher.fetch_by_doi("10.1000/a").await.unwrap();
        assert_eq!(record.title, "A Paper");
        assert_eq!(doi.calls(), 1);
    }

    /// Records which thread each cache call ran on
    #[derive(Default)]
    struct ThreadRecordingCache {
        threads: std::sync::Mutex<Vec<std::thread::ThreadId>>,
    }

    impl ThreadRecordingCache {
        fn record(&self) {
            if let Ok(mut threads) = self.threads.lock() {
                threads.push(std::thread::current().id());
            }
        }
    }

    impl MetadataCache for ThreadRecordingCache {
        fn get(&self, _key: &CacheKey) -> Result<Option<BibliographicRecord>, CacheError> {
            self.record();
            Ok(None)
        }

        fn put(&self, _key: &CacheKey, _record: &BibliographicRecord) -> Result<(), CacheError> {
            self.record();
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_cache_calls_run_off_the_runtime_thread() {
        let doi = Arc::new(FakeProvider::new(SourceKind::Doi).with_record(paper("10.1000/a")));
        let cache = Arc::new(ThreadRecordingCache::default());
        let fetcher = MetadataFetcher::new(
            cache.clone(),
            doi,
            Arc::new(FakeProvider::new(SourceKind::Isbn)),
            8,
        );

        fetcher.fetch_by_doi("10.1000/a").await.unwrap();

        let runtime_thread = std::thread::current().id();
        let threads = cache.threads.lock().unwrap();
        assert_eq!(threads.len(), 2);
        assert!(threads.iter().all(|t| *t != runtime_thread));
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_sqlite_cache_serves_second_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Arc::new(crate::cache::SqliteCache::open(dir.path().join("cache.sqlite3")).unwrap());
        let doi = Arc::new(FakeProvider::new(SourceKind::Doi).with_record(paper("10.1000/a")));
        let fetcher = MetadataFetcher::new(
            cache,
            doi.clone(),
            Arc::new(FakeProvider::new(SourceKind::Isbn)),
            8,
        );

        fetcher.fetch_by_doi("10.1000/a").await.unwrap();
        let second = fetcher.fetch_by_doi("10.1000/a").await.unwrap();

        assert_eq!(second.title, "A Paper");
        assert_eq!(doi.calls(), 1);
    }

    #[tokio::test]
    async fn test_provider_calls_are_bounded() {
        let mut provider = FakeProvider::new(SourceKind::Doi).with_delay(Duration::from_millis(20));
        for i in 0..10 {
            provider = provider.with_record(paper(&format!("10.1000/{}", i)));
        }
        let doi = Arc::new(provider);
        let fetcher = MetadataFetcher::new(
            Arc::new(InMemoryCache::new()),
            doi.clone(),
            Arc::new(FakeProvider::new(SourceKind::Isbn)),
            3,
        );

        let futures = (0..10).map(|i| {
            let fetcher = &fetcher;
            async move { fetcher.fetch_by_doi(&format!("10.1000/{}", i)).await }
        });
        let results = futures::future::join_all(futures).await;

        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(doi.calls(), 10);
        assert!(doi.max_in_flight.load(Ordering::SeqCst) <= 3);
    }
}
