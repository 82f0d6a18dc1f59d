//! Citation formatting engine
//!
//! Turns DOIs and ISBNs into formatted citations:
//!
//! ```text
//!  raw line ──► classify ──► MetadataFetcher ──► format_citation / format_bibtex
//!                              │        │
//!                     MetadataCache   MetadataProvider
//!                  (memory / sqlite)  (Crossref / Open Library)
//! ```
//!
//! `BatchProcessor` runs the pipeline for many lines at once with bounded
//! fetch concurrency and per-line failure isolation; `CitationService` is the
//! validated single-request entry point used by the HTTP layer.

pub mod batch;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod format;
pub mod http;
pub mod service;
pub mod sources;

pub use batch::{BatchProcessor, BatchSummary};
pub use cache::{InMemoryCache, MetadataCache};
#[cfg(feature = "sqlite")]
pub use cache::SqliteCache;
pub use config::{CacheConfig, CiteConfig, ConfigError, FetchConfig, ServerConfig};
pub use error::{CacheError, CiteError, FetchError, Result};
pub use fetcher::MetadataFetcher;
pub use format::{
    format_authors, format_citation, format_citation_with, in_text_citation, CitationMarkup,
    FormattedCitation,
};
pub use service::CitationService;
pub use sources::{CrossrefProvider, MetadataProvider, OpenLibraryProvider};

pub use citekit_domain as domain;
