//! Request-level entry points
//!
//! Every operation validates its style and type strings before any metadata
//! is fetched, so a bad request never reaches a provider.

use std::str::FromStr;
use std::sync::Arc;

use citekit_bibtex::format_bibtex;
use citekit_domain::{CitationResult, SourceKind, Style};
use citekit_identifiers::ClassifiedIdentifier;

use crate::batch::BatchProcessor;
use crate::cache::{InMemoryCache, MetadataCache};
use crate::config::CiteConfig;
use crate::error::Result;
use crate::fetcher::MetadataFetcher;
use crate::format::{format_citation_with, CitationMarkup};

#[derive(Clone)]
pub struct CitationService {
    fetcher: Arc<MetadataFetcher>,
    batch: BatchProcessor,
}

impl CitationService {
    pub fn new(fetcher: Arc<MetadataFetcher>) -> Self {
        Self {
            batch: BatchProcessor::new(fetcher.clone()),
            fetcher,
        }
    }

    /// Build the service from configuration: SQLite cache when a path is
    /// set, in-memory otherwise, and the Crossref / Open Library providers.
    pub fn from_config(config: &CiteConfig) -> Result<Self> {
        config.validate()?;
        let cache = open_cache(config)?;
        let fetcher = MetadataFetcher::from_config(&config.fetch, cache)?;
        Ok(Self::new(Arc::new(fetcher)))
    }

    /// Cite a single identifier of an explicit type ("doi" / "isbn")
    pub async fn cite(
        &self,
        identifier: &str,
        id_type: &str,
        style: &str,
        markup: CitationMarkup,
    ) -> Result<CitationResult> {
        let style = Style::from_str(style)?;
        let id = parse_typed(identifier, id_type)?;

        let record = self.fetcher.fetch(&id).await?;
        let formatted = format_citation_with(&record, style, 1, markup);
        Ok(CitationResult::new(formatted.citation, formatted.in_text))
    }

    /// BibTeX entry for a single identifier
    pub async fn bibtex(&self, identifier: &str, id_type: &str) -> Result<String> {
        let id = parse_typed(identifier, id_type)?;
        let record = self.fetcher.fetch(&id).await?;
        Ok(format_bibtex(&record))
    }

    /// Process newline-delimited identifiers. Only the style can fail the
    /// request; per-line failures come back as degraded results.
    pub async fn batch_text(
        &self,
        text: &str,
        style: &str,
        markup: CitationMarkup,
    ) -> Result<Vec<CitationResult>> {
        let style = Style::from_str(style)?;
        Ok(self.batch.process_text(text, style, markup).await)
    }
}

fn parse_typed(identifier: &str, id_type: &str) -> Result<ClassifiedIdentifier> {
    let kind = SourceKind::from_str(id_type)?;
    Ok(ClassifiedIdentifier::from_typed(kind, identifier)?)
}

fn open_cache(config: &CiteConfig) -> Result<Arc<dyn MetadataCache>> {
    match &config.cache.path {
        #[cfg(feature = "sqlite")]
        Some(path) => {
            tracing::info!(path = %path.display(), "Opening SQLite metadata cache");
            Ok(Arc::new(crate::cache::SqliteCache::open(path)?))
        }
        #[cfg(not(feature = "sqlite"))]
        Some(path) => {
            tracing::warn!(path = %path.display(), "SQLite support disabled, using in-memory cache");
            Ok(Arc::new(InMemoryCache::new()))
        }
        None => Ok(Arc::new(InMemoryCache::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CiteError;
    use crate::fetcher::testing::FakeProvider;
    use citekit_domain::{Author, BibliographicRecord, ValidationError};

    fn service() -> (CitationService, Arc<FakeProvider>) {
        let doi = Arc::new(
            FakeProvider::new(SourceKind::Doi).with_record(
                BibliographicRecord::new(SourceKind::Doi, "10.1000/xyz123", "Paper", "2021")
                    .with_authors(vec![Author::structured("Doe", Some("Jane".to_string()))])
                    .with_venue("Journal"),
            ),
        );
        let fetcher = MetadataFetcher::new(
            Arc::new(InMemoryCache::new()),
            doi.clone(),
            Arc::new(FakeProvider::new(SourceKind::Isbn)),
            8,
        );
        (CitationService::new(Arc::new(fetcher)), doi)
    }

    #[tokio::test]
    async fn test_cite_normalizes_doi_url() {
        let (service, doi) = service();
        let result = service
            .cite("https://doi.org/10.1000/xyz123", "doi", "apa", CitationMarkup::Plain)
            .await
            .unwrap();

        assert!(result.citation.starts_with("Doe, J. (2021). Paper."));
        assert_eq!(result.in_text, "(Doe, 2021)");
        assert!(result.bibtex.is_none());
        assert_eq!(doi.calls(), 1);
    }

    #[tokio::test]
    async fn test_unsupported_style_rejected_before_fetch() {
        let (service, doi) = service();
        let err = service
            .cite("10.1000/xyz123", "doi", "Chicago", CitationMarkup::Plain)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CiteError::Validation(ValidationError::UnsupportedStyle(ref s)) if s == "Chicago"
        ));
        assert_eq!(doi.calls(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_type_rejected() {
        let (service, doi) = service();
        let err = service.bibtex("10.1000/xyz123", "pmid").await.unwrap_err();
        assert!(matches!(
            err,
            CiteError::Validation(ValidationError::UnsupportedType(_))
        ));
        assert_eq!(doi.calls(), 0);
    }

    #[tokio::test]
    async fn test_not_found_surfaces_fetch_error() {
        let (service, _) = service();
        let err = service
            .cite("10.1000/missing", "doi", "IEEE", CitationMarkup::Plain)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "DOI not found: 10.1000/missing");
    }

    #[tokio::test]
    async fn test_bibtex() {
        let (service, _) = service();
        let bibtex = service.bibtex("10.1000/xyz123", "doi").await.unwrap();
        assert!(bibtex.starts_with("@article{DOE2021,"));
    }

    #[tokio::test]
    async fn test_batch_text_rejects_style_first() {
        let (service, doi) = service();
        let err = service
            .batch_text("10.1000/xyz123", "MLA", CitationMarkup::Plain)
            .await
            .unwrap_err();
        assert!(matches!(err, CiteError::Validation(_)));
        assert_eq!(doi.calls(), 0);
    }

    #[test]
    fn test_from_config_in_memory() {
        assert!(CitationService::from_config(&CiteConfig::default()).is_ok());
    }
}
