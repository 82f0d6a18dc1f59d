//! Normalized bibliographic metadata

use serde::{Deserialize, Serialize};

use crate::{Author, SourceKind};

/// Metadata for one work, mapped from a provider payload.
///
/// Records are immutable snapshots: fetchers build them once and the cache
/// stores them verbatim.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BibliographicRecord {
    pub source: SourceKind,
    /// DOI or ISBN the record was fetched for
    pub identifier: String,
    pub title: String,
    pub authors: Vec<Author>,
    pub year: String,
    /// 1-based month of publication (articles only)
    pub month: Option<u32>,
    /// Journal or container title
    pub venue: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub pages: Option<String>,
    pub publisher: Option<String>,
    pub place: Option<String>,
    pub edition: Option<String>,
    pub url: Option<String>,
}

impl BibliographicRecord {
    /// Create a record with required fields
    pub fn new(
        source: SourceKind,
        identifier: impl Into<String>,
        title: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            source,
            identifier: identifier.into(),
            title: title.into(),
            authors: Vec::new(),
            year: year.into(),
            month: None,
            venue: None,
            volume: None,
            issue: None,
            pages: None,
            publisher: None,
            place: None,
            edition: None,
            url: None,
        }
    }

    pub fn with_authors(mut self, authors: Vec<Author>) -> Self {
        self.authors = authors;
        self
    }

    pub fn with_month(mut self, month: u32) -> Self {
        self.month = Some(month).filter(|m| (1..=12).contains(m));
        self
    }

    pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = Some(venue.into());
        self
    }

    pub fn with_volume(mut self, volume: impl Into<String>) -> Self {
        self.volume = Some(volume.into());
        self
    }

    pub fn with_issue(mut self, issue: impl Into<String>) -> Self {
        self.issue = Some(issue.into());
        self
    }

    pub fn with_pages(mut self, pages: impl Into<String>) -> Self {
        self.pages = Some(pages.into());
        self
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    pub fn with_place(mut self, place: impl Into<String>) -> Self {
        self.place = Some(place.into());
        self
    }

    pub fn with_edition(mut self, edition: impl Into<String>) -> Self {
        self.edition = Some(edition.into()).filter(|e: &String| !e.trim().is_empty());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Whether this record describes a journal article (DOI-sourced)
    pub fn is_article(&self) -> bool {
        self.source == SourceKind::Doi
    }

    /// Cache key for this record
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(self.identifier.clone(), self.source)
    }
}

/// Key into the metadata cache: (identifier, type)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub identifier: String,
    pub kind: SourceKind,
}

impl CacheKey {
    pub fn new(identifier: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
        }
    }

    pub fn doi(doi: impl Into<String>) -> Self {
        Self::new(doi, SourceKind::Doi)
    }

    pub fn isbn(isbn: impl Into<String>) -> Self {
        Self::new(isbn, SourceKind::Isbn)
    }
}
