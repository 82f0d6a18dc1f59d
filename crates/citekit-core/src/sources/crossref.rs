//! Crossref provider for DOI metadata
//!
//! API docs: https://api.crossref.org/swagger-ui/index.html

use async_trait::async_trait;
use citekit_domain::{Author, BibliographicRecord, SourceKind};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use super::traits::{parse_error, transport_error, MetadataProvider};
use crate::error::FetchError;
use crate::http::HttpClient;

lazy_static! {
    static ref JATS_TAG: Regex = Regex::new(r"</?jats:[^>]+>").unwrap();
}

#[derive(Debug, Deserialize)]
struct CrossrefResponse {
    message: CrossrefWork,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CrossrefWork {
    title: Vec<String>,
    author: Vec<CrossrefAuthor>,
    #[serde(rename = "container-title")]
    container_title: Vec<String>,
    volume: Option<String>,
    issue: Option<String>,
    page: Option<String>,
    issued: Option<CrossrefDate>,
    publisher: Option<String>,
    #[serde(rename = "URL")]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CrossrefAuthor {
    given: Option<String>,
    family: Option<String>,
    /// Organizational authors only carry a name
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CrossrefDate {
    #[serde(rename = "date-parts")]
    date_parts: Option<Vec<Vec<Option<i64>>>>,
}

pub struct CrossrefProvider {
    client: HttpClient,
    base_url: String,
}

impl CrossrefProvider {
    pub fn new(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn work_url(&self, doi: &str) -> String {
        format!("{}/works/{}", self.base_url, urlencoding::encode(doi))
    }
}

#[async_trait]
impl MetadataProvider for CrossrefProvider {
    fn kind(&self) -> SourceKind {
        SourceKind::Doi
    }

    fn name(&self) -> &str {
        "Crossref"
    }

    async fn fetch(&self, doi: &str) -> Result<BibliographicRecord, FetchError> {
        let response = self
            .client
            .get(&self.work_url(doi))
            .await
            .map_err(|e| transport_error(SourceKind::Doi, doi, e))?;

        if !response.is_success() {
            tracing::debug!(doi, status = response.status, "Crossref returned no record");
            return Err(FetchError::not_found(SourceKind::Doi, doi));
        }

        parse_work_response(&response.body, doi)
    }
}

/// Map a Crossref `/works/{doi}` response body to a record.
///
/// Missing fields fall back to "Unknown Title", "Unknown Journal" and year
/// "n.d."; authors without any usable name are skipped.
pub fn parse_work_response(json: &str, doi: &str) -> Result<BibliographicRecord, FetchError> {
    let response: CrossrefResponse = serde_json::from_str(json)
        .map_err(|e| parse_error(SourceKind::Doi, doi, format!("Invalid Crossref JSON: {}", e)))?;
    let work = response.message;

    let title = work
        .title
        .into_iter()
        .map(|t| clean_text(&t))
        .find(|t| !t.is_empty())
        .unwrap_or_else(|| "Unknown Title".to_string());

    let authors = work.author.into_iter().filter_map(map_author).collect();

    let date_parts = work
        .issued
        .and_then(|d| d.date_parts)
        .and_then(|dp| dp.into_iter().next())
        .unwrap_or_default();
    let year = date_parts
        .first()
        .copied()
        .flatten()
        .map(|y| y.to_string())
        .unwrap_or_else(|| "n.d.".to_string());
    let month = date_parts.get(1).copied().flatten();

    let venue = work
        .container_title
        .into_iter()
        .map(|t| clean_text(&t))
        .find(|t| !t.is_empty())
        .unwrap_or_else(|| "Unknown Journal".to_string());

    let mut record = BibliographicRecord::new(SourceKind::Doi, doi, title, year)
        .with_authors(authors)
        .with_venue(venue);

    if let Some(month) = month.and_then(|m| u32::try_from(m).ok()) {
        record = record.with_month(month);
    }
    if let Some(volume) = work.volume {
        record = record.with_volume(volume);
    }
    if let Some(issue) = work.issue {
        record = record.with_issue(issue);
    }
    if let Some(page) = work.page {
        record = record.with_pages(page);
    }
    if let Some(publisher) = work.publisher {
        record = record.with_publisher(publisher);
    }
    if let Some(url) = work.url {
        record = record.with_url(url);
    }

    Ok(record)
}

fn map_author(author: CrossrefAuthor) -> Option<Author> {
    match (author.family, author.given, author.name) {
        (Some(family), given, _) if !family.trim().is_empty() => {
            Some(Author::structured(family.trim(), given.map(|g| g.trim().to_string())))
        }
        (_, Some(given), _) if !given.trim().is_empty() => Some(Author::flat(given.trim())),
        (_, _, Some(name)) if !name.trim().is_empty() => Some(Author::flat(name.trim())),
        _ => None,
    }
}

/// Strip JATS markup and collapse whitespace
fn clean_text(text: &str) -> String {
    JATS_TAG
        .replace_all(text, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
