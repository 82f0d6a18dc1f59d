//! Open Library provider for ISBN metadata
//!
//! Uses the Books API: `/api/books?bibkeys=ISBN:{isbn}&format=json&jscmd=data`.
//! The response is an object keyed by bibkey; an empty object means the
//! catalog has no record.

use std::collections::HashMap;

use async_trait::async_trait;
use citekit_domain::{Author, BibliographicRecord, SourceKind};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use super::traits::{parse_error, transport_error, MetadataProvider};
use crate::error::FetchError;
use crate::http::HttpClient;

lazy_static! {
    // "March 1988", "1988-03-22"
    static ref YEAR_PATTERN: Regex = Regex::new(r"\b(\d{4})\b").unwrap();
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BookData {
    title: Option<String>,
    /// Absent and empty are different: only an absent list falls back
    authors: Option<Vec<NamedEntry>>,
    publishers: Vec<NamedEntry>,
    publish_date: Option<String>,
    edition_name: Option<String>,
    publish_places: Vec<NamedEntry>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NamedEntry {
    name: Option<String>,
}

pub struct OpenLibraryProvider {
    client: HttpClient,
    base_url: String,
}

impl OpenLibraryProvider {
    pub fn new(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl MetadataProvider for OpenLibraryProvider {
    fn kind(&self) -> SourceKind {
        SourceKind::Isbn
    }

    fn name(&self) -> &str {
        "Open Library"
    }

    async fn fetch(&self, isbn: &str) -> Result<BibliographicRecord, FetchError> {
        let url = format!("{}/api/books", self.base_url);
        let bibkey = format!("ISBN:{}", isbn);
        let response = self
            .client
            .get_with_params(&url, &[("bibkeys", bibkey.as_str()), ("format", "json"), ("jscmd", "data")])
            .await
            .map_err(|e| transport_error(SourceKind::Isbn, isbn, e))?;

        if !response.is_success() {
            tracing::debug!(isbn, status = response.status, "Open Library returned no record");
            return Err(FetchError::not_found(SourceKind::Isbn, isbn));
        }

        parse_books_response(&response.body, isbn)
    }
}

/// Map an Open Library Books API response to a record for `isbn`.
pub fn parse_books_response(json: &str, isbn: &str) -> Result<BibliographicRecord, FetchError> {
    let mut books: HashMap<String, BookData> = serde_json::from_str(json).map_err(|e| {
        parse_error(SourceKind::Isbn, isbn, format!("Invalid Open Library JSON: {}", e))
    })?;

    let Some(book) = books.remove(&format!("ISBN:{}", isbn)) else {
        return Err(FetchError::not_found(SourceKind::Isbn, isbn));
    };

    let title = non_blank(book.title).unwrap_or_else(|| "Unknown Title".to_string());

    let authors = match book.authors {
        Some(entries) => entries
            .into_iter()
            .filter_map(|a| non_blank(a.name))
            .map(Author::flat)
            .collect(),
        None => vec![Author::flat("Unknown Author")],
    };

    let year = match non_blank(book.publish_date) {
        Some(date) => extract_year(&date).unwrap_or(date),
        None => "Unknown Year".to_string(),
    };

    let publisher = first_name(book.publishers).unwrap_or_else(|| "Unknown Publisher".to_string());
    let place = first_name(book.publish_places).unwrap_or_else(|| "Unknown Place".to_string());

    let mut record = BibliographicRecord::new(SourceKind::Isbn, isbn, title, year)
        .with_authors(authors)
        .with_publisher(publisher)
        .with_place(place);

    if let Some(edition) = book.edition_name {
        record = record.with_edition(edition.trim());
    }
    if let Some(url) = book.url {
        record = record.with_url(url);
    }

    Ok(record)
}

fn extract_year(date: &str) -> Option<String> {
    YEAR_PATTERN
        .captures(date)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn first_name(entries: Vec<NamedEntry>) -> Option<String> {
    entries.into_iter().next().and_then(|e| non_blank(e.name))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_BOOK: &str = r#"{
        "ISBN:9780131101630": {
            "url": "https://openlibrary.org/books/OL2030084M/The_C_programming_language",
            "title": "The C programming language",
            "authors": [
                {"url": "https://openlibrary.org/authors/OL1872530A", "name": "Brian W. Kernighan"},
                {"name": "Dennis M. Ritchie"}
            ],
            "publishers": [{"name": "Prentice Hall"}],
            "publish_places": [{"name": "Englewood Cliffs, N.J"}],
            "publish_date": "1988",
            "edition_name": "2nd ed."
        }
    }"#;

    #[test]
    fn test_parse_books_response() {
        let record = parse_books_response(SAMPLE_BOOK, "9780131101630").unwrap();

        assert_eq!(record.source, SourceKind::Isbn);
        assert_eq!(record.title, "The C programming language");
        assert_eq!(
            record.authors,
            vec![Author::flat("Brian W. Kernighan"), Author::flat("Dennis M. Ritchie")]
        );
        assert_eq!(record.year, "1988");
        assert_eq!(record.publisher.as_deref(), Some("Prentice Hall"));
        assert_eq!(record.place.as_deref(), Some("Englewood Cliffs, N.J"));
        assert_eq!(record.edition.as_deref(), Some("2nd ed."));
        assert!(record.url.is_some());
    }

    #[test]
    fn test_empty_object_is_not_found() {
        let err = parse_books_response("{}", "0000000000000").unwrap_err();
        assert_eq!(err, FetchError::not_found(SourceKind::Isbn, "0000000000000"));
    }

    #[test]
    fn test_sparse_book_uses_defaults() {
        let record = parse_books_response(r#"{"ISBN:0306406152": {}}"#, "0306406152").unwrap();

        assert_eq!(record.title, "Unknown Title");
        assert_eq!(record.authors, vec![Author::flat("Unknown Author")]);
        assert_eq!(record.year, "Unknown Year");
        assert_eq!(record.publisher.as_deref(), Some("Unknown Publisher"));
        assert_eq!(record.place.as_deref(), Some("Unknown Place"));
        assert_eq!(record.edition, None);
    }

    #[test]
    fn test_empty_author_list_stays_empty() {
        let json = r#"{"ISBN:0306406152": {"title": "Anon", "authors": []}}"#;
        let record = parse_books_response(json, "0306406152").unwrap();
        assert!(record.authors.is_empty());
    }

    #[test]
    fn test_year_extracted_from_long_date() {
        let json = r#"{"ISBN:0306406152": {"publish_date": "March 22, 1988"}}"#;
        let record = parse_books_response(json, "0306406152").unwrap();
        assert_eq!(record.year, "1988");

        let json = r#"{"ISBN:0306406152": {"publish_date": "unknown"}}"#;
        let record = parse_books_response(json, "0306406152").unwrap();
        assert_eq!(record.year, "unknown");
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_books_response("[", "0306406152").unwrap_err();
        assert!(matches!(err, FetchError::Parse { .. }));
    }
}
