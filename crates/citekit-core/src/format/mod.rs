//! Citation formatting
//!
//! Pure functions from a [`BibliographicRecord`] to citation text. Nothing
//! here touches the network or the cache, and the same input always yields
//! byte-identical output.

mod authors;
mod templates;

pub use authors::{format_author, format_authors, in_text_citation};

use citekit_domain::{BibliographicRecord, SourceKind, Style};
use serde::{Deserialize, Serialize};

/// Output flavour for citation text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationMarkup {
    /// Plain text
    #[default]
    Plain,
    /// HTML with the container or book title in `<em>`, values escaped
    Html,
}

/// Citation and in-text reference for one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedCitation {
    pub citation: String,
    pub in_text: String,
}

/// Format `record` as a plain-text citation in `style`.
///
/// `ref_index` is the 1-based position used by numbered styles (IEEE).
pub fn format_citation(record: &BibliographicRecord, style: Style, ref_index: usize) -> FormattedCitation {
    format_citation_with(record, style, ref_index, CitationMarkup::Plain)
}

pub fn format_citation_with(
    record: &BibliographicRecord,
    style: Style,
    ref_index: usize,
    markup: CitationMarkup,
) -> FormattedCitation {
    let authors = format_authors(&record.authors, style);
    let citation = match record.source {
        SourceKind::Doi => templates::article(record, &authors, style, ref_index, markup),
        SourceKind::Isbn => templates::book(record, &authors, style, ref_index, markup),
    };

    FormattedCitation {
        citation,
        in_text: in_text_citation(&record.authors, &record.year),
    }
}
