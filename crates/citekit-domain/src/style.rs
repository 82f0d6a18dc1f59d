//! Citation styles and identifier source kinds

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ValidationError;

/// Supported citation styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Style {
    #[serde(rename = "APA")]
    Apa,
    #[serde(rename = "Harvard")]
    Harvard,
    #[serde(rename = "IEEE")]
    Ieee,
}

impl Style {
    /// Get all styles
    pub fn all() -> &'static [Style] {
        &[Style::Apa, Style::Harvard, Style::Ieee]
    }

    /// Canonical display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Apa => "APA",
            Style::Harvard => "Harvard",
            Style::Ieee => "IEEE",
        }
    }

    /// IEEE renders numbered references and "Initials Family" names
    pub fn is_numbered(&self) -> bool {
        matches!(self, Style::Ieee)
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Style {
    type Err = ValidationError;

    /// Parse a style name (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "apa" => Ok(Style::Apa),
            "harvard" => Ok(Style::Harvard),
            "ieee" => Ok(Style::Ieee),
            _ => Err(ValidationError::UnsupportedStyle(s.to_string())),
        }
    }
}

/// Where a record came from: a DOI (journal article) or an ISBN (book)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Doi,
    Isbn,
}

impl SourceKind {
    /// Lowercase type tag used by the HTTP API and the cache
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Doi => "doi",
            SourceKind::Isbn => "isbn",
        }
    }

    /// Display name ("DOI", "ISBN")
    pub fn display_name(&self) -> &'static str {
        match self {
            SourceKind::Doi => "DOI",
            SourceKind::Isbn => "ISBN",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "doi" => Ok(SourceKind::Doi),
            "isbn" => Ok(SourceKind::Isbn),
            _ => Err(ValidationError::UnsupportedType(s.to_string())),
        }
    }
}
