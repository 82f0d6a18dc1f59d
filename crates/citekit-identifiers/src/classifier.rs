//! Raw identifier classification
//!
//! DOIs are tested before ISBNs: a DOI suffix may contain long digit runs
//! that would otherwise pass the ISBN shape check.

use citekit_domain::{SourceKind, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::validators::{
    clean_doi, is_isbn_shaped, is_valid_isbn_checksum, normalize_isbn, strip_angle_brackets,
    strip_doi_prefix, DOI_PATTERN,
};

/// Kind of a classified identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    Doi,
    Isbn,
    Unrecognized,
}

impl IdentifierKind {
    /// The metadata source for this kind, if any
    pub fn source_kind(&self) -> Option<SourceKind> {
        match self {
            IdentifierKind::Doi => Some(SourceKind::Doi),
            IdentifierKind::Isbn => Some(SourceKind::Isbn),
            IdentifierKind::Unrecognized => None,
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierKind::Doi => f.write_str("DOI"),
            IdentifierKind::Isbn => f.write_str("ISBN"),
            IdentifierKind::Unrecognized => f.write_str("unrecognized"),
        }
    }
}

/// A raw input string after classification
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassifiedIdentifier {
    pub kind: IdentifierKind,
    /// Lookup form: bare DOI, digits-only ISBN, or the trimmed input
    pub value: String,
}

impl ClassifiedIdentifier {
    pub fn doi(value: impl Into<String>) -> Self {
        Self {
            kind: IdentifierKind::Doi,
            value: value.into(),
        }
    }

    pub fn isbn(value: impl Into<String>) -> Self {
        Self {
            kind: IdentifierKind::Isbn,
            value: value.into(),
        }
    }

    pub fn unrecognized(value: impl Into<String>) -> Self {
        Self {
            kind: IdentifierKind::Unrecognized,
            value: value.into(),
        }
    }

    /// Build a classified identifier from an explicit type tag ("doi" / "isbn").
    ///
    /// Used when the caller states the type instead of relying on detection;
    /// the value is normalized the same way `classify` would.
    pub fn from_typed(kind: SourceKind, raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyIdentifier);
        }
        Ok(match kind {
            SourceKind::Doi => Self::doi(crate::normalize_doi(trimmed)),
            SourceKind::Isbn => Self::isbn(normalize_isbn(trimmed)),
        })
    }

    pub fn is_recognized(&self) -> bool {
        self.kind != IdentifierKind::Unrecognized
    }

    /// For ISBNs, whether the check digit is correct. Always true otherwise.
    pub fn has_valid_checksum(&self) -> bool {
        match self.kind {
            IdentifierKind::Isbn => is_valid_isbn_checksum(&self.value),
            _ => true,
        }
    }
}

impl fmt::Display for ClassifiedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.value)
    }
}

/// Classify a raw identifier string. Total over all inputs.
///
/// 1. trim, drop surrounding angle brackets, strip one DOI URL prefix
/// 2. DOI if it starts with "10." and contains "/", or contains `10.NNNN/suffix`
/// 3. ISBN if, without hyphens and spaces, it is 9 digits + digit/X or 13 digits
/// 4. otherwise unrecognized, keeping the trimmed input
pub fn classify(raw: &str) -> ClassifiedIdentifier {
    let trimmed = raw.trim();
    let candidate = strip_doi_prefix(strip_angle_brackets(trimmed));
    let candidate = strip_angle_brackets(candidate);

    if candidate.starts_with("10.") && candidate.contains('/') {
        return ClassifiedIdentifier::doi(clean_doi(candidate));
    }
    if let Some(m) = DOI_PATTERN.find(candidate) {
        return ClassifiedIdentifier::doi(clean_doi(m.as_str()));
    }

    let isbn_candidate = strip_isbn_label(candidate);
    if is_isbn_shaped(isbn_candidate) {
        return ClassifiedIdentifier::isbn(normalize_isbn(isbn_candidate));
    }

    ClassifiedIdentifier::unrecognized(trimmed)
}

/// Drop a leading "ISBN", "ISBN:" or "ISBN-13:" style label
fn strip_isbn_label(input: &str) -> &str {
    let lower = input.to_ascii_lowercase();
    for label in ["isbn-13:", "isbn-10:", "isbn:", "isbn"] {
        if lower.starts_with(label) {
            return input[label.len()..].trim_start();
        }
    }
    input
}
