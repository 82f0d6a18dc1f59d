//! Author representation
//!
//! Metadata providers disagree on how they describe people: Crossref hands back
//! `{given, family}` objects while Open Library only has a display name. Both
//! shapes are kept as-is and resolved to a family name plus initials on demand.

use serde::{Deserialize, Serialize};

/// An author of a publication
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Author {
    /// Separate family and given names (Crossref)
    Structured {
        family: String,
        given: Option<String>,
    },
    /// A single display name such as "Brian W. Kernighan" (Open Library)
    Flat { raw: String },
}

/// Family name and initials extracted from an [`Author`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedName {
    /// Title-cased family name
    pub family: String,
    /// Hyphen-joined initials, e.g. "J.-M.", when a given name is known
    pub initials: Option<String>,
}

impl Author {
    /// Create a structured author
    pub fn structured(family: impl Into<String>, given: Option<String>) -> Self {
        Self::Structured {
            family: family.into(),
            given: given.filter(|g| !g.trim().is_empty()),
        }
    }

    /// Create an author from a display name
    pub fn flat(raw: impl Into<String>) -> Self {
        Self::Flat { raw: raw.into() }
    }

    /// Resolve the author to a title-cased family name and initials.
    ///
    /// For flat names the last whitespace-delimited token is the family name
    /// and every preceding token contributes an initial.
    pub fn resolve(&self) -> ResolvedName {
        match self {
            Author::Structured { family, given } => ResolvedName {
                family: title_case_or_unknown(family),
                initials: given.as_deref().and_then(|g| initials(g.split_whitespace())),
            },
            Author::Flat { raw } => {
                let parts: Vec<&str> = raw.split_whitespace().collect();
                match parts.split_last() {
                    Some((last, rest)) => ResolvedName {
                        family: title_case(last),
                        initials: initials(rest.iter().copied()),
                    },
                    None => ResolvedName {
                        family: "Unknown".to_string(),
                        initials: None,
                    },
                }
            }
        }
    }

    /// Title-cased family name
    pub fn family_name(&self) -> String {
        self.resolve().family
    }

    /// Format as "Family, Given" for BibTeX; flat names are emitted untouched
    pub fn to_bibtex_format(&self) -> String {
        match self {
            Author::Structured {
                family,
                given: Some(given),
            } => format!("{}, {}", family, given),
            Author::Structured { family, given: None } => family.clone(),
            Author::Flat { raw } => raw.trim().to_string(),
        }
    }
}

fn title_case_or_unknown(family: &str) -> String {
    let cased = title_case(family.trim());
    if cased.is_empty() {
        "Unknown".to_string()
    } else {
        cased
    }
}

/// Title-case a name: every letter that follows a non-letter is uppercased,
/// every other letter is lowercased ("o'NEIL-smith" becomes "O'Neil-Smith").
pub fn title_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut prev_is_letter = false;
    for c in name.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            result.push(c);
            prev_is_letter = false;
        }
    }
    result
}

/// Reduce given-name tokens to hyphen-joined initials, each followed by a
/// period: `["John", "Michael"]` becomes `"J.-M."`.
///
/// Hyphenated tokens ("Jean-Paul") contribute one initial per part.
/// Returns `None` when no token has a usable first character.
pub fn initials<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let parts: Vec<String> = tokens
        .into_iter()
        .flat_map(|t| t.split('-'))
        .filter_map(|t| t.chars().find(|c| c.is_alphanumeric()))
        .map(|c| format!("{}.", c.to_uppercase()))
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("-"))
    }
}
