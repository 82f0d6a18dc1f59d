//! Formatted citation output

use serde::{Deserialize, Serialize};

/// Citation text for one identifier.
///
/// A degraded result carries a human-readable error in `citation`, an empty
/// `in_text`, no BibTeX, and the same message in `error`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CitationResult {
    pub citation: String,
    pub in_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bibtex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CitationResult {
    pub fn new(citation: impl Into<String>, in_text: impl Into<String>) -> Self {
        Self {
            citation: citation.into(),
            in_text: in_text.into(),
            bibtex: None,
            error: None,
        }
    }

    pub fn with_bibtex(mut self, bibtex: impl Into<String>) -> Self {
        self.bibtex = Some(bibtex.into());
        self
    }

    /// Placeholder result for a line that could not be processed
    pub fn degraded(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            citation: message.clone(),
            in_text: String::new(),
            bibtex: None,
            error: Some(message),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded() {
        let result = CitationResult::degraded("Invalid identifier: foo");
        assert!(result.is_degraded());
        assert_eq!(result.citation, "Invalid identifier: foo");
        assert!(result.in_text.is_empty());
        assert!(result.bibtex.is_none());
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let json = serde_json::to_value(CitationResult::new("c", "(A, 2020)")).unwrap();
        assert_eq!(json, serde_json::json!({"citation": "c", "in_text": "(A, 2020)"}));
    }
}
