//! Request validation errors

use thiserror::Error;

/// A request was rejected before any metadata was fetched
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Style outside {APA, Harvard, IEEE}
    #[error("Unsupported citation style: {0}")]
    UnsupportedStyle(String),

    /// Identifier type outside {doi, isbn}
    #[error("Invalid identifier type: {0}")]
    UnsupportedType(String),

    /// Identifier was empty after trimming
    #[error("Identifier must not be empty")]
    EmptyIdentifier,
}
