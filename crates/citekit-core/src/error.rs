//! Error types for citekit-core

use citekit_domain::{SourceKind, ValidationError};
use thiserror::Error;

use crate::config::ConfigError;
use crate::http::HttpError;

/// Result type alias for citekit operations
pub type Result<T> = std::result::Result<T, CiteError>;

/// Main error type for citekit operations
#[derive(Error, Debug)]
pub enum CiteError {
    /// Request rejected before any fetch
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Input is neither a DOI nor an ISBN
    #[error("Invalid identifier: {0}")]
    Unrecognized(String),

    /// Metadata lookup failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Cache could not be opened
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Configuration could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// HTTP client could not be built
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),
}

/// Metadata lookup errors.
///
/// Callers see every variant as "not found"; the variants only exist so the
/// logs can tell a missing record from an unreachable provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Provider has no record for the identifier
    #[error("{} not found: {}", .kind.display_name(), .identifier)]
    NotFound {
        kind: SourceKind,
        identifier: String,
    },

    /// Network failure or provider unavailable
    #[error("{} lookup failed for {}: {}", .kind.display_name(), .identifier, .message)]
    Transport {
        kind: SourceKind,
        identifier: String,
        message: String,
    },

    /// Provider answered with a payload that could not be mapped
    #[error("{} metadata for {} could not be parsed: {}", .kind.display_name(), .identifier, .message)]
    Parse {
        kind: SourceKind,
        identifier: String,
        message: String,
    },
}

impl FetchError {
    pub fn not_found(kind: SourceKind, identifier: impl Into<String>) -> Self {
        FetchError::NotFound {
            kind,
            identifier: identifier.into(),
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            FetchError::NotFound { kind, .. }
            | FetchError::Transport { kind, .. }
            | FetchError::Parse { kind, .. } => *kind,
        }
    }

    pub fn identifier(&self) -> &str {
        match self {
            FetchError::NotFound { identifier, .. }
            | FetchError::Transport { identifier, .. }
            | FetchError::Parse { identifier, .. } => identifier,
        }
    }

    /// Message shown to API callers: always reported as "not found"
    pub fn user_message(&self) -> String {
        format!("{} not found: {}", self.kind().display_name(), self.identifier())
    }
}

/// Metadata cache errors
#[derive(Error, Debug)]
pub enum CacheError {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Blocking cache task panicked or was cancelled
    #[error("Cache task failed: {0}")]
    Task(String),
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for CacheError {
    fn from(err: rusqlite::Error) -> Self {
        CacheError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}
