//! Common traits for metadata providers

use async_trait::async_trait;
use citekit_domain::{BibliographicRecord, SourceKind};

use crate::error::FetchError;
use crate::http::HttpError;

/// An external source of bibliographic metadata
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Identifier type this provider resolves
    fn kind(&self) -> SourceKind;

    /// Provider name for logs
    fn name(&self) -> &str;

    /// Fetch and map the record for a normalized identifier
    async fn fetch(&self, identifier: &str) -> Result<BibliographicRecord, FetchError>;
}

/// Convert a client error into a lookup failure for `identifier`
pub(crate) fn transport_error(kind: SourceKind, identifier: &str, err: HttpError) -> FetchError {
    FetchError::Transport {
        kind,
        identifier: identifier.to_string(),
        message: err.to_string(),
    }
}

pub(crate) fn parse_error(kind: SourceKind, identifier: &str, message: impl Into<String>) -> FetchError {
    FetchError::Parse {
        kind,
        identifier: identifier.to_string(),
        message: message.into(),
    }
}
