//! Batch citation processing
//!
//! Every non-blank line is classified, fetched and formatted on its own. A
//! failing line becomes a degraded [`CitationResult`] in its slot; it never
//! aborts the batch or disturbs the order of the other results.

use std::sync::Arc;

use citekit_bibtex::format_bibtex;
use citekit_domain::{CitationResult, Style};
use citekit_identifiers::{classify, IdentifierKind};
use futures::future::join_all;
use thiserror::Error;

use crate::error::FetchError;
use crate::fetcher::MetadataFetcher;
use crate::format::{format_citation_with, CitationMarkup};

/// Why a single line produced no citation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LineError {
    #[error("Invalid identifier: {0}")]
    Unrecognized(String),

    #[error("{}", .0.user_message())]
    Fetch(FetchError),
}

/// Result of processing one line
pub type LineOutcome = Result<CitationResult, LineError>;

/// Counts logged when a batch completes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn from_outcomes(outcomes: &[LineOutcome]) -> Self {
        let failed = outcomes.iter().filter(|o| o.is_err()).count();
        Self {
            total: outcomes.len(),
            succeeded: outcomes.len() - failed,
            failed,
        }
    }
}

/// Runs the classify, fetch, format pipeline over many lines.
///
/// Fetch concurrency is bounded by the fetcher's gate, so a batch never has
/// more provider calls in flight than `fetch.max_concurrent_fetches`.
#[derive(Clone)]
pub struct BatchProcessor {
    fetcher: Arc<MetadataFetcher>,
}

impl BatchProcessor {
    pub fn new(fetcher: Arc<MetadataFetcher>) -> Self {
        Self { fetcher }
    }

    /// Process lines with plain-text citations
    pub async fn process_batch<S: AsRef<str>>(&self, lines: &[S], style: Style) -> Vec<CitationResult> {
        self.process_batch_with(lines, style, CitationMarkup::Plain).await
    }

    /// Process lines, one result per non-blank line in input order.
    ///
    /// Reference indices are 1-based positions among the non-blank lines.
    pub async fn process_batch_with<S: AsRef<str>>(
        &self,
        lines: &[S],
        style: Style,
        markup: CitationMarkup,
    ) -> Vec<CitationResult> {
        let lines: Vec<&str> = lines
            .iter()
            .map(|l| l.as_ref().trim())
            .filter(|l| !l.is_empty())
            .collect();

        let tasks = lines
            .iter()
            .enumerate()
            .map(|(i, line)| self.process_line(line, style, i + 1, markup));
        let outcomes: Vec<LineOutcome> = join_all(tasks).await;

        let summary = BatchSummary::from_outcomes(&outcomes);
        tracing::info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            style = %style,
            "Batch complete"
        );

        outcomes
            .into_iter()
            .map(|outcome| outcome.unwrap_or_else(|e| CitationResult::degraded(e.to_string())))
            .collect()
    }

    /// Split newline-delimited text and process each line
    pub async fn process_text(&self, text: &str, style: Style, markup: CitationMarkup) -> Vec<CitationResult> {
        let lines: Vec<&str> = text.lines().collect();
        self.process_batch_with(&lines, style, markup).await
    }

    async fn process_line(
        &self,
        line: &str,
        style: Style,
        ref_index: usize,
        markup: CitationMarkup,
    ) -> LineOutcome {
        let id = classify(line);
        tracing::debug!(line, kind = %id.kind, value = %id.value, "Classified batch line");

        let record = match id.kind {
            IdentifierKind::Doi => self.fetcher.fetch_by_doi(&id.value).await,
            IdentifierKind::Isbn => self.fetcher.fetch_by_isbn(&id.value).await,
            IdentifierKind::Unrecognized => {
                tracing::warn!(ref_index, line, "Unrecognized identifier in batch");
                return Err(LineError::Unrecognized(line.to_string()));
            }
        };

        let record = record.map_err(|e| {
            tracing::warn!(ref_index, error = %e, "Batch line lookup failed");
            LineError::Fetch(e)
        })?;

        let formatted = format_citation_with(&record, style, ref_index, markup);
        Ok(CitationResult::new(formatted.citation, formatted.in_text).with_bibtex(format_bibtex(&record)))
    }
}
