//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use citekit_core::domain::CitationResult;
use citekit_core::{CitationMarkup, CiteError};

use crate::AppState;

/// Error returned by a handler, rendered as `{"detail": "..."}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CiteError> for ApiError {
    fn from(err: CiteError) -> Self {
        match err {
            CiteError::Validation(e) => ApiError::BadRequest(e.to_string()),
            CiteError::Unrecognized(value) => {
                ApiError::BadRequest(format!("Invalid identifier: {}", value))
            }
            CiteError::Fetch(e) => ApiError::NotFound(e.user_message()),
            other => {
                tracing::error!(error = %other, "Request failed");
                ApiError::Internal(other.to_string())
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (
            status,
            Json(ErrorResponse {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Request to cite a single identifier
#[derive(Debug, Deserialize)]
pub struct CiteRequest {
    pub identifier: String,
    #[serde(rename = "type")]
    pub id_type: String,
    pub style: String,
    #[serde(default)]
    pub markup: CitationMarkup,
}

pub async fn cite(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CiteRequest>,
) -> Result<Json<CitationResult>, ApiError> {
    let result = state
        .service
        .cite(&request.identifier, &request.id_type, &request.style, request.markup)
        .await?;
    Ok(Json(result))
}

/// Request to cite newline-delimited identifiers
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub lines: String,
    pub style: String,
    #[serde(default)]
    pub markup: CitationMarkup,
}

pub async fn batch(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<Vec<CitationResult>>, ApiError> {
    let results = state
        .service
        .batch_text(&request.lines, &request.style, request.markup)
        .await?;
    Ok(Json(results))
}

/// Cite every line of an uploaded `.txt` file.
///
/// Form fields: `file` (required), `style` (required), `markup` (optional).
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Vec<CitationResult>>, ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut style: Option<String> = None;
    let mut markup = CitationMarkup::Plain;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;
                file = Some((filename, data.to_vec()));
            }
            "style" | "markup" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read field {}: {}", name, e)))?;
                if name == "style" {
                    style = Some(value);
                } else {
                    markup = parse_markup(&value)?;
                }
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown upload field");
            }
        }
    }

    let (filename, data) = file.ok_or_else(|| ApiError::Unprocessable("Missing field: file".to_string()))?;
    let style = style.ok_or_else(|| ApiError::Unprocessable("Missing field: style".to_string()))?;

    if !filename.ends_with(".txt") {
        tracing::warn!(filename = %filename, "Rejected non-.txt upload");
        return Err(ApiError::BadRequest("Only .txt files are supported.".to_string()));
    }

    let text = String::from_utf8(data)
        .map_err(|_| ApiError::BadRequest("File must be UTF-8 text".to_string()))?;

    tracing::debug!(filename = %filename, bytes = text.len(), "Processing upload");
    let results = state.service.batch_text(&text, &style, markup).await?;
    Ok(Json(results))
}

fn parse_markup(value: &str) -> Result<CitationMarkup, ApiError> {
    match value.trim().to_lowercase().as_str() {
        "" | "plain" => Ok(CitationMarkup::Plain),
        "html" => Ok(CitationMarkup::Html),
        other => Err(ApiError::BadRequest(format!("Unsupported markup: {}", other))),
    }
}

/// Request for a BibTeX entry
#[derive(Debug, Deserialize)]
pub struct BibtexRequest {
    pub identifier: String,
    #[serde(rename = "type")]
    pub id_type: String,
}

#[derive(Debug, Serialize)]
pub struct BibtexResponse {
    pub bibtex: String,
}

pub async fn bibtex(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BibtexRequest>,
) -> Result<Json<BibtexResponse>, ApiError> {
    let bibtex = state
        .service
        .bibtex(&request.identifier, &request.id_type)
        .await?;
    Ok(Json(BibtexResponse { bibtex }))
}
