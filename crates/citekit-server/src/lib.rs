//! citekit server
//!
//! HTTP front end for the citation engine in `citekit-core`.

pub mod http;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use citekit_core::{CitationService, CiteConfig};

/// Shared application state
pub struct AppState {
    pub service: CitationService,
}

impl AppState {
    pub fn new(service: CitationService) -> Self {
        Self { service }
    }

    /// Create state with the cache and providers described by `config`
    pub fn from_config(config: &CiteConfig) -> citekit_core::Result<Self> {
        Ok(Self::new(CitationService::from_config(config)?))
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(http::health))
        .route("/cite", post(http::cite))
        .route("/batch", post(http::batch))
        .route("/upload", post(http::upload))
        .route("/bibtex", post(http::bibtex))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the server
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("citekit server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
