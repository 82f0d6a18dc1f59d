//! citekit server binary

use std::sync::Arc;

use citekit_core::CiteConfig;
use citekit_server::{serve, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("citekit=info,tower_http=info")),
        )
        .init();

    let mut config = match std::env::var("CITEKIT_CONFIG") {
        Ok(path) => {
            tracing::info!("Loading configuration from {}", path);
            CiteConfig::load(&path)?
        }
        Err(_) => {
            let mut config = CiteConfig::default();
            config.cache.path = dirs::data_dir().map(|d| d.join("citekit").join("cache.sqlite3"));
            config
        }
    };

    if let Ok(addr) = std::env::var("CITEKIT_ADDR") {
        config.server.addr = addr;
    }

    let state = Arc::new(AppState::from_config(&config)?);
    serve(&config.server.addr, state).await
}
