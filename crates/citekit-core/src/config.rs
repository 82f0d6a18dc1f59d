//! Configuration for citekit
//!
//! Server address, cache location, and metadata fetch settings. Every section
//! has defaults, so a config file only needs the values it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CiteConfig {
    pub server: ServerConfig,
    pub cache: CacheConfig,
    pub fetch: FetchConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind, e.g. "127.0.0.1:8080"
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Metadata cache settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// SQLite database file; `None` keeps the cache in memory
    pub path: Option<PathBuf>,
}

/// Metadata provider settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Maximum simultaneous requests to external providers
    pub max_concurrent_fetches: usize,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    pub user_agent: String,
    pub crossref_base_url: String,
    pub openlibrary_base_url: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: 8,
            timeout_secs: 30,
            user_agent: format!("citekit/{}", env!("CARGO_PKG_VERSION")),
            crossref_base_url: "https://api.crossref.org".to_string(),
            openlibrary_base_url: "https://openlibrary.org".to_string(),
        }
    }
}

impl CiteConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&contents)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.max_concurrent_fetches == 0 {
            return Err(ConfigError::OutOfRange(
                "fetch.max_concurrent_fetches must be at least 1".to_string(),
            ));
        }

        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::OutOfRange(
                "fetch.timeout_secs must be positive".to_string(),
            ));
        }

        for (name, url) in [
            ("fetch.crossref_base_url", &self.fetch.crossref_base_url),
            ("fetch.openlibrary_base_url", &self.fetch.openlibrary_base_url),
        ] {
            if url::Url::parse(url).is_err() {
                return Err(ConfigError::InvalidUrl(format!("{} = {:?}", name, url)));
            }
        }

        if self.server.addr.trim().is_empty() {
            return Err(ConfigError::MissingField("server.addr".to_string()));
        }

        Ok(())
    }
}

/// Configuration loading or validation error
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Value is out of valid range
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    /// URL setting does not parse
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Required field is missing
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(String),

    /// Config text could not be parsed or written
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
