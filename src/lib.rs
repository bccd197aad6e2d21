//! Dataset-Harvest: a federated data catalog walker
//!
//! This crate resolves nested data catalog documents into the dataset sites
//! they list, fetches every site, and collects the JSON-LD metadata each one
//! embeds. Failures never abort a harvest; they are returned as data next to
//! the metadata that was found.

pub mod config;
pub mod harvest;
pub mod output;

use thiserror::Error;

/// Main error type for Dataset-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Request failed with status code {status}")]
    Status { url: String, status: u16 },

    /// reqwest already names the URL in its message
    #[error("HTTP error: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Catalog cycle detected at {url}")]
    CycleDetected { url: String },

    #[error("Catalog {url} exceeds the maximum depth of {max_depth}")]
    DepthExceeded { url: String, max_depth: u32 },

    #[error("Harvest task for {url} failed: {message}")]
    Task { url: String, message: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarvestError {
    /// Returns the HTTP status code carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http { source, .. } | Self::Reqwest(source) => {
                source.status().map(|s| s.as_u16())
            }
            _ => None,
        }
    }

    /// Classifies a transport error from reqwest for the given URL
    pub fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Http {
                url: url.to_string(),
                source,
            }
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Dataset-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use harvest::{
    DatasetAggregate, FetchError, Harvester, ResolutionResult, RetryPolicy, StructuredBlock,
    ValidationOutcome,
};
