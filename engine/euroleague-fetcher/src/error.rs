//! Error types for the stats provider client

use thiserror::Error;

/// Result type for provider operations
pub type Result<T> = std::result::Result<T, FetchError>;

/// Errors that can occur while talking to the stats provider
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: reqwest::StatusCode },

    #[error("Failed to parse response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),
}
