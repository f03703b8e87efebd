//! Error types for the stats loader

use euroleague_fetcher::FetchError;
use thiserror::Error;

/// Result type for loader operations
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Errors that can occur while loading stats into the database
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Could not connect to the database after {attempts} attempts: {source}")]
    Connection {
        attempts: u32,
        #[source]
        source: sqlx::Error,
    },

    #[error("Failed to write {table}: {source}")]
    TableWrite {
        table: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Failed to encode a {table} row: {source}")]
    Encode {
        table: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Provider error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Configuration(String),
}
