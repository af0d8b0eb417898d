//! Error types for memento-core

use thiserror::Error;

/// Result type alias using memento-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in memento-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Asset fetched but the server answered with a failure status
    #[error("Request for {path} failed (status {status}): {body}")]
    AssetStatus {
        path: String,
        status: u16,
        body: String,
    },

    /// Catalog document present but not in the required shape
    #[error("Invalid catalog {resource}: {reason}")]
    InvalidCatalog {
        resource: String,
        reason: String,
    },

    /// Page address could not be parsed
    #[error("Invalid address: {0}")]
    InvalidAddress(#[from] url::ParseError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
