//! Error types for the BenchBox crate

use thiserror::Error;

/// Result type for BenchBox operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for BenchBox operations
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input could not be parsed as an absolute URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Metadata resolution error
    #[error("Resolve error: {0}")]
    Resolve(String),
}
