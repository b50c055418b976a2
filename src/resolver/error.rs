//! Error types for the resolver module
//!
//! These never reach callers of `MetadataResolver::resolve`; they are logged
//! and turned into the fallback result.

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for a single resolution attempt
#[derive(Debug, Error)]
pub enum ResolveError {
    /// HTTP client error (connect, timeout, redirect limit, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("Unexpected status {status} from {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// HTML parsing error
    #[error("HTML parsing error: {0}")]
    HtmlParse(String),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Response parsed but carried nothing usable
    #[error("Incomplete response: {0}")]
    Incomplete(String),
}

impl From<ResolveError> for CrateError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Http(e) => CrateError::Http(e),
            ResolveError::Json(e) => CrateError::Json(e),
            _ => CrateError::Resolve(err.to_string()),
        }
    }
}
