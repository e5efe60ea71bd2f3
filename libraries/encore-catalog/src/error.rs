//! Error types for the catalog client.

use thiserror::Error;

/// Errors that can occur when talking to the track catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Catalog returned an error response
    #[error("Catalog error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Invalid catalog URL
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    /// API key cannot be sent as a header
    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    /// Failed to parse catalog response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// The requested record does not exist
    #[error("Track not found: {0}")]
    NotFound(String),

    /// Catalog is offline or unreachable
    #[error("Catalog unreachable: {0}")]
    Unreachable(String),

    /// Rate limited by catalog
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
