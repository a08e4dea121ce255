//! Error types for laggard-info

use thiserror::Error;

/// Result type alias for laggard-info operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for registry operations
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid package name format
    #[error("Invalid package name: {0}")]
    InvalidPackageName(String),

    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Package not found in registry
    #[error("Package '{0}' not found in {1} registry")]
    PackageNotFound(String, String),

    /// Non-success HTTP status other than 404 and 429
    #[error("HTTP request failed with status {status}: {url}")]
    Status {
        /// Response status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded for URL: {0}")]
    RateLimitExceeded(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Turn a 404 status into [`Error::PackageNotFound`] for `name`
    pub(crate) fn not_found_as(self, name: &str, registry: &str) -> Self {
        match self {
            Self::Status { status: 404, .. } => {
                Self::PackageNotFound(name.to_string(), registry.to_string())
            }
            other => other,
        }
    }
}
