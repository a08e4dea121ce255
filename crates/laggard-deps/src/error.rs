//! Error types for laggard-deps

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using laggard-deps Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while analyzing a project
#[derive(Debug, Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Cargo.lock parsing error
    #[error("Cargo.lock parse error: {0}")]
    CargoLock(String),

    /// No supported lockfile in the directory
    #[error("No Cargo.lock or package-lock.json found in {0}")]
    LockfileNotFound(PathBuf),

    /// File exists but is not a lockfile this crate understands
    #[error("Unsupported lockfile: {0}")]
    UnsupportedLockfile(PathBuf),

    /// Invalid file format
    #[error("Invalid file format for {0}: {1}")]
    InvalidFormat(PathBuf, String),
}

impl From<cargo_lock::Error> for Error {
    fn from(e: cargo_lock::Error) -> Self {
        Self::CargoLock(e.to_string())
    }
}
