//! # laggard-deps
//!
//! Lockfile analysis for Rust and JavaScript projects.
//!
//! This crate turns a project's lockfile into what the lag engine consumes:
//! - one flat [`laggard_core::DependencyGraph`] per dependency scope
//! - the deduplicated list of artifacts those graphs reference
//!
//! Supported lockfiles are `Cargo.lock` and `package-lock.json` (v2/v3).
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! # async fn example() -> laggard_deps::Result<()> {
//! let project = laggard_deps::analyze_project(Path::new(".")).await?;
//! for (scope, graph) in &project.scopes {
//!     println!("{}: {} packages", scope, graph.nodes.len());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod cargo;
pub mod error;
pub mod npm;
pub mod types;

pub use error::{Error, Result};
pub use types::{Ecosystem, ResolvedProject};

pub use cargo::{analyze_cargo_lock, parse_cargo_lock, CARGO_SCOPE};
pub use npm::{analyze_package_lock, parse_package_lock, DEV_SCOPE, RUNTIME_SCOPE};

use std::path::{Path, PathBuf};

/// Lockfile names, in detection order
pub const LOCKFILE_NAMES: [&str; 2] = ["Cargo.lock", "package-lock.json"];

/// Find the lockfile for `path`.
///
/// A file path is returned as is when its name is supported; a directory is
/// searched for the names in [`LOCKFILE_NAMES`], first match wins.
///
/// # Errors
/// [`Error::UnsupportedLockfile`] for other files, [`Error::LockfileNotFound`]
/// when a directory holds none
pub async fn detect_lockfile(path: &Path) -> Result<PathBuf> {
    let metadata = tokio::fs::metadata(path).await?;
    if metadata.is_file() {
        return match lockfile_ecosystem(path) {
            Some(_) => Ok(path.to_path_buf()),
            None => Err(Error::UnsupportedLockfile(path.to_path_buf())),
        };
    }

    for name in LOCKFILE_NAMES {
        let candidate = path.join(name);
        if tokio::fs::try_exists(&candidate).await? {
            tracing::debug!(lockfile = %candidate.display(), "detected lockfile");
            return Ok(candidate);
        }
    }
    Err(Error::LockfileNotFound(path.to_path_buf()))
}

/// Ecosystem a lockfile belongs to, judged by its file name
pub fn lockfile_ecosystem(path: &Path) -> Option<Ecosystem> {
    match path.file_name()?.to_str()? {
        "Cargo.lock" => Some(Ecosystem::Rust),
        "package-lock.json" => Some(Ecosystem::JavaScript),
        _ => None,
    }
}

/// Detect the lockfile at `path` and build the project's graphs
///
/// # Errors
/// Returns an error if no supported lockfile is found or it cannot be parsed
pub async fn analyze_project(path: &Path) -> Result<ResolvedProject> {
    let lockfile = detect_lockfile(path).await?;
    match lockfile_ecosystem(&lockfile) {
        Some(Ecosystem::Rust) => analyze_cargo_lock(&lockfile).await,
        Some(Ecosystem::JavaScript) => analyze_package_lock(&lockfile).await,
        None => Err(Error::UnsupportedLockfile(lockfile)),
    }
}
