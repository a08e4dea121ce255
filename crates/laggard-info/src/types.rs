//! Core domain types for registry access

use chrono::{DateTime, Utc};
use laggard_core::ArtifactVersion;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Registry a catalog is fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Registry {
    /// npm registry
    Npm,
    /// crates.io registry
    CratesIo,
}

impl Registry {
    /// Get the registry name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Registry::Npm => "npm",
            Registry::CratesIo => "crates.io",
        }
    }
}

impl std::fmt::Display for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Registry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "npm" => Ok(Registry::Npm),
            "crates-io" | "crates.io" | "cratesio" => Ok(Registry::CratesIo),
            other => Err(format!("unknown registry '{}' (expected npm or crates-io)", other)),
        }
    }
}

/// Build a catalog entry from raw registry fields.
///
/// Unparseable version strings are dropped; unparseable dates become unknown.
pub(crate) fn catalog_entry(
    registry: Registry,
    package: &str,
    raw_version: &str,
    raw_date: Option<&str>,
    is_default: bool,
) -> Option<ArtifactVersion> {
    let release_date = raw_date.and_then(|raw| match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => Some(date.with_timezone(&Utc)),
        Err(e) => {
            tracing::debug!(%registry, package, version = raw_version, error = %e, "unparseable release date");
            None
        }
    });

    match ArtifactVersion::new(raw_version, release_date, is_default) {
        Ok(entry) => Some(entry),
        Err(e) => {
            tracing::warn!(%registry, package, version = raw_version, error = %e, "skipping version");
            None
        }
    }
}
