use crate::error::ConfigError;
use laggard_core::{LinkOptions, UpdateScope, DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES};
use serde::{Deserialize, Serialize};

/// Main configuration structure for laggard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LaggardConfig {
    /// Schema version for migrations
    #[serde(default = "default_version")]
    pub version: String,

    /// Analysis settings
    #[serde(default)]
    pub settings: Settings,
}

impl Default for LaggardConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            settings: Settings::default(),
        }
    }
}

impl LaggardConfig {
    /// Reject settings the analyzer cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let settings = &self.settings;
        if settings.scopes.is_empty() {
            return Err(ConfigError::invalid("scopes", "at least one update scope is required"));
        }
        if settings.fetch_concurrency == 0 {
            return Err(ConfigError::invalid("fetch_concurrency", "must be at least 1"));
        }
        if settings.requests_per_second == 0 {
            return Err(ConfigError::invalid("requests_per_second", "must be at least 1"));
        }
        if settings.max_depth == 0 {
            return Err(ConfigError::invalid("max_depth", "must be at least 1"));
        }
        Ok(())
    }
}

/// Settings for lockfile analysis and catalog fetching
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Update scopes to report
    #[serde(default = "default_scopes")]
    pub scopes: Vec<UpdateScope>,

    /// Concurrent registry requests while fetching catalogs
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,

    /// Client-side rate limit per registry
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Deepest dependency path the linker follows
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Most tree nodes the linker materializes
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,

    /// Analyze development-only dependency scopes
    #[serde(default = "default_true")]
    pub include_dev: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scopes: default_scopes(),
            fetch_concurrency: default_fetch_concurrency(),
            requests_per_second: default_requests_per_second(),
            max_depth: default_max_depth(),
            max_nodes: default_max_nodes(),
            include_dev: default_true(),
        }
    }
}

impl Settings {
    /// Linker limits derived from these settings
    pub fn link_options(&self) -> LinkOptions {
        LinkOptions {
            max_depth: self.max_depth,
            max_nodes: self.max_nodes,
        }
    }
}

// Default value functions
fn default_version() -> String {
    "1.0".to_string()
}

fn default_scopes() -> Vec<UpdateScope> {
    UpdateScope::all().to_vec()
}

fn default_fetch_concurrency() -> usize {
    4
}

fn default_requests_per_second() -> u32 {
    1
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_max_nodes() -> usize {
    DEFAULT_MAX_NODES
}

fn default_true() -> bool {
    true
}
