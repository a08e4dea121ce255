//! Release catalog fetcher for crates.io and npm
//!
//! This library turns registry metadata into the version catalogs the lag
//! engine works on: every published version with its release date and the
//! registry's default flag.
//!
//! # Example
//!
//! ```no_run
//! use laggard_core::{ArtifactId, UpdateScope};
//! use laggard_info::{fetch_catalogs, InfoClient, Registry};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = InfoClient::new()?;
//!     let ids = vec![ArtifactId::new("serde"), ArtifactId::new("tokio")];
//!
//!     let artifacts = fetch_catalogs(&client.source(Registry::CratesIo), &ids, 4).await;
//!     let lag = artifacts[0].tech_lag("1.0.100", UpdateScope::Minor)?;
//!     println!("serde: {:?}", lag.map(|l| l.lib_days));
//!
//!     Ok(())
//! }
//! ```

mod client;
mod crates_io;
mod error;
mod npm;
mod types;

pub use client::HttpClient;
pub use error::{Error, Result};
pub use types::Registry;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use laggard_core::{Artifact, ArtifactId, ArtifactVersion};

/// Anything that can produce the release catalog of an artifact
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// Fetch every known release of `id`
    async fn fetch_versions(&self, id: &ArtifactId) -> Result<Vec<ArtifactVersion>>;
}

/// Main client for fetching release catalogs
///
/// By default, rate limiting is enabled to comply with registry requirements:
/// - npm: 1 request/second (conservative)
/// - crates.io: 1 request/second (required)
pub struct InfoClient {
    npm_client: HttpClient,
    crates_io_client: HttpClient,
}

impl InfoClient {
    /// Create a new InfoClient with rate limiting enabled (recommended)
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP clients cannot be initialized.
    pub fn new() -> Result<Self> {
        Self::with_rate_limit(1)
    }

    /// Create a client allowing `requests_per_second` against each registry
    ///
    /// # Errors
    ///
    /// Returns an error for a zero rate or if the HTTP clients cannot be initialized.
    pub fn with_rate_limit(requests_per_second: u32) -> Result<Self> {
        Ok(Self {
            npm_client: HttpClient::with_rate_limit(requests_per_second)?,
            crates_io_client: HttpClient::with_rate_limit(requests_per_second)?,
        })
    }

    /// Create a new InfoClient without rate limiting (use with caution!)
    ///
    /// Note: crates.io requires 1 req/sec maximum. Using this method may result
    /// in your requests being blocked.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP clients cannot be initialized.
    pub fn without_rate_limiting() -> Result<Self> {
        Ok(Self {
            npm_client: HttpClient::new()?,
            crates_io_client: HttpClient::new()?,
        })
    }

    /// Fetch the release catalog of an npm package
    ///
    /// # Arguments
    ///
    /// * `name` - Package name (e.g., "react" or "@types/node")
    pub async fn fetch_npm(&self, name: &str) -> Result<Vec<ArtifactVersion>> {
        npm::fetch_npm_versions(&self.npm_client, name).await
    }

    /// Fetch the release catalog of a crate
    ///
    /// # Arguments
    ///
    /// * `name` - Crate name (e.g., "serde")
    pub async fn fetch_crates_io(&self, name: &str) -> Result<Vec<ArtifactVersion>> {
        crates_io::fetch_crates_io_versions(&self.crates_io_client, name).await
    }

    /// Fetch the release catalog of `id` from `registry`
    pub async fn fetch(&self, registry: Registry, id: &ArtifactId) -> Result<Vec<ArtifactVersion>> {
        let name = id.to_string();
        match registry {
            Registry::Npm => self.fetch_npm(&name).await,
            Registry::CratesIo => self.fetch_crates_io(&name).await,
        }
    }

    /// A [`VersionSource`] bound to one registry
    pub fn source(&self, registry: Registry) -> RegistrySource<'_> {
        RegistrySource {
            client: self,
            registry,
        }
    }
}

/// [`InfoClient`] view answering every lookup from one registry
pub struct RegistrySource<'a> {
    client: &'a InfoClient,
    registry: Registry,
}

impl RegistrySource<'_> {
    /// Registry this source queries
    pub fn registry(&self) -> Registry {
        self.registry
    }
}

#[async_trait]
impl<'a> VersionSource for RegistrySource<'a> {
    async fn fetch_versions(&self, id: &ArtifactId) -> Result<Vec<ArtifactVersion>> {
        self.client.fetch(self.registry, id).await
    }
}

/// Fetch the catalog of every id with at most `concurrency` requests in flight.
///
/// Returns one [`Artifact`] per id, in input order. A failed fetch is logged
/// and yields an artifact without versions, so its nodes count as missing data.
pub async fn fetch_catalogs<S>(source: &S, ids: &[ArtifactId], concurrency: usize) -> Vec<Artifact>
where
    S: VersionSource + ?Sized,
{
    tracing::info!(artifacts = ids.len(), concurrency, "fetching release catalogs");

    stream::iter(ids)
        .map(|id| async move {
            match source.fetch_versions(id).await {
                Ok(versions) => Artifact::new(id.clone(), versions),
                Err(e) => {
                    tracing::warn!(artifact = %id, error = %e, "failed to fetch release catalog");
                    Artifact::without_versions(id.clone())
                }
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}
