//! crates.io registry client

use crate::client::HttpClient;
use crate::error::{Error, Result};
use crate::types::{catalog_entry, Registry};
use laggard_core::ArtifactVersion;
use serde::Deserialize;
use url::Url;

const CRATES_IO_API_URL: &str = "https://crates.io/api/v1/crates";

/// crates.io API response structure
#[derive(Debug, Deserialize)]
pub(crate) struct CratesIoResponse {
    #[serde(rename = "crate")]
    crate_info: CrateInfo,
    #[serde(default)]
    versions: Vec<CrateVersion>,
}

#[derive(Debug, Deserialize)]
struct CrateInfo {
    name: String,
    max_version: String,
    #[serde(default)]
    max_stable_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CrateVersion {
    num: String,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    yanked: bool,
}

/// Fetch the release catalog of a crate
pub async fn fetch_crates_io_versions(
    client: &HttpClient,
    crate_name: &str,
) -> Result<Vec<ArtifactVersion>> {
    if crate_name.is_empty() {
        return Err(Error::InvalidPackageName("Crate name cannot be empty".to_string()));
    }

    let mut url = Url::parse(CRATES_IO_API_URL)?;
    url.path_segments_mut()
        .map_err(|_| Error::other("crates.io base URL cannot carry a path"))?
        .pop_if_empty()
        .push(crate_name);

    let response: CratesIoResponse = client
        .get_json(url.as_str())
        .await
        .map_err(|e| e.not_found_as(crate_name, Registry::CratesIo.as_str()))?;

    Ok(catalog_from_response(response))
}

/// Turn an API response into catalog entries, dropping yanked releases
pub(crate) fn catalog_from_response(response: CratesIoResponse) -> Vec<ArtifactVersion> {
    let CratesIoResponse {
        crate_info,
        versions,
    } = response;
    let default = crate_info
        .max_stable_version
        .as_deref()
        .unwrap_or(&crate_info.max_version);

    let catalog: Vec<_> = versions
        .iter()
        .filter(|v| !v.yanked)
        .filter_map(|v| {
            catalog_entry(
                Registry::CratesIo,
                &crate_info.name,
                &v.num,
                v.created_at.as_deref(),
                v.num == default,
            )
        })
        .collect();

    tracing::debug!(
        krate = %crate_info.name,
        published = versions.len(),
        kept = catalog.len(),
        "fetched crates.io catalog"
    );
    catalog
}
