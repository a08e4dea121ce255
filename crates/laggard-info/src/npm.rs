//! npm registry client

use crate::client::HttpClient;
use crate::error::{Error, Result};
use crate::types::{catalog_entry, Registry};
use laggard_core::ArtifactVersion;
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use url::Url;

const NPM_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// npm packument, reduced to what a release catalog needs
#[derive(Debug, Deserialize)]
pub(crate) struct NpmPackageResponse {
    name: String,
    #[serde(rename = "dist-tags", default)]
    dist_tags: HashMap<String, String>,
    #[serde(default)]
    versions: BTreeMap<String, IgnoredAny>,
    #[serde(default)]
    time: HashMap<String, String>,
}

/// Build the packument URL; scoped names keep their `@` and get `/` encoded
pub(crate) fn package_url(package_name: &str) -> Result<Url> {
    let mut url = Url::parse(NPM_REGISTRY_URL)?;
    url.path_segments_mut()
        .map_err(|_| Error::other("npm registry URL cannot carry a path"))?
        .pop_if_empty()
        .push(package_name);
    Ok(url)
}

/// Fetch the release catalog of an npm package
pub async fn fetch_npm_versions(
    client: &HttpClient,
    package_name: &str,
) -> Result<Vec<ArtifactVersion>> {
    if package_name.is_empty() || package_name == "@" || package_name.ends_with('/') {
        return Err(Error::InvalidPackageName(format!(
            "'{}' is not a valid npm package name",
            package_name
        )));
    }

    let url = package_url(package_name)?;
    let response: NpmPackageResponse = client
        .get_json(url.as_str())
        .await
        .map_err(|e| e.not_found_as(package_name, Registry::Npm.as_str()))?;

    Ok(catalog_from_response(response))
}

/// Turn a packument into catalog entries
pub(crate) fn catalog_from_response(response: NpmPackageResponse) -> Vec<ArtifactVersion> {
    let latest = response.dist_tags.get("latest").map(String::as_str);

    let catalog: Vec<_> = response
        .versions
        .keys()
        .filter_map(|raw| {
            catalog_entry(
                Registry::Npm,
                &response.name,
                raw,
                response.time.get(raw).map(String::as_str),
                latest == Some(raw.as_str()),
            )
        })
        .collect();

    tracing::debug!(
        package = %response.name,
        published = response.versions.len(),
        kept = catalog.len(),
        "fetched npm catalog"
    );
    catalog
}
