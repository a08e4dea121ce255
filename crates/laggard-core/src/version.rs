//! Version catalog entries, normalization and target resolution

use crate::scope::UpdateScope;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Normalize a registry or lockfile version string into a semantic version.
///
/// Accepts everything `semver` accepts, plus the shapes registries commonly
/// publish: a leading `v` or `=`, missing minor/patch components (`2.4` ->
/// `2.4.0`) and zero-padded numbers. Anything else is an
/// [`Error::InvalidVersion`].
pub fn normalize_version(raw: &str) -> Result<Version> {
    let trimmed = raw
        .trim()
        .trim_start_matches(|c| c == 'v' || c == 'V' || c == '=');

    if let Ok(version) = Version::parse(trimmed) {
        return Ok(version);
    }

    let split = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let (core, suffix) = trimmed.split_at(split);
    if core.is_empty() {
        return Err(Error::invalid_version(raw, "empty version"));
    }

    let parts = core
        .split('.')
        .map(|part| part.parse::<u64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::invalid_version(raw, e))?;

    let (major, minor, patch) = match parts.as_slice() {
        [major] => (*major, 0, 0),
        [major, minor] => (*major, *minor, 0),
        [major, minor, patch] => (*major, *minor, *patch),
        _ => {
            return Err(Error::invalid_version(
                raw,
                format!("expected 1 to 3 numeric components, found {}", parts.len()),
            ))
        }
    };

    Version::parse(&format!("{}.{}.{}{}", major, minor, patch, suffix))
        .map_err(|e| Error::invalid_version(raw, e))
}

/// Whether `version` is a stable (non pre-release) version
pub fn is_stable(version: &Version) -> bool {
    version.pre.is_empty()
}

/// Whether `candidate` may be offered as an update to `used`.
///
/// A stable baseline only accepts stable candidates; a pre-release baseline
/// accepts everything.
pub fn is_stability_compatible(used: &Version, candidate: &Version) -> bool {
    !is_stable(used) || is_stable(candidate)
}

fn in_scope(used: &Version, candidate: &Version, scope: UpdateScope) -> bool {
    match scope {
        UpdateScope::Major => true,
        UpdateScope::Minor => candidate.major == used.major,
        UpdateScope::Patch => candidate.major == used.major && candidate.minor == used.minor,
    }
}

/// One published release of an artifact.
///
/// Equality, ordering and hashing only consider the version number, so a
/// catalog keyed by `ArtifactVersion` has one entry per version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactVersion {
    #[serde(rename = "version_number", with = "version_string")]
    version: Version,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    release_date: Option<DateTime<Utc>>,
    #[serde(default)]
    is_default: bool,
}

impl ArtifactVersion {
    /// Create a catalog entry, normalizing `raw`
    ///
    /// # Errors
    /// Returns [`Error::InvalidVersion`] if `raw` cannot be normalized
    pub fn new(raw: &str, release_date: Option<DateTime<Utc>>, is_default: bool) -> Result<Self> {
        Ok(Self {
            version: normalize_version(raw)?,
            release_date,
            is_default,
        })
    }

    /// Create a catalog entry from a millisecond timestamp.
    ///
    /// Negative timestamps are the "unknown" sentinel used by registry dumps.
    pub fn from_millis(raw: &str, release_millis: i64, is_default: bool) -> Result<Self> {
        let release_date = if release_millis < 0 {
            None
        } else {
            DateTime::from_timestamp_millis(release_millis)
        };
        Self::new(raw, release_date, is_default)
    }

    /// The parsed version
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Normalized version string
    pub fn version_number(&self) -> String {
        self.version.to_string()
    }

    /// Release timestamp, if the registry reported one
    pub fn release_date(&self) -> Option<DateTime<Utc>> {
        self.release_date
    }

    /// Whether the registry marks this as the default/latest release
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    /// Whether this is a stable release
    pub fn is_stable(&self) -> bool {
        is_stable(&self.version)
    }
}

impl PartialEq for ArtifactVersion {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
    }
}

impl Eq for ArtifactVersion {}

impl PartialOrd for ArtifactVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ArtifactVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.version.cmp(&other.version)
    }
}

impl Hash for ArtifactVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.version.hash(state);
    }
}

/// Find the highest version `used` could update to within `scope`.
///
/// Candidates are filtered by stability compatibility first, then narrowed by
/// scope, and the greatest remaining version wins. Returns `None` when
/// nothing qualifies.
pub fn find_highest_applicable_version<'a>(
    used: &Version,
    catalog: &'a [ArtifactVersion],
    scope: UpdateScope,
) -> Option<&'a ArtifactVersion> {
    catalog
        .iter()
        .filter(|candidate| is_stability_compatible(used, candidate.version()))
        .filter(|candidate| in_scope(used, candidate.version(), scope))
        .max_by(|a, b| a.version().cmp(b.version()))
}

/// Like [`find_highest_applicable_version`], for an unparsed used version.
///
/// An unparseable `used` resolves to nothing.
pub fn resolve_target<'a>(
    used: &str,
    catalog: &'a [ArtifactVersion],
    scope: UpdateScope,
) -> Option<&'a ArtifactVersion> {
    let used = normalize_version(used).ok()?;
    find_highest_applicable_version(&used, catalog, scope)
}

mod version_string {
    use semver::Version;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(version: &Version, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(version)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Version, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::normalize_version(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(versions: &[&str]) -> Vec<ArtifactVersion> {
        versions
            .iter()
            .map(|v| ArtifactVersion::new(v, None, false).unwrap())
            .collect()
    }

    fn v(raw: &str) -> Version {
        normalize_version(raw).unwrap()
    }

    #[test]
    fn test_normalize_version() {
        assert_eq!(v("1.2.3").to_string(), "1.2.3");
        assert_eq!(v("2.4").to_string(), "2.4.0");
        assert_eq!(v("7").to_string(), "7.0.0");
        assert_eq!(v("v1.0.1").to_string(), "1.0.1");
        assert_eq!(v(" =3.1 ").to_string(), "3.1.0");
        assert_eq!(v("1.0-beta.2").to_string(), "1.0.0-beta.2");
        assert_eq!(v("01.02.03").to_string(), "1.2.3");
        assert_eq!(v("1.0.0+build.5").to_string(), "1.0.0+build.5");
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(matches!(
            normalize_version(""),
            Err(Error::InvalidVersion { .. })
        ));
        assert!(normalize_version("latest").is_err());
        assert!(normalize_version("1.2.3.4").is_err());
        assert!(normalize_version("1.x").is_err());
    }

    #[test]
    fn test_equal_strings_are_equal_versions() {
        let a = ArtifactVersion::new("2.4", None, false).unwrap();
        let b = ArtifactVersion::new("2.4.0", None, true).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.version_number(), "2.4.0");
    }

    #[test]
    fn test_millis_sentinel_is_unknown() {
        let unknown = ArtifactVersion::from_millis("1.0.0", -1, false).unwrap();
        assert!(unknown.release_date().is_none());

        let known = ArtifactVersion::from_millis("1.0.0", 86_400_000, false).unwrap();
        assert_eq!(known.release_date().unwrap().timestamp(), 86_400);
    }

    #[test]
    fn test_resolve_by_scope() {
        let catalog = catalog(&["1.0.0", "1.0.1", "1.1.0", "1.1.3", "2.0.0", "2.1.0"]);
        let used = v("1.0.0");

        let major = find_highest_applicable_version(&used, &catalog, UpdateScope::Major);
        let minor = find_highest_applicable_version(&used, &catalog, UpdateScope::Minor);
        let patch = find_highest_applicable_version(&used, &catalog, UpdateScope::Patch);

        assert_eq!(major.unwrap().version_number(), "2.1.0");
        assert_eq!(minor.unwrap().version_number(), "1.1.3");
        assert_eq!(patch.unwrap().version_number(), "1.0.1");
    }

    #[test]
    fn test_stable_baseline_never_gets_prerelease() {
        let catalog = catalog(&["1.0.0", "1.0.1-rc.1", "1.1.0-beta", "2.0.0-alpha"]);
        let used = v("1.0.0");

        for scope in UpdateScope::all() {
            let target = find_highest_applicable_version(&used, &catalog, *scope).unwrap();
            assert_eq!(target.version_number(), "1.0.0", "scope {}", scope);
        }
    }

    #[test]
    fn test_prerelease_baseline_sees_prereleases() {
        let catalog = catalog(&["1.0.0-alpha", "1.0.0-beta", "1.0.1-rc.1"]);
        let used = v("1.0.0-alpha");

        let target = find_highest_applicable_version(&used, &catalog, UpdateScope::Patch).unwrap();
        assert_eq!(target.version_number(), "1.0.1-rc.1");
    }

    #[test]
    fn test_empty_narrowed_set() {
        let catalog = catalog(&["2.0.0", "3.0.0"]);
        assert!(find_highest_applicable_version(&v("1.0.0"), &catalog, UpdateScope::Minor).is_none());
        assert!(find_highest_applicable_version(&v("1.0.0"), &[], UpdateScope::Major).is_none());
    }

    #[test]
    fn test_unparseable_used_resolves_to_nothing() {
        let catalog = catalog(&["1.0.0"]);
        assert!(resolve_target("not-a-version", &catalog, UpdateScope::Major).is_none());
        assert!(resolve_target("1.0", &catalog, UpdateScope::Major).is_some());
    }

    #[test]
    fn test_serde_uses_version_string_and_millis() {
        let version = ArtifactVersion::from_millis("1.2", 1_000, true).unwrap();
        let json = serde_json::to_value(&version).unwrap();
        assert_eq!(json["version_number"], "1.2.0");
        assert_eq!(json["release_date"], 1_000);
        assert_eq!(json["is_default"], true);

        let parsed: ArtifactVersion =
            serde_json::from_str(r#"{"version_number":"v3","release_date":null}"#).unwrap();
        assert_eq!(parsed.version_number(), "3.0.0");
        assert!(parsed.release_date().is_none());
        assert!(!parsed.is_default());
    }
}
