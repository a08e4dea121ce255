//! Artifacts: a package's release catalog plus its memoized lag results

use crate::distance::release_distance;
use crate::lag::{ReleaseFrequency, TechnicalLag};
use crate::scope::UpdateScope;
use crate::version::{
    find_highest_applicable_version, is_stability_compatible, normalize_version, ArtifactVersion,
};
use crate::Result;
use parking_lot::Mutex;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Package identifier as reported by the project analyzer
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtifactId {
    /// Namespace (npm scope, Maven group); `None` for flat registries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Package name within the namespace
    pub artifact_id: String,
}

impl ArtifactId {
    /// Identifier without a namespace
    pub fn new(artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: None,
            artifact_id: artifact_id.into(),
        }
    }

    /// Identifier inside a namespace
    pub fn with_group(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: Some(group_id.into()),
            artifact_id: artifact_id.into(),
        }
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.group_id {
            Some(group) => write!(f, "{}/{}", group, self.artifact_id),
            None => f.write_str(&self.artifact_id),
        }
    }
}

/// Serializable form of an [`Artifact`] (the lag cache is never persisted)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    /// Package identifier
    pub id: ArtifactId,
    /// Known releases, in any order
    #[serde(default)]
    pub versions: Vec<ArtifactVersion>,
}

/// Hit/miss counters of a [`LagCache`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that ran the computation
    pub misses: u64,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<(Version, UpdateScope), Option<TechnicalLag>>,
    stats: CacheStats,
}

/// Memoized lag results keyed by `(used version, scope)`.
///
/// Absent results are cached too. The lock is held while computing, so
/// concurrent callers on one artifact are serialized and each key is
/// computed once.
#[derive(Debug, Default)]
pub struct LagCache {
    state: Mutex<CacheState>,
}

impl LagCache {
    /// Empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for the key, computing and storing it on a miss
    pub fn get_or_compute(
        &self,
        version: &Version,
        scope: UpdateScope,
        compute: impl FnOnce() -> Option<TechnicalLag>,
    ) -> Option<TechnicalLag> {
        let mut state = self.state.lock();
        let key = (version.clone(), scope);
        if let Some(cached) = state.entries.get(&key) {
            let cached = cached.clone();
            state.stats.hits += 1;
            return cached;
        }

        state.stats.misses += 1;
        let value = compute();
        state.entries.insert(key, value.clone());
        value
    }

    /// Hit/miss counters since creation or the last [`LagCache::clear`]
    pub fn stats(&self) -> CacheStats {
        self.state.lock().stats
    }

    /// Number of cached keys
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry and reset the counters
    pub fn clear(&self) {
        *self.state.lock() = CacheState::default();
    }
}

/// A package and its known releases.
///
/// The catalog is fixed at construction; the only interior state is the lag
/// cache, which is purely derived.
#[derive(Debug)]
pub struct Artifact {
    id: ArtifactId,
    sorted_versions: Vec<ArtifactVersion>,
    release_frequency: ReleaseFrequency,
    cache: LagCache,
}

impl Artifact {
    /// Build an artifact; duplicate version numbers keep the first entry
    pub fn new(id: ArtifactId, versions: impl IntoIterator<Item = ArtifactVersion>) -> Self {
        let mut sorted_versions: Vec<ArtifactVersion> = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for version in versions {
            if seen.insert(version.version().clone()) {
                sorted_versions.push(version);
            }
        }
        sorted_versions.sort();

        let release_frequency = ReleaseFrequency::from_catalog(&sorted_versions);
        Self {
            id,
            sorted_versions,
            release_frequency,
            cache: LagCache::new(),
        }
    }

    /// Artifact with no release information
    pub fn without_versions(id: ArtifactId) -> Self {
        Self::new(id, Vec::new())
    }

    /// Rebuild from the serializable form
    pub fn from_record(record: ArtifactRecord) -> Self {
        Self::new(record.id, record.versions)
    }

    /// Serializable form
    pub fn to_record(&self) -> ArtifactRecord {
        ArtifactRecord {
            id: self.id.clone(),
            versions: self.sorted_versions.clone(),
        }
    }

    /// Replace the catalog, producing a fresh artifact with an empty cache
    pub fn with_versions(self, versions: impl IntoIterator<Item = ArtifactVersion>) -> Self {
        Self::new(self.id, versions)
    }

    /// Package identifier
    pub fn id(&self) -> &ArtifactId {
        &self.id
    }

    /// Releases in ascending semver order
    pub fn sorted_versions(&self) -> &[ArtifactVersion] {
        &self.sorted_versions
    }

    /// Whether the registry reported any release
    pub fn has_versions(&self) -> bool {
        !self.sorted_versions.is_empty()
    }

    /// Look up a release by (unnormalized) version number
    pub fn version(&self, raw: &str) -> Option<&ArtifactVersion> {
        let version = normalize_version(raw).ok()?;
        self.entry(&version)
    }

    /// The registry's default release, falling back to the highest stable one
    pub fn latest_default(&self) -> Option<&ArtifactVersion> {
        self.sorted_versions
            .iter()
            .rev()
            .find(|v| v.is_default())
            .or_else(|| self.sorted_versions.iter().rev().find(|v| v.is_stable()))
    }

    /// Release cadence, computed once per artifact
    pub fn release_frequency(&self) -> ReleaseFrequency {
        self.release_frequency
    }

    /// Lag cache counters
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Forget every memoized lag result
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Technical lag of `used` within `scope`.
    ///
    /// `Ok(None)` means the registry data cannot answer the question (no
    /// catalog, no applicable target, unknown release dates).
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidVersion`] if `used` cannot be normalized
    pub fn tech_lag(&self, used: &str, scope: UpdateScope) -> Result<Option<TechnicalLag>> {
        let used = normalize_version(used)?;
        Ok(self.tech_lag_for(&used, scope))
    }

    /// Technical lag of an already parsed version, memoized per artifact
    pub fn tech_lag_for(&self, used: &Version, scope: UpdateScope) -> Option<TechnicalLag> {
        self.cache
            .get_or_compute(used, scope, || self.compute_lag(used, scope))
    }

    fn entry(&self, version: &Version) -> Option<&ArtifactVersion> {
        self.sorted_versions
            .binary_search_by(|candidate| candidate.version().cmp(version))
            .ok()
            .map(|index| &self.sorted_versions[index])
    }

    fn compute_lag(&self, used: &Version, scope: UpdateScope) -> Option<TechnicalLag> {
        if self.sorted_versions.is_empty() {
            tracing::debug!(artifact = %self.id, "no release information");
            return None;
        }

        let Some(target) = find_highest_applicable_version(used, &self.sorted_versions, scope)
        else {
            tracing::debug!(artifact = %self.id, %used, %scope, "no applicable target version");
            return None;
        };

        let current = self.entry(used)?;
        let (Some(used_date), Some(target_date)) = (current.release_date(), target.release_date())
        else {
            tracing::debug!(artifact = %self.id, %used, target = %target.version(), "release date unknown");
            return None;
        };

        let position = |version: &Version| {
            self.sorted_versions
                .iter()
                .filter(|v| is_stability_compatible(used, v.version()))
                .take_while(|v| v.version() < version)
                .count() as i64
        };

        Some(TechnicalLag {
            lib_days: (target_date - used_date).num_days(),
            distance: release_distance(used, target.version(), &self.sorted_versions),
            target_version: target.version_number(),
            missed_releases: position(target.version()) - position(used),
            release_frequency: self.release_frequency,
        })
    }
}

impl Clone for Artifact {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            sorted_versions: self.sorted_versions.clone(),
            release_frequency: self.release_frequency,
            cache: LagCache::new(),
        }
    }
}

impl From<ArtifactRecord> for Artifact {
    fn from(record: ArtifactRecord) -> Self {
        Self::from_record(record)
    }
}
