//! Release distance: how many major/minor/patch releases separate two versions

use crate::version::{is_stability_compatible, ArtifactVersion};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of releases per track between a used version and its target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionDistance {
    /// Major releases adopted on the way
    pub major: u64,
    /// Minor releases adopted within the target major
    pub minor: u64,
    /// Patch lines adopted within the target major
    pub patch: u64,
}

impl VersionDistance {
    /// Already on the target
    pub const ZERO: VersionDistance = VersionDistance {
        major: 0,
        minor: 0,
        patch: 0,
    };

    /// Build from components
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Whether no release separates the two versions
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for VersionDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.major, self.minor, self.patch)
    }
}

/// Count the releases one would have had to adopt to move from `older` to `newer`.
///
/// Scans `ordered` (ascending) over every version greater than `older` up to
/// and including `newer`, skipping versions whose stability class does not
/// match `older`. Each scanned version bumps at most one track:
///
/// - a major step whenever its major exceeds the highest major seen so far,
/// - within `newer`'s major, a minor step whenever its minor exceeds the
///   highest minor seen so far,
/// - otherwise, within `newer`'s major, one patch step per minor line in
///   which patch releases were passed.
///
/// Returns [`VersionDistance::ZERO`] when `newer` is not ahead of `older`.
pub fn release_distance(
    older: &Version,
    newer: &Version,
    ordered: &[ArtifactVersion],
) -> VersionDistance {
    if newer <= older {
        return VersionDistance::ZERO;
    }

    let start = ordered.partition_point(|v| v.version() <= older);
    let end = ordered.partition_point(|v| v.version() <= newer);
    if start >= end {
        return VersionDistance::ZERO;
    }

    let mut distance = VersionDistance::ZERO;
    let mut running_major = older.major;
    let mut running_minor = older.minor;
    let mut counted_line: Option<(u64, u64)> = None;

    for candidate in ordered[start..end]
        .iter()
        .map(ArtifactVersion::version)
        .filter(|v| is_stability_compatible(older, v))
    {
        if candidate.major > running_major {
            distance.major += 1;
            running_major = candidate.major;
            running_minor = candidate.minor;
            continue;
        }
        if candidate.major != newer.major {
            continue;
        }
        if candidate.minor > running_minor {
            distance.minor += 1;
            running_minor = candidate.minor;
            continue;
        }
        let line = (candidate.major, candidate.minor);
        if candidate.minor == running_minor && counted_line != Some(line) {
            distance.patch += 1;
            counted_line = Some(line);
        }
    }

    distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::normalize_version;

    fn catalog(versions: &[&str]) -> Vec<ArtifactVersion> {
        let mut catalog: Vec<_> = versions
            .iter()
            .map(|v| ArtifactVersion::new(v, None, false).unwrap())
            .collect();
        catalog.sort();
        catalog
    }

    fn distance(older: &str, newer: &str, catalog: &[ArtifactVersion]) -> VersionDistance {
        release_distance(
            &normalize_version(older).unwrap(),
            &normalize_version(newer).unwrap(),
            catalog,
        )
    }

    #[test]
    fn test_same_version_is_zero() {
        let catalog = catalog(&["1.0.0", "1.0.1"]);
        assert!(distance("1.0.0", "1.0.0", &catalog).is_zero());
        assert!(distance("1.0.1", "1.0.0", &catalog).is_zero());
    }

    #[test]
    fn test_single_major_step() {
        let catalog = catalog(&["1.0.0", "1.0.1", "1.0.2", "1.1.0", "2.0.0"]);
        assert_eq!(distance("1.0.0", "2.0.0", &catalog), VersionDistance::new(1, 0, 0));
        assert_eq!(distance("1.0.0", "1.1.0", &catalog), VersionDistance::new(0, 1, 1));
        assert_eq!(distance("1.0.0", "1.0.2", &catalog), VersionDistance::new(0, 0, 1));
    }

    #[test]
    fn test_counts_published_majors_only() {
        let catalog = catalog(&["1.0.0", "2.0.0", "2.1.0", "4.0.0", "5.0.0"]);
        assert_eq!(distance("1.0.0", "5.0.0", &catalog).major, 3);
    }

    #[test]
    fn test_patch_lines_within_target_major() {
        let catalog = catalog(&["2.0.0", "2.0.1", "2.1.0", "2.1.1", "2.1.2", "2.2.0", "2.2.1"]);
        assert_eq!(distance("2.0.0", "2.2.1", &catalog), VersionDistance::new(0, 2, 3));
    }

    #[test]
    fn test_prereleases_skipped_for_stable_baseline() {
        let catalog = catalog(&["1.0.0", "1.1.0-beta.1", "1.1.0-beta.2", "1.1.0"]);
        assert_eq!(distance("1.0.0", "1.1.0", &catalog), VersionDistance::new(0, 1, 0));
    }

    #[test]
    fn test_prereleases_counted_for_prerelease_baseline() {
        let catalog = catalog(&["1.0.0-alpha", "1.0.0-beta", "1.0.0-rc.1"]);
        assert_eq!(
            distance("1.0.0-alpha", "1.0.0-rc.1", &catalog),
            VersionDistance::new(0, 0, 1)
        );
    }

    #[test]
    fn test_used_version_missing_from_catalog() {
        let catalog = catalog(&["1.0.0", "1.2.0", "2.0.0"]);
        assert_eq!(distance("1.1.0", "1.2.0", &catalog), VersionDistance::new(0, 1, 0));
    }

    #[test]
    fn test_major_component_is_monotone() {
        let catalog = catalog(&["1.0.0", "1.0.1", "1.2.0", "2.0.0", "2.0.3", "3.0.0", "3.1.0"]);
        for (i, a) in catalog.iter().enumerate() {
            for (j, b) in catalog.iter().enumerate().skip(i) {
                for c in catalog.iter().skip(j) {
                    let ab = release_distance(a.version(), b.version(), &catalog);
                    let ac = release_distance(a.version(), c.version(), &catalog);
                    assert!(ac.major >= ab.major, "{} {} {}", a.version(), b.version(), c.version());
                    if b.version().major == c.version().major {
                        assert!(ac.minor >= ab.minor);
                    }
                    if (b.version().major, b.version().minor) == (c.version().major, c.version().minor) {
                        assert!(ac.patch >= ab.patch);
                    }
                }
            }
        }
    }
}
