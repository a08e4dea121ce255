//! Technical lag measurements for a single (artifact, version, scope) triple

use crate::distance::VersionDistance;
use crate::version::ArtifactVersion;
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// How often an artifact ships stable releases
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReleaseFrequency {
    /// Stable releases per day
    pub releases_per_day: f64,
    /// Stable releases per week
    pub releases_per_week: f64,
    /// Stable releases per (30 day) month
    pub releases_per_month: f64,
}

impl ReleaseFrequency {
    /// Release cadence over the stable releases with a known date.
    ///
    /// All figures are zero with fewer than two dated stable releases or when
    /// they were all published at the same instant.
    pub fn from_catalog(catalog: &[ArtifactVersion]) -> Self {
        let mut dates: Vec<_> = catalog
            .iter()
            .filter(|v| v.is_stable())
            .filter_map(ArtifactVersion::release_date)
            .collect();
        dates.sort();

        let (Some(first), Some(last)) = (dates.first(), dates.last()) else {
            return Self::default();
        };
        if dates.len() < 2 {
            return Self::default();
        }

        let span_days = (*last - *first).num_milliseconds() as f64 / MILLIS_PER_DAY;
        if span_days <= 0.0 {
            return Self::default();
        }

        let per_day = dates.len() as f64 / span_days;
        Self {
            releases_per_day: per_day,
            releases_per_week: per_day * 7.0,
            releases_per_month: per_day * 30.0,
        }
    }
}

/// Lag of one used version relative to the highest applicable version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalLag {
    /// Whole days between the used and the target release; positive when behind
    pub lib_days: i64,
    /// Releases per track between the used and the target version
    pub distance: VersionDistance,
    /// The version the used one would update to
    pub target_version: String,
    /// Qualifying releases between the used and the target version
    pub missed_releases: i64,
    /// Release cadence of the artifact
    pub release_frequency: ReleaseFrequency,
}

impl TechnicalLag {
    /// Whether the used version already is the target
    pub fn is_up_to_date(&self) -> bool {
        self.lib_days == 0 && self.missed_releases == 0 && self.distance.is_zero()
    }

    /// Lag expressed in years
    pub fn lib_years(&self) -> f64 {
        self.lib_days as f64 / 365.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 86_400_000;

    fn release(version: &str, day: i64) -> ArtifactVersion {
        ArtifactVersion::from_millis(version, day * DAY, false).unwrap()
    }

    #[test]
    fn test_frequency_over_stable_releases() {
        let catalog = vec![
            release("1.0.0", 0),
            release("1.1.0-beta", 3),
            release("1.1.0", 10),
            release("1.2.0", 20),
        ];
        let frequency = ReleaseFrequency::from_catalog(&catalog);

        assert!((frequency.releases_per_day - 0.15).abs() < 1e-9);
        assert!((frequency.releases_per_week - 1.05).abs() < 1e-9);
        assert!((frequency.releases_per_month - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_frequency_needs_two_dated_releases() {
        let catalog = vec![
            release("1.0.0", 5),
            ArtifactVersion::new("1.0.1", None, false).unwrap(),
        ];
        assert_eq!(ReleaseFrequency::from_catalog(&catalog), ReleaseFrequency::default());
        assert_eq!(ReleaseFrequency::from_catalog(&[]), ReleaseFrequency::default());
    }

    #[test]
    fn test_frequency_zero_span() {
        let catalog = vec![release("1.0.0", 5), release("1.0.1", 5)];
        assert_eq!(ReleaseFrequency::from_catalog(&catalog).releases_per_day, 0.0);
    }
}
