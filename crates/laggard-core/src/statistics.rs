//! Distributional statistics over technical lag samples

use crate::lag::TechnicalLag;
use serde::{Deserialize, Serialize};

/// Population mean, variance and standard deviation of a sample set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Arithmetic mean
    pub average: f64,
    /// Population variance
    pub variance: f64,
    /// Square root of the population variance
    pub standard_deviation: f64,
}

impl Statistics {
    /// Statistics over `samples`; `None` for an empty set
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        samples.iter().copied().collect::<RunningStats>().statistics()
    }
}

/// Mergeable accumulator (count, mean, sum of squared deviations).
///
/// Pushing samples uses Welford's update; merging two accumulators uses the
/// pairwise formula, so partial results from subtrees combine without
/// revisiting their samples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    /// Empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one sample
    pub fn push(&mut self, sample: f64) {
        self.count += 1;
        let delta = sample - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (sample - self.mean);
    }

    /// Fold another accumulator into this one
    pub fn merge(&mut self, other: &RunningStats) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }

        let left = self.count as f64;
        let right = other.count as f64;
        let total = left + right;
        let delta = other.mean - self.mean;

        self.mean += delta * right / total;
        self.m2 += other.m2 + delta * delta * left * right / total;
        self.count += other.count;
    }

    /// Number of samples seen
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Whether no sample was seen
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Population statistics; `None` when empty
    pub fn statistics(&self) -> Option<Statistics> {
        if self.count == 0 {
            return None;
        }
        let variance = (self.m2 / self.count as f64).max(0.0);
        Some(Statistics {
            average: self.mean,
            variance,
            standard_deviation: variance.sqrt(),
        })
    }
}

impl Extend<f64> for RunningStats {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for sample in iter {
            self.push(sample);
        }
    }
}

impl FromIterator<f64> for RunningStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = Self::new();
        stats.extend(iter);
        stats
    }
}

/// Running accumulators for every lag metric of one scope
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct LagPool {
    lib_days: RunningStats,
    missed_releases: RunningStats,
    major: RunningStats,
    minor: RunningStats,
    patch: RunningStats,
    release_frequency: RunningStats,
}

impl LagPool {
    pub(crate) fn push(&mut self, lag: &TechnicalLag) {
        self.lib_days.push(lag.lib_days as f64);
        self.missed_releases.push(lag.missed_releases as f64);
        self.major.push(lag.distance.major as f64);
        self.minor.push(lag.distance.minor as f64);
        self.patch.push(lag.distance.patch as f64);
        self.release_frequency
            .push(lag.release_frequency.releases_per_month);
    }

    pub(crate) fn merge(&mut self, other: &LagPool) {
        self.lib_days.merge(&other.lib_days);
        self.missed_releases.merge(&other.missed_releases);
        self.major.merge(&other.major);
        self.minor.merge(&other.minor);
        self.patch.merge(&other.patch);
        self.release_frequency.merge(&other.release_frequency);
    }

    pub(crate) fn sample_count(&self) -> u64 {
        self.lib_days.count()
    }
}

/// Statistics of the three release-distance components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceStatistics {
    /// Major steps
    pub major: Statistics,
    /// Minor steps
    pub minor: Statistics,
    /// Patch steps
    pub patch: Statistics,
}

/// Lag of one tree node for one scope, plus statistics over its subtree.
///
/// The aggregate fields cover every node below this one (the node itself
/// excluded) that produced a lag value. Release frequency is sampled in
/// releases per month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalLagStatistics {
    /// Lag of the node's own artifact version
    pub own_lag: Option<TechnicalLag>,
    /// Days behind
    pub lib_days: Option<Statistics>,
    /// Missed releases
    pub missed_releases: Option<Statistics>,
    /// Release distance components
    pub distance: Option<DistanceStatistics>,
    /// Releases per month
    pub release_frequency: Option<Statistics>,
}

impl TechnicalLagStatistics {
    /// `None` when there is neither an own lag nor any subtree sample
    pub(crate) fn from_parts(own_lag: Option<TechnicalLag>, pool: &LagPool) -> Option<Self> {
        if own_lag.is_none() && pool.sample_count() == 0 {
            return None;
        }

        let distance = match (
            pool.major.statistics(),
            pool.minor.statistics(),
            pool.patch.statistics(),
        ) {
            (Some(major), Some(minor), Some(patch)) => Some(DistanceStatistics {
                major,
                minor,
                patch,
            }),
            _ => None,
        };

        Some(Self {
            own_lag,
            lib_days: pool.lib_days.statistics(),
            missed_releases: pool.missed_releases.statistics(),
            distance,
            release_frequency: pool.release_frequency.statistics(),
        })
    }

    /// Whether subtree statistics are present
    pub fn has_aggregate(&self) -> bool {
        self.lib_days.is_some()
    }
}
