//! # laggard-core
//!
//! Technical lag computation and aggregation over dependency graphs.
//!
//! This crate provides:
//! - Version normalization and target resolution per [`UpdateScope`]
//! - Release distance, days behind and missed releases for one artifact version
//! - A memoizing [`Artifact`] calculator safe to share across threads
//! - Linking a flat [`DependencyGraph`] into a tree with cycle breaking
//! - Bottom-up statistics (mean, variance, standard deviation) over every subtree
//!
//! ## Example
//!
//! ```rust
//! use laggard_core::{
//!     compute_statistics, Artifact, ArtifactId, ArtifactVersion, DependencyGraph,
//!     DependencyNode, UpdateScope,
//! };
//!
//! # fn main() -> laggard_core::Result<()> {
//! const DAY: i64 = 86_400_000;
//! let serde = Artifact::new(
//!     ArtifactId::new("serde"),
//!     vec![
//!         ArtifactVersion::from_millis("1.0.0", 0, false)?,
//!         ArtifactVersion::from_millis("1.1.0", 30 * DAY, true)?,
//!     ],
//! );
//!
//! let mut graph = DependencyGraph::new();
//! let node = graph.add_node(DependencyNode::new(0, "1.0.0"));
//! graph.add_direct(node);
//!
//! let analyzed = compute_statistics(&graph, &[serde])?;
//! let deep = analyzed.deep_statistics(UpdateScope::Minor).unwrap();
//! assert_eq!(deep.lib_days.unwrap().average, 30.0);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod aggregate;
pub mod artifact;
pub mod distance;
pub mod error;
pub mod graph;
pub mod lag;
pub mod linker;
pub mod scope;
pub mod statistics;
pub mod version;

pub use error::{Error, Result};

pub use aggregate::{
    aggregate, compute_statistics, compute_statistics_with, AnalyzedGraph, Completeness,
};
pub use artifact::{Artifact, ArtifactId, ArtifactRecord, CacheStats, LagCache};
pub use distance::{release_distance, VersionDistance};
pub use graph::{DependencyEdge, DependencyGraph, DependencyNode};
pub use lag::{ReleaseFrequency, TechnicalLag};
pub use linker::{
    link, link_with, LinkOptions, LinkedDependencyNode, DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES,
};
pub use scope::{ScopeMap, UpdateScope};
pub use statistics::{DistanceStatistics, RunningStats, Statistics, TechnicalLagStatistics};
pub use version::{
    find_highest_applicable_version, is_stable, is_stability_compatible, normalize_version,
    resolve_target, ArtifactVersion,
};
