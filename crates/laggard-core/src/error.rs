//! Error types for laggard-core

use thiserror::Error;

/// Result type alias using laggard-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the lag engine.
///
/// Only malformed input is an error. Missing registry data (no catalog, no
/// applicable target, unknown release date) is reported as `None` by the
/// calculator instead.
#[derive(Debug, Error)]
pub enum Error {
    /// A version string could not be normalized into a semantic version
    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion {
        /// The raw version string
        version: String,
        /// Why parsing failed
        reason: String,
    },

    /// An edge references a node outside the graph
    #[error("Edge {edge} ({from} -> {to}) is out of bounds for a graph with {node_count} nodes")]
    EdgeOutOfBounds {
        /// Position of the edge in the edge list
        edge: usize,
        /// Source node index
        from: usize,
        /// Target node index
        to: usize,
        /// Number of nodes in the graph
        node_count: usize,
    },

    /// A direct dependency index references a node outside the graph
    #[error("Direct dependency #{position} points at node {index}, but the graph has {node_count} nodes")]
    DirectDependencyOutOfBounds {
        /// Position within the direct dependency list
        position: usize,
        /// The offending node index
        index: usize,
        /// Number of nodes in the graph
        node_count: usize,
    },

    /// A node references an artifact outside the artifact list
    #[error("Node {node} references artifact {artifact_index}, but only {artifact_count} artifacts are known")]
    ArtifactOutOfBounds {
        /// Node index
        node: usize,
        /// The offending artifact index
        artifact_index: usize,
        /// Number of known artifacts
        artifact_count: usize,
    },

    /// Linked tree exceeded the configured depth
    #[error("Dependency tree depth {depth} exceeds max {max_allowed}")]
    GraphTooDeep {
        /// Depth reached
        depth: usize,
        /// Configured limit
        max_allowed: usize,
    },

    /// Linked tree exceeded the configured node count
    #[error("Linked dependency tree has more than {max_allowed} nodes ({node_count} materialized)")]
    GraphTooLarge {
        /// Nodes materialized when the limit tripped
        node_count: usize,
        /// Configured limit
        max_allowed: usize,
    },
}

impl Error {
    pub(crate) fn invalid_version(version: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidVersion {
            version: version.into(),
            reason: reason.to_string(),
        }
    }
}
