//! Flat, index-addressed dependency graph (the wire/storage form)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// One resolved package version in a project
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyNode {
    /// Index into the project's artifact list
    pub artifact_index: usize,
    /// The version the project resolves to
    pub used_version: String,
}

impl DependencyNode {
    /// Build a node
    pub fn new(artifact_index: usize, used_version: impl Into<String>) -> Self {
        Self {
            artifact_index,
            used_version: used_version.into(),
        }
    }
}

/// `from` depends on `to`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Depending node index
    pub from: usize,
    /// Dependency node index
    pub to: usize,
}

impl DependencyEdge {
    /// Build an edge
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }
}

/// Adjacency list over node indices, one per dependency scope (e.g. runtime, dev)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGraph {
    /// All nodes
    #[serde(default)]
    pub nodes: Vec<DependencyNode>,
    /// Edges between nodes, in declaration order
    #[serde(default)]
    pub edges: Vec<DependencyEdge>,
    /// Nodes the project depends on directly
    #[serde(default)]
    pub direct_dependency_indices: Vec<usize>,
}

impl DependencyGraph {
    /// Empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a node and return its index
    pub fn add_node(&mut self, node: DependencyNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Add an edge
    pub fn add_edge(&mut self, from: usize, to: usize) {
        self.edges.push(DependencyEdge::new(from, to));
    }

    /// Mark a node as a direct dependency of the project
    pub fn add_direct(&mut self, index: usize) {
        self.direct_dependency_indices.push(index);
    }

    /// Check that every edge endpoint and direct index addresses a node
    ///
    /// # Errors
    /// Returns the first out-of-range index found
    pub fn validate(&self) -> Result<()> {
        let node_count = self.nodes.len();
        for (position, &index) in self.direct_dependency_indices.iter().enumerate() {
            if index >= node_count {
                return Err(Error::DirectDependencyOutOfBounds {
                    position,
                    index,
                    node_count,
                });
            }
        }
        for (edge, e) in self.edges.iter().enumerate() {
            if e.from >= node_count || e.to >= node_count {
                return Err(Error::EdgeOutOfBounds {
                    edge,
                    from: e.from,
                    to: e.to,
                    node_count,
                });
            }
        }
        Ok(())
    }

    /// Check that every node references one of `artifact_count` artifacts
    ///
    /// # Errors
    /// Returns [`Error::ArtifactOutOfBounds`] for the first bad node
    pub fn validate_artifacts(&self, artifact_count: usize) -> Result<()> {
        match self
            .nodes
            .iter()
            .enumerate()
            .find(|(_, node)| node.artifact_index >= artifact_count)
        {
            Some((node, bad)) => Err(Error::ArtifactOutOfBounds {
                node,
                artifact_index: bad.artifact_index,
                artifact_count,
            }),
            None => Ok(()),
        }
    }

    /// Direct dependency nodes, skipping out-of-range indices
    pub fn direct_nodes(&self) -> impl Iterator<Item = &DependencyNode> {
        self.direct_dependency_indices
            .iter()
            .filter_map(|&index| self.nodes.get(index))
    }

    /// Indices `from` depends on, in edge order
    pub fn children_of(&self, from: usize) -> impl Iterator<Item = usize> + '_ {
        self.edges
            .iter()
            .filter(move |edge| edge.from == from)
            .map(|edge| edge.to)
    }

    /// Outgoing edges per node, in edge order
    ///
    /// # Errors
    /// Returns [`Error::EdgeOutOfBounds`] if an edge leaves the node range
    pub fn adjacency(&self) -> Result<Vec<Vec<usize>>> {
        let node_count = self.nodes.len();
        let mut adjacency = vec![Vec::new(); node_count];
        for (edge, e) in self.edges.iter().enumerate() {
            if e.from >= node_count || e.to >= node_count {
                return Err(Error::EdgeOutOfBounds {
                    edge,
                    from: e.from,
                    to: e.to,
                    node_count,
                });
            }
            adjacency[e.from].push(e.to);
        }
        Ok(adjacency)
    }
}
