//! Core types for project analysis

use laggard_core::{ArtifactId, DependencyGraph, DependencyNode};
use laggard_info::Registry;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Represents a dependency ecosystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    /// Rust (Cargo)
    Rust,
    /// JavaScript/TypeScript (npm)
    JavaScript,
}

impl Ecosystem {
    /// Registry the ecosystem's packages are published to
    pub fn registry(&self) -> Registry {
        match self {
            Ecosystem::Rust => Registry::CratesIo,
            Ecosystem::JavaScript => Registry::Npm,
        }
    }
}

impl std::fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ecosystem::Rust => f.write_str("rust"),
            Ecosystem::JavaScript => f.write_str("javascript"),
        }
    }
}

/// A project's dependency graphs, one per dependency scope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedProject {
    /// Ecosystem of the lockfile
    pub ecosystem: Ecosystem,
    /// Deduplicated artifacts; `DependencyNode::artifact_index` points here
    pub artifacts: Vec<ArtifactId>,
    /// Graph per scope name (`all`, `runtime`, `dev`)
    pub scopes: BTreeMap<String, DependencyGraph>,
}

impl ResolvedProject {
    /// Graph of one scope
    pub fn scope(&self, name: &str) -> Option<&DependencyGraph> {
        self.scopes.get(name)
    }

    /// Total node count across scopes
    pub fn node_count(&self) -> usize {
        self.scopes.values().map(|graph| graph.nodes.len()).sum()
    }
}

/// Interns artifacts and collects scope graphs while a lockfile is walked
#[derive(Debug)]
pub(crate) struct ProjectBuilder {
    ecosystem: Ecosystem,
    artifacts: Vec<ArtifactId>,
    artifact_index: HashMap<ArtifactId, usize>,
    scopes: BTreeMap<String, DependencyGraph>,
}

impl ProjectBuilder {
    pub(crate) fn new(ecosystem: Ecosystem) -> Self {
        Self {
            ecosystem,
            artifacts: Vec::new(),
            artifact_index: HashMap::new(),
            scopes: BTreeMap::new(),
        }
    }

    pub(crate) fn intern_artifact(&mut self, id: ArtifactId) -> usize {
        if let Some(&index) = self.artifact_index.get(&id) {
            return index;
        }
        self.artifacts.push(id.clone());
        self.artifact_index.insert(id, self.artifacts.len() - 1);
        self.artifacts.len() - 1
    }

    pub(crate) fn add_scope(&mut self, name: impl Into<String>, graph: DependencyGraph) {
        self.scopes.insert(name.into(), graph);
    }

    pub(crate) fn finish(self) -> ResolvedProject {
        ResolvedProject {
            ecosystem: self.ecosystem,
            artifacts: self.artifacts,
            scopes: self.scopes,
        }
    }
}

/// Builds one scope's graph.
///
/// `K` identifies a locked package (name + version, or an install path);
/// each distinct key becomes exactly one node.
#[derive(Debug)]
pub(crate) struct ScopeGraphBuilder<K> {
    graph: DependencyGraph,
    nodes: HashMap<K, usize>,
    edges: HashSet<(usize, usize)>,
}

impl<K: std::hash::Hash + Eq> ScopeGraphBuilder<K> {
    pub(crate) fn new() -> Self {
        Self {
            graph: DependencyGraph::new(),
            nodes: HashMap::new(),
            edges: HashSet::new(),
        }
    }

    /// Node for `key`, creating it on first sight; the flag tells whether it is new
    pub(crate) fn node(
        &mut self,
        key: K,
        make: impl FnOnce() -> DependencyNode,
    ) -> (usize, bool) {
        if let Some(&index) = self.nodes.get(&key) {
            return (index, false);
        }
        let index = self.graph.add_node(make());
        self.nodes.insert(key, index);
        (index, true)
    }

    pub(crate) fn edge(&mut self, from: usize, to: usize) {
        if self.edges.insert((from, to)) {
            self.graph.add_edge(from, to);
        }
    }

    pub(crate) fn direct(&mut self, index: usize) {
        if !self.graph.direct_dependency_indices.contains(&index) {
            self.graph.add_direct(index);
        }
    }

    pub(crate) fn finish(self) -> DependencyGraph {
        self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifacts_are_interned() {
        let mut builder = ProjectBuilder::new(Ecosystem::JavaScript);
        let a = builder.intern_artifact(ArtifactId::with_group("@s", "a"));
        let b = builder.intern_artifact(ArtifactId::new("b"));
        let again = builder.intern_artifact(ArtifactId::with_group("@s", "a"));

        assert_eq!(a, again);
        assert_ne!(a, b);
        assert_eq!(builder.finish().artifacts.len(), 2);
    }

    #[test]
    fn test_scope_builder_deduplicates() {
        let mut scope = ScopeGraphBuilder::new();
        let (x, fresh) = scope.node("x", || DependencyNode::new(0, "1.0.0"));
        assert!(fresh);
        let (y, _) = scope.node("y", || DependencyNode::new(1, "1.0.0"));
        let (x_again, fresh) = scope.node("x", || DependencyNode::new(0, "9.9.9"));
        assert_eq!(x, x_again);
        assert!(!fresh);

        scope.edge(x, y);
        scope.edge(x, y);
        scope.direct(x);
        scope.direct(x);

        let graph = scope.finish();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.direct_dependency_indices, vec![x]);
        assert_eq!(graph.nodes[x].used_version, "1.0.0");
    }

    #[test]
    fn test_ecosystem_registry() {
        assert_eq!(Ecosystem::Rust.registry(), Registry::CratesIo);
        assert_eq!(Ecosystem::JavaScript.registry(), Registry::Npm);
    }
}
