//! Flat graph to rooted tree conversion with per-path cycle breaking

use crate::graph::{DependencyGraph, DependencyNode};
use crate::scope::{ScopeMap, UpdateScope};
use crate::statistics::TechnicalLagStatistics;
use crate::{Error, Result};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::HashSet;

/// Default maximum depth of a linked tree
pub const DEFAULT_MAX_DEPTH: usize = 1_000;
/// Default maximum number of materialized tree nodes
pub const DEFAULT_MAX_NODES: usize = 1_000_000;

/// Limits applied while materializing a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkOptions {
    /// Deepest allowed root-to-node path (the synthetic root is depth 0)
    pub max_depth: usize,
    /// Most nodes the tree may contain, root excluded
    pub max_nodes: usize,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

/// A node of the linked dependency tree.
///
/// The synthetic root has no backing [`DependencyNode`] and holds the direct
/// dependencies as children. Every occurrence of a shared dependency is its
/// own node with its own statistics.
///
/// Serializes as `{"nodes": [...]}`, a pre-order list where each entry names
/// its `parent` by position.
#[derive(Debug, Clone)]
pub struct LinkedDependencyNode<'g> {
    node_index: Option<usize>,
    node: Option<&'g DependencyNode>,
    cycle_truncated: bool,
    statistics: ScopeMap<Option<TechnicalLagStatistics>>,
    children: Vec<LinkedDependencyNode<'g>>,
}

impl<'g> LinkedDependencyNode<'g> {
    fn root(children: Vec<LinkedDependencyNode<'g>>) -> Self {
        Self {
            node_index: None,
            node: None,
            cycle_truncated: false,
            statistics: ScopeMap::default(),
            children,
        }
    }

    fn new(index: usize, node: &'g DependencyNode, children: Vec<LinkedDependencyNode<'g>>) -> Self {
        Self {
            node_index: Some(index),
            node: Some(node),
            cycle_truncated: false,
            statistics: ScopeMap::default(),
            children,
        }
    }

    /// Whether this is the synthetic project root
    pub fn is_root(&self) -> bool {
        self.node.is_none()
    }

    /// Backing flat node (`None` for the root)
    pub fn node(&self) -> Option<&'g DependencyNode> {
        self.node
    }

    /// Index of the backing flat node (`None` for the root)
    pub fn node_index(&self) -> Option<usize> {
        self.node_index
    }

    /// Whether expansion stopped here because the node already sits on the path
    pub fn is_cycle_truncated(&self) -> bool {
        self.cycle_truncated
    }

    /// Resolved dependencies of this node
    pub fn children(&self) -> &[LinkedDependencyNode<'g>] {
        &self.children
    }

    /// Statistics attached for `scope`, if any
    pub fn statistics(&self, scope: UpdateScope) -> Option<&TechnicalLagStatistics> {
        self.statistics.get(scope).as_ref()
    }

    /// Statistics for every scope
    pub fn statistics_map(&self) -> &ScopeMap<Option<TechnicalLagStatistics>> {
        &self.statistics
    }

    pub(crate) fn set_statistics(&mut self, statistics: ScopeMap<Option<TechnicalLagStatistics>>) {
        self.statistics = statistics;
    }

    pub(crate) fn take_children(&mut self) -> Vec<LinkedDependencyNode<'g>> {
        std::mem::take(&mut self.children)
    }

    pub(crate) fn set_children(&mut self, children: Vec<LinkedDependencyNode<'g>>) {
        self.children = children;
    }

    /// Number of nodes below this one
    pub fn descendant_count(&self) -> usize {
        self.walk().count() - 1
    }

    /// Depth-first, pre-order walk over this node and everything below it
    pub fn walk(&self) -> impl Iterator<Item = &LinkedDependencyNode<'g>> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.children.iter().rev());
            Some(next)
        })
    }

    /// Pre-order walk yielding each node with its parent's position in the walk
    fn walk_with_parents(
        &self,
    ) -> impl Iterator<Item = (Option<usize>, &LinkedDependencyNode<'g>)> {
        let mut stack = vec![(None, self)];
        let mut position = 0;
        std::iter::from_fn(move || {
            let (parent, next) = stack.pop()?;
            stack.extend(next.children.iter().rev().map(|child| (Some(position), child)));
            position += 1;
            Some((parent, next))
        })
    }
}

#[derive(Serialize)]
struct FlatEntry<'a, 'g> {
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    node_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    node: Option<&'g DependencyNode>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    cycle_truncated: bool,
    statistics: &'a ScopeMap<Option<TechnicalLagStatistics>>,
}

struct FlatEntries<'a, 'g>(&'a LinkedDependencyNode<'g>);

impl Serialize for FlatEntries<'_, '_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.walk_with_parents().map(|(parent, node)| FlatEntry {
            parent,
            node_index: node.node_index,
            node: node.node,
            cycle_truncated: node.cycle_truncated,
            statistics: node.statistics_map(),
        }))
    }
}

impl Serialize for LinkedDependencyNode<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut tree = serializer.serialize_struct("LinkedDependencyTree", 1)?;
        tree.serialize_field("nodes", &FlatEntries(self))?;
        tree.end()
    }
}

/// Link `graph` with the default [`LinkOptions`]
///
/// # Errors
/// See [`link_with`]
pub fn link(graph: &DependencyGraph) -> Result<LinkedDependencyNode<'_>> {
    link_with(graph, &LinkOptions::default())
}

/// Materialize `graph` as a tree rooted at a synthetic project node.
///
/// Each direct dependency is expanded depth-first. A node already on the
/// current root-to-node path is emitted without children (the cycle is cut
/// there); the same node reached through a different path is expanded again.
/// Expansion keeps its path on the heap, so tree depth is bounded by
/// [`LinkOptions::max_depth`] only.
///
/// # Errors
/// - [`Error::EdgeOutOfBounds`] / [`Error::DirectDependencyOutOfBounds`] for
///   indices outside the node list
/// - [`Error::GraphTooDeep`] / [`Error::GraphTooLarge`] when a limit trips
pub fn link_with<'g>(
    graph: &'g DependencyGraph,
    options: &LinkOptions,
) -> Result<LinkedDependencyNode<'g>> {
    graph.validate()?;
    let mut linker = Linker {
        graph,
        adjacency: graph.adjacency()?,
        options,
        path: HashSet::new(),
        stack: Vec::new(),
        finished: Vec::new(),
        materialized: 0,
    };

    for &index in &graph.direct_dependency_indices {
        linker.expand(index)?;
    }

    tracing::debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        materialized = linker.materialized,
        "linked dependency graph"
    );
    Ok(LinkedDependencyNode::root(linker.finished))
}

/// A node on the current path whose children are still being expanded
struct Frame<'g> {
    index: usize,
    next_child: usize,
    children: Vec<LinkedDependencyNode<'g>>,
}

struct Linker<'g, 'o> {
    graph: &'g DependencyGraph,
    adjacency: Vec<Vec<usize>>,
    options: &'o LinkOptions,
    /// Node indices on the current root-to-node path
    path: HashSet<usize>,
    stack: Vec<Frame<'g>>,
    /// Expanded direct dependencies
    finished: Vec<LinkedDependencyNode<'g>>,
    materialized: usize,
}

impl<'g> Linker<'g, '_> {
    fn expand(&mut self, index: usize) -> Result<()> {
        self.enter(index)?;
        while let Some(frame) = self.stack.last_mut() {
            let next = self.adjacency[frame.index].get(frame.next_child).copied();
            match next {
                Some(child) => {
                    frame.next_child += 1;
                    self.enter(child)?;
                }
                None => self.leave(),
            }
        }
        Ok(())
    }

    fn enter(&mut self, index: usize) -> Result<()> {
        let depth = self.stack.len() + 1;
        if depth > self.options.max_depth {
            return Err(Error::GraphTooDeep {
                depth,
                max_allowed: self.options.max_depth,
            });
        }
        self.materialized += 1;
        if self.materialized > self.options.max_nodes {
            return Err(Error::GraphTooLarge {
                node_count: self.materialized,
                max_allowed: self.options.max_nodes,
            });
        }

        if !self.path.insert(index) {
            let mut leaf = LinkedDependencyNode::new(index, &self.graph.nodes[index], Vec::new());
            leaf.cycle_truncated = true;
            self.attach(leaf);
            return Ok(());
        }

        self.stack.push(Frame {
            index,
            next_child: 0,
            children: Vec::new(),
        });
        Ok(())
    }

    fn leave(&mut self) {
        if let Some(frame) = self.stack.pop() {
            self.path.remove(&frame.index);
            let node = LinkedDependencyNode::new(
                frame.index,
                &self.graph.nodes[frame.index],
                frame.children,
            );
            self.attach(node);
        }
    }

    fn attach(&mut self, node: LinkedDependencyNode<'g>) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.finished.push(node),
        }
    }
}
