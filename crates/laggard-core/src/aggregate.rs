//! Bottom-up aggregation of technical lag over a linked dependency tree

use crate::artifact::Artifact;
use crate::graph::DependencyGraph;
use crate::lag::TechnicalLag;
use crate::linker::{link_with, LinkOptions, LinkedDependencyNode};
use crate::scope::{ScopeMap, UpdateScope};
use crate::statistics::{LagPool, TechnicalLagStatistics};
use crate::version::normalize_version;
use crate::{Error, Result};
use serde::Serialize;

/// How many statistic slots of a tree ended up populated.
///
/// Every node, root included, has one slot per [`UpdateScope`]. A low
/// percentage flags graphs whose artifacts mostly lack release data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Completeness {
    /// `(descendants + 1) * 3`
    pub expected: usize,
    /// Slots holding statistics
    pub populated: usize,
}

impl Completeness {
    /// Populated share in percent
    pub fn percentage(&self) -> f64 {
        if self.expected == 0 {
            return 0.0;
        }
        self.populated as f64 * 100.0 / self.expected as f64
    }
}

/// A linked tree with statistics attached to every node
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedGraph<'g> {
    completeness: Completeness,
    node_count: usize,
    root: LinkedDependencyNode<'g>,
}

impl<'g> AnalyzedGraph<'g> {
    /// The synthetic project root
    pub fn root(&self) -> &LinkedDependencyNode<'g> {
        &self.root
    }

    /// Slot fill rate of the tree
    pub fn completeness(&self) -> Completeness {
        self.completeness
    }

    /// Nodes in the tree, root excluded
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Statistics over every node of the tree
    pub fn deep_statistics(&self, scope: UpdateScope) -> Option<&TechnicalLagStatistics> {
        self.root.statistics(scope)
    }

    /// Statistics over the direct dependencies' own lag only
    pub fn shallow_statistics(&self, scope: UpdateScope) -> Option<TechnicalLagStatistics> {
        let mut pool = LagPool::default();
        for lag in self
            .root
            .children()
            .iter()
            .filter_map(|child| child.statistics(scope)?.own_lag.as_ref())
        {
            pool.push(lag);
        }
        TechnicalLagStatistics::from_parts(None, &pool)
    }
}

/// Link `graph` and aggregate it against `artifacts` with default limits
///
/// # Errors
/// Structural problems of the flat graph (see [`compute_statistics_with`])
pub fn compute_statistics<'g>(
    graph: &'g DependencyGraph,
    artifacts: &[Artifact],
) -> Result<AnalyzedGraph<'g>> {
    compute_statistics_with(graph, artifacts, &LinkOptions::default())
}

/// Link `graph` with `options` and aggregate it against `artifacts`
///
/// # Errors
/// Returns an error for out-of-range edge, direct dependency or artifact
/// indices, and when a [`LinkOptions`] limit trips. Missing release data
/// never fails the computation.
pub fn compute_statistics_with<'g>(
    graph: &'g DependencyGraph,
    artifacts: &[Artifact],
    options: &LinkOptions,
) -> Result<AnalyzedGraph<'g>> {
    graph.validate_artifacts(artifacts.len())?;
    let root = link_with(graph, options)?;
    aggregate(root, artifacts)
}

/// Attach statistics to every node of `root` in one post-order pass.
///
/// Children are finished before their parent. For each scope a node gets its
/// own lag plus statistics over everything below it; the node's lag then
/// joins the pool handed to its parent. Nodes without release data simply
/// contribute nothing.
///
/// # Errors
/// Returns [`Error::ArtifactOutOfBounds`] if a node references an unknown artifact
pub fn aggregate<'g>(
    root: LinkedDependencyNode<'g>,
    artifacts: &[Artifact],
) -> Result<AnalyzedGraph<'g>> {
    let mut tally = Tally::default();
    let mut top = Frame::new(root);
    let mut stack: Vec<Frame<'g>> = Vec::new();

    loop {
        let current = stack.last_mut().unwrap_or(&mut top);
        if let Some(child) = current.pending.next() {
            stack.push(Frame::new(child));
            continue;
        }
        let Some(frame) = stack.pop() else {
            break;
        };
        let (node, contribution) = frame.finish(artifacts, &mut tally)?;
        stack.last_mut().unwrap_or(&mut top).absorb(node, &contribution);
    }
    let (root, _) = top.finish(artifacts, &mut tally)?;

    let node_count = tally.nodes.saturating_sub(1);
    let completeness = Completeness {
        expected: (node_count + 1) * UpdateScope::all().len(),
        populated: tally.populated,
    };
    tracing::debug!(
        nodes = node_count,
        populated = completeness.populated,
        expected = completeness.expected,
        "aggregated technical lag"
    );

    Ok(AnalyzedGraph {
        completeness,
        node_count,
        root,
    })
}

#[derive(Debug, Default)]
struct Tally {
    nodes: usize,
    populated: usize,
}

/// A node whose children are still being aggregated
struct Frame<'g> {
    node: LinkedDependencyNode<'g>,
    pending: std::vec::IntoIter<LinkedDependencyNode<'g>>,
    done: Vec<LinkedDependencyNode<'g>>,
    /// Lags of everything below `node` finished so far
    pools: ScopeMap<LagPool>,
}

impl<'g> Frame<'g> {
    fn new(mut node: LinkedDependencyNode<'g>) -> Self {
        let children = node.take_children();
        Self {
            done: Vec::with_capacity(children.len()),
            pending: children.into_iter(),
            node,
            pools: ScopeMap::default(),
        }
    }

    fn absorb(&mut self, child: LinkedDependencyNode<'g>, contribution: &ScopeMap<LagPool>) {
        for &scope in UpdateScope::all() {
            self.pools.get_mut(scope).merge(contribution.get(scope));
        }
        self.done.push(child);
    }

    /// Attach statistics to the node and hand back its pool for the parent
    fn finish(
        self,
        artifacts: &[Artifact],
        tally: &mut Tally,
    ) -> Result<(LinkedDependencyNode<'g>, ScopeMap<LagPool>)> {
        let Frame {
            mut node,
            done,
            mut pools,
            ..
        } = self;
        let own = own_lag(&node, artifacts)?;

        let statistics =
            own.map(|scope, lag| TechnicalLagStatistics::from_parts(lag.clone(), pools.get(scope)));
        tally.populated += statistics.iter().filter(|(_, s)| s.is_some()).count();
        node.set_statistics(statistics);
        node.set_children(done);

        for (scope, lag) in own.iter() {
            if let Some(lag) = lag {
                pools.get_mut(scope).push(lag);
            }
        }
        tally.nodes += 1;

        Ok((node, pools))
    }
}

fn own_lag(
    node: &LinkedDependencyNode<'_>,
    artifacts: &[Artifact],
) -> Result<ScopeMap<Option<TechnicalLag>>> {
    let (Some(flat), Some(index)) = (node.node(), node.node_index()) else {
        return Ok(ScopeMap::default());
    };

    let artifact = artifacts
        .get(flat.artifact_index)
        .ok_or(Error::ArtifactOutOfBounds {
            node: index,
            artifact_index: flat.artifact_index,
            artifact_count: artifacts.len(),
        })?;

    match normalize_version(&flat.used_version) {
        Ok(used) => Ok(ScopeMap::from_fn(|scope| artifact.tech_lag_for(&used, scope))),
        Err(e) => {
            tracing::warn!(
                artifact = %artifact.id(),
                version = %flat.used_version,
                error = %e,
                "skipping node with unparseable version"
            );
            Ok(ScopeMap::default())
        }
    }
}
