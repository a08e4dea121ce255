//! Cargo.lock analysis

use crate::types::{Ecosystem, ProjectBuilder, ResolvedProject, ScopeGraphBuilder};
use crate::Result;
use cargo_lock::{Lockfile, Package, SourceId, Version};
use laggard_core::{ArtifactId, DependencyNode};
use std::collections::{HashMap, VecDeque};
use std::path::Path;

/// Scope name used for Cargo projects; lockfiles do not separate dev dependencies
pub const CARGO_SCOPE: &str = "all";

/// Read and analyze a `Cargo.lock`
///
/// # Errors
/// Returns an error if the file cannot be read or is not a valid lockfile
pub async fn analyze_cargo_lock(path: &Path) -> Result<ResolvedProject> {
    let content = tokio::fs::read_to_string(path).await?;
    parse_cargo_lock(&content)
}

/// Build the dependency graph of a `Cargo.lock`.
///
/// Registry packages become nodes and their lockfile dependencies edges.
/// Dependencies of local (path or workspace) packages are the direct
/// dependencies. Git packages have no registry catalog and are left out.
///
/// # Errors
/// Returns [`crate::Error::CargoLock`] for malformed lockfiles
pub fn parse_cargo_lock(content: &str) -> Result<ResolvedProject> {
    let lockfile: Lockfile = content.parse()?;

    let registry: HashMap<(&str, &Version), &Package> = lockfile
        .packages
        .iter()
        .filter(|package| package.source.as_ref().is_some_and(SourceId::is_registry))
        .map(|package| ((package.name.as_str(), &package.version), package))
        .collect();
    let resolve = |dependency: &cargo_lock::Dependency| {
        registry
            .get(&(dependency.name.as_str(), &dependency.version))
            .copied()
    };

    let mut project = ProjectBuilder::new(Ecosystem::Rust);
    let mut scope = ScopeGraphBuilder::new();
    let mut queue = VecDeque::new();

    let locals = lockfile.packages.iter().filter(|package| package.source.is_none());
    for local in locals {
        for dependency in &local.dependencies {
            match resolve(dependency) {
                Some(package) => {
                    let index = enqueue(package, &mut project, &mut scope, &mut queue);
                    scope.direct(index);
                }
                None => tracing::debug!(
                    from = %local.name,
                    dependency = %dependency.name,
                    "skipping non-registry dependency"
                ),
            }
        }
    }

    while let Some((from, package)) = queue.pop_front() {
        for dependency in &package.dependencies {
            if let Some(child) = resolve(dependency) {
                let to = enqueue(child, &mut project, &mut scope, &mut queue);
                scope.edge(from, to);
            }
        }
    }

    let graph = scope.finish();
    tracing::debug!(
        packages = lockfile.packages.len(),
        nodes = graph.nodes.len(),
        direct = graph.direct_dependency_indices.len(),
        "parsed Cargo.lock"
    );
    project.add_scope(CARGO_SCOPE, graph);
    Ok(project.finish())
}

/// Node for `package`, queueing it for expansion the first time it is seen
fn enqueue<'l>(
    package: &'l Package,
    project: &mut ProjectBuilder,
    scope: &mut ScopeGraphBuilder<(String, String)>,
    queue: &mut VecDeque<(usize, &'l Package)>,
) -> usize {
    let key = (package.name.as_str().to_string(), package.version.to_string());
    let (index, fresh) = scope.node(key, || {
        let artifact = project.intern_artifact(ArtifactId::new(package.name.as_str()));
        DependencyNode::new(artifact, package.version.to_string())
    });
    if fresh {
        queue.push_back((index, package));
    }
    index
}
