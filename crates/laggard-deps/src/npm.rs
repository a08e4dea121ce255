//! package-lock.json (v2/v3) analysis

use crate::types::{Ecosystem, ProjectBuilder, ResolvedProject, ScopeGraphBuilder};
use crate::{Error, Result};
use laggard_core::{ArtifactId, DependencyNode};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::Path;

/// Scope holding `dependencies` and `optionalDependencies` of the root package
pub const RUNTIME_SCOPE: &str = "runtime";
/// Scope holding `devDependencies` of the root package
pub const DEV_SCOPE: &str = "dev";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageLock {
    #[serde(default)]
    lockfile_version: u8,
    #[serde(default)]
    packages: HashMap<String, PackageLockEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageLockEntry {
    name: Option<String>,
    version: Option<String>,
    #[serde(default)]
    link: bool,
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
    #[serde(default)]
    optional_dependencies: BTreeMap<String, String>,
    #[serde(default)]
    dev_dependencies: BTreeMap<String, String>,
}

impl PackageLockEntry {
    fn runtime_dependencies(&self) -> impl Iterator<Item = &str> {
        self.dependencies
            .keys()
            .chain(self.optional_dependencies.keys())
            .map(String::as_str)
    }
}

/// Read and analyze a `package-lock.json`
///
/// # Errors
/// Returns an error if the file cannot be read or is not a v2/v3 lockfile
pub async fn analyze_package_lock(path: &Path) -> Result<ResolvedProject> {
    let content = tokio::fs::read_to_string(path).await?;
    parse_package_lock(&content, path)
}

/// Build the runtime and dev graphs of a `package-lock.json`.
///
/// Dependency names are resolved the way node does: look in the requiring
/// package's own `node_modules`, then walk up towards the project root.
/// Each scope only contains packages reachable from its direct dependencies.
///
/// # Errors
/// Returns [`Error::InvalidFormat`] for lockfiles older than v2 or without a root entry
pub fn parse_package_lock(content: &str, path: &Path) -> Result<ResolvedProject> {
    let lock: PackageLock = serde_json::from_str(content)?;
    if lock.lockfile_version < 2 {
        return Err(Error::InvalidFormat(
            path.to_path_buf(),
            format!(
                "lockfileVersion {} is not supported, regenerate with npm 7 or newer",
                lock.lockfile_version
            ),
        ));
    }
    let root = lock.packages.get("").ok_or_else(|| {
        Error::InvalidFormat(path.to_path_buf(), "missing root package entry".to_string())
    })?;

    let mut project = ProjectBuilder::new(Ecosystem::JavaScript);
    let scopes = [
        (RUNTIME_SCOPE, root.runtime_dependencies().collect::<Vec<_>>()),
        (DEV_SCOPE, root.dev_dependencies.keys().map(String::as_str).collect()),
    ];
    for (name, direct) in scopes {
        let graph = ScopeWalker::new(&lock.packages, &mut project).walk(&direct);
        tracing::debug!(
            scope = name,
            nodes = graph.nodes.len(),
            direct = graph.direct_dependency_indices.len(),
            "parsed package-lock.json scope"
        );
        project.add_scope(name, graph);
    }

    Ok(project.finish())
}

struct ScopeWalker<'l, 'p> {
    packages: &'l HashMap<String, PackageLockEntry>,
    project: &'p mut ProjectBuilder,
    scope: ScopeGraphBuilder<&'l str>,
    queue: VecDeque<(usize, &'l str)>,
}

impl<'l, 'p> ScopeWalker<'l, 'p> {
    fn new(
        packages: &'l HashMap<String, PackageLockEntry>,
        project: &'p mut ProjectBuilder,
    ) -> Self {
        Self {
            packages,
            project,
            scope: ScopeGraphBuilder::new(),
            queue: VecDeque::new(),
        }
    }

    fn walk(mut self, direct: &[&str]) -> laggard_core::DependencyGraph {
        for name in direct {
            match self.node_for("", name) {
                Some(index) => self.scope.direct(index),
                None => tracing::debug!(package = name, "direct dependency not installed"),
            }
        }

        let packages = self.packages;
        while let Some((from, path)) = self.queue.pop_front() {
            let Some(entry) = packages.get(path) else {
                continue;
            };
            for name in entry.runtime_dependencies() {
                if let Some(to) = self.node_for(path, name) {
                    self.scope.edge(from, to);
                }
            }
        }

        self.scope.finish()
    }

    /// Node of the package `name` as seen from the install path `from`
    fn node_for(&mut self, from: &str, name: &str) -> Option<usize> {
        let (path, entry) = resolve(self.packages, from, name)?;
        if entry.link {
            tracing::debug!(package = name, "skipping linked workspace package");
            return None;
        }
        let Some(version) = entry.version.as_deref() else {
            tracing::warn!(package = name, path, "lockfile entry without version");
            return None;
        };

        let project = &mut *self.project;
        let (index, fresh) = self.scope.node(path, || {
            let package = entry.name.as_deref().unwrap_or(name);
            let artifact = project.intern_artifact(artifact_id(package));
            DependencyNode::new(artifact, version)
        });
        if fresh {
            self.queue.push_back((index, path));
        }
        Some(index)
    }
}

/// Find the install path node would load `name` from when required at `from`
fn resolve<'l>(
    packages: &'l HashMap<String, PackageLockEntry>,
    from: &str,
    name: &str,
) -> Option<(&'l str, &'l PackageLockEntry)> {
    let mut base = from;
    loop {
        let candidate = if base.is_empty() {
            format!("node_modules/{}", name)
        } else {
            format!("{}/node_modules/{}", base, name)
        };
        if let Some((path, entry)) = packages.get_key_value(&candidate) {
            return Some((path.as_str(), entry));
        }
        if base.is_empty() {
            return None;
        }
        base = base
            .rfind("/node_modules/")
            .map_or("", |index| &base[..index]);
    }
}

/// `@scope/name` becomes a grouped id, everything else a flat one
pub fn artifact_id(package: &str) -> ArtifactId {
    match package.strip_prefix('@').and_then(|rest| rest.split_once('/')) {
        Some((scope, name)) => ArtifactId::with_group(format!("@{}", scope), name),
        None => ArtifactId::new(package),
    }
}
