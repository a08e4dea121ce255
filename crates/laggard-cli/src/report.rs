//! Per-scope lag reports for a resolved project.

use anyhow::{Context, Result};
use laggard_config::Settings;
use laggard_core::{
    compute_statistics_with, AnalyzedGraph, Artifact, DependencyGraph, TechnicalLagStatistics,
    UpdateScope,
};
use laggard_deps::{Ecosystem, ResolvedProject, DEV_SCOPE};
use laggard_info::{fetch_catalogs, InfoClient};
use std::collections::BTreeSet;

/// Statistics of every analyzed graph scope of a project
pub struct ProjectReport<'p> {
    pub ecosystem: Ecosystem,
    pub update_scopes: Vec<UpdateScope>,
    pub shallow_only: bool,
    pub scopes: Vec<ScopeReport<'p>>,
}

/// One graph scope (`all`, `runtime`, `dev`) of a project
pub struct ScopeReport<'p> {
    pub name: &'p str,
    pub analyzed: AnalyzedGraph<'p>,
}

/// Deep and shallow statistics of one update scope
pub struct ScopeSummary {
    pub scope: UpdateScope,
    pub deep: Option<TechnicalLagStatistics>,
    pub shallow: Option<TechnicalLagStatistics>,
}

impl ScopeReport<'_> {
    pub fn summaries(&self, scopes: &[UpdateScope]) -> Vec<ScopeSummary> {
        scopes
            .iter()
            .map(|&scope| ScopeSummary {
                scope,
                deep: self.analyzed.deep_statistics(scope).cloned(),
                shallow: self.analyzed.shallow_statistics(scope),
            })
            .collect()
    }
}

/// Graph scopes the settings ask for, in name order
pub fn selected_scopes<'p>(
    project: &'p ResolvedProject,
    settings: &Settings,
) -> impl Iterator<Item = (&'p str, &'p DependencyGraph)> {
    let include_dev = settings.include_dev;
    project
        .scopes
        .iter()
        .filter(move |(name, _)| include_dev || name.as_str() != DEV_SCOPE)
        .map(|(name, graph)| (name.as_str(), graph))
}

/// Fetch catalogs for the artifacts used by the selected scopes.
///
/// The result is aligned with `project.artifacts`; artifacts only used by
/// skipped scopes are left without versions.
pub async fn fetch_project_catalogs(
    project: &ResolvedProject,
    settings: &Settings,
) -> Result<Vec<Artifact>> {
    let used: BTreeSet<usize> = selected_scopes(project, settings)
        .flat_map(|(_, graph)| graph.nodes.iter().map(|node| node.artifact_index))
        .collect();
    let ids: Vec<_> = used
        .iter()
        .filter_map(|&index| project.artifacts.get(index).cloned())
        .collect();

    let client = registry_client(settings)?;
    let source = client.source(project.ecosystem.registry());
    let mut fetched = fetch_catalogs(&source, &ids, settings.fetch_concurrency)
        .await
        .into_iter();

    Ok(project
        .artifacts
        .iter()
        .enumerate()
        .map(|(index, id)| {
            let artifact = used.contains(&index).then(|| fetched.next()).flatten();
            artifact.unwrap_or_else(|| Artifact::without_versions(id.clone()))
        })
        .collect())
}

/// Registry client throttled to the configured request rate
pub fn registry_client(settings: &Settings) -> Result<InfoClient> {
    InfoClient::with_rate_limit(settings.requests_per_second)
        .context("Failed to create registry client")
}

/// Link and aggregate every selected scope of `project`
pub fn build_report<'p>(
    project: &'p ResolvedProject,
    artifacts: &[Artifact],
    settings: &Settings,
    shallow_only: bool,
) -> Result<ProjectReport<'p>> {
    let options = settings.link_options();
    let scopes = selected_scopes(project, settings)
        .map(|(name, graph)| {
            let analyzed = compute_statistics_with(graph, artifacts, &options)
                .with_context(|| format!("Failed to analyze scope '{}'", name))?;
            tracing::info!(
                scope = name,
                nodes = analyzed.node_count(),
                completeness = analyzed.completeness().percentage(),
                "analyzed dependency scope"
            );
            Ok(ScopeReport { name, analyzed })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ProjectReport {
        ecosystem: project.ecosystem,
        update_scopes: settings.scopes.clone(),
        shallow_only,
        scopes,
    })
}
