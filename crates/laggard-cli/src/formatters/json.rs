//! JSON formatter for lag reports.

use crate::report::{ProjectReport, ScopeReport};
use anyhow::{Context, Result};
use laggard_core::{TechnicalLag, UpdateScope};
use serde_json::{json, Map, Value};

pub struct JsonFormatter;

pub fn render_report(report: &ProjectReport<'_>) -> Result<String> {
    let scopes = report
        .scopes
        .iter()
        .map(|scope| scope_json(report, scope))
        .collect::<Result<Vec<_>>>()?;

    let json_report = json!({
        "ecosystem": report.ecosystem,
        "scopes": scopes,
    });
    serde_json::to_string_pretty(&json_report).context("Error serializing report")
}

fn scope_json(report: &ProjectReport<'_>, scope: &ScopeReport<'_>) -> Result<Value> {
    let completeness = scope.analyzed.completeness();

    let mut statistics = Map::new();
    for summary in scope.summaries(&report.update_scopes) {
        let mut entry = json!({ "shallow": summary.shallow });
        if !report.shallow_only {
            entry["deep"] = serde_json::to_value(&summary.deep)?;
        }
        statistics.insert(summary.scope.to_string(), entry);
    }

    let mut value = json!({
        "name": scope.name,
        "node_count": scope.analyzed.node_count(),
        "completeness": {
            "expected": completeness.expected,
            "populated": completeness.populated,
            "percentage": completeness.percentage(),
        },
        "statistics": statistics,
    });
    if !report.shallow_only {
        value["tree"] =
            serde_json::to_value(scope.analyzed.root()).context("Error serializing tree")?;
    }
    Ok(value)
}

/// Lag of a single package version, one entry per update scope
pub fn render_lag(
    package: &str,
    used: &str,
    lags: &[(UpdateScope, Option<TechnicalLag>)],
) -> Result<String> {
    let lag: Map<String, Value> = lags
        .iter()
        .map(|(scope, lag)| Ok((scope.to_string(), serde_json::to_value(lag)?)))
        .collect::<Result<_, serde_json::Error>>()?;

    serde_json::to_string_pretty(&json!({
        "package": package,
        "used_version": used,
        "lag": lag,
    }))
    .context("Error serializing lag")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::build_report;
    use laggard_config::Settings;
    use laggard_core::{
        Artifact, ArtifactId, ArtifactVersion, DependencyGraph, DependencyNode, VersionDistance,
    };
    use laggard_deps::{Ecosystem, ResolvedProject};
    use std::collections::BTreeMap;

    fn project() -> ResolvedProject {
        let mut graph = DependencyGraph::new();
        let node = graph.add_node(DependencyNode::new(0, "1.0.0"));
        graph.add_direct(node);
        ResolvedProject {
            ecosystem: Ecosystem::Rust,
            artifacts: vec![ArtifactId::new("itoa")],
            scopes: BTreeMap::from([("all".to_string(), graph)]),
        }
    }

    fn artifacts() -> Vec<Artifact> {
        vec![Artifact::new(
            ArtifactId::new("itoa"),
            [
                ArtifactVersion::from_millis("1.0.0", 0, false).unwrap(),
                ArtifactVersion::from_millis("1.0.1", 2 * 86_400_000, true).unwrap(),
            ],
        )]
    }

    #[test]
    fn test_report_json_includes_tree() {
        let project = project();
        let artifacts = artifacts();
        let report = build_report(&project, &artifacts, &Settings::default(), false).unwrap();

        let json: Value = serde_json::from_str(&render_report(&report).unwrap()).unwrap();
        let scope = &json["scopes"][0];
        assert_eq!(json["ecosystem"], "rust");
        assert_eq!(scope["name"], "all");
        assert_eq!(scope["node_count"], 1);
        assert_eq!(scope["completeness"]["percentage"], 100.0);
        assert_eq!(scope["statistics"]["patch"]["deep"]["lib_days"]["average"], 2.0);
        assert_eq!(scope["statistics"]["patch"]["shallow"]["lib_days"]["average"], 2.0);
        assert_eq!(
            scope["tree"]["nodes"][1]["statistics"]["patch"]["own_lag"]["target_version"],
            "1.0.1"
        );
    }

    #[test]
    fn test_shallow_report_omits_deep_data() {
        let project = project();
        let artifacts = artifacts();
        let report = build_report(&project, &artifacts, &Settings::default(), true).unwrap();

        let json: Value = serde_json::from_str(&render_report(&report).unwrap()).unwrap();
        let scope = &json["scopes"][0];
        assert!(scope.get("tree").is_none());
        assert!(scope["statistics"]["major"].get("deep").is_none());
        assert!(scope["statistics"]["major"]["shallow"].is_object());
    }

    #[test]
    fn test_render_lag() {
        let lag = TechnicalLag {
            lib_days: 12,
            distance: VersionDistance::new(0, 1, 0),
            target_version: "1.1.0".to_string(),
            missed_releases: 1,
            release_frequency: Default::default(),
        };
        let rendered =
            render_lag("serde", "1.0.0", &[(UpdateScope::Minor, Some(lag)), (UpdateScope::Patch, None)])
                .unwrap();

        let json: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(json["lag"]["minor"]["lib_days"], 12);
        assert!(json["lag"]["patch"].is_null());
    }
}
