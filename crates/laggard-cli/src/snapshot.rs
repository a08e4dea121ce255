//! Offline snapshots: a resolved project plus the catalogs fetched for it.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use laggard_core::{Artifact, ArtifactRecord};
use laggard_deps::ResolvedProject;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub created_at: DateTime<Utc>,
    pub project: ResolvedProject,
    /// Aligned with `project.artifacts`
    pub artifacts: Vec<ArtifactRecord>,
}

impl Snapshot {
    pub fn new(project: ResolvedProject, artifacts: &[Artifact]) -> Self {
        Self {
            created_at: Utc::now(),
            project,
            artifacts: artifacts.iter().map(Artifact::to_record).collect(),
        }
    }

    /// Rebuild the artifacts, lag caches start empty
    pub fn artifacts(&self) -> Vec<Artifact> {
        self.artifacts
            .iter()
            .cloned()
            .map(Artifact::from_record)
            .collect()
    }

    pub async fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize snapshot")?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write snapshot to {}", path.display()))
    }

    pub async fn read(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&json)
            .with_context(|| format!("{} is not a laggard snapshot", path.display()))?;

        if snapshot.artifacts.len() != snapshot.project.artifacts.len() {
            bail!(
                "Snapshot {} holds {} catalogs for {} artifacts",
                path.display(),
                snapshot.artifacts.len(),
                snapshot.project.artifacts.len()
            );
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use laggard_core::{ArtifactId, ArtifactVersion, UpdateScope};
    use laggard_deps::Ecosystem;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn project() -> ResolvedProject {
        ResolvedProject {
            ecosystem: Ecosystem::Rust,
            artifacts: vec![ArtifactId::new("itoa")],
            scopes: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn test_snapshot_keeps_catalogs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshot.json");
        let artifact = Artifact::new(
            ArtifactId::new("itoa"),
            [
                ArtifactVersion::from_millis("1.0.0", 0, false).unwrap(),
                ArtifactVersion::from_millis("1.0.9", 86_400_000, true).unwrap(),
            ],
        );

        Snapshot::new(project(), &[artifact]).write(&path).await.unwrap();
        let loaded = Snapshot::read(&path).await.unwrap();

        let artifacts = loaded.artifacts();
        let lag = artifacts[0]
            .tech_lag("1.0.0", UpdateScope::Patch)
            .unwrap()
            .unwrap();
        assert_eq!(lag.target_version, "1.0.9");
        assert_eq!(lag.lib_days, 1);
    }

    #[tokio::test]
    async fn test_misaligned_snapshot_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshot.json");
        Snapshot::new(project(), &[]).write(&path).await.unwrap();

        let err = Snapshot::read(&path).await.unwrap_err();
        assert!(err.to_string().contains("0 catalogs for 1 artifacts"));
    }

    #[tokio::test]
    async fn test_garbage_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, "{\"hello\": 1}").unwrap();
        assert!(Snapshot::read(&path).await.is_err());
    }
}
