//! Integration tests for laggard-deps
//!
//! These tests write lockfiles into temporary directories and run the full
//! detection and analysis path.

use laggard_core::{compute_statistics, Artifact, ArtifactVersion, UpdateScope};
use laggard_deps::{
    analyze_project, detect_lockfile, Ecosystem, Error, CARGO_SCOPE, RUNTIME_SCOPE,
};
use tempfile::TempDir;

const CARGO_LOCK: &str = r#"
version = 3

[[package]]
name = "demo"
version = "0.1.0"
dependencies = [
 "anyhow",
]

[[package]]
name = "anyhow"
version = "1.0.75"
source = "registry+https://github.com/rust-lang/crates.io-index"
checksum = "a4668cab20f66d8d020e1fbc0ebe47217433c1b6c8f2040faf858554e394ace6"
"#;

const PACKAGE_LOCK: &str = r#"{
  "name": "demo",
  "lockfileVersion": 2,
  "packages": {
    "": {"name": "demo", "dependencies": {"left-pad": "^1.3.0"}},
    "node_modules/left-pad": {"version": "1.3.0"}
  }
}"#;

#[tokio::test]
async fn test_analyze_cargo_project() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("Cargo.lock"), CARGO_LOCK).unwrap();

    let project = analyze_project(dir.path()).await.unwrap();
    assert_eq!(project.ecosystem, Ecosystem::Rust);
    assert_eq!(project.artifacts.len(), 1);
    let graph = project.scope(CARGO_SCOPE).unwrap();
    assert_eq!(graph.direct_dependency_indices, vec![0]);
}

#[tokio::test]
async fn test_analyze_npm_project_by_file_path() {
    let dir = TempDir::new().unwrap();
    let lockfile = dir.path().join("package-lock.json");
    std::fs::write(&lockfile, PACKAGE_LOCK).unwrap();

    assert_eq!(detect_lockfile(dir.path()).await.unwrap(), lockfile);

    let project = analyze_project(&lockfile).await.unwrap();
    assert_eq!(project.ecosystem, Ecosystem::JavaScript);
    assert!(project.scope(RUNTIME_SCOPE).is_some());
    assert_eq!(project.node_count(), 1);
}

#[tokio::test]
async fn test_cargo_lock_wins_when_both_exist() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("package-lock.json"), PACKAGE_LOCK).unwrap();
    std::fs::write(dir.path().join("Cargo.lock"), CARGO_LOCK).unwrap();

    let lockfile = detect_lockfile(dir.path()).await.unwrap();
    assert!(lockfile.ends_with("Cargo.lock"));
}

#[tokio::test]
async fn test_missing_and_unsupported_lockfiles() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        analyze_project(dir.path()).await,
        Err(Error::LockfileNotFound(_))
    ));

    let yarn = dir.path().join("yarn.lock");
    std::fs::write(&yarn, "# yarn lockfile v1\n").unwrap();
    assert!(matches!(
        analyze_project(&yarn).await,
        Err(Error::UnsupportedLockfile(_))
    ));
}

#[tokio::test]
async fn test_project_graph_feeds_statistics() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("package-lock.json"), PACKAGE_LOCK).unwrap();
    let project = analyze_project(dir.path()).await.unwrap();

    const DAY: i64 = 86_400_000;
    let artifacts: Vec<_> = project
        .artifacts
        .iter()
        .map(|id| {
            Artifact::new(
                id.clone(),
                vec![
                    ArtifactVersion::from_millis("1.3.0", 0, false).unwrap(),
                    ArtifactVersion::from_millis("1.3.1", 3 * DAY, true).unwrap(),
                ],
            )
        })
        .collect();

    let graph = project.scope(RUNTIME_SCOPE).unwrap();
    let analyzed = compute_statistics(graph, &artifacts).unwrap();
    let deep = analyzed.deep_statistics(UpdateScope::Patch).unwrap();
    assert_eq!(deep.lib_days.unwrap().average, 3.0);
}
