//! End-to-end lag figures for a small, fully dated release history

use laggard_core::{
    Artifact, ArtifactId, ArtifactVersion, TechnicalLag, UpdateScope, VersionDistance,
};

const DAY: i64 = 86_400_000;

fn artifact_x() -> Artifact {
    Artifact::new(
        ArtifactId::new("X"),
        [
            ("2.0.0", 18),
            ("1.0.1", 1),
            ("1.1.0", 8),
            ("1.0.0", 0),
            ("1.0.2", 2),
        ]
        .into_iter()
        .map(|(v, day)| ArtifactVersion::from_millis(v, day * DAY, false).unwrap()),
    )
}

fn lag(artifact: &Artifact, used: &str, scope: UpdateScope) -> TechnicalLag {
    artifact.tech_lag(used, scope).unwrap().unwrap()
}

#[test]
fn test_major_scope() {
    let lag = lag(&artifact_x(), "1.0.0", UpdateScope::Major);
    assert_eq!(lag.target_version, "2.0.0");
    assert_eq!(lag.lib_days, 18);
    assert_eq!(lag.distance, VersionDistance::new(1, 0, 0));
    assert_eq!(lag.missed_releases, 4);
}

#[test]
fn test_minor_scope() {
    let lag = lag(&artifact_x(), "1.0.0", UpdateScope::Minor);
    assert_eq!(lag.target_version, "1.1.0");
    assert_eq!(lag.lib_days, 8);
    assert_eq!(lag.distance, VersionDistance::new(0, 1, 1));
    assert_eq!(lag.missed_releases, 3);
}

#[test]
fn test_patch_scope() {
    let lag = lag(&artifact_x(), "1.0.0", UpdateScope::Patch);
    assert_eq!(lag.target_version, "1.0.2");
    assert_eq!(lag.lib_days, 2);
    assert_eq!(lag.distance, VersionDistance::new(0, 0, 1));
    // missed releases are the position of the target minus the position of
    // the used version in the sorted stable catalog: 1.0.2 (2) - 1.0.0 (0)
    assert_eq!(lag.missed_releases, 2);
}

#[test]
fn test_newest_version_has_no_lag() {
    let artifact = artifact_x();
    for &scope in UpdateScope::all() {
        let lag = lag(&artifact, "2.0.0", scope);
        assert_eq!(lag.target_version, "2.0.0");
        assert_eq!(lag.lib_days, 0);
        assert_eq!(lag.distance, VersionDistance::ZERO);
        assert_eq!(lag.missed_releases, 0);
        assert!(lag.is_up_to_date());
    }
}

#[test]
fn test_release_frequency_is_shared_across_scopes() {
    let artifact = artifact_x();
    let major = lag(&artifact, "1.0.0", UpdateScope::Major);
    let patch = lag(&artifact, "1.0.0", UpdateScope::Patch);

    // five releases over eighteen days
    let per_day = 5.0 / 18.0;
    assert!((major.release_frequency.releases_per_day - per_day).abs() < 1e-9);
    assert!((major.release_frequency.releases_per_month - per_day * 30.0).abs() < 1e-9);
    assert_eq!(major.release_frequency, patch.release_frequency);
}

#[test]
fn test_lag_is_stable_across_threads() {
    let artifact = std::sync::Arc::new(artifact_x());
    let expected = lag(&artifact, "1.0.1", UpdateScope::Minor);
    artifact.clear_cache();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let artifact = artifact.clone();
            std::thread::spawn(move || artifact.tech_lag("1.0.1", UpdateScope::Minor).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().as_ref(), Some(&expected));
    }
    let stats = artifact.cache_stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 7);
}
