//! Linking and aggregation over whole dependency graphs

use laggard_core::{
    compute_statistics, compute_statistics_with, link, Artifact, ArtifactId, ArtifactVersion,
    DependencyGraph, DependencyNode, Error, LinkOptions, UpdateScope, DEFAULT_MAX_DEPTH,
};

const DAY: i64 = 86_400_000;

fn dated(name: &str, releases: &[(&str, i64)]) -> Artifact {
    Artifact::new(
        ArtifactId::new(name),
        releases
            .iter()
            .map(|(v, day)| ArtifactVersion::from_millis(v, day * DAY, false).unwrap()),
    )
}

fn graph(nodes: &[(usize, &str)], edges: &[(usize, usize)], direct: &[usize]) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    for &(artifact, version) in nodes {
        graph.add_node(DependencyNode::new(artifact, version));
    }
    for &(from, to) in edges {
        graph.add_edge(from, to);
    }
    for &index in direct {
        graph.add_direct(index);
    }
    graph
}

#[test]
fn test_cyclic_graph_terminates_with_full_completeness() {
    // a -> b -> a
    let artifacts = vec![
        dated("a", &[("1.0.0", 0), ("1.0.1", 3), ("1.1.0", 6), ("2.0.0", 9)]),
        dated("b", &[("1.0.0", 0), ("1.0.1", 2), ("1.1.0", 4), ("2.0.0", 8)]),
    ];
    let graph = graph(&[(0, "1.0.0"), (1, "1.0.0")], &[(0, 1), (1, 0)], &[0]);

    let analyzed = compute_statistics(&graph, &artifacts).unwrap();

    // root -> a -> b -> a (truncated)
    assert_eq!(analyzed.node_count(), 3);
    let closing = &analyzed.root().children()[0].children()[0].children()[0];
    assert!(closing.is_cycle_truncated());

    let completeness = analyzed.completeness();
    assert_eq!(completeness.expected, 12);
    assert_eq!(completeness.populated, 12);
    assert_eq!(completeness.percentage(), 100.0);
}

#[test]
fn test_deep_and_shallow_views_differ() {
    // direct: a; a -> b
    let artifacts = vec![
        dated("a", &[("1.0.0", 0), ("2.0.0", 10)]),
        dated("b", &[("1.0.0", 0), ("2.0.0", 40)]),
    ];
    let graph = graph(&[(0, "1.0.0"), (1, "1.0.0")], &[(0, 1)], &[0]);

    let analyzed = compute_statistics(&graph, &artifacts).unwrap();

    let shallow = analyzed.shallow_statistics(UpdateScope::Major).unwrap();
    assert_eq!(shallow.lib_days.unwrap().average, 10.0);
    assert_eq!(shallow.lib_days.unwrap().variance, 0.0);

    let deep = analyzed.deep_statistics(UpdateScope::Major).unwrap();
    let lib_days = deep.lib_days.unwrap();
    assert_eq!(lib_days.average, 25.0);
    assert_eq!(lib_days.variance, 225.0);
    assert_eq!(lib_days.standard_deviation, 15.0);

    let distance = deep.distance.unwrap();
    assert_eq!(distance.major.average, 1.0);
    assert_eq!(distance.minor.average, 0.0);
}

#[test]
fn test_empty_graph() {
    let empty = DependencyGraph::new();
    let analyzed = compute_statistics(&empty, &[]).unwrap();
    assert_eq!(analyzed.node_count(), 0);
    assert!(analyzed.deep_statistics(UpdateScope::Major).is_none());
    assert_eq!(analyzed.completeness().percentage(), 0.0);
}

#[test]
fn test_undated_sibling_does_not_poison_pool() {
    let artifacts = vec![
        dated("dated", &[("1.0.0", 0), ("1.2.0", 12)]),
        Artifact::new(
            ArtifactId::new("undated"),
            vec![
                ArtifactVersion::new("1.0.0", None, false).unwrap(),
                ArtifactVersion::new("1.3.0", None, false).unwrap(),
            ],
        ),
    ];
    let graph = graph(&[(0, "1.0.0"), (1, "1.0.0")], &[], &[0, 1]);

    let analyzed = compute_statistics(&graph, &artifacts).unwrap();
    let deep = analyzed.deep_statistics(UpdateScope::Minor).unwrap();
    assert_eq!(deep.lib_days.unwrap().average, 12.0);
    assert_eq!(deep.missed_releases.unwrap().average, 1.0);
    assert!(analyzed.completeness().percentage() < 100.0);
}

#[test]
fn test_bad_graphs_are_rejected() {
    let artifacts = vec![dated("a", &[("1.0.0", 0)])];

    let bad_edge = graph(&[(0, "1.0.0")], &[(0, 3)], &[0]);
    assert!(matches!(
        compute_statistics(&bad_edge, &artifacts),
        Err(Error::EdgeOutOfBounds { .. })
    ));

    let bad_artifact = graph(&[(2, "1.0.0")], &[], &[0]);
    assert!(matches!(
        compute_statistics(&bad_artifact, &artifacts),
        Err(Error::ArtifactOutOfBounds { .. })
    ));

    let chain = graph(&[(0, "1.0.0"), (0, "1.0.0")], &[(0, 1)], &[0]);
    let limits = LinkOptions {
        max_depth: 1,
        ..LinkOptions::default()
    };
    assert!(matches!(
        compute_statistics_with(&chain, &artifacts, &limits),
        Err(Error::GraphTooDeep { .. })
    ));
}

#[test]
fn test_tree_serializes_with_statistics() {
    let artifacts = vec![dated("a", &[("1.0.0", 0), ("1.0.1", 5)])];
    let graph = graph(&[(0, "1.0.0")], &[], &[0]);

    let analyzed = compute_statistics(&graph, &artifacts).unwrap();
    let json = serde_json::to_value(&analyzed).unwrap();

    assert_eq!(json["node_count"], 1);
    let child = &json["root"]["nodes"][1];
    assert_eq!(child["parent"], 0);
    assert_eq!(child["node"]["used_version"], "1.0.0");
    assert_eq!(child["statistics"]["patch"]["own_lag"]["lib_days"], 5);
    assert!(child["statistics"]["patch"]["lib_days"].is_null());
}

fn chain(length: usize) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    for i in 0..length {
        graph.add_node(DependencyNode::new(0, "1.0.0"));
        if i > 0 {
            graph.add_edge(i - 1, i);
        }
    }
    graph.add_direct(0);
    graph
}

#[test]
fn test_chain_at_depth_limit_fits_a_small_stack() {
    let handle = std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(|| {
            let artifacts = vec![dated("a", &[("1.0.0", 0), ("1.0.3", 6)])];
            let graph = chain(DEFAULT_MAX_DEPTH);

            let linked = link(&graph).unwrap();
            assert_eq!(linked.descendant_count(), DEFAULT_MAX_DEPTH);

            let analyzed = compute_statistics(&graph, &artifacts).unwrap();
            assert_eq!(analyzed.node_count(), DEFAULT_MAX_DEPTH);
            assert_eq!(analyzed.completeness().percentage(), 100.0);
            let patch = analyzed.deep_statistics(UpdateScope::Patch).unwrap();
            assert_eq!(patch.lib_days.unwrap().average, 6.0);

            let json = serde_json::to_value(&analyzed).unwrap();
            let nodes = json["root"]["nodes"].as_array().unwrap();
            assert_eq!(nodes.len(), DEFAULT_MAX_DEPTH + 1);
            assert_eq!(nodes[DEFAULT_MAX_DEPTH]["parent"], DEFAULT_MAX_DEPTH - 1);
        })
        .unwrap();
    handle.join().unwrap();
}

#[test]
fn test_chain_past_depth_limit_is_rejected() {
    let artifacts = vec![dated("a", &[("1.0.0", 0)])];
    let graph = chain(DEFAULT_MAX_DEPTH + 1);

    let result = compute_statistics(&graph, &artifacts);
    assert!(matches!(
        result,
        Err(Error::GraphTooDeep { depth, max_allowed })
            if depth == DEFAULT_MAX_DEPTH + 1 && max_allowed == DEFAULT_MAX_DEPTH
    ));
}
