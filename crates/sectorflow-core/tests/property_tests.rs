use proptest::prelude::*;
use sectorflow_core::config::{BetweennessConfig, GraphConfig};
use sectorflow_core::graph::SectorGraph;
use sectorflow_core::matrix::UseMatrix;
use sectorflow_core::metrics::betweenness::betweenness_centrality;
use sectorflow_core::metrics::degree::{degree_centrality, degree_counts};
use sectorflow_core::path::{PathResult, shortest_path};

/// Square matrices of 1..=7 sectors; roughly half the cells are zero so
/// graphs range from sparse to dense.
fn arb_matrix() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (1usize..=7).prop_flat_map(|n| {
        prop::collection::vec(
            prop::collection::vec(prop_oneof![Just(0.0), 0.0f64..10.0], n),
            n,
        )
    })
}

fn build(rows: &[Vec<f64>], threshold: f64) -> SectorGraph {
    let m = UseMatrix::from_rows(rows).expect("generated matrix is valid");
    SectorGraph::from_matrix(&m, None, &GraphConfig::with_threshold(threshold))
        .expect("generated threshold is valid")
}

fn edge_list(g: &SectorGraph) -> Vec<(String, String, f64)> {
    g.flows()
        .map(|(a, b, f)| {
            (
                g.label(a).unwrap_or_default().to_string(),
                g.label(b).unwrap_or_default().to_string(),
                f.weight,
            )
        })
        .collect()
}

fn labels_of(g: &SectorGraph) -> Vec<String> {
    g.sectors().map(|s| s.label.clone()).collect()
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn degree_sums_equal_edge_count(rows in arb_matrix(), threshold in 0.0f64..5.0) {
        let g = build(&rows, threshold);
        let counts = degree_counts(&g).expect("non-empty");
        let total_in: usize = counts.in_degree.values().sum();
        let total_out: usize = counts.out_degree.values().sum();
        prop_assert_eq!(total_in, g.edge_count());
        prop_assert_eq!(total_out, g.edge_count());
    }

    #[test]
    fn normalized_betweenness_in_unit_interval(rows in arb_matrix(), threshold in 0.0f64..5.0) {
        let g = build(&rows, threshold);
        let bc = betweenness_centrality(&g, &BetweennessConfig::default()).expect("ok");
        let counts = degree_counts(&g).expect("non-empty");

        for (label, score) in &bc {
            prop_assert!(*score >= -1e-12 && *score <= 1.0 + 1e-12, "{} = {}", label, score);
            if counts.total_degree[label] == 0 {
                prop_assert!(score.abs() < 1e-12, "isolated {} = {}", label, score);
            }
        }
    }

    #[test]
    fn isolated_sectors_have_zero_degree_centrality(rows in arb_matrix(), threshold in 0.0f64..5.0) {
        let g = build(&rows, threshold);
        let dc = degree_centrality(&g).expect("non-empty");
        let counts = degree_counts(&g).expect("non-empty");
        for (label, d) in &counts.total_degree {
            if *d == 0 {
                prop_assert!(dc[label].abs() < f64::EPSILON);
            }
        }
    }

    #[test]
    fn threshold_at_max_yields_no_edges(rows in arb_matrix()) {
        let m = UseMatrix::from_rows(&rows).expect("valid");
        let max = m.max_value().unwrap_or(0.0);
        let g = build(&rows, max);
        prop_assert_eq!(g.edge_count(), 0);
        prop_assert_eq!(g.node_count(), rows.len());
    }

    #[test]
    fn parallel_betweenness_matches_sequential(rows in arb_matrix(), threshold in 0.0f64..5.0) {
        let g = build(&rows, threshold);
        let seq = betweenness_centrality(&g, &BetweennessConfig::default()).expect("ok");
        let par = betweenness_centrality(
            &g,
            &BetweennessConfig { normalized: true, parallel: true },
        )
        .expect("ok");
        for (label, v) in &seq {
            prop_assert!((v - par[label]).abs() < 1e-9);
        }
    }

    #[test]
    fn heavier_path_edge_never_shortens_path(
        rows in arb_matrix(),
        threshold in 0.0f64..5.0,
        src in 0usize..7,
        dst in 0usize..7,
        pick in 0usize..7,
        bump in 0.0f64..20.0,
    ) {
        let g = build(&rows, threshold);
        let n = g.node_count();
        let source = format!("Sector_{}", src % n);
        let target = format!("Sector_{}", dst % n);

        let before = shortest_path(&g, &source, &target).expect("labels exist");
        if let PathResult::Found { path, total_weight } = &before {
            if path.len() >= 2 {
                let k = pick % (path.len() - 1);
                let (a, b) = (&path[k], &path[k + 1]);

                let edges: Vec<(String, String, f64)> = edge_list(&g)
                    .into_iter()
                    .map(|(x, y, w)| {
                        if &x == a && &y == b { (x, y, w + bump) } else { (x, y, w) }
                    })
                    .collect();
                let heavier = SectorGraph::from_edges(&labels_of(&g), &edges).expect("valid");

                let after = shortest_path(&heavier, &source, &target).expect("labels exist");
                let after_weight = after.total_weight().expect("path still exists");
                prop_assert!(after_weight + 1e-9 >= *total_weight);
            }
        }
    }
}
