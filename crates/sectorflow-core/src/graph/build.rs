//! Graph construction from a use matrix.
//!
//! # Overview
//!
//! [`SectorGraph::from_matrix`] turns a [`UseMatrix`] into a
//! [`petgraph`] directed graph whose nodes are sectors and whose edges are
//! significant economic flows.
//!
//! ## Edge Direction
//!
//! Cell `(i, j)` is sector `i`'s use of sector `j`'s output, so it encodes a
//! flow from supplier `j` to consumer `i`. An edge `j → i` is inserted for
//! every cell in the leading square block whose value is strictly greater
//! than the threshold. Diagonal cells above the threshold become self-loops.
//!
//! ## Totals
//!
//! `total_output` and `total_input` come from the full, unfiltered matrix
//! (all columns for a row, all rows for a column). The threshold affects
//! edges only.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use serde::Serialize;
use tracing::{info, instrument};

use crate::config::GraphConfig;
use crate::error::{AnalysisError, Result};
use crate::matrix::UseMatrix;

// ---------------------------------------------------------------------------
// Node and edge weights
// ---------------------------------------------------------------------------

/// A sector node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sector {
    /// Unique sector label.
    pub label: String,
    /// Row/column index of this sector in the source matrix.
    pub id: usize,
    /// Sum of the sector's matrix row across every column.
    pub total_output: f64,
    /// Sum of the sector's matrix column across every row.
    pub total_input: f64,
}

/// A directed economic flow between two sectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Flow {
    /// Flow magnitude (matrix cell value).
    pub weight: f64,
    /// `weight` divided by the largest cell in the whole matrix.
    pub normalized_weight: f64,
}

// ---------------------------------------------------------------------------
// SectorGraph
// ---------------------------------------------------------------------------

/// An immutable directed weighted sector graph.
///
/// An edge `A → B` means "A supplies B". At most one edge exists per ordered
/// pair.
#[derive(Debug, Clone)]
pub struct SectorGraph {
    graph: DiGraph<Sector, Flow>,
    node_map: HashMap<String, NodeIndex>,
    threshold: f64,
    max_flow: f64,
}

impl SectorGraph {
    /// Build a [`SectorGraph`] from a use matrix.
    ///
    /// The sector count is `min(rows, cols)`. `labels` are used when the list
    /// has at least that many entries (extra entries are ignored); otherwise
    /// every sector receives a synthetic `Sector_k` label.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Configuration`] if the threshold is negative
    /// or non-finite, or if the labels used contain duplicates.
    #[instrument(skip(matrix, labels), fields(rows = matrix.nrows(), cols = matrix.ncols()))]
    pub fn from_matrix(
        matrix: &UseMatrix,
        labels: Option<&[String]>,
        config: &GraphConfig,
    ) -> Result<Self> {
        config.validate()?;

        let n = matrix.sector_count();
        let node_labels = resolve_labels(labels, n)?;

        let mut graph = DiGraph::<Sector, Flow>::with_capacity(n, 0);
        let mut node_map: HashMap<String, NodeIndex> = HashMap::with_capacity(n);

        for (k, label) in node_labels.into_iter().enumerate() {
            let idx = graph.add_node(Sector {
                label: label.clone(),
                id: k,
                total_output: matrix.row_sum(k),
                total_input: matrix.column_sum(k),
            });
            node_map.insert(label, idx);
        }

        let max_flow = matrix.max_value().unwrap_or(0.0);

        // Each ordered pair is visited once, so no duplicate edges arise.
        for i in 0..n {
            for j in 0..n {
                let weight = matrix.get(i, j);
                if weight > config.threshold {
                    graph.add_edge(
                        NodeIndex::new(j),
                        NodeIndex::new(i),
                        Flow {
                            weight,
                            normalized_weight: weight / max_flow,
                        },
                    );
                }
            }
        }

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            threshold = config.threshold,
            max_flow,
            "sector graph built"
        );

        Ok(Self {
            graph,
            node_map,
            threshold: config.threshold,
            max_flow,
        })
    }

    /// Build a graph from an explicit edge list `(from, to, weight)`.
    ///
    /// Totals are derived from the edges the same way the matrix builder
    /// derives them: a sector's output total is the sum of flows it receives
    /// (its matrix row), its input total the sum of flows it supplies (its
    /// matrix column). Weights are stored as given and checked only when a
    /// shortest-path computation runs.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Configuration`] for duplicate labels or a
    /// repeated ordered pair, and [`AnalysisError::NodeNotFound`] when an
    /// edge names an unknown label.
    pub fn from_edges(labels: &[String], edges: &[(String, String, f64)]) -> Result<Self> {
        let node_labels = resolve_labels(Some(labels), labels.len())?;

        let mut graph = DiGraph::<Sector, Flow>::with_capacity(labels.len(), edges.len());
        let mut node_map: HashMap<String, NodeIndex> = HashMap::with_capacity(labels.len());

        for (k, label) in node_labels.into_iter().enumerate() {
            let idx = graph.add_node(Sector {
                label: label.clone(),
                id: k,
                total_output: 0.0,
                total_input: 0.0,
            });
            node_map.insert(label, idx);
        }

        let max_flow = edges
            .iter()
            .map(|(_, _, w)| *w)
            .fold(0.0_f64, f64::max);

        for (from, to, weight) in edges {
            let a = *node_map
                .get(from)
                .ok_or_else(|| AnalysisError::NodeNotFound(from.clone()))?;
            let b = *node_map
                .get(to)
                .ok_or_else(|| AnalysisError::NodeNotFound(to.clone()))?;

            if graph.contains_edge(a, b) {
                return Err(AnalysisError::Configuration(format!(
                    "duplicate edge: {from} -> {to}"
                )));
            }

            let normalized_weight = if max_flow > 0.0 { weight / max_flow } else { 0.0 };
            graph.add_edge(
                a,
                b,
                Flow {
                    weight: *weight,
                    normalized_weight,
                },
            );
            graph[b].total_output += weight;
            graph[a].total_input += weight;
        }

        Ok(Self {
            graph,
            node_map,
            threshold: 0.0,
            max_flow,
        })
    }

    /// Return the number of sectors in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of flow edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Look up the `NodeIndex` for a sector label.
    #[must_use]
    pub fn node_index(&self, label: &str) -> Option<NodeIndex> {
        self.node_map.get(label).copied()
    }

    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.node_map.contains_key(label)
    }

    /// Return the sector stored at `idx`.
    #[must_use]
    pub fn sector(&self, idx: NodeIndex) -> Option<&Sector> {
        self.graph.node_weight(idx)
    }

    /// Return the label of the sector stored at `idx`.
    #[must_use]
    pub fn label(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(|s| s.label.as_str())
    }

    /// Iterate over sectors in matrix order.
    pub fn sectors(&self) -> impl Iterator<Item = &Sector> {
        self.graph.node_weights()
    }

    /// Return the flow on edge `from → to`, if present.
    #[must_use]
    pub fn flow(&self, from: &str, to: &str) -> Option<&Flow> {
        let a = self.node_index(from)?;
        let b = self.node_index(to)?;
        self.graph
            .find_edge(a, b)
            .and_then(|e| self.graph.edge_weight(e))
    }

    /// Iterate over every edge as `(source, target, flow)`.
    pub fn flows(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, &Flow)> {
        self.graph.edge_indices().filter_map(|e: EdgeIndex| {
            let (a, b) = self.graph.edge_endpoints(e)?;
            Some((a, b, &self.graph[e]))
        })
    }

    /// Threshold the graph was built with.
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Largest cell value in the source matrix (0.0 for an empty matrix).
    #[must_use]
    pub const fn max_flow(&self) -> f64 {
        self.max_flow
    }

    /// Read-only access to the underlying petgraph graph.
    #[must_use]
    pub const fn inner(&self) -> &DiGraph<Sector, Flow> {
        &self.graph
    }

    /// Fail with [`AnalysisError::EmptyGraph`] when there are no nodes.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::EmptyGraph`] for a zero-node graph.
    pub fn ensure_non_empty(&self) -> Result<()> {
        if self.is_empty() {
            Err(AnalysisError::EmptyGraph)
        } else {
            Ok(())
        }
    }

    /// Verify every edge weight is finite and nonnegative.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidWeight`] naming the first offending edge.
    pub fn ensure_valid_weights(&self) -> Result<()> {
        for (a, b, flow) in self.flows() {
            if !flow.weight.is_finite() || flow.weight < 0.0 {
                return Err(AnalysisError::InvalidWeight {
                    from: self.label(a).unwrap_or_default().to_string(),
                    to: self.label(b).unwrap_or_default().to_string(),
                    weight: flow.weight,
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Pick the first `n` supplied labels, or synthesize `Sector_k` labels when
/// the supplied list is absent or too short.
fn resolve_labels(labels: Option<&[String]>, n: usize) -> Result<Vec<String>> {
    match labels {
        Some(list) if list.len() >= n => {
            let chosen = &list[..n];
            let mut seen = HashSet::with_capacity(n);
            for label in chosen {
                if !seen.insert(label.as_str()) {
                    return Err(AnalysisError::Configuration(format!(
                        "duplicate sector label: {label}"
                    )));
                }
            }
            Ok(chosen.to_vec())
        }
        _ => Ok((0..n).map(|k| format!("Sector_{k}")).collect()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    fn build(rows: &[Vec<f64>], names: Option<&[&str]>, threshold: f64) -> Result<SectorGraph> {
        let m = UseMatrix::from_rows(rows).expect("valid matrix");
        let owned = names.map(labels);
        SectorGraph::from_matrix(&m, owned.as_deref(), &GraphConfig::with_threshold(threshold))
    }

    #[test]
    fn empty_matrix_produces_empty_graph() {
        let g = build(&[], None, 0.1).expect("empty is not an error");
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.is_empty());
        assert_eq!(g.ensure_non_empty(), Err(AnalysisError::EmptyGraph));
    }

    #[test]
    fn two_sector_edge_direction() {
        // Cell (0,1)=5: sector A uses B's output → edge B → A.
        let g = build(&[vec![0.0, 5.0], vec![2.0, 0.0]], Some(&["A", "B"]), 1.0)
            .expect("build");
        assert_eq!(g.edge_count(), 2);

        let ba = g.flow("B", "A").expect("B → A");
        assert!((ba.weight - 5.0).abs() < f64::EPSILON);
        assert!((ba.normalized_weight - 1.0).abs() < f64::EPSILON);

        let ab = g.flow("A", "B").expect("A → B");
        assert!((ab.weight - 2.0).abs() < f64::EPSILON);
        assert!((ab.normalized_weight - 0.4).abs() < 1e-12);
    }

    #[test]
    fn threshold_is_strict() {
        let g = build(&[vec![0.0, 1.0], vec![1.5, 0.0]], Some(&["A", "B"]), 1.0)
            .expect("build");
        assert!(g.flow("B", "A").is_none(), "cell equal to threshold excluded");
        assert!(g.flow("A", "B").is_some());
    }

    #[test]
    fn threshold_at_max_removes_all_edges() {
        let g = build(&[vec![3.0, 5.0], vec![2.0, 4.0]], None, 5.0).expect("build");
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn diagonal_becomes_self_loop() {
        let g = build(&[vec![7.0, 0.0], vec![0.0, 0.0]], Some(&["A", "B"]), 1.0)
            .expect("build");
        assert_eq!(g.edge_count(), 1);
        assert!(g.flow("A", "A").is_some());
    }

    #[test]
    fn short_label_list_falls_back_to_synthetic() {
        let g = build(
            &[vec![0.0, 1.0, 0.0], vec![0.0; 3], vec![0.0; 3]],
            Some(&["A", "B"]),
            0.1,
        )
        .expect("build");
        assert!(g.contains("Sector_0"));
        assert!(g.contains("Sector_2"));
        assert!(!g.contains("A"));
    }

    #[test]
    fn long_label_list_is_truncated() {
        let g = build(&[vec![0.0, 1.0], vec![0.0, 0.0]], Some(&["A", "B", "C"]), 0.1)
            .expect("build");
        assert_eq!(g.node_count(), 2);
        assert!(g.contains("A") && g.contains("B"));
        assert!(!g.contains("C"));
    }

    #[test]
    fn duplicate_labels_rejected() {
        let err = build(&[vec![0.0, 1.0], vec![0.0, 0.0]], Some(&["A", "A"]), 0.1)
            .expect_err("duplicate");
        assert!(matches!(err, AnalysisError::Configuration(_)));
    }

    #[test]
    fn negative_threshold_rejected_before_build() {
        let err = build(&[vec![1.0]], None, -0.5).expect_err("negative");
        assert!(matches!(err, AnalysisError::Configuration(_)));
    }

    #[test]
    fn totals_use_full_rectangular_matrix() {
        // 2×3 matrix: third column is outside the square block but still
        // counts toward total_output, and toward the global max.
        let g = build(&[vec![1.0, 2.0, 10.0], vec![3.0, 4.0, 0.0]], Some(&["A", "B"]), 0.0)
            .expect("build");
        let a = g.sector(g.node_index("A").expect("A")).expect("sector A");
        assert!((a.total_output - 13.0).abs() < 1e-12);
        assert!((a.total_input - 4.0).abs() < 1e-12);
        assert_eq!(a.id, 0);

        assert!((g.max_flow() - 10.0).abs() < f64::EPSILON);
        let ab = g.flow("A", "B").expect("A → B");
        assert!((ab.normalized_weight - 0.3).abs() < 1e-12);
    }

    #[test]
    fn totals_independent_of_threshold() {
        let rows = vec![vec![0.5, 8.0], vec![2.0, 0.2]];
        let low = build(&rows, None, 0.0).expect("build");
        let high = build(&rows, None, 100.0).expect("build");

        let lows: Vec<_> = low.sectors().cloned().collect();
        let highs: Vec<_> = high.sectors().cloned().collect();
        assert_eq!(lows, highs);
        assert_eq!(high.edge_count(), 0);
    }

    #[test]
    fn edge_list_totals_match_matrix_semantics() {
        // Same flows as [[0,5],[2,0]]: B → A (5), A → B (2).
        let names = labels(&["A", "B"]);
        let g = SectorGraph::from_edges(
            &names,
            &[
                ("B".to_string(), "A".to_string(), 5.0),
                ("A".to_string(), "B".to_string(), 2.0),
            ],
        )
        .expect("build");
        let from_matrix =
            build(&[vec![0.0, 5.0], vec![2.0, 0.0]], Some(&["A", "B"]), 0.0).expect("build");

        let a = g.sector(g.node_index("A").expect("A")).expect("A");
        let m = from_matrix
            .sector(from_matrix.node_index("A").expect("A"))
            .expect("A");
        assert!((a.total_output - m.total_output).abs() < 1e-12);
        assert!((a.total_input - m.total_input).abs() < 1e-12);
    }

    #[test]
    fn edge_list_unknown_endpoint() {
        let names = labels(&["A"]);
        let err = SectorGraph::from_edges(&names, &[("A".to_string(), "Z".to_string(), 1.0)])
            .expect_err("unknown");
        assert_eq!(err, AnalysisError::NodeNotFound("Z".to_string()));
    }

    #[test]
    fn edge_list_duplicate_pair() {
        let names = labels(&["A", "B"]);
        let edge = ("A".to_string(), "B".to_string(), 1.0);
        let err = SectorGraph::from_edges(&names, &[edge.clone(), edge]).expect_err("dup");
        assert!(matches!(err, AnalysisError::Configuration(_)));
    }

    #[test]
    fn negative_edge_weight_detected() {
        let names = labels(&["A", "B"]);
        let g = SectorGraph::from_edges(&names, &[("A".to_string(), "B".to_string(), -3.0)])
            .expect("stored as given");
        let err = g.ensure_valid_weights().expect_err("negative");
        assert_eq!(
            err,
            AnalysisError::InvalidWeight {
                from: "A".to_string(),
                to: "B".to_string(),
                weight: -3.0,
            }
        );
    }

    #[test]
    fn valid_weights_pass_validation() {
        let g = build(&[vec![0.0, 5.0], vec![2.0, 0.0]], None, 0.0).expect("build");
        assert!(g.ensure_valid_weights().is_ok());
        assert_eq!(g.flows().count(), 2);
    }
}
