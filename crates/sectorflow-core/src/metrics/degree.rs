//! Degree-based metrics: degree centrality, weighted flow totals, density.
//!
//! # Overview
//!
//! These are the cheap metrics: one pass over each node's incident edges.
//! A self-loop counts once toward in-degree and once toward out-degree, and
//! its weight is added to both weighted totals.

use std::collections::HashMap;

use petgraph::{Direction, visit::EdgeRef};
use serde::Serialize;

use crate::error::Result;
use crate::graph::SectorGraph;

// ---------------------------------------------------------------------------
// Unweighted degree
// ---------------------------------------------------------------------------

/// Per-sector unweighted degree counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DegreeCounts {
    /// Number of suppliers feeding this sector.
    pub in_degree: HashMap<String, usize>,
    /// Number of consumers this sector supplies.
    pub out_degree: HashMap<String, usize>,
    /// Total degree (in + out).
    pub total_degree: HashMap<String, usize>,
}

/// Count incoming and outgoing edges for every sector.
///
/// # Errors
///
/// Returns [`crate::error::AnalysisError::EmptyGraph`] for a zero-node graph.
pub fn degree_counts(g: &SectorGraph) -> Result<DegreeCounts> {
    g.ensure_non_empty()?;

    let inner = g.inner();
    let n = g.node_count();
    let mut in_degree = HashMap::with_capacity(n);
    let mut out_degree = HashMap::with_capacity(n);
    let mut total_degree = HashMap::with_capacity(n);

    for idx in inner.node_indices() {
        let in_d = inner.edges_directed(idx, Direction::Incoming).count();
        let out_d = inner.edges_directed(idx, Direction::Outgoing).count();
        let label = inner[idx].label.clone();

        in_degree.insert(label.clone(), in_d);
        out_degree.insert(label.clone(), out_d);
        total_degree.insert(label, in_d + out_d);
    }

    Ok(DegreeCounts {
        in_degree,
        out_degree,
        total_degree,
    })
}

/// Degree centrality: `(in_degree + out_degree) / (n - 1)`.
///
/// Every score is 0.0 when the graph has a single node.
///
/// # Errors
///
/// Returns [`crate::error::AnalysisError::EmptyGraph`] for a zero-node graph.
#[allow(clippy::cast_precision_loss)]
pub fn degree_centrality(g: &SectorGraph) -> Result<HashMap<String, f64>> {
    let counts = degree_counts(g)?;
    let n = g.node_count();

    let scale = if n <= 1 { 0.0 } else { 1.0 / (n - 1) as f64 };

    Ok(counts
        .total_degree
        .into_iter()
        .map(|(label, d)| (label, d as f64 * scale))
        .collect())
}

// ---------------------------------------------------------------------------
// Weighted degree
// ---------------------------------------------------------------------------

/// Per-sector sums of flow weights.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedDegree {
    /// Sum of weights on edges into the sector (what it buys).
    pub weighted_in: HashMap<String, f64>,
    /// Sum of weights on edges out of the sector (what it sells).
    pub weighted_out: HashMap<String, f64>,
    /// `weighted_in + weighted_out`: total economic flow through the sector.
    pub total: HashMap<String, f64>,
}

/// Sum incoming and outgoing flow weights for every sector.
///
/// # Errors
///
/// Returns [`crate::error::AnalysisError::EmptyGraph`] for a zero-node graph.
pub fn weighted_degrees(g: &SectorGraph) -> Result<WeightedDegree> {
    g.ensure_non_empty()?;

    let inner = g.inner();
    let n = g.node_count();
    let mut weighted_in = HashMap::with_capacity(n);
    let mut weighted_out = HashMap::with_capacity(n);
    let mut total = HashMap::with_capacity(n);

    for idx in inner.node_indices() {
        let w_in: f64 = inner
            .edges_directed(idx, Direction::Incoming)
            .map(|e| e.weight().weight)
            .sum();
        let w_out: f64 = inner
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| e.weight().weight)
            .sum();
        let label = inner[idx].label.clone();

        weighted_in.insert(label.clone(), w_in);
        weighted_out.insert(label.clone(), w_out);
        total.insert(label, w_in + w_out);
    }

    Ok(WeightedDegree {
        weighted_in,
        weighted_out,
        total,
    })
}

// ---------------------------------------------------------------------------
// Density
// ---------------------------------------------------------------------------

/// Directed graph density: `edges / (n * (n - 1))`.
///
/// Returns 0.0 for graphs with fewer than 2 nodes. Self-loops count as
/// edges, so a graph with loops on every node can exceed 1.0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn density(g: &SectorGraph) -> f64 {
    let n = g.node_count();
    if n < 2 {
        return 0.0;
    }
    let max_edges = (n * (n - 1)) as f64;
    g.edge_count() as f64 / max_edges
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
