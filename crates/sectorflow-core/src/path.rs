//! Shortest weighted path between two sectors.
//!
//! Edge weight is treated as cost here, even though it also measures flow
//! magnitude: the "economic distance" between two sectors is the sum of the
//! flows along the cheapest directed chain from source to target. The search
//! only follows edge direction; no reverse search is attempted.

use std::collections::BinaryHeap;

use petgraph::{Direction, graph::NodeIndex, visit::EdgeRef};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{AnalysisError, Result};
use crate::graph::SectorGraph;
use crate::graph::heap::Candidate;

/// Outcome of a shortest-path query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PathResult {
    /// A directed path exists.
    Found {
        /// Sector labels from source to target, inclusive.
        path: Vec<String>,
        /// Sum of edge weights along `path`.
        total_weight: f64,
    },
    /// The target is unreachable from the source.
    NoPath { source: String, target: String },
}

impl PathResult {
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    /// Total weight of the path, `None` when no path exists.
    #[must_use]
    pub const fn total_weight(&self) -> Option<f64> {
        match self {
            Self::Found { total_weight, .. } => Some(*total_weight),
            Self::NoPath { .. } => None,
        }
    }

    /// Labels along the path, empty when no path exists.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        match self {
            Self::Found { path, .. } => path,
            Self::NoPath { .. } => &[],
        }
    }
}

/// Find the minimum cumulative-weight directed path from `source` to `target`.
///
/// A query from a sector to itself returns the single-node path with weight 0.
///
/// # Errors
///
/// Returns [`AnalysisError::NodeNotFound`] if either label is unknown (the
/// source is checked first) and [`AnalysisError::InvalidWeight`] if any edge
/// weight is negative or non-finite.
#[instrument(skip(g))]
pub fn shortest_path(g: &SectorGraph, source: &str, target: &str) -> Result<PathResult> {
    let s = g
        .node_index(source)
        .ok_or_else(|| AnalysisError::NodeNotFound(source.to_string()))?;
    let t = g
        .node_index(target)
        .ok_or_else(|| AnalysisError::NodeNotFound(target.to_string()))?;
    g.ensure_valid_weights()?;

    if s == t {
        return Ok(PathResult::Found {
            path: vec![source.to_string()],
            total_weight: 0.0,
        });
    }

    let inner = g.inner();
    let n = g.node_count();

    let mut dist = vec![f64::INFINITY; n];
    let mut prev: Vec<Option<NodeIndex>> = vec![None; n];
    let mut settled = vec![false; n];
    dist[s.index()] = 0.0;

    let mut heap = BinaryHeap::new();
    heap.push(Candidate { cost: 0.0, node: s });

    while let Some(Candidate { cost, node: v }) = heap.pop() {
        if settled[v.index()] || cost > dist[v.index()] {
            continue;
        }
        settled[v.index()] = true;
        if v == t {
            break;
        }

        for edge in inner.edges_directed(v, Direction::Outgoing) {
            let w = edge.target();
            if settled[w.index()] {
                continue;
            }
            let alt = cost + edge.weight().weight;
            if alt < dist[w.index()] {
                dist[w.index()] = alt;
                prev[w.index()] = Some(v);
                heap.push(Candidate { cost: alt, node: w });
            }
        }
    }

    if !settled[t.index()] {
        debug!(source, target, "no directed path");
        return Ok(PathResult::NoPath {
            source: source.to_string(),
            target: target.to_string(),
        });
    }

    let mut path = vec![inner[t].label.clone()];
    let mut cursor = t;
    while let Some(p) = prev[cursor.index()] {
        path.push(inner[p].label.clone());
        cursor = p;
    }
    path.reverse();

    Ok(PathResult::Found {
        path,
        total_weight: dist[t.index()],
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
