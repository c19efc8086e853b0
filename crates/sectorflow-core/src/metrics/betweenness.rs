//! Weighted betweenness centrality via Brandes' algorithm.
//!
//! # Overview
//!
//! Betweenness centrality measures how often a sector lies on shortest flow
//! paths between other pairs of sectors. High-betweenness sectors are
//! "bridges": removing them lengthens or severs many supply chains.
//!
//! # Algorithm
//!
//! Brandes (2001) with Dijkstra in place of BFS, since edge weights are
//! path costs:
//!
//! 1. For each source `s`, run Dijkstra to compute shortest distances,
//!    shortest-path counts `sigma`, and predecessor lists. Paths of equal
//!    total weight are all kept.
//! 2. Accumulate dependencies in reverse settle order (farthest first):
//!    `delta[v] += sigma[v] / sigma[w] * (1 + delta[w])`.
//! 3. Sum the dependencies across all sources.
//!
//! Complexity: O(V·E + V²·log V).
//!
//! # Output
//!
//! Scores keyed by sector label. With `normalized = true` (the default),
//! raw scores are divided by `(n-1)(n-2)`, the number of ordered pairs that
//! exclude a given node; graphs with `n <= 2` score 0.0 everywhere.
//!
//! Self-loops never shorten a path and are skipped. Edges of weight zero
//! tie with their tail's distance; only predecessors settled before the
//! head is settled are credited.

use std::collections::{BinaryHeap, HashMap};

use petgraph::{Direction, visit::EdgeRef};
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::config::BetweennessConfig;
use crate::error::Result;
use crate::graph::SectorGraph;
use crate::graph::heap::Candidate;

/// Compute weighted betweenness centrality for every sector.
///
/// # Errors
///
/// Returns [`crate::error::AnalysisError::EmptyGraph`] for a zero-node
/// graph and [`crate::error::AnalysisError::InvalidWeight`] if any edge
/// weight is negative or non-finite. Both checks run before any path search.
#[instrument(skip(g), fields(nodes = g.node_count(), edges = g.edge_count()))]
pub fn betweenness_centrality(
    g: &SectorGraph,
    config: &BetweennessConfig,
) -> Result<HashMap<String, f64>> {
    g.ensure_non_empty()?;
    g.ensure_valid_weights()?;

    let n = g.node_count();
    let adjacency = out_adjacency(g);

    let mut cb = if config.parallel {
        (0..n)
            .into_par_iter()
            .fold(
                || vec![0.0_f64; n],
                |mut acc, s| {
                    accumulate_source(&adjacency, s, &mut acc);
                    acc
                },
            )
            .reduce(
                || vec![0.0_f64; n],
                |mut a, b| {
                    for (x, y) in a.iter_mut().zip(b) {
                        *x += y;
                    }
                    a
                },
            )
    } else {
        let mut acc = vec![0.0_f64; n];
        for s in 0..n {
            accumulate_source(&adjacency, s, &mut acc);
        }
        acc
    };

    if config.normalized {
        let scale = normalization_scale(n);
        for b in &mut cb {
            *b *= scale;
        }
    }

    debug!(parallel = config.parallel, "betweenness computed");

    Ok(g
        .inner()
        .node_indices()
        .map(|idx| (g.inner()[idx].label.clone(), cb[idx.index()]))
        .collect())
}

/// `1 / ((n-1)(n-2))` for `n > 2`, otherwise 0.0 (no node can be strictly
/// between two others).
#[allow(clippy::cast_precision_loss)]
fn normalization_scale(n: usize) -> f64 {
    if n <= 2 {
        0.0
    } else {
        1.0 / ((n - 1) * (n - 2)) as f64
    }
}

/// Outgoing adjacency as `(target, weight)` lists, self-loops removed.
fn out_adjacency(g: &SectorGraph) -> Vec<Vec<(usize, f64)>> {
    let inner = g.inner();
    inner
        .node_indices()
        .map(|v| {
            inner
                .edges_directed(v, Direction::Outgoing)
                .filter(|e| e.target() != v)
                .map(|e| (e.target().index(), e.weight().weight))
                .collect()
        })
        .collect()
}

/// Run one Dijkstra pass from `s` and add its dependency scores into `cb`.
#[allow(clippy::float_cmp)]
fn accumulate_source(adjacency: &[Vec<(usize, f64)>], s: usize, cb: &mut [f64]) {
    let n = adjacency.len();

    // Nodes in the order they were settled (farthest popped last).
    let mut stack: Vec<usize> = Vec::with_capacity(n);

    // predecessors[w]: nodes immediately preceding w on shortest paths from s.
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];

    // sigma[t]: number of shortest paths from s to t.
    let mut sigma: Vec<f64> = vec![0.0; n];
    sigma[s] = 1.0;

    let mut dist: Vec<f64> = vec![f64::INFINITY; n];
    dist[s] = 0.0;

    let mut settled = vec![false; n];

    let mut heap = BinaryHeap::new();
    heap.push(Candidate {
        cost: 0.0,
        node: petgraph::graph::NodeIndex::new(s),
    });

    while let Some(Candidate { cost, node }) = heap.pop() {
        let v = node.index();
        if settled[v] || cost > dist[v] {
            continue;
        }
        settled[v] = true;
        stack.push(v);

        for &(w, weight) in &adjacency[v] {
            if settled[w] {
                continue;
            }
            let alt = dist[v] + weight;

            if alt < dist[w] {
                dist[w] = alt;
                sigma[w] = sigma[v];
                predecessors[w].clear();
                predecessors[w].push(v);
                heap.push(Candidate {
                    cost: alt,
                    node: petgraph::graph::NodeIndex::new(w),
                });
            } else if alt == dist[w] {
                // Another shortest path of equal total weight.
                sigma[w] += sigma[v];
                predecessors[w].push(v);
            }
        }
    }

    // Accumulate dependencies in reverse settle order.
    let mut delta: Vec<f64> = vec![0.0; n];

    while let Some(w) = stack.pop() {
        for &v in &predecessors[w] {
            if sigma[w] > 0.0 {
                delta[v] += (sigma[v] / sigma[w]) * (1.0 + delta[w]);
            }
        }

        if w != s {
            cb[w] += delta[w];
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
