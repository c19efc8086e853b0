//! Full structural analysis of a sector graph.
//!
//! [`analyze`] runs every metric and collects the results into a
//! [`ResultBundle`] keyed by sector label. The bundle is a plain value: it
//! holds no reference to the graph and is recomputed on every call.
//!
//! Ranking helpers ([`top_n`], [`default_pathway_endpoints`]) give
//! presenters a deterministic order: descending score, then label.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{info, instrument};

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::graph::SectorGraph;
use crate::metrics::betweenness::betweenness_centrality;
use crate::metrics::connectivity::{ConnectivitySummary, connectivity_summary};
use crate::metrics::degree::{degree_centrality, density, weighted_degrees};

/// Every metric for one graph, keyed by sector label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultBundle {
    pub node_count: usize,
    pub edge_count: usize,
    /// Directed density: `edges / (n * (n - 1))`.
    pub density: f64,
    pub degree_centrality: HashMap<String, f64>,
    pub weighted_in_degree: HashMap<String, f64>,
    pub weighted_out_degree: HashMap<String, f64>,
    /// In plus out: total economic flow through each sector.
    pub weighted_degree: HashMap<String, f64>,
    pub betweenness: HashMap<String, f64>,
    pub connectivity: ConnectivitySummary,
}

/// Run every metric on `g`.
///
/// # Errors
///
/// Returns [`crate::error::AnalysisError::EmptyGraph`] for a zero-node graph
/// and [`crate::error::AnalysisError::InvalidWeight`] for a negative or
/// non-finite edge weight. Nothing is computed when either check fails.
#[instrument(skip(g, config), fields(nodes = g.node_count(), edges = g.edge_count()))]
pub fn analyze(g: &SectorGraph, config: &AnalysisConfig) -> Result<ResultBundle> {
    g.ensure_non_empty()?;
    g.ensure_valid_weights()?;

    let degree_centrality = degree_centrality(g)?;
    let weighted = weighted_degrees(g)?;
    let betweenness = betweenness_centrality(g, &config.betweenness)?;
    let connectivity = connectivity_summary(g)?;

    info!(
        strong_components = connectivity.strong_components,
        weak_components = connectivity.weak_components,
        strongly_connected = connectivity.is_strongly_connected,
        "analysis complete"
    );

    Ok(ResultBundle {
        node_count: g.node_count(),
        edge_count: g.edge_count(),
        density: density(g),
        degree_centrality,
        weighted_in_degree: weighted.weighted_in,
        weighted_out_degree: weighted.weighted_out,
        weighted_degree: weighted.total,
        betweenness,
        connectivity,
    })
}

/// The `n` highest-scoring entries, sorted by descending score then label.
#[must_use]
pub fn top_n(scores: &HashMap<String, f64>, n: usize) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = scores.iter().map(|(k, v)| (k.clone(), *v)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(n);
    ranked
}

/// Pick endpoints for an illustrative pathway: the two sectors with the
/// highest betweenness, highest first.
///
/// Returns `None` when the bundle has fewer than two sectors.
#[must_use]
pub fn default_pathway_endpoints(bundle: &ResultBundle) -> Option<(String, String)> {
    let mut top = top_n(&bundle.betweenness, 2).into_iter();
    let (first, _) = top.next()?;
    let (second, _) = top.next()?;
    Some((first, second))
}
