//! Sector graph module.
//!
//! # Overview
//!
//! This module builds the immutable petgraph-based directed flow graph that
//! every metric and path query reads from.
//!
//! ## Pipeline
//!
//! ```text
//! UseMatrix (R×C dense flows) + optional labels
//!        ↓  build::SectorGraph::from_matrix(threshold)
//! SectorGraph (DiGraph<Sector, Flow>, edge j → i per cell (i, j) > threshold)
//!        ↓  metrics::* / path::shortest_path
//! label-keyed metric maps, ConnectivitySummary, PathResult
//! ```
//!
//! ## Typical Usage
//!
//! ```rust,ignore
//! use sectorflow_core::config::GraphConfig;
//! use sectorflow_core::graph::SectorGraph;
//! use sectorflow_core::matrix::UseMatrix;
//!
//! let m = UseMatrix::from_rows(&[vec![0.0, 5.0], vec![2.0, 0.0]])?;
//! let labels = vec!["A".to_string(), "B".to_string()];
//! let g = SectorGraph::from_matrix(&m, Some(&labels), &GraphConfig::with_threshold(1.0))?;
//!
//! println!("nodes={} edges={}", g.node_count(), g.edge_count());
//! ```

pub mod build;
pub(crate) mod heap;

// Re-export primary types at module level for convenience.
pub use build::{Flow, Sector, SectorGraph};
