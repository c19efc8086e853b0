//! Centrality and connectivity metrics for the sector graph.
//!
//! # Overview
//!
//! Each metric answers a different question about a sector's role in the
//! economy:
//!
//! - **Degree** (`degree`): How many sectors does it trade with, and how much
//!   flow does it buy (weighted in-degree) and sell (weighted out-degree)?
//! - **Betweenness** (`betweenness`): Which sectors sit on the cheapest
//!   supply chains between other sectors?
//! - **Connectivity** (`connectivity`): Does every sector reach every other
//!   one, and how many disjoint trading blocs exist?
//!
//! # Usage
//!
//! All metrics take a [`crate::graph::SectorGraph`] reference, fail with
//! [`crate::error::AnalysisError::EmptyGraph`] on a zero-node graph, and
//! return scores keyed by sector label.
//!
//! ```rust,ignore
//! use sectorflow_core::config::BetweennessConfig;
//! use sectorflow_core::metrics::betweenness::betweenness_centrality;
//! use sectorflow_core::metrics::connectivity::connectivity_summary;
//! use sectorflow_core::metrics::degree::{degree_centrality, weighted_degrees};
//!
//! let dc = degree_centrality(&g)?;
//! let wd = weighted_degrees(&g)?;
//! let bc = betweenness_centrality(&g, &BetweennessConfig::default())?;
//! let cs = connectivity_summary(&g)?;
//! ```

pub mod betweenness;
pub mod connectivity;
pub mod degree;
