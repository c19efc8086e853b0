#![forbid(unsafe_code)]
//! sectorflow-core library.
//!
//! Builds a directed weighted sector graph from an input-output use matrix
//! and computes degree, weighted flow, betweenness, connectivity, and
//! shortest-path results for presentation.
//!
//! # Conventions
//!
//! - **Errors**: Library operations return [`error::Result`] with an
//!   [`error::AnalysisError`]; config loading uses `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod analysis;
pub mod config;
pub mod error;
pub mod graph;
pub mod matrix;
pub mod metrics;
pub mod path;

pub use analysis::{ResultBundle, analyze};
pub use error::{AnalysisError, ErrorCode};
pub use graph::SectorGraph;
pub use matrix::UseMatrix;
pub use path::{PathResult, shortest_path};
