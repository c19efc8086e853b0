//! Error taxonomy for graph construction and analysis.
//!
//! Every precondition is checked before any algorithmic work starts, so a
//! returned error never accompanies a partial graph or metric mapping.
//!
//! "No path between two sectors" is deliberately absent here: it is a normal
//! outcome reported through [`crate::path::PathResult::NoPath`].

use std::fmt;

/// Errors produced by the sector graph builder and analysis engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    /// Invalid configuration: negative or non-finite threshold, duplicate labels.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The supplied matrix is not a dense finite numeric matrix.
    #[error("invalid matrix: {0}")]
    InvalidMatrix(String),

    /// Analysis was requested on a graph with zero nodes.
    #[error("graph has no nodes")]
    EmptyGraph,

    /// An edge weight is negative or non-finite, so shortest paths are undefined.
    #[error("invalid edge weight {weight} on {from} -> {to}")]
    InvalidWeight { from: String, to: String, weight: f64 },

    /// A path query referenced a label that is not in the graph.
    #[error("sector not found: {0}")]
    NodeNotFound(String),
}

impl AnalysisError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Configuration(_) => ErrorCode::InvalidConfiguration,
            Self::InvalidMatrix(_) => ErrorCode::InvalidMatrix,
            Self::EmptyGraph => ErrorCode::EmptyGraph,
            Self::InvalidWeight { .. } => ErrorCode::InvalidWeight,
            Self::NodeNotFound(_) => ErrorCode::NodeNotFound,
        }
    }
}

/// Machine-readable error codes for JSON consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidConfiguration,
    InvalidMatrix,
    EmptyGraph,
    InvalidWeight,
    NodeNotFound,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidConfiguration => "E1001",
            Self::InvalidMatrix => "E1002",
            Self::EmptyGraph => "E2001",
            Self::InvalidWeight => "E2002",
            Self::NodeNotFound => "E3001",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InvalidConfiguration => {
                Some("Use a finite, nonnegative threshold and unique sector labels.")
            }
            Self::InvalidMatrix => Some("Supply rows of equal length containing finite numbers."),
            Self::EmptyGraph => Some("Provide a matrix with at least one row and one column."),
            Self::InvalidWeight => Some("Remove negative flows from the matrix before analysis."),
            Self::NodeNotFound => Some("Sector labels are case-sensitive; check the input labels."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Convenience alias used across the crate.
pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;
