//! Matrix document loading.
//!
//! The CLI reads a single JSON document:
//!
//! ```json
//! { "matrix": [[0.0, 5.0], [2.0, 0.0]], "labels": ["Farming", "Mining"] }
//! ```
//!
//! `labels` is optional. Spreadsheet extraction and row/column cleanup are
//! left to whatever produced the document. Pass `-` to read from stdin.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use sectorflow_core::matrix::UseMatrix;
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct MatrixDocument {
    pub matrix: Vec<Vec<f64>>,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
}

impl MatrixDocument {
    /// Parse a document from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("Failed to parse matrix document")
    }

    /// Validate the cells into a [`UseMatrix`].
    pub fn to_matrix(&self) -> Result<UseMatrix> {
        let m = UseMatrix::from_rows(&self.matrix)?;
        let n = m.sector_count();

        if let Some(labels) = &self.labels {
            if labels.len() < n {
                warn!(
                    labels = labels.len(),
                    sectors = n,
                    "label list shorter than sector count; using synthetic labels"
                );
            }
        }

        debug!(
            rows = m.nrows(),
            cols = m.ncols(),
            total_flow = m.total_flow(),
            "matrix loaded"
        );
        Ok(m)
    }
}

/// Read a matrix document from `path`, or stdin when `path` is `-`.
pub fn load_document(path: &Path) -> Result<MatrixDocument> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read matrix document from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };

    MatrixDocument::from_json(&raw).with_context(|| format!("Invalid input {}", path.display()))
}
