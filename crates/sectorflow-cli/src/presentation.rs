//! `[presentation]` settings from `sectorflow.toml`.
//!
//! These only shape the report. The engine never sees them, and the graph
//! and analysis tables of the same file are read by `sectorflow_core::config`.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Layout a downstream renderer should use when drawing the sector graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    #[default]
    Spring,
    Circular,
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationConfig {
    #[serde(default)]
    pub layout: LayoutKind,
    /// Sector table rows shown before the report truncates.
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,
    /// Entries per ranking.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            layout: LayoutKind::default(),
            max_nodes: default_max_nodes(),
            top_n: default_top_n(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PresentationFile {
    #[serde(default)]
    presentation: PresentationConfig,
}

const fn default_max_nodes() -> usize {
    40
}

const fn default_top_n() -> usize {
    5
}

/// Read the `[presentation]` table, defaulting when the file is absent.
pub fn load_presentation(path: &Path) -> Result<PresentationConfig> {
    if !path.exists() {
        return Ok(PresentationConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file = toml::from_str::<PresentationFile>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    if file.presentation.max_nodes == 0 {
        anyhow::bail!(
            "Invalid configuration in {}: presentation.max_nodes must be at least 1",
            path.display()
        );
    }
    Ok(file.presentation)
}
