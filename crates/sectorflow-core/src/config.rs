use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::AnalysisError;

/// Default config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "sectorflow.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectorflowConfig {
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Graph construction settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Cells must be strictly greater than this value to become edges.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

impl GraphConfig {
    #[must_use]
    pub const fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Reject thresholds that cannot filter a nonnegative matrix meaningfully.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Configuration`] for negative or non-finite values.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !self.threshold.is_finite() {
            return Err(AnalysisError::Configuration(format!(
                "threshold must be finite, got {}",
                self.threshold
            )));
        }
        if self.threshold < 0.0 {
            return Err(AnalysisError::Configuration(format!(
                "threshold must be nonnegative, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub betweenness: BetweennessConfig,
}

/// Betweenness centrality settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetweennessConfig {
    /// Divide raw scores by `(n-1)(n-2)`.
    #[serde(default = "default_true")]
    pub normalized: bool,
    /// Spread per-source shortest-path runs over the rayon thread pool.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for BetweennessConfig {
    fn default() -> Self {
        Self {
            normalized: default_true(),
            parallel: false,
        }
    }
}

impl SectorflowConfig {
    /// # Errors
    ///
    /// Returns [`AnalysisError::Configuration`] if any section is invalid.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        self.graph.validate()
    }
}

/// Load a config file, falling back to defaults when it does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read, parsed, or
/// fails validation.
pub fn load_config(path: &Path) -> Result<SectorflowConfig> {
    if !path.exists() {
        return Ok(SectorflowConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = toml::from_str::<SectorflowConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;

    Ok(config)
}

const fn default_true() -> bool {
    true
}

const fn default_threshold() -> f64 {
    0.1
}
