pub mod analyze;
pub mod path;

use std::path::{Path, PathBuf};

use anyhow::Result;
use sectorflow_core::config::{CONFIG_FILE_NAME, SectorflowConfig, load_config};
use sectorflow_core::graph::SectorGraph;
use tracing::debug;

use crate::input::load_document;
use crate::presentation::{PresentationConfig, load_presentation};

/// Flags shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalOpts {
    pub config: Option<PathBuf>,
    pub threshold: Option<f64>,
}

/// Everything a command needs once the input has been loaded.
#[derive(Debug)]
pub struct Session {
    pub config: SectorflowConfig,
    pub presentation: PresentationConfig,
    pub graph: SectorGraph,
}

impl GlobalOpts {
    fn config_path(&self, project_root: &Path) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| project_root.join(CONFIG_FILE_NAME))
    }
}

/// Load config, apply flag overrides, read the input and build the graph.
pub fn open_session(opts: &GlobalOpts, input: &Path, project_root: &Path) -> Result<Session> {
    let config_path = opts.config_path(project_root);
    let mut config = load_config(&config_path)?;
    let presentation = load_presentation(&config_path)?;

    if let Some(threshold) = opts.threshold {
        config.graph.threshold = threshold;
    }
    debug!(config = %config_path.display(), threshold = config.graph.threshold, "config resolved");

    let doc = load_document(input)?;
    let matrix = doc.to_matrix()?;
    let graph = SectorGraph::from_matrix(&matrix, doc.labels.as_deref(), &config.graph)?;

    Ok(Session {
        config,
        presentation,
        graph,
    })
}

/// Format a score for text and pretty output.
pub fn fmt_score(v: f64) -> String {
    format!("{v:.6}")
}

/// Format a flow amount for text and pretty output.
pub fn fmt_flow(v: f64) -> String {
    format!("{v:.2}")
}
