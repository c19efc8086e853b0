//! `sflow path`: cheapest directed supply chain between two sectors.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use sectorflow_core::path::{PathResult, shortest_path};
use serde::Serialize;

use super::{GlobalOpts, fmt_flow, open_session};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct PathArgs {
    /// Matrix document (JSON), or `-` for stdin.
    pub input: PathBuf,

    /// Supplying sector label.
    #[arg(long)]
    pub from: String,

    /// Receiving sector label.
    #[arg(long)]
    pub to: String,
}

#[derive(Debug, Serialize)]
pub struct PathReport {
    pub from: String,
    pub to: String,
    #[serde(flatten)]
    pub result: PathResult,
}

pub fn run_path(
    args: &PathArgs,
    opts: &GlobalOpts,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let session = open_session(opts, &args.input, project_root)?;
    let result = shortest_path(&session.graph, &args.from, &args.to)?;

    let report = PathReport {
        from: args.from.clone(),
        to: args.to.clone(),
        result,
    };

    render_mode(output, &report, render_text, render_pretty)
}

/// One line: `found <weight> A > B > C` or `no_path A B`.
pub fn render_text(report: &PathReport, w: &mut dyn Write) -> std::io::Result<()> {
    match &report.result {
        PathResult::Found { path, total_weight } => {
            writeln!(w, "found {} {}", fmt_flow(*total_weight), path.join(" > "))
        }
        PathResult::NoPath { source, target } => writeln!(w, "no_path {source} {target}"),
    }
}

pub fn render_pretty(report: &PathReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Pathway: {} → {}", report.from, report.to))?;
    match &report.result {
        PathResult::Found { path, total_weight } => {
            pretty_kv(w, "Hops", (path.len().saturating_sub(1)).to_string())?;
            pretty_kv(w, "Total weight", fmt_flow(*total_weight))?;
            pretty_kv(w, "Route", path.join(" → "))
        }
        PathResult::NoPath { .. } => {
            writeln!(w, "No directed path; {} does not feed {}.", report.from, report.to)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(report: &PathReport) -> String {
        let mut buf = Vec::new();
        render_text(report, &mut buf).expect("write");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn text_for_found_path() {
        let report = PathReport {
            from: "Farming".into(),
            to: "Baking".into(),
            result: PathResult::Found {
                path: vec!["Farming".into(), "Milling".into(), "Baking".into()],
                total_weight: 14.0,
            },
        };
        assert_eq!(render(&report), "found 14.00 Farming > Milling > Baking\n");
    }

    #[test]
    fn text_for_missing_path() {
        let report = PathReport {
            from: "Retail".into(),
            to: "Farming".into(),
            result: PathResult::NoPath {
                source: "Retail".into(),
                target: "Farming".into(),
            },
        };
        assert_eq!(render(&report), "no_path Retail Farming\n");
    }

    #[test]
    fn json_flattens_status() {
        let report = PathReport {
            from: "A".into(),
            to: "B".into(),
            result: PathResult::Found {
                path: vec!["A".into(), "B".into()],
                total_weight: 2.0,
            },
        };
        let v = serde_json::to_value(&report).expect("json");
        assert_eq!(v["status"], "found");
        assert_eq!(v["from"], "A");
        assert_eq!(v["total_weight"], 2.0);
    }
}
