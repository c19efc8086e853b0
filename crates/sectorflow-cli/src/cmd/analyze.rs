//! `sflow analyze`: full structural report for a use matrix.
//!
//! Sections: basic properties, top-N rankings, a per-sector table (capped at
//! `presentation.max_nodes`, heaviest flow first) and one illustrative
//! pathway. The pathway uses `--from/--to` when given, otherwise the two
//! sectors with the highest betweenness.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use sectorflow_core::analysis::{ResultBundle, analyze, default_pathway_endpoints, top_n};
use sectorflow_core::graph::SectorGraph;
use sectorflow_core::path::shortest_path;
use serde::Serialize;
use tracing::info;

use super::path::PathReport;
use super::{GlobalOpts, fmt_flow, fmt_score, open_session};
use crate::output::{OutputMode, pretty_kv, pretty_rule, pretty_section, render_mode};
use crate::presentation::{LayoutKind, PresentationConfig};

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Matrix document (JSON), or `-` for stdin.
    pub input: PathBuf,

    /// Pathway start sector (requires --to).
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// Pathway end sector (requires --from).
    #[arg(long, requires = "from")]
    pub to: Option<String>,

    /// Entries per ranking; overrides `presentation.top_n`.
    #[arg(long)]
    pub top: Option<usize>,

    /// Compute betweenness on the rayon thread pool.
    #[arg(long)]
    pub parallel: bool,
}

#[derive(Debug, Serialize)]
pub struct Ranked {
    pub sector: String,
    pub score: f64,
}

#[derive(Debug, Serialize)]
pub struct Properties {
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    pub threshold: f64,
    pub max_flow: f64,
    pub strong_components: usize,
    pub weak_components: usize,
    pub is_strongly_connected: bool,
}

#[derive(Debug, Serialize)]
pub struct Rankings {
    pub degree_centrality: Vec<Ranked>,
    pub weighted_degree: Vec<Ranked>,
    pub betweenness: Vec<Ranked>,
    /// Highest weighted in-degree: sectors buying the most from others.
    pub top_importers: Vec<Ranked>,
    /// Highest weighted out-degree: sectors selling the most to others.
    pub top_exporters: Vec<Ranked>,
}

#[derive(Debug, Serialize)]
pub struct SectorRow {
    pub sector: String,
    pub total_output: f64,
    pub total_input: f64,
    pub degree_centrality: f64,
    pub weighted_in: f64,
    pub weighted_out: f64,
    pub betweenness: f64,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeReport {
    pub properties: Properties,
    pub rankings: Rankings,
    pub sectors: Vec<SectorRow>,
    /// Sectors left out of `sectors` by `max_nodes`.
    pub sectors_omitted: usize,
    pub layout: LayoutKind,
    pub pathway: Option<PathReport>,
}

pub fn run_analyze(
    args: &AnalyzeArgs,
    opts: &GlobalOpts,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let mut session = open_session(opts, &args.input, project_root)?;
    if args.parallel {
        session.config.analysis.betweenness.parallel = true;
    }
    if let Some(top) = args.top {
        session.presentation.top_n = top;
    }

    let bundle = analyze(&session.graph, &session.config.analysis)?;

    let endpoints = match (&args.from, &args.to) {
        (Some(from), Some(to)) => Some((from.clone(), to.clone())),
        _ => default_pathway_endpoints(&bundle),
    };
    let pathway = match endpoints {
        Some((from, to)) => {
            let result = shortest_path(&session.graph, &from, &to)?;
            Some(PathReport { from, to, result })
        }
        None => None,
    };

    let report = build_report(&session.graph, &bundle, &session.presentation, pathway);
    info!(
        sectors = report.properties.node_count,
        shown = report.sectors.len(),
        "report assembled"
    );

    render_mode(output, &report, render_text, render_pretty)
}

fn ranked(scores: &HashMap<String, f64>, n: usize) -> Vec<Ranked> {
    top_n(scores, n)
        .into_iter()
        .map(|(sector, score)| Ranked { sector, score })
        .collect()
}

fn score(scores: &HashMap<String, f64>, label: &str) -> f64 {
    scores.get(label).copied().unwrap_or(0.0)
}

/// Assemble the report from a finished bundle.
pub fn build_report(
    g: &SectorGraph,
    bundle: &ResultBundle,
    presentation: &PresentationConfig,
    pathway: Option<PathReport>,
) -> AnalyzeReport {
    let n = presentation.top_n;

    let sectors: Vec<SectorRow> = top_n(&bundle.weighted_degree, presentation.max_nodes)
        .into_iter()
        .filter_map(|(label, _)| {
            let sector = g.node_index(&label).and_then(|idx| g.sector(idx))?;
            Some(SectorRow {
                total_output: sector.total_output,
                total_input: sector.total_input,
                degree_centrality: score(&bundle.degree_centrality, &label),
                weighted_in: score(&bundle.weighted_in_degree, &label),
                weighted_out: score(&bundle.weighted_out_degree, &label),
                betweenness: score(&bundle.betweenness, &label),
                sector: label,
            })
        })
        .collect();

    AnalyzeReport {
        properties: Properties {
            node_count: bundle.node_count,
            edge_count: bundle.edge_count,
            density: bundle.density,
            threshold: g.threshold(),
            max_flow: g.max_flow(),
            strong_components: bundle.connectivity.strong_components,
            weak_components: bundle.connectivity.weak_components,
            is_strongly_connected: bundle.connectivity.is_strongly_connected,
        },
        rankings: Rankings {
            degree_centrality: ranked(&bundle.degree_centrality, n),
            weighted_degree: ranked(&bundle.weighted_degree, n),
            betweenness: ranked(&bundle.betweenness, n),
            top_importers: ranked(&bundle.weighted_in_degree, n),
            top_exporters: ranked(&bundle.weighted_out_degree, n),
        },
        sectors_omitted: bundle.node_count.saturating_sub(sectors.len()),
        sectors,
        layout: presentation.layout,
        pathway,
    }
}

fn ranking_groups(r: &Rankings) -> [(&'static str, &[Ranked]); 5] {
    [
        ("degree_centrality", r.degree_centrality.as_slice()),
        ("weighted_degree", r.weighted_degree.as_slice()),
        ("betweenness", r.betweenness.as_slice()),
        ("top_importers", r.top_importers.as_slice()),
        ("top_exporters", r.top_exporters.as_slice()),
    ]
}

pub fn render_text(report: &AnalyzeReport, w: &mut dyn Write) -> std::io::Result<()> {
    let p = &report.properties;
    writeln!(
        w,
        "nodes={} edges={} density={} strong={} weak={} strongly_connected={}",
        p.node_count,
        p.edge_count,
        fmt_score(p.density),
        p.strong_components,
        p.weak_components,
        p.is_strongly_connected
    )?;

    for (name, entries) in ranking_groups(&report.rankings) {
        for (rank, entry) in entries.iter().enumerate() {
            writeln!(w, "rank {name} {} {} {}", rank + 1, entry.sector, fmt_score(entry.score))?;
        }
    }

    for row in &report.sectors {
        writeln!(
            w,
            "sector {} out={} in={} degree={} betweenness={}",
            row.sector,
            fmt_flow(row.weighted_out),
            fmt_flow(row.weighted_in),
            fmt_score(row.degree_centrality),
            fmt_score(row.betweenness)
        )?;
    }

    if let Some(pathway) = &report.pathway {
        write!(w, "path ")?;
        super::path::render_text(pathway, w)?;
    }
    Ok(())
}

pub fn render_pretty(report: &AnalyzeReport, w: &mut dyn Write) -> std::io::Result<()> {
    let p = &report.properties;
    pretty_section(w, "Network")?;
    pretty_kv(w, "Sectors", p.node_count.to_string())?;
    pretty_kv(w, "Flows", p.edge_count.to_string())?;
    pretty_kv(w, "Density", format!("{:.4}", p.density))?;
    pretty_kv(w, "Threshold", fmt_flow(p.threshold))?;
    pretty_kv(w, "Largest flow", fmt_flow(p.max_flow))?;
    pretty_kv(w, "Strong components", p.strong_components.to_string())?;
    pretty_kv(w, "Weak components", p.weak_components.to_string())?;
    pretty_kv(
        w,
        "Strongly connected",
        if p.is_strongly_connected { "yes" } else { "no" },
    )?;
    writeln!(w)?;

    for (name, entries) in ranking_groups(&report.rankings) {
        pretty_section(w, &format!("Top {}", name.replace('_', " ")))?;
        for (rank, entry) in entries.iter().enumerate() {
            writeln!(w, "{:>3}. {:<32} {}", rank + 1, entry.sector, fmt_score(entry.score))?;
        }
        writeln!(w)?;
    }

    pretty_section(w, "Sectors")?;
    writeln!(
        w,
        "{:<28} {:>12} {:>12} {:>10} {:>10}",
        "SECTOR", "SELLS", "BUYS", "DEGREE", "BETWEEN"
    )?;
    pretty_rule(w)?;
    for row in &report.sectors {
        writeln!(
            w,
            "{:<28} {:>12} {:>12} {:>10.4} {:>10.4}",
            row.sector,
            fmt_flow(row.weighted_out),
            fmt_flow(row.weighted_in),
            row.degree_centrality,
            row.betweenness
        )?;
    }
    if report.sectors_omitted > 0 {
        writeln!(w, "... {} more sectors not shown", report.sectors_omitted)?;
    }

    if let Some(pathway) = &report.pathway {
        writeln!(w)?;
        super::path::render_pretty(pathway, w)?;
    }
    Ok(())
}
