#![forbid(unsafe_code)]

mod cmd;
mod input;
mod output;
mod presentation;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "sflow: structural analysis of input-output use matrices",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: ./sectorflow.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Edge threshold; cells must be strictly greater to become flows.
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Alias for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }

    fn global_opts(&self) -> cmd::GlobalOpts {
        cmd::GlobalOpts {
            config: self.config.clone(),
            threshold: self.threshold,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Analyze a use matrix",
        long_about = "Build the sector graph and report density, connectivity, rankings and one pathway.",
        after_help = "EXAMPLES:\n    # Full report\n    sflow analyze table.json\n\n    # Pathway between two named sectors, as JSON\n    sflow analyze table.json --from Farming --to Retail --format json"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        about = "Shortest supply chain between two sectors",
        after_help = "EXAMPLES:\n    sflow path table.json --from Farming --to Retail"
    )]
    Path(cmd::path::PathArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("SECTORFLOW_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "sectorflow=debug,sflow=debug,info"
        } else {
            "sectorflow=info,sflow=info,warn"
        })
    });

    let format = env::var("SECTORFLOW_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout stays parseable in every output mode.
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: &Cli, output: OutputMode) -> anyhow::Result<()> {
    let project_root = env::current_dir()?;
    let opts = cli.global_opts();

    match &cli.command {
        Commands::Analyze(args) => {
            cmd::analyze::run_analyze(args, &opts, output, &project_root)
        }
        Commands::Path(args) => cmd::path::run_path(args, &opts, output, &project_root),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();
    debug!(?output, "output mode resolved");

    match run(&cli, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let cli_err = CliError::from_anyhow(&err);
            if render_error(output, &cli_err).is_err() {
                eprintln!("error: {}", cli_err.message);
            }
            ExitCode::FAILURE
        }
    }
}
