#![forbid(unsafe_code)]

mod cmd;
mod output;
mod render;
mod twitter;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use rtnet_core::config::load_config;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "rtnet: retweet network analysis",
    long_about = None
)]
struct Cli {
    /// Enable debug logging (same as `RTNET_LOG=rtnet=debug`).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Read settings from this file instead of `./rtnet.toml`.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format for reports.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print counts, PageRank, centrality and SCC reports, then plot.
    Report(cmd::report::ReportArgs),

    /// Handles whose posts are passed along the most.
    Pagerank(cmd::pagerank::PagerankArgs),

    /// Handles that bridge otherwise separate audiences.
    Centrality(cmd::centrality::CentralityArgs),

    /// Size of the largest strongly connected component and its leaders.
    Scc(cmd::scc::SccArgs),

    /// Draw the largest connected component.
    Plot(cmd::plot::PlotArgs),

    /// Show the account behind the configured API credentials.
    Whoami,

    /// Search recent posts by term and/or geocode.
    Search(cmd::search::SearchArgs),

    /// Generate shell completion scripts.
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("RTNET_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "rtnet=debug,info"
        } else {
            "rtnet=info,warn"
        })
    });

    let format = env::var("RTNET_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

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
    let working_dir = env::current_dir()?;
    let config = load_config(cli.config.as_deref(), &working_dir).context("loading configuration")?;
    debug!(?config.columns, ?config.report, ?config.plot, "configuration resolved");

    match &cli.command {
        Commands::Report(args) => cmd::report::run_report(args, &config, output),
        Commands::Pagerank(args) => cmd::pagerank::run_pagerank(args, &config, output),
        Commands::Centrality(args) => cmd::centrality::run_centrality(args, &config, output),
        Commands::Scc(args) => cmd::scc::run_scc(args, &config, output),
        Commands::Plot(args) => cmd::plot::run_plot(args, &config, output),
        Commands::Whoami => cmd::whoami::run_whoami(&config, output),
        Commands::Search(args) => cmd::search::run_search(args, &config, output),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = cli.output_mode();
    match run(&cli, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(error = ?err, "command failed");
            if render_error(output, &CliError::from(&err)).is_err() {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
