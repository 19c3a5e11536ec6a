pub mod centrality;
pub mod completions;
pub mod pagerank;
pub mod plot;
pub mod report;
pub mod scc;
pub mod search;
pub mod whoami;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rtnet_core::RetweetGraph;
use rtnet_core::config::{PlotConfig, ReportConfig, RtnetConfig};
use rtnet_core::ingest::{ColumnLayout, load_files};
use rtnet_metrics::layout::LayoutConfig;
use rtnet_metrics::pagerank::PageRankConfig;

/// Input files shared by every analysis command.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Exported tweet spreadsheets (XLSX/XLS/ODS, CSV or TSV), processed in order.
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,
}

/// Row-count override shared by the ranked reports.
#[derive(Args, Debug, Default)]
pub struct TopArgs {
    /// Rows per ranked report (default: `report.top_n`, 20).
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,
}

impl TopArgs {
    pub fn resolve(&self, report: &ReportConfig) -> usize {
        self.top.unwrap_or(report.top_n)
    }
}

/// Load every input file into one retweet graph.
///
/// # Errors
///
/// Fails on an invalid `[columns]` section or on the first unreadable
/// file or malformed record.
pub fn load_graph(input: &InputArgs, config: &RtnetConfig) -> Result<RetweetGraph> {
    let layout = ColumnLayout::from_config(&config.columns)?;
    let (graph, _summary) =
        load_files(&input.files, &layout).context("loading tweet exports")?;
    Ok(graph)
}

pub const fn pagerank_config(report: &ReportConfig) -> PageRankConfig {
    PageRankConfig {
        damping: report.damping,
        tolerance: report.tolerance,
        max_iter: report.max_iter,
    }
}

pub const fn layout_config(plot: &PlotConfig) -> LayoutConfig {
    LayoutConfig {
        iterations: plot.iterations,
        seed: plot.seed,
    }
}
