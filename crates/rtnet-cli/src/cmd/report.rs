//! `rtnet report`: the full analysis in one pass.
//!
//! Loads the exports once, then prints basic counts, the PageRank report,
//! the centrality report and the SCC report, and finally plots the
//! largest connected component.

use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use rtnet_core::config::RtnetConfig;
use rtnet_metrics::betweenness::{CentralityRow, top_centrality};
use rtnet_metrics::components::{SccReport, scc_report};
use rtnet_metrics::pagerank::{RankedScore, top_pagerank};
use rtnet_metrics::stats::GraphStats;
use serde::Serialize;
use tracing::info;

use super::centrality::{write_centrality_pretty, write_centrality_text};
use super::pagerank::{write_pagerank_pretty, write_pagerank_text};
use super::plot::{PlotSummary, check_plot_path, layout_component, show_plot, write_plot_file};
use super::scc::{write_scc_pretty, write_scc_text};
use super::{InputArgs, TopArgs, load_graph, pagerank_config};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `rtnet report`.
#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub top: TopArgs,

    /// Write the plot to an SVG file instead of the interactive view.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Skip the plot entirely.
    #[arg(long, conflicts_with = "output")]
    pub no_plot: bool,

    /// Plot retweet direction instead of the undirected projection.
    #[arg(long)]
    pub directed: bool,
}

/// Where the report's plot goes, settled before any layout work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotTarget<'a> {
    File(&'a Path),
    Interactive,
    Skip,
}

impl<'a> PlotTarget<'a> {
    /// The interactive view needs a terminal on stdout and human output.
    pub fn choose(args: &'a ReportArgs, output: OutputMode, stdout_is_terminal: bool) -> Self {
        match &args.output {
            _ if args.no_plot => Self::Skip,
            Some(path) => Self::File(path),
            None if output.is_json() || !stdout_is_terminal => Self::Skip,
            None => Self::Interactive,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FullReport {
    pub stats: GraphStats,
    pub pagerank: Vec<RankedScore>,
    pub centrality: Vec<CentralityRow>,
    pub scc: SccReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot: Option<PlotSummary>,
}

pub fn write_stats_text(w: &mut dyn Write, stats: &GraphStats) -> io::Result<()> {
    writeln!(w, "Nodes: {}", stats.nodes)?;
    writeln!(w, "Edges: {}", stats.edges)?;
    writeln!(w, "Connected component nodes: {}", stats.component_nodes)?;
    writeln!(w, "Connected component edges: {}", stats.component_edges)
}

fn write_stats_pretty(w: &mut dyn Write, stats: &GraphStats) -> io::Result<()> {
    pretty_section(w, "Retweet graph")?;
    pretty_kv(w, "Nodes", stats.nodes.to_string())?;
    pretty_kv(w, "Edges", stats.edges.to_string())?;
    pretty_kv(w, "Density", format!("{:.6}", stats.density))?;
    pretty_kv(w, "Connected components", stats.component_count.to_string())?;
    pretty_kv(w, "Largest component nodes", stats.component_nodes.to_string())?;
    pretty_kv(w, "Largest component edges", stats.component_edges.to_string())
}

pub fn write_report_text(w: &mut dyn Write, report: &FullReport) -> io::Result<()> {
    write_stats_text(w, &report.stats)?;
    writeln!(w)?;
    write_pagerank_text(w, &report.pagerank)?;
    writeln!(w)?;
    write_centrality_text(w, &report.centrality)?;
    writeln!(w)?;
    write_scc_text(w, &report.scc)
}

fn write_report_pretty(w: &mut dyn Write, report: &FullReport) -> io::Result<()> {
    write_stats_pretty(w, &report.stats)?;
    writeln!(w)?;
    pretty_section(w, "Top handles by PageRank")?;
    write_pagerank_pretty(w, &report.pagerank)?;
    writeln!(w)?;
    pretty_section(w, "Top handles by betweenness centrality")?;
    write_centrality_pretty(w, &report.centrality)?;
    writeln!(w)?;
    write_scc_pretty(w, &report.scc)?;
    if let Some(plot) = &report.plot {
        writeln!(w)?;
        pretty_kv(w, "Plot written to", plot.path.display().to_string())?;
    }
    Ok(())
}

/// Run every report over the given exports.
///
/// # Errors
///
/// Returns an error if loading, writing the plot, or drawing fails.
pub fn run_report(args: &ReportArgs, config: &RtnetConfig, output: OutputMode) -> Result<()> {
    let target = PlotTarget::choose(args, output, io::stdout().is_terminal());
    if let PlotTarget::File(path) = target {
        check_plot_path(path)?;
    }
    if target == PlotTarget::Skip && !args.no_plot {
        info!("stdout is not an interactive terminal; skipping plot view");
    }

    let graph = load_graph(&args.input, config)?;
    let top = args.top.resolve(&config.report);
    let pr_config = pagerank_config(&config.report);

    let mut report = FullReport {
        stats: GraphStats::from_graph(&graph),
        pagerank: top_pagerank(&graph, &pr_config, top),
        centrality: top_centrality(&graph, top, config.report.normalized_betweenness),
        scc: scc_report(&graph, &pr_config, top),
        plot: None,
    };

    let layout = (target != PlotTarget::Skip)
        .then(|| layout_component(&graph, &config.plot, args.directed));

    if let (Some(layout), PlotTarget::File(path)) = (&layout, target) {
        report.plot = Some(write_plot_file(layout, &config.plot, path)?);
    }

    render_mode(
        output,
        &report,
        |r, w| write_report_text(w, r),
        |r, w| write_report_pretty(w, r),
    )?;

    match layout {
        Some(layout) if target == PlotTarget::Interactive && !layout.is_empty() => show_plot(&layout),
        _ => Ok(()),
    }
}
