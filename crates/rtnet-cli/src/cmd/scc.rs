//! `rtnet scc`: how much of the conversation is two-way.
//!
//! A large strongly connected component means many handles both pass
//! along and get passed along; a small one means broadcasting dominates.

use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use rtnet_core::config::RtnetConfig;
use rtnet_metrics::components::{SccReport, scc_report};

use super::pagerank::{write_pagerank_pretty, write_pagerank_text};
use super::{InputArgs, TopArgs, load_graph, pagerank_config};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `rtnet scc`.
#[derive(Args, Debug)]
pub struct SccArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub top: TopArgs,
}

pub fn write_scc_text(w: &mut dyn Write, report: &SccReport) -> io::Result<()> {
    writeln!(
        w,
        "{} of {} nodes in largest SCC",
        report.scc_size, report.total_nodes
    )?;
    writeln!(w, "Highest-PageRank nodes in SCC:")?;
    write_pagerank_text(w, &report.top_pagerank)
}

pub fn write_scc_pretty(w: &mut dyn Write, report: &SccReport) -> io::Result<()> {
    pretty_section(w, "Largest strongly connected component")?;
    pretty_kv(
        w,
        "Members",
        format!("{} of {} nodes", report.scc_size, report.total_nodes),
    )?;
    pretty_kv(w, "Components", report.scc_count.to_string())?;
    writeln!(w)?;
    pretty_section(w, "Highest-PageRank nodes in SCC")?;
    write_pagerank_pretty(w, &report.top_pagerank)
}

/// Print the largest-SCC summary and its PageRank sub-report.
///
/// # Errors
///
/// Returns an error if loading fails or stdout cannot be written.
pub fn run_scc(args: &SccArgs, config: &RtnetConfig, output: OutputMode) -> Result<()> {
    let graph = load_graph(&args.input, config)?;
    let report = scc_report(
        &graph,
        &pagerank_config(&config.report),
        args.top.resolve(&config.report),
    );

    render_mode(
        output,
        &report,
        |r, w| write_scc_text(w, r),
        |r, w| write_scc_pretty(w, r),
    )
}
