//! `rtnet centrality`: connectors between otherwise separate audiences.

use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use rtnet_core::config::RtnetConfig;
use rtnet_metrics::betweenness::{CentralityRow, top_centrality};

use super::pagerank::handle_width;
use super::{InputArgs, TopArgs, load_graph};
use crate::output::{OutputMode, pretty_section, render_mode};

/// Arguments for `rtnet centrality`.
#[derive(Args, Debug)]
pub struct CentralityArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub top: TopArgs,
}

pub fn write_centrality_text(w: &mut dyn Write, rows: &[CentralityRow]) -> io::Result<()> {
    writeln!(w, "Rank\tHandle\tcentrality\tin_deg\tout_deg")?;
    for row in rows {
        writeln!(
            w,
            "{}\t{}\t{:?}\t{}\t{}",
            row.rank, row.handle, row.centrality, row.in_degree, row.out_degree
        )?;
    }
    Ok(())
}

pub fn write_centrality_pretty(w: &mut dyn Write, rows: &[CentralityRow]) -> io::Result<()> {
    let width = handle_width(rows.iter().map(|r| r.handle.as_str()));
    writeln!(
        w,
        "{:>4}  {:<width$}  {:>10}  {:>6}  {:>7}",
        "#", "Handle", "Centrality", "In", "Out"
    )?;
    for row in rows {
        writeln!(
            w,
            "{:>4}  {:<width$}  {:>10.6}  {:>6}  {:>7}",
            row.rank, row.handle, row.centrality, row.in_degree, row.out_degree
        )?;
    }
    Ok(())
}

/// Print the top handles by betweenness centrality.
///
/// # Errors
///
/// Returns an error if loading fails or stdout cannot be written.
pub fn run_centrality(
    args: &CentralityArgs,
    config: &RtnetConfig,
    output: OutputMode,
) -> Result<()> {
    let graph = load_graph(&args.input, config)?;
    let rows = top_centrality(
        &graph,
        args.top.resolve(&config.report),
        config.report.normalized_betweenness,
    );

    render_mode(
        output,
        &rows,
        |rows, w| write_centrality_text(w, rows),
        |rows, w| {
            pretty_section(w, "Top handles by betweenness centrality")?;
            write_centrality_pretty(w, rows)
        },
    )
}
