//! `rtnet pagerank`: handles whose posts get passed along the most.
//!
//! Rank flows from each retweeter to the handle it retweeted, so a high
//! score marks a good source of information rather than a busy retweeter.

use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use rtnet_core::config::RtnetConfig;
use rtnet_metrics::pagerank::{RankedScore, top_pagerank};

use super::{InputArgs, TopArgs, load_graph, pagerank_config};
use crate::output::{OutputMode, pretty_section, render_mode};

/// Arguments for `rtnet pagerank`.
#[derive(Args, Debug)]
pub struct PagerankArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub top: TopArgs,
}

/// Header line, then one `handle<TAB>score` row per entry.
///
/// Scores always carry a decimal point (`1.0`, not `1`).
pub fn write_pagerank_text(w: &mut dyn Write, rows: &[RankedScore]) -> io::Result<()> {
    writeln!(w, "Handle\tPageRank")?;
    for row in rows {
        writeln!(w, "{}\t{:?}", row.handle, row.score)?;
    }
    Ok(())
}

pub fn write_pagerank_pretty(w: &mut dyn Write, rows: &[RankedScore]) -> io::Result<()> {
    let width = handle_width(rows.iter().map(|r| r.handle.as_str()));
    writeln!(w, "{:>4}  {:<width$}  {:>10}", "#", "Handle", "PageRank")?;
    for (i, row) in rows.iter().enumerate() {
        writeln!(w, "{:>4}  {:<width$}  {:>10.6}", i + 1, row.handle, row.score)?;
    }
    Ok(())
}

/// Column width that fits every handle (and the header).
pub fn handle_width<'a>(handles: impl Iterator<Item = &'a str>) -> usize {
    handles.map(|h| h.chars().count()).max().unwrap_or(0).max("Handle".len())
}

/// Print the top PageRank handles of the whole graph.
///
/// # Errors
///
/// Returns an error if loading fails or stdout cannot be written.
pub fn run_pagerank(args: &PagerankArgs, config: &RtnetConfig, output: OutputMode) -> Result<()> {
    let graph = load_graph(&args.input, config)?;
    let rows = top_pagerank(
        &graph,
        &pagerank_config(&config.report),
        args.top.resolve(&config.report),
    );

    render_mode(
        output,
        &rows,
        |rows, w| write_pagerank_text(w, rows),
        |rows, w| {
            pretty_section(w, "Top handles by PageRank")?;
            write_pagerank_pretty(w, rows)
        },
    )
}
