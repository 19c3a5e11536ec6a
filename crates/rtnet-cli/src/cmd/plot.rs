//! `rtnet plot`: picture of the largest connected component.
//!
//! Fan shapes near the rim are single posts radiating out to many
//! retweeters; tight knots are handles that retweet one another.

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::Args;
use rtnet_core::RetweetGraph;
use rtnet_core::config::{PlotConfig, RtnetConfig};
use rtnet_metrics::layout::{Layout, component_layout};
use serde::Serialize;
use tracing::info;

use super::{InputArgs, layout_config, load_graph};
use crate::output::{OutputMode, render};
use crate::render::svg::{SvgStyle, save_svg};
use crate::render::terminal;

/// Arguments for `rtnet plot`.
#[derive(Args, Debug)]
pub struct PlotArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Write an SVG file instead of opening the interactive view.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Draw retweet direction instead of the undirected projection.
    #[arg(long)]
    pub directed: bool,
}

/// What was written by a file plot.
#[derive(Debug, Clone, Serialize)]
pub struct PlotSummary {
    pub path: PathBuf,
    pub nodes: usize,
    pub edges: usize,
    pub directed: bool,
}

/// Lay out the largest connected component with the `[plot]` settings.
pub fn layout_component(graph: &RetweetGraph, plot: &PlotConfig, directed: bool) -> Layout {
    component_layout(graph, &layout_config(plot), directed)
}

/// Reject output paths that would hold SVG under another extension.
///
/// # Errors
///
/// Fails unless `path` ends in `.svg` (any case).
pub fn check_plot_path(path: &Path) -> Result<()> {
    if path
        .extension()
        .is_none_or(|ext| !ext.eq_ignore_ascii_case("svg"))
    {
        bail!(
            "plots are written as SVG; choose an output name ending in .svg (got {})",
            path.display()
        );
    }
    Ok(())
}

/// Save `layout` as SVG at `path`.
///
/// # Errors
///
/// Returns an error if `path` is not an `.svg` name or cannot be written.
pub fn write_plot_file(layout: &Layout, plot: &PlotConfig, path: &Path) -> Result<PlotSummary> {
    check_plot_path(path)?;
    save_svg(path, layout, &SvgStyle::from(plot))?;
    Ok(PlotSummary {
        path: path.to_path_buf(),
        nodes: layout.nodes.len(),
        edges: layout.edges.len(),
        directed: layout.directed,
    })
}

/// Open the interactive view, provided stdout is a terminal.
///
/// # Errors
///
/// Fails when stdout is redirected or the terminal cannot be driven.
pub fn show_plot(layout: &Layout) -> Result<()> {
    if !io::stdout().is_terminal() {
        bail!("stdout is not a terminal; pass --output FILE to write an SVG instead");
    }
    terminal::show(layout)
}

/// Plot the largest connected component to a file or the terminal.
///
/// With `--format json` and no `--output`, the computed layout itself is
/// printed.
///
/// # Errors
///
/// Returns an error if loading, writing, or drawing fails.
pub fn run_plot(args: &PlotArgs, config: &RtnetConfig, output: OutputMode) -> Result<()> {
    if let Some(path) = &args.output {
        check_plot_path(path)?;
    }
    let graph = load_graph(&args.input, config)?;
    let layout = layout_component(&graph, &config.plot, args.directed);
    if layout.is_empty() {
        info!("no retweets found; nothing to plot");
    }

    match &args.output {
        Some(path) => {
            let summary = write_plot_file(&layout, &config.plot, path)?;
            render(output, &summary, |s, w| {
                writeln!(
                    w,
                    "Wrote {} ({} nodes, {} edges)",
                    s.path.display(),
                    s.nodes,
                    s.edges
                )
            })
        }
        None if output.is_json() => render(output, &layout, |_, _| Ok(())),
        None if layout.is_empty() => Ok(()),
        None => show_plot(&layout),
    }
}
