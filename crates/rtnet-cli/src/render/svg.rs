//! Static SVG rendering of a [`Layout`].
//!
//! Only edges are drawn, as thin translucent strokes; dense regions of the
//! network show up as darker areas. Directed layouts get an arrow marker
//! at the retweeter's end.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use rtnet_core::config::PlotConfig;
use rtnet_metrics::layout::Layout;
use tracing::info;

/// Blank border around the drawing, in pixels.
const MARGIN: f64 = 20.0;

/// Canvas geometry and stroke settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvgStyle {
    pub width: u32,
    pub height: u32,
    pub edge_opacity: f64,
}

impl From<&PlotConfig> for SvgStyle {
    fn from(config: &PlotConfig) -> Self {
        Self {
            width: config.width.max(1),
            height: config.height.max(1),
            edge_opacity: config.edge_opacity.clamp(0.0, 1.0),
        }
    }
}

impl SvgStyle {
    /// Map a unit-square coordinate into the canvas. SVG's y axis grows down.
    fn project(&self, x: f64, y: f64) -> (f64, f64) {
        let w = (f64::from(self.width) - 2.0 * MARGIN).max(1.0);
        let h = (f64::from(self.height) - 2.0 * MARGIN).max(1.0);
        (MARGIN + x * w, MARGIN + (1.0 - y) * h)
    }
}

/// Write `layout` as a standalone SVG document.
///
/// # Errors
///
/// Returns any I/O error from `out`.
pub fn write_svg(out: &mut dyn Write, layout: &Layout, style: &SvgStyle) -> io::Result<()> {
    let (w, h) = (style.width, style.height);
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    )?;
    writeln!(
        out,
        "  <title>Largest connected component: {} nodes, {} edges</title>",
        layout.nodes.len(),
        layout.edges.len()
    )?;
    writeln!(out, r#"  <rect width="100%" height="100%" fill="white"/>"#)?;

    let marker = if layout.directed {
        writeln!(out, "  <defs>")?;
        writeln!(
            out,
            r#"    <marker id="arrow" viewBox="0 0 10 10" refX="10" refY="5" markerWidth="6" markerHeight="6" orient="auto-start-reverse">"#
        )?;
        writeln!(out, r#"      <path d="M 0 0 L 10 5 L 0 10 z" fill="black"/>"#)?;
        writeln!(out, "    </marker>")?;
        writeln!(out, "  </defs>")?;
        r#" marker-end="url(#arrow)""#
    } else {
        ""
    };

    writeln!(
        out,
        r#"  <g stroke="black" stroke-width="1" stroke-opacity="{}" fill="none">"#,
        style.edge_opacity
    )?;
    for edge in &layout.edges {
        // Self-loops have no length to draw.
        if edge.from == edge.to {
            continue;
        }
        let (Some(a), Some(b)) = (layout.nodes.get(edge.from), layout.nodes.get(edge.to)) else {
            continue;
        };
        let (x1, y1) = style.project(a.x, a.y);
        let (x2, y2) = style.project(b.x, b.y);
        writeln!(
            out,
            r#"    <line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}"{marker}/>"#
        )?;
    }
    writeln!(out, "  </g>")?;
    writeln!(out, "</svg>")
}

/// Write `layout` to `path`.
///
/// # Errors
///
/// Returns an error naming `path` if it cannot be created or written.
pub fn save_svg(path: &Path, layout: &Layout, style: &SvgStyle) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_svg(&mut out, layout, style)
        .and_then(|()| out.flush())
        .with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), edges = layout.edges.len(), "wrote plot");
    Ok(())
}
