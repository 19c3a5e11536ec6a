//! Interactive full-screen plot on a braille canvas.
//!
//! Press `q` or `Esc` to close the view.

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::Color;
use ratatui::widgets::Block;
use ratatui::widgets::canvas::{Canvas, Line, Points};
use rtnet_metrics::layout::Layout;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

type Term = Terminal<CrosstermBackend<Stdout>>;

fn setup_terminal() -> Result<Term> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(io::stdout()))?)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Show `layout` until the user quits.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or drawn to. The
/// terminal is restored before returning either way.
pub fn show(layout: &Layout) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, layout);
    restore_terminal()?;
    result
}

fn run(terminal: &mut Term, layout: &Layout) -> Result<()> {
    let title = title(layout);
    loop {
        terminal.draw(|frame| {
            let canvas = Canvas::default()
                .block(Block::bordered().title(title.as_str()))
                .x_bounds([0.0, 1.0])
                .y_bounds([0.0, 1.0])
                .paint(|ctx| paint(ctx, layout));
            frame.render_widget(canvas, frame.area());
        })?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
                {
                    return Ok(());
                }
            }
        }
    }
}

fn title(layout: &Layout) -> String {
    format!(
        " rtnet | {} nodes, {} edges{} | q to quit ",
        layout.nodes.len(),
        layout.edges.len(),
        if layout.directed { ", directed" } else { "" }
    )
}

fn paint(ctx: &mut ratatui::widgets::canvas::Context<'_>, layout: &Layout) {
    for edge in &layout.edges {
        let (Some(a), Some(b)) = (layout.nodes.get(edge.from), layout.nodes.get(edge.to)) else {
            continue;
        };
        ctx.draw(&Line::new(a.x, a.y, b.x, b.y, Color::DarkGray));
    }

    // Braille cells cannot hold arrowheads; mark retweeters instead.
    if layout.directed {
        let heads: Vec<(f64, f64)> = layout
            .edges
            .iter()
            .filter_map(|e| layout.nodes.get(e.to))
            .map(|n| (n.x, n.y))
            .collect();
        ctx.layer();
        ctx.draw(&Points {
            coords: &heads,
            color: Color::Yellow,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtnet_metrics::layout::{PlacedEdge, PlacedNode};

    #[test]
    fn title_summarizes_layout() {
        let layout = Layout {
            nodes: vec![
                PlacedNode {
                    handle: "a".into(),
                    x: 0.0,
                    y: 0.0,
                },
                PlacedNode {
                    handle: "b".into(),
                    x: 1.0,
                    y: 1.0,
                },
            ],
            edges: vec![PlacedEdge { from: 0, to: 1 }],
            directed: true,
        };
        assert_eq!(title(&layout), " rtnet | 2 nodes, 1 edges, directed | q to quit ");
    }
}
