//! Force-directed layout of the largest connected component.
//!
//! # Algorithm
//!
//! Fruchterman & Reingold (1991) on the unit square:
//!
//! - ideal edge length `k = sqrt(1 / n)`;
//! - every pair repels with force `k² / d`;
//! - every edge attracts its endpoints with force `d² / k`;
//! - displacement per step is capped by a temperature that cools linearly
//!   from `0.1` to zero.
//!
//! Initial positions come from a seeded [`StdRng`], so the same graph and
//! seed always produce the same picture. Final positions are rescaled to
//! fill `[0, 1] × [0, 1]`.

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rtnet_core::RetweetGraph;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::components::{largest_connected_component, undirected_projection};

const MIN_DISTANCE: f64 = 0.01;
const INITIAL_TEMPERATURE: f64 = 0.1;

/// Configuration for the force-directed layout.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Simulation steps. Default: 300.
    pub iterations: usize,
    /// RNG seed for initial positions. Default: 42.
    pub seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 300,
            seed: 42,
        }
    }
}

/// A positioned handle; coordinates are in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedNode {
    pub handle: String,
    pub x: f64,
    pub y: f64,
}

/// An edge between two entries of [`Layout::nodes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlacedEdge {
    pub from: usize,
    pub to: usize,
}

/// Positions plus the edges to draw between them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    pub nodes: Vec<PlacedNode>,
    pub edges: Vec<PlacedEdge>,
    /// Whether `edges` keep retweet direction (`from` was retweeted by `to`).
    pub directed: bool,
}

impl Layout {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Lay out the largest connected component of `rg`.
///
/// Forces always use the undirected projection. With `directed = true`
/// the returned edges are the component's original retweet edges instead
/// of the collapsed undirected ones.
#[must_use]
#[instrument(skip(rg, config), fields(nodes = rg.node_count()))]
pub fn component_layout(rg: &RetweetGraph, config: &LayoutConfig, directed: bool) -> Layout {
    let Some(members) = largest_connected_component(rg) else {
        return Layout {
            directed,
            ..Layout::default()
        };
    };

    // Position slot for every member, by graph index.
    let mut slot = vec![usize::MAX; rg.node_count()];
    for (i, idx) in members.iter().enumerate() {
        slot[idx.index()] = i;
    }
    let in_component = |idx: NodeIndex| slot[idx.index()] != usize::MAX;

    let ug = undirected_projection(rg);
    let spring_edges: Vec<(usize, usize)> = ug
        .edge_references()
        .filter(|e| in_component(e.source()) && in_component(e.target()))
        .map(|e| (slot[e.source().index()], slot[e.target().index()]))
        .collect();

    let positions = fruchterman_reingold(members.len(), &spring_edges, config);

    let edges: Vec<PlacedEdge> = if directed {
        rg.graph
            .edge_references()
            .filter(|e| in_component(e.source()) && in_component(e.target()))
            .map(|e| PlacedEdge {
                from: slot[e.source().index()],
                to: slot[e.target().index()],
            })
            .collect()
    } else {
        spring_edges
            .iter()
            .map(|&(from, to)| PlacedEdge { from, to })
            .collect()
    };

    let nodes = members
        .iter()
        .zip(positions)
        .map(|(&idx, [x, y])| PlacedNode {
            handle: rg.handle(idx).to_string(),
            x,
            y,
        })
        .collect();

    Layout {
        nodes,
        edges,
        directed,
    }
}

/// Run the spring simulation on `n` nodes and return unit-square positions.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn fruchterman_reingold(
    n: usize,
    edges: &[(usize, usize)],
    config: &LayoutConfig,
) -> Vec<[f64; 2]> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![[0.5, 0.5]];
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut pos: Vec<[f64; 2]> = (0..n).map(|_| [rng.r#gen::<f64>(), rng.r#gen::<f64>()]).collect();
    let mut disp = vec![[0.0_f64; 2]; n];

    let k = (1.0 / n as f64).sqrt();
    let k2 = k * k;
    let steps = config.iterations.max(1);

    for step in 0..config.iterations {
        let temperature = INITIAL_TEMPERATURE * (1.0 - step as f64 / steps as f64);

        for d in &mut disp {
            *d = [0.0, 0.0];
        }

        // Repulsion between every pair.
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = pos[i][0] - pos[j][0];
                let dy = pos[i][1] - pos[j][1];
                let dist = dx.hypot(dy).max(MIN_DISTANCE);
                let force = k2 / dist;
                let (fx, fy) = (dx / dist * force, dy / dist * force);
                disp[i][0] += fx;
                disp[i][1] += fy;
                disp[j][0] -= fx;
                disp[j][1] -= fy;
            }
        }

        // Attraction along edges.
        for &(a, b) in edges {
            if a == b {
                continue;
            }
            let dx = pos[a][0] - pos[b][0];
            let dy = pos[a][1] - pos[b][1];
            let dist = dx.hypot(dy).max(MIN_DISTANCE);
            let force = dist * dist / k;
            let (fx, fy) = (dx / dist * force, dy / dist * force);
            disp[a][0] -= fx;
            disp[a][1] -= fy;
            disp[b][0] += fx;
            disp[b][1] += fy;
        }

        for (p, d) in pos.iter_mut().zip(&disp) {
            let len = d[0].hypot(d[1]);
            if len > 0.0 {
                let step_len = len.min(temperature);
                p[0] += d[0] / len * step_len;
                p[1] += d[1] / len * step_len;
            }
        }
    }

    debug!(nodes = n, edges = edges.len(), "layout converged");
    normalize(&mut pos);
    pos
}

/// Rescale positions to the unit square, centering degenerate axes.
fn normalize(pos: &mut [[f64; 2]]) {
    for axis in 0..2 {
        let min = pos.iter().map(|p| p[axis]).fold(f64::INFINITY, f64::min);
        let max = pos.iter().map(|p| p[axis]).fold(f64::NEG_INFINITY, f64::max);
        let span = max - min;
        for p in pos.iter_mut() {
            p[axis] = if span > f64::EPSILON {
                (p[axis] - min) / span
            } else {
                0.5
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtnet_core::model::{AuthorProfile, Retweet};

    fn make_graph(edges: &[(&str, &str)]) -> RetweetGraph {
        let mut rg = RetweetGraph::new();
        for (a, b) in edges {
            rg.add_retweet(a, b, &AuthorProfile::default(), Retweet::default());
        }
        rg
    }

    fn in_unit_square(layout: &Layout) -> bool {
        layout
            .nodes
            .iter()
            .all(|n| (0.0..=1.0).contains(&n.x) && (0.0..=1.0).contains(&n.y))
    }

    #[test]
    fn empty_graph_has_empty_layout() {
        let layout = component_layout(&RetweetGraph::new(), &LayoutConfig::default(), false);
        assert!(layout.is_empty());
        assert!(layout.edges.is_empty());
    }

    #[test]
    fn only_largest_component_is_placed() {
        let rg = make_graph(&[("a", "b"), ("b", "c"), ("c", "d"), ("x", "y")]);
        let layout = component_layout(&rg, &LayoutConfig::default(), false);

        let mut handles: Vec<&str> = layout.nodes.iter().map(|n| n.handle.as_str()).collect();
        handles.sort_unstable();
        assert_eq!(handles, ["a", "b", "c", "d"]);
        assert_eq!(layout.edges.len(), 3);
        assert!(in_unit_square(&layout));
    }

    #[test]
    fn directed_layout_keeps_both_directions() {
        let rg = make_graph(&[("a", "b"), ("b", "a"), ("b", "c")]);
        let undirected = component_layout(&rg, &LayoutConfig::default(), false);
        let directed = component_layout(&rg, &LayoutConfig::default(), true);

        assert_eq!(undirected.edges.len(), 2);
        assert_eq!(directed.edges.len(), 3);
        assert!(directed.directed);
        assert_eq!(undirected.nodes, directed.nodes);
    }

    #[test]
    fn same_seed_same_positions() {
        let rg = make_graph(&[("a", "b"), ("b", "c"), ("c", "a"), ("c", "d")]);
        let config = LayoutConfig {
            iterations: 50,
            seed: 7,
        };
        assert_eq!(
            component_layout(&rg, &config, false),
            component_layout(&rg, &config, false)
        );
    }

    #[test]
    fn single_node_is_centered() {
        let rg = make_graph(&[("solo", "solo")]);
        let layout = component_layout(&rg, &LayoutConfig::default(), false);
        assert_eq!(layout.nodes.len(), 1);
        assert!((layout.nodes[0].x - 0.5).abs() < f64::EPSILON);
        assert_eq!(layout.edges.len(), 1, "self-loop kept");
    }

    #[test]
    fn connected_nodes_end_closer_than_strangers() {
        // Two triangles joined by a single bridge c-d.
        let rg = make_graph(&[
            ("a", "b"),
            ("b", "c"),
            ("c", "a"),
            ("c", "d"),
            ("d", "e"),
            ("e", "f"),
            ("f", "d"),
        ]);
        let layout = component_layout(&rg, &LayoutConfig::default(), false);
        let at = |h: &str| {
            let n = layout.nodes.iter().find(|n| n.handle == h).unwrap();
            (n.x, n.y)
        };
        let dist = |p: (f64, f64), q: (f64, f64)| (p.0 - q.0).hypot(p.1 - q.1);

        assert!(dist(at("a"), at("b")) < dist(at("a"), at("f")));
    }
}
