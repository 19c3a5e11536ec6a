//! Betweenness centrality via Brandes' algorithm.
//!
//! # Overview
//!
//! Betweenness centrality measures how often a handle lies on shortest
//! paths between other pairs of handles. High-betweenness handles are
//! "connectors" between people who might not otherwise be connected.
//!
//! # Algorithm
//!
//! Brandes (2001) for unweighted directed graphs:
//!
//! 1. For each source node `s`, run BFS to compute shortest-path counts
//!    and distances.
//! 2. Accumulate dependency scores in reverse BFS order (farthest nodes first).
//! 3. Sum the dependency scores across all source nodes.
//!
//! Complexity: O(V * E).
//!
//! # Normalization
//!
//! With `normalized = true` scores are divided by `(n-1)*(n-2)`, the number
//! of ordered pairs excluding the node itself, so values fall in `[0, 1]`.
//! Graphs with two or fewer nodes are left unscaled.

use std::collections::{HashMap, VecDeque};

use petgraph::{
    Direction,
    graph::NodeIndex,
    visit::{IntoNodeIdentifiers, NodeIndexable},
};
use rtnet_core::RetweetGraph;
use serde::Serialize;
use tracing::instrument;

use crate::rank_order;

/// Compute betweenness centrality for every handle.
///
/// Disconnected nodes and nodes with no shortest paths through them
/// receive a score of 0.0.
#[must_use]
#[instrument(skip(rg), fields(nodes = rg.node_count()))]
pub fn betweenness_centrality(rg: &RetweetGraph, normalized: bool) -> HashMap<String, f64> {
    let g = &rg.graph;
    let n = g.node_count();

    if n == 0 {
        return HashMap::new();
    }

    // Node-indexed betweenness accumulator.
    let mut cb: Vec<f64> = vec![0.0; n];

    for s in g.node_identifiers() {
        let si = g.to_index(s);

        // Stack: nodes in order of discovery (farthest popped first).
        let mut stack: Vec<NodeIndex> = Vec::with_capacity(n);

        // predecessors[w]: nodes immediately preceding w on shortest paths from s.
        let mut predecessors: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];

        // sigma[t]: number of shortest paths from s to t.
        let mut sigma: Vec<f64> = vec![0.0; n];
        sigma[si] = 1.0;

        // dist[t]: distance from s to t (-1 = unvisited).
        let mut dist: Vec<i64> = vec![-1; n];
        dist[si] = 0;

        let mut queue: VecDeque<NodeIndex> = VecDeque::new();
        queue.push_back(s);

        while let Some(v) = queue.pop_front() {
            let vi = g.to_index(v);
            stack.push(v);

            for w in g.neighbors_directed(v, Direction::Outgoing) {
                let wi = g.to_index(w);

                if dist[wi] < 0 {
                    dist[wi] = dist[vi] + 1;
                    queue.push_back(w);
                }

                if dist[wi] == dist[vi] + 1 {
                    sigma[wi] += sigma[vi];
                    predecessors[wi].push(v);
                }
            }
        }

        // Accumulate dependencies in reverse BFS order.
        let mut delta: Vec<f64> = vec![0.0; n];

        while let Some(w) = stack.pop() {
            let wi = g.to_index(w);

            for &v in &predecessors[wi] {
                let vi = g.to_index(v);
                if sigma[wi] > 0.0 {
                    delta[vi] += (sigma[vi] / sigma[wi]) * (1.0 + delta[wi]);
                }
            }

            if wi != si {
                cb[wi] += delta[wi];
            }
        }
    }

    let scale = if normalized { normalization(n) } else { 1.0 };

    g.node_identifiers()
        .map(|idx| (rg.handle(idx).to_string(), cb[g.to_index(idx)] * scale))
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn normalization(n: usize) -> f64 {
    if n <= 2 {
        return 1.0;
    }
    1.0 / ((n - 1) * (n - 2)) as f64
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// One row of the centrality report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CentralityRow {
    /// 1-based rank.
    pub rank: usize,
    pub handle: String,
    pub centrality: f64,
    /// Handles this one retweeted.
    pub in_degree: usize,
    /// Handles that retweeted this one.
    pub out_degree: usize,
}

/// Top `n` handles by betweenness, with their degrees.
///
/// `n` is clamped to the node count.
#[must_use]
pub fn top_centrality(rg: &RetweetGraph, n: usize, normalized: bool) -> Vec<CentralityRow> {
    let scores = betweenness_centrality(rg, normalized);

    let mut sorted: Vec<(&str, f64)> = scores.iter().map(|(h, &c)| (h.as_str(), c)).collect();
    sorted.sort_by(|a, b| rank_order(*a, *b));

    sorted
        .into_iter()
        .take(n)
        .enumerate()
        .filter_map(|(i, (handle, centrality))| {
            let idx = rg.index_of(handle)?;
            Some(CentralityRow {
                rank: i + 1,
                handle: handle.to_string(),
                centrality,
                in_degree: rg.in_degree(idx),
                out_degree: rg.out_degree(idx),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
