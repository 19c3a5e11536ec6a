//! PageRank over the retweet graph.
//!
//! # Overview
//!
//! Edges in a [`RetweetGraph`] point from the retweeted handle to the
//! retweeter. Ranking "who is worth listening to" needs influence to flow
//! the other way, so the report ranks the **inverted** graph: every edge
//! `A → B` is treated as `B → A`. [`Flow::Reversed`] does this without
//! materializing a second graph.
//!
//! # Algorithm
//!
//! Standard PageRank uses the iterative power method:
//!
//! ```text
//! PR(v) = (1 - d) / N + d * Σ PR(u) / out_degree(u)   for each u → v
//! ```
//!
//! where `d` is the damping factor (default 0.85). Dangling nodes spread
//! their rank uniformly over all nodes, so scores always sum to 1.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::visit::{IntoNodeIdentifiers, NodeIndexable};
use rtnet_core::RetweetGraph;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::rank_order;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for PageRank computation.
#[derive(Debug, Clone)]
pub struct PageRankConfig {
    /// Damping factor (probability of following a link vs teleporting).
    /// Default: 0.85.
    pub damping: f64,
    /// Convergence threshold: stop when L1 norm of rank delta < tolerance.
    /// Default: 1e-6.
    pub tolerance: f64,
    /// Maximum number of iterations.
    /// Default: 100.
    pub max_iter: usize,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            tolerance: 1e-6,
            max_iter: 100,
        }
    }
}

/// Which way rank travels along stored edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Rank moves `source → target` as stored.
    Forward,
    /// Rank moves `target → source` (the inverted graph).
    Reversed,
}

impl Flow {
    const fn out_direction(self) -> Direction {
        match self {
            Self::Forward => Direction::Outgoing,
            Self::Reversed => Direction::Incoming,
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Result of a PageRank computation.
#[derive(Debug, Clone)]
pub struct PageRankResult {
    /// PageRank scores: handle → score.
    pub scores: HashMap<String, f64>,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the algorithm converged within `max_iter`.
    pub converged: bool,
}

impl PageRankResult {
    /// Scores sorted descending, ties by handle.
    #[must_use]
    pub fn ranked(&self) -> Vec<RankedScore> {
        let mut rows: Vec<RankedScore> = self
            .scores
            .iter()
            .map(|(handle, &score)| RankedScore {
                handle: handle.clone(),
                score,
            })
            .collect();
        rows.sort_by(|a, b| rank_order((a.handle.as_str(), a.score), (b.handle.as_str(), b.score)));
        rows
    }
}

/// One row of a PageRank report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedScore {
    pub handle: String,
    pub score: f64,
}

// ---------------------------------------------------------------------------
// PageRank
// ---------------------------------------------------------------------------

/// Compute PageRank for every handle in `rg`.
#[must_use]
#[instrument(skip(rg, config), fields(nodes = rg.node_count()))]
#[allow(clippy::cast_precision_loss)]
pub fn pagerank(rg: &RetweetGraph, config: &PageRankConfig, flow: Flow) -> PageRankResult {
    let g = &rg.graph;
    let n = g.node_count();

    if n == 0 {
        return PageRankResult {
            scores: HashMap::new(),
            iterations: 0,
            converged: true,
        };
    }

    let dir = flow.out_direction();
    let n_f64 = n as f64;
    let base = (1.0 - config.damping) / n_f64;

    let out_degree: Vec<usize> = (0..n)
        .map(|i| g.neighbors_directed(g.from_index(i), dir).count())
        .collect();

    // Initialize ranks uniformly.
    let mut ranks = vec![1.0 / n_f64; n];
    let mut new_ranks = vec![0.0_f64; n];

    let mut iterations = 0;
    let mut converged = false;

    for _ in 0..config.max_iter {
        iterations += 1;

        let dangling: f64 = (0..n)
            .filter(|&i| out_degree[i] == 0)
            .map(|i| ranks[i])
            .sum();
        let teleport = config.damping.mul_add(dangling / n_f64, base);

        for r in &mut new_ranks {
            *r = teleport;
        }

        // Distribute rank from each node to its neighbors along `flow`.
        for node in g.node_identifiers() {
            let idx = g.to_index(node);
            if out_degree[idx] == 0 {
                continue;
            }
            let share = config.damping * ranks[idx] / out_degree[idx] as f64;
            for neighbor in g.neighbors_directed(node, dir) {
                new_ranks[g.to_index(neighbor)] += share;
            }
        }

        // Check convergence: L1 norm of delta.
        let delta: f64 = ranks
            .iter()
            .zip(new_ranks.iter())
            .map(|(old, new)| (old - new).abs())
            .sum();

        std::mem::swap(&mut ranks, &mut new_ranks);

        if delta < config.tolerance {
            converged = true;
            break;
        }
    }

    debug!(iterations, converged, "pagerank finished");

    let scores = g
        .node_identifiers()
        .map(|idx| (rg.handle(idx).to_string(), ranks[g.to_index(idx)]))
        .collect();

    PageRankResult {
        scores,
        iterations,
        converged,
    }
}

/// Top `n` handles by PageRank over the inverted graph.
///
/// `n` is clamped to the node count.
#[must_use]
pub fn top_pagerank(rg: &RetweetGraph, config: &PageRankConfig, n: usize) -> Vec<RankedScore> {
    let mut ranked = pagerank(rg, config, Flow::Reversed).ranked();
    ranked.truncate(n);
    ranked
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
