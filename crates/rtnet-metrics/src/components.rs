//! Strongly connected components and the undirected projection.
//!
//! # Strongly connected components
//!
//! In a directed graph, a set of handles is strongly connected if any one
//! of them can reach any other. A large SCC indicates a conversation where
//! everyone gives and receives information; a small one indicates a
//! conversation dominated by broadcasting.
//!
//! # Undirected projection
//!
//! For connectivity and plotting the retweet graph is projected onto a
//! simple undirected graph: `A → B` and `B → A` collapse into one edge,
//! self-loops are kept. Node indices of the projection match the
//! directed graph's.
//!
//! # Tie-breaking
//!
//! When several components share the largest size, the one containing the
//! lexicographically smallest handle wins.

#![allow(clippy::module_name_repetitions)]

use petgraph::algo::tarjan_scc;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use petgraph::visit::{EdgeRef, NodeIndexable};
use rtnet_core::RetweetGraph;
use serde::Serialize;
use tracing::instrument;

use crate::pagerank::{PageRankConfig, RankedScore, top_pagerank};

// ---------------------------------------------------------------------------
// Component selection
// ---------------------------------------------------------------------------

fn smallest_handle<'a>(rg: &'a RetweetGraph, members: &[NodeIndex]) -> Option<&'a str> {
    members.iter().map(|&idx| rg.handle(idx)).min()
}

/// Sort components by size descending, ties by smallest member handle.
fn sort_components(rg: &RetweetGraph, components: &mut [Vec<NodeIndex>]) {
    components.sort_by(|a, b| {
        b.len()
            .cmp(&a.len())
            .then_with(|| smallest_handle(rg, a).cmp(&smallest_handle(rg, b)))
    });
}

/// All strongly connected components, largest first.
#[must_use]
#[instrument(skip(rg), fields(nodes = rg.node_count()))]
pub fn strongly_connected_components(rg: &RetweetGraph) -> Vec<Vec<NodeIndex>> {
    let mut sccs = tarjan_scc(&rg.graph);
    sort_components(rg, &mut sccs);
    sccs
}

/// The largest strongly connected component, or `None` for an empty graph.
#[must_use]
pub fn largest_scc(rg: &RetweetGraph) -> Option<Vec<NodeIndex>> {
    strongly_connected_components(rg).into_iter().next()
}

// ---------------------------------------------------------------------------
// Undirected projection
// ---------------------------------------------------------------------------

/// Project `rg` onto a simple undirected graph of handles.
#[must_use]
pub fn undirected_projection(rg: &RetweetGraph) -> UnGraph<String, ()> {
    let g = &rg.graph;
    let mut ug = UnGraph::<String, ()>::with_capacity(g.node_count(), g.edge_count());

    for idx in g.node_indices() {
        ug.add_node(rg.handle(idx).to_string());
    }

    for edge in g.edge_references() {
        let (a, b) = (edge.source(), edge.target());
        if !ug.contains_edge(a, b) {
            ug.add_edge(a, b, ());
        }
    }

    ug
}

/// Connected components of the undirected projection, largest first.
#[must_use]
pub fn connected_components(rg: &RetweetGraph) -> Vec<Vec<NodeIndex>> {
    let g = &rg.graph;
    let mut uf = UnionFind::<usize>::new(g.node_count());

    for edge in g.edge_references() {
        uf.union(g.to_index(edge.source()), g.to_index(edge.target()));
    }

    let mut by_root: std::collections::HashMap<usize, Vec<NodeIndex>> =
        std::collections::HashMap::new();
    for idx in g.node_indices() {
        by_root.entry(uf.find(idx.index())).or_default().push(idx);
    }

    let mut components: Vec<Vec<NodeIndex>> = by_root.into_values().collect();
    sort_components(rg, &mut components);
    components
}

/// The largest connected component of the undirected projection.
#[must_use]
pub fn largest_connected_component(rg: &RetweetGraph) -> Option<Vec<NodeIndex>> {
    connected_components(rg).into_iter().next()
}

/// Number of undirected simple edges among `members`.
#[must_use]
pub fn undirected_edge_count(ug: &UnGraph<String, ()>, members: &[NodeIndex]) -> usize {
    let mut inside = vec![false; ug.node_count()];
    for idx in members {
        inside[idx.index()] = true;
    }
    ug.edge_references()
        .filter(|e| inside[e.source().index()] && inside[e.target().index()])
        .count()
}

// ---------------------------------------------------------------------------
// SCC report
// ---------------------------------------------------------------------------

/// Largest-SCC summary with PageRank restricted to that component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SccReport {
    /// Nodes in the largest SCC.
    pub scc_size: usize,
    /// Nodes in the whole graph.
    pub total_nodes: usize,
    /// Total number of SCCs.
    pub scc_count: usize,
    /// Top handles by PageRank over the SCC's induced subgraph.
    pub top_pagerank: Vec<RankedScore>,
}

/// Build the SCC report; `n` bounds the PageRank listing.
#[must_use]
pub fn scc_report(rg: &RetweetGraph, config: &PageRankConfig, n: usize) -> SccReport {
    let sccs = strongly_connected_components(rg);
    let scc_count = sccs.len();

    let Some(largest) = sccs.into_iter().next() else {
        return SccReport {
            scc_size: 0,
            total_nodes: 0,
            scc_count: 0,
            top_pagerank: Vec::new(),
        };
    };

    let sub = rg.induced_subgraph(&largest);
    SccReport {
        scc_size: largest.len(),
        total_nodes: rg.node_count(),
        scc_count,
        top_pagerank: top_pagerank(&sub, config, n),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
