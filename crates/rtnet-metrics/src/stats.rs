//! Basic graph statistics printed ahead of the ranked reports.
//!
//! - **nodes** / **edges**: size of the full directed retweet graph.
//! - **component_nodes** / **component_edges**: size of the largest
//!   connected component of the undirected projection (see
//!   [`crate::components`]). Edge counts there are simple undirected edges.
//! - **density**: `edges / (nodes * (nodes - 1))` of the directed graph;
//!   0.0 for graphs with fewer than two nodes.

use rtnet_core::RetweetGraph;
use serde::Serialize;

use crate::components::{
    connected_components, strongly_connected_components, undirected_edge_count,
    undirected_projection,
};

/// Summary statistics for a retweet graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub component_nodes: usize,
    pub component_edges: usize,
    /// Number of connected components of the undirected projection.
    pub component_count: usize,
    /// Number of strongly connected components.
    pub scc_count: usize,
    pub density: f64,
}

impl GraphStats {
    #[must_use]
    pub fn from_graph(rg: &RetweetGraph) -> Self {
        let ug = undirected_projection(rg);
        let components = connected_components(rg);
        let (component_nodes, component_edges) = components
            .first()
            .map_or((0, 0), |cc| (cc.len(), undirected_edge_count(&ug, cc)));

        Self {
            nodes: rg.node_count(),
            edges: rg.edge_count(),
            component_nodes,
            component_edges,
            component_count: components.len(),
            scc_count: strongly_connected_components(rg).len(),
            density: compute_density(rg.node_count(), rg.edge_count()),
        }
    }

    /// Return `true` if the whole graph is one connected component.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.component_count <= 1
    }
}

#[allow(clippy::cast_precision_loss)]
fn compute_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0_f64;
    }
    let max_edges = (node_count * (node_count - 1)) as f64;
    edge_count as f64 / max_edges
}
