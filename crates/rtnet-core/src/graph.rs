//! The retweet graph.
//!
//! ## Edge Direction
//!
//! An edge `A → B` means "A **was retweeted by** B": the row authored by
//! `B` whose text starts `RT @A:` produces it. Frequently-retweeted
//! handles therefore have a high out-degree.
//!
//! ## Upsert semantics
//!
//! Nodes are never deleted. Re-adding an existing pair overwrites the edge
//! payload instead of creating a parallel edge, and the retweeting author's
//! profile is overwritten on every row, so both follow last-write-wins.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeSet, HashMap};

use petgraph::Direction;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::model::{Author, AuthorProfile, Retweet};

// ---------------------------------------------------------------------------
// RetweetGraph
// ---------------------------------------------------------------------------

/// A directed retweet graph keyed by handle.
#[derive(Debug, Clone, Default)]
pub struct RetweetGraph {
    /// Directed graph: nodes = authors, edges = retweet relations.
    pub graph: DiGraph<Author, Retweet>,
    /// Mapping from handle to petgraph `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
}

impl RetweetGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index for `handle`, inserting a bare node if absent.
    pub fn ensure_node(&mut self, handle: &str) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(handle) {
            return idx;
        }
        let idx = self.graph.add_node(Author::bare(handle));
        self.node_map.insert(handle.to_string(), idx);
        idx
    }

    /// Record that `author` retweeted `source`.
    ///
    /// Inserts both endpoints as needed, overwrites `author`'s profile,
    /// and inserts or overwrites the `source → author` edge.
    pub fn add_retweet(
        &mut self,
        source: &str,
        author: &str,
        profile: &AuthorProfile,
        retweet: Retweet,
    ) -> EdgeIndex {
        let author_idx = self.ensure_node(author);
        self.graph[author_idx].apply_profile(profile);
        let source_idx = self.ensure_node(source);

        if let Some(edge) = self.graph.find_edge(source_idx, author_idx) {
            self.graph[edge] = retweet;
            edge
        } else {
            self.graph.add_edge(source_idx, author_idx, retweet)
        }
    }

    /// Return the number of handles in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of distinct retweet relations.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    #[must_use]
    pub fn index_of(&self, handle: &str) -> Option<NodeIndex> {
        self.node_map.get(handle).copied()
    }

    #[must_use]
    pub fn author(&self, handle: &str) -> Option<&Author> {
        self.index_of(handle).map(|idx| &self.graph[idx])
    }

    /// Handle stored at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not a node of this graph.
    #[must_use]
    pub fn handle(&self, idx: NodeIndex) -> &str {
        &self.graph[idx].handle
    }

    /// Payload of the `source → author` edge, if present.
    #[must_use]
    pub fn retweet(&self, source: &str, author: &str) -> Option<&Retweet> {
        let a = self.index_of(source)?;
        let b = self.index_of(author)?;
        self.graph.find_edge(a, b).map(|e| &self.graph[e])
    }

    /// Number of distinct handles the node retweeted.
    #[must_use]
    pub fn in_degree(&self, idx: NodeIndex) -> usize {
        self.graph.neighbors_directed(idx, Direction::Incoming).count()
    }

    /// Number of distinct handles that retweeted the node.
    #[must_use]
    pub fn out_degree(&self, idx: NodeIndex) -> usize {
        self.graph.neighbors_directed(idx, Direction::Outgoing).count()
    }

    /// Sorted handle set; convenient for order-independent comparisons.
    #[must_use]
    pub fn handles(&self) -> BTreeSet<String> {
        self.node_map.keys().cloned().collect()
    }

    /// Sorted `(source, author)` pairs.
    #[must_use]
    pub fn edge_pairs(&self) -> BTreeSet<(String, String)> {
        self.graph
            .edge_references()
            .map(|e| {
                (
                    self.handle(e.source()).to_string(),
                    self.handle(e.target()).to_string(),
                )
            })
            .collect()
    }

    /// Build the subgraph induced by `members`, keeping attributes.
    ///
    /// Indices in the result are renumbered; handles are preserved.
    #[must_use]
    pub fn induced_subgraph(&self, members: &[NodeIndex]) -> Self {
        let mut sub = Self::new();
        let mut remap: HashMap<NodeIndex, NodeIndex> = HashMap::with_capacity(members.len());

        for &idx in members {
            let author = self.graph[idx].clone();
            let handle = author.handle.clone();
            let new_idx = sub.graph.add_node(author);
            sub.node_map.insert(handle, new_idx);
            remap.insert(idx, new_idx);
        }

        for edge in self.graph.edge_references() {
            if let (Some(&a), Some(&b)) = (remap.get(&edge.source()), remap.get(&edge.target())) {
                sub.graph.add_edge(a, b, edge.weight().clone());
            }
        }

        sub
    }
}
