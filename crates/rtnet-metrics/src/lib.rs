#![forbid(unsafe_code)]
//! Graph metrics for rtnet retweet graphs.
//!
//! # Overview
//!
//! Every function takes a [`RetweetGraph`](rtnet_core::RetweetGraph) by
//! reference and answers one question about it:
//!
//! - **PageRank** (`pagerank`): which handles are sources of information
//!   that others pass along?
//! - **Betweenness centrality** (`betweenness`): which handles connect
//!   people who would otherwise not be connected?
//! - **Components** (`components`): how much of the conversation is
//!   two-way (largest SCC) versus broadcast?
//! - **Stats** (`stats`): node/edge counts for the whole graph and its
//!   largest connected component.
//! - **Layout** (`layout`): 2-D positions for plotting that component.
//!
//! # Conventions
//!
//! - **Logging**: Use `tracing` macros; heavy entry points carry `#[instrument]`.
//! - Ranked outputs break score ties by handle, ascending, so reports are
//!   stable across runs.

pub mod betweenness;
pub mod components;
pub mod layout;
pub mod pagerank;
pub mod stats;

use std::cmp::Ordering;

/// Order `(handle, score)` pairs by score descending, then handle ascending.
pub(crate) fn rank_order(a: (&str, f64), b: (&str, f64)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0))
}
