#![forbid(unsafe_code)]
//! rtnet-core library.
//!
//! Loads exported tweet spreadsheets and assembles the retweet graph that
//! every report in `rtnet-metrics` consumes.
//!
//! # Conventions
//!
//! - **Errors**: typed errors via `thiserror` ([`error::LoadError`],
//!   [`error::ConfigError`]); binaries wrap them in `anyhow`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod model;

pub use graph::RetweetGraph;
pub use model::{Author, Retweet};
