//! Read-only client for the Twitter REST API v1.1.
//!
//! Authenticates with OAuth 1.0a user credentials (consumer key/secret
//! plus access token/secret) and exposes the two calls the CLI needs:
//! verifying the account and searching by term or geocode.

mod client;
mod error;
pub mod oauth;
mod types;

pub use client::TwitterClient;
pub use error::ApiError;
pub use types::{Account, Geocode, Post, SearchQuery};
