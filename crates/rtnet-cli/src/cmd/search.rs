//! `rtnet search`: recent posts matching a term, a place, or both.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Args;
use rtnet_core::config::RtnetConfig;

use crate::output::{OutputMode, render};
use crate::twitter::{Geocode, Post, SearchQuery, TwitterClient};

/// Arguments for `rtnet search`.
#[derive(Args, Debug)]
#[command(group(clap::ArgGroup::new("query").required(true).multiple(true)))]
pub struct SearchArgs {
    /// Search term, e.g. a hashtag or handle.
    #[arg(long, group = "query")]
    pub term: Option<String>,

    /// Circle to search in, as LAT,LONG,RADIUS (radius in km or mi).
    #[arg(long, group = "query", value_name = "LAT,LONG,RADIUS", allow_hyphen_values = true)]
    pub geocode: Option<Geocode>,

    /// Number of posts to request.
    #[arg(long, default_value_t = 5)]
    pub count: u32,
}

impl SearchArgs {
    pub fn query(&self) -> SearchQuery {
        SearchQuery {
            term: self.term.clone(),
            geocode: self.geocode.clone(),
        }
    }
}

/// `@handle`, the text, then a blank line, per post.
pub fn write_posts_text(w: &mut dyn Write, posts: &[Post]) -> io::Result<()> {
    for post in posts {
        writeln!(w, "@{}", post.handle)?;
        writeln!(w, "{}", post.text)?;
        writeln!(w)?;
    }
    Ok(())
}

/// Run one search and print the hits in server order.
///
/// # Errors
///
/// Returns an error if credentials are missing or the request fails.
pub fn run_search(args: &SearchArgs, config: &RtnetConfig, output: OutputMode) -> Result<()> {
    let client = TwitterClient::from_config(&config.api)?;
    let query = args.query();
    let posts = client
        .search(&query, args.count)
        .context("searching posts")?;

    render(output, &posts, |p, w| write_posts_text(w, p))
}
