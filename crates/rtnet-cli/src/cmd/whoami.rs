//! `rtnet whoami`: confirm the configured API credentials work.

use std::io::{self, Write};

use anyhow::{Context, Result};
use rtnet_core::config::RtnetConfig;

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use crate::twitter::{Account, TwitterClient};

pub fn write_account_text(w: &mut dyn Write, account: &Account) -> io::Result<()> {
    let or_blank = |v: &Option<String>| v.clone().unwrap_or_default();
    writeln!(w, "Name: {}", account.name)?;
    writeln!(w, "Screen name: {}", account.screen_name)?;
    writeln!(w, "Location: {}", or_blank(&account.location))?;
    writeln!(w, "Description: {}", or_blank(&account.description))?;
    writeln!(w, "Recent post: {}", or_blank(&account.recent_post))
}

fn write_account_pretty(w: &mut dyn Write, account: &Account) -> io::Result<()> {
    let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    pretty_section(w, &format!("@{}", account.screen_name))?;
    pretty_kv(w, "Name", &account.name)?;
    pretty_kv(w, "Location", or_dash(&account.location))?;
    pretty_kv(w, "Description", or_dash(&account.description))?;
    pretty_kv(w, "Recent post", or_dash(&account.recent_post))
}

/// Print the account the credentials belong to.
///
/// # Errors
///
/// Returns an error if credentials are missing or the request fails.
pub fn run_whoami(config: &RtnetConfig, output: OutputMode) -> Result<()> {
    let client = TwitterClient::from_config(&config.api)?;
    let account = client
        .verify_credentials()
        .context("verifying API credentials")?;

    render_mode(
        output,
        &account,
        |a, w| write_account_text(w, a),
        |a, w| write_account_pretty(w, a),
    )
}
