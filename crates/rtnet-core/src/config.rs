//! `rtnet.toml` configuration.
//!
//! # Lookup order
//!
//! 1. An explicit `--config <PATH>` (must exist).
//! 2. `./rtnet.toml` in the working directory.
//! 3. `<config_dir>/rtnet/config.toml` (e.g. `~/.config/rtnet/config.toml`).
//! 4. Built-in defaults.
//!
//! API credentials may additionally be supplied through the environment
//! (`RTNET_CONSUMER_KEY`, `RTNET_CONSUMER_SECRET`, `RTNET_ACCESS_TOKEN`,
//! `RTNET_ACCESS_SECRET`), which take precedence over the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ConfigError;

pub const PROJECT_CONFIG_FILE: &str = "rtnet.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RtnetConfig {
    #[serde(default)]
    pub columns: ColumnsConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub plot: PlotConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

/// Zero-based column offsets of the spreadsheet export.
///
/// Defaults match the Crimson Hexagon export layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnsConfig {
    #[serde(default = "default_date_col")]
    pub date: usize,
    #[serde(default = "default_tweet_col")]
    pub tweet: usize,
    #[serde(default = "default_author_col")]
    pub author: usize,
    #[serde(default = "default_name_col")]
    pub name: usize,
    #[serde(default = "default_location_col")]
    pub location: usize,
    #[serde(default = "default_influence_col")]
    pub influence: usize,
    #[serde(default = "default_gender_col")]
    pub gender: usize,
    /// Field delimiter, a single ASCII character.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// Whether the first row of each file is a header to skip.
    #[serde(default = "default_true")]
    pub has_header: bool,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            date: default_date_col(),
            tweet: default_tweet_col(),
            author: default_author_col(),
            name: default_name_col(),
            location: default_location_col(),
            influence: default_influence_col(),
            gender: default_gender_col(),
            delimiter: default_delimiter(),
            has_header: default_true(),
        }
    }
}

impl ColumnsConfig {
    /// Return the delimiter as a byte.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDelimiter`] unless the configured value
    /// is exactly one ASCII character (`"\t"` is accepted as tab).
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        match self.delimiter.as_str() {
            "\\t" | "tab" => Ok(b'\t'),
            s if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
            other => Err(ConfigError::InvalidDelimiter(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Rows printed by each ranked report.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_damping")]
    pub damping: f64,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
    /// Scale betweenness by `1 / ((n-1)(n-2))`.
    #[serde(default = "default_true")]
    pub normalized_betweenness: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            damping: default_damping(),
            tolerance: default_tolerance(),
            max_iter: default_max_iter(),
            normalized_betweenness: default_true(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotConfig {
    #[serde(default = "default_layout_iterations")]
    pub iterations: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_edge_opacity")]
    pub edge_opacity: f64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            iterations: default_layout_iterations(),
            seed: default_seed(),
            width: default_width(),
            height: default_height(),
            edge_opacity: default_edge_opacity(),
        }
    }
}

/// OAuth 1.0a credentials and endpoint for the social API client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub consumer_key: Option<String>,
    #[serde(default)]
    pub consumer_secret: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub access_secret: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            consumer_key: None,
            consumer_secret: None,
            access_token: None,
            access_secret: None,
        }
    }
}

impl ApiConfig {
    /// Replace credentials with values from `lookup` where present.
    ///
    /// `lookup` is `std::env::var(..).ok()` in production; tests pass a map.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let slots: [(&str, &mut Option<String>); 4] = [
            ("RTNET_CONSUMER_KEY", &mut self.consumer_key),
            ("RTNET_CONSUMER_SECRET", &mut self.consumer_secret),
            ("RTNET_ACCESS_TOKEN", &mut self.access_token),
            ("RTNET_ACCESS_SECRET", &mut self.access_secret),
        ];
        for (var, slot) in slots {
            if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
                *slot = Some(value);
            }
        }
    }

    /// Names of credential fields that are still unset.
    #[must_use]
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        [
            ("consumer_key", &self.consumer_key),
            ("consumer_secret", &self.consumer_secret),
            ("access_token", &self.access_token),
            ("access_secret", &self.access_secret),
        ]
        .into_iter()
        .filter(|(_, v)| v.as_deref().is_none_or(str::is_empty))
        .map(|(name, _)| name)
        .collect()
    }
}

/// Load configuration following the lookup order in the module docs.
///
/// # Errors
///
/// Returns [`ConfigError`] if an explicit path is unreadable or any file
/// found fails to parse.
pub fn load_config(explicit: Option<&Path>, working_dir: &Path) -> Result<RtnetConfig, ConfigError> {
    let mut config = match resolve_config_path(explicit, working_dir) {
        Some(path) => read_config_file(&path)?,
        None => {
            debug!("no config file found, using defaults");
            RtnetConfig::default()
        }
    };
    config.api.apply_env(|var| std::env::var(var).ok());
    Ok(config)
}

/// Parse one config file.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
pub fn read_config_file(path: &Path) -> Result<RtnetConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = toml::from_str::<RtnetConfig>(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

fn resolve_config_path(explicit: Option<&Path>, working_dir: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let local = working_dir.join(PROJECT_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("rtnet/config.toml"))
        .filter(|path| path.exists())
}

const fn default_true() -> bool {
    true
}

const fn default_date_col() -> usize {
    1
}

const fn default_tweet_col() -> usize {
    3
}

const fn default_author_col() -> usize {
    4
}

const fn default_name_col() -> usize {
    5
}

const fn default_location_col() -> usize {
    6
}

const fn default_influence_col() -> usize {
    8
}

const fn default_gender_col() -> usize {
    12
}

fn default_delimiter() -> String {
    ",".to_string()
}

const fn default_top_n() -> usize {
    20
}

const fn default_damping() -> f64 {
    0.85
}

const fn default_tolerance() -> f64 {
    1e-6
}

const fn default_max_iter() -> usize {
    100
}

const fn default_layout_iterations() -> usize {
    300
}

const fn default_seed() -> u64 {
    42
}

const fn default_width() -> u32 {
    1200
}

const fn default_height() -> u32 {
    900
}

const fn default_edge_opacity() -> f64 {
    0.2
}

fn default_base_url() -> String {
    "https://api.twitter.com/1.1".to_string()
}
