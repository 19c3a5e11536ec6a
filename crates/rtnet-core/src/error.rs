//! Error types for ingestion and configuration.

use std::io;
use std::path::PathBuf;

/// Errors raised while reading tweet exports.
///
/// Any of these aborts the whole load: there is no partial-result policy.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// No input files were supplied.
    #[error("no input files given")]
    NoInput,

    /// The file could not be opened.
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The delimited reader failed on a record.
    #[error("malformed record in {} at line {line}: {source}", path.display())]
    Record {
        path: PathBuf,
        line: u64,
        #[source]
        source: csv::Error,
    },

    /// A record was read but is not valid UTF-8.
    #[error("invalid UTF-8 in {} at line {line}: {source}", path.display())]
    Encoding {
        path: PathBuf,
        line: u64,
        #[source]
        source: csv::FromUtf8Error,
    },

    /// The workbook could not be opened or its first sheet decoded.
    #[error("failed to read workbook {}: {source}", path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    /// The workbook has no worksheet to read.
    #[error("workbook {} has no worksheets", path.display())]
    EmptyWorkbook { path: PathBuf },
}

/// Errors raised while loading `rtnet.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The configured delimiter is not a single ASCII byte.
    #[error("delimiter must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(String),
}
