//! Spreadsheet ingestion: row filtering and graph assembly.
//!
//! # Overview
//!
//! Each input file is either a workbook (`.xlsx`, `.xls`, `.xlsb`, `.ods`;
//! the first worksheet is read) or a delimited export (CSV by default), with
//! one tweet per row. Both go through the same [`ColumnLayout`]. Only retweets contribute to the graph. A row qualifies when the
//! first whitespace-delimited token of its text contains `RT` and the second
//! token starts with `@`; the second token (minus one trailing `:` and the
//! leading `@`) names the retweeted handle. A bare `@` is kept as is.
//!
//! ```text
//! tweet = "RT @alice: hello"   author = "bob"   =>   alice → bob
//! tweet = "just tweeting"                       =>   (skipped)
//! ```
//!
//! Rows that do not qualify, or that lack a tweet or author cell, are
//! skipped and counted. Unreadable files and undecodable records abort the
//! whole load.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, open_workbook_auto};
use csv::{ByteRecord, StringRecord};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::ColumnsConfig;
use crate::error::{ConfigError, LoadError};
use crate::graph::RetweetGraph;
use crate::model::{AuthorProfile, Retweet};

// ---------------------------------------------------------------------------
// Row filter
// ---------------------------------------------------------------------------

/// Extract the retweeted handle from tweet text, if the text is a retweet.
///
/// Returns the mentioned handle: the second token without one trailing `:`
/// and without its leading `@`, unless nothing else is left, in which case
/// the handle is `@` itself. Text with fewer than two tokens is never a
/// retweet.
#[must_use]
pub fn parse_retweet_source(text: &str) -> Option<&str> {
    let mut tokens = text.split_whitespace();
    let first = tokens.next()?;
    let second = tokens.next()?;

    if !first.contains("RT") || !second.starts_with('@') {
        return None;
    }

    let mention = second.strip_suffix(':').unwrap_or(second);
    match mention.strip_prefix('@') {
        Some("") | None => Some(mention),
        Some(handle) => Some(handle),
    }
}

// ---------------------------------------------------------------------------
// Column layout
// ---------------------------------------------------------------------------

/// Resolved column offsets and reader options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub date: usize,
    pub tweet: usize,
    pub author: usize,
    pub name: usize,
    pub location: usize,
    pub influence: usize,
    pub gender: usize,
    pub delimiter: u8,
    pub has_header: bool,
}

impl ColumnLayout {
    /// Validate a [`ColumnsConfig`] into a layout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDelimiter`] for a bad delimiter.
    pub fn from_config(config: &ColumnsConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            date: config.date,
            tweet: config.tweet,
            author: config.author,
            name: config.name,
            location: config.location,
            influence: config.influence,
            gender: config.gender,
            delimiter: config.delimiter_byte()?,
            has_header: config.has_header,
        })
    }
}

impl Default for ColumnLayout {
    fn default() -> Self {
        // The default config always carries a valid single-byte delimiter.
        let c = ColumnsConfig::default();
        Self {
            date: c.date,
            tweet: c.tweet,
            author: c.author,
            name: c.name,
            location: c.location,
            influence: c.influence,
            gender: c.gender,
            delimiter: b',',
            has_header: c.has_header,
        }
    }
}

// ---------------------------------------------------------------------------
// Per-row ingestion
// ---------------------------------------------------------------------------

/// What happened to a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    /// The row was a retweet and updated the graph.
    Retweet,
    /// The tweet text is not a retweet.
    NotRetweet,
    /// The tweet or author cell is absent or blank.
    MissingField,
}

fn cell(record: &StringRecord, col: usize) -> Option<&str> {
    record.get(col).map(str::trim).filter(|s| !s.is_empty())
}

/// Apply one spreadsheet row to `graph`.
pub fn ingest_record(
    graph: &mut RetweetGraph,
    record: &StringRecord,
    layout: &ColumnLayout,
) -> RowOutcome {
    let Some(text) = record.get(layout.tweet).filter(|t| !t.trim().is_empty()) else {
        return RowOutcome::MissingField;
    };
    let Some(source) = parse_retweet_source(text) else {
        return RowOutcome::NotRetweet;
    };
    // Some exports prefix the author handle with `@`; mentions never keep it.
    let Some(author) = cell(record, layout.author)
        .map(|a| a.trim_start_matches('@'))
        .filter(|a| !a.is_empty())
    else {
        return RowOutcome::MissingField;
    };

    let profile = AuthorProfile {
        name: cell(record, layout.name).map(str::to_string),
        location: cell(record, layout.location).map(str::to_string),
        influence: cell(record, layout.influence).and_then(|s| s.parse::<f64>().ok()),
        gender: cell(record, layout.gender).map(str::to_string),
    };
    let retweet = Retweet {
        date: cell(record, layout.date).map(str::to_string),
        content: text.to_string(),
    };

    graph.add_retweet(source, author, &profile, retweet);
    RowOutcome::Retweet
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Row counts for one input file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub path: PathBuf,
    /// Data rows read (header excluded).
    pub rows: usize,
    /// Rows that produced or updated an edge.
    pub retweets: usize,
    /// Rows whose text was not a retweet.
    pub not_retweets: usize,
    /// Rows missing the tweet or author cell.
    pub missing_fields: usize,
}

impl FileSummary {
    fn record(&mut self, outcome: RowOutcome) {
        self.rows += 1;
        match outcome {
            RowOutcome::Retweet => self.retweets += 1,
            RowOutcome::NotRetweet => self.not_retweets += 1,
            RowOutcome::MissingField => self.missing_fields += 1,
        }
    }
}

/// Row counts across every input file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub files: Vec<FileSummary>,
}

impl LoadSummary {
    #[must_use]
    pub fn rows(&self) -> usize {
        self.files.iter().map(|f| f.rows).sum()
    }

    #[must_use]
    pub fn retweets(&self) -> usize {
        self.files.iter().map(|f| f.retweets).sum()
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.files
            .iter()
            .map(|f| f.not_retweets + f.missing_fields)
            .sum()
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Read every row from `reader` into `graph`.
///
/// `path` is only used to label errors and the summary.
///
/// # Errors
///
/// Returns [`LoadError::Record`] if the reader fails and
/// [`LoadError::Encoding`] for a record that is not valid UTF-8.
pub fn load_reader<R: Read>(
    graph: &mut RetweetGraph,
    reader: R,
    layout: &ColumnLayout,
    path: &Path,
) -> Result<FileSummary, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(layout.delimiter)
        .has_headers(layout.has_header)
        .flexible(true)
        .from_reader(reader);

    let mut summary = FileSummary {
        path: path.to_path_buf(),
        ..FileSummary::default()
    };

    let mut raw = ByteRecord::new();
    loop {
        let line_before = csv_reader.position().line();
        match csv_reader.read_byte_record(&mut raw) {
            Ok(true) => {
                let line = raw.position().map_or(line_before, csv::Position::line);
                let record = StringRecord::from_byte_record(raw.clone()).map_err(
                    |source| LoadError::Encoding {
                        path: path.to_path_buf(),
                        line,
                        source,
                    },
                )?;
                let outcome = ingest_record(graph, &record, layout);
                if outcome == RowOutcome::MissingField {
                    debug!(file = %path.display(), line, "skipping row without tweet or author");
                }
                summary.record(outcome);
            }
            Ok(false) => break,
            Err(source) => {
                let line = source.position().map_or(line_before, csv::Position::line);
                return Err(LoadError::Record {
                    path: path.to_path_buf(),
                    line,
                    source,
                });
            }
        }
    }

    Ok(summary)
}

// ---------------------------------------------------------------------------
// Workbooks
// ---------------------------------------------------------------------------

/// How an input file is decoded, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// CSV/TSV text read with the configured delimiter.
    Delimited,
    /// Spreadsheet workbook; the first worksheet is read.
    Workbook,
}

impl InputFormat {
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => Self::Workbook,
            _ => Self::Delimited,
        }
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Read the first worksheet of the workbook at `path` into `graph`.
///
/// The sheet's used range may not start at `A1`; cells are shifted back so
/// column offsets and the header row refer to absolute positions.
///
/// # Errors
///
/// Returns [`LoadError::Workbook`] if the file cannot be decoded and
/// [`LoadError::EmptyWorkbook`] if it has no worksheet.
pub fn load_workbook(
    graph: &mut RetweetGraph,
    path: &Path,
    layout: &ColumnLayout,
) -> Result<FileSummary, LoadError> {
    let workbook_error = |source: calamine::Error| LoadError::Workbook {
        path: path.to_path_buf(),
        source,
    };
    let mut workbook = open_workbook_auto(path).map_err(workbook_error)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::EmptyWorkbook {
            path: path.to_path_buf(),
        })?
        .map_err(workbook_error)?;

    let (first_row, first_col) = range.start().unwrap_or((0, 0));
    let mut summary = FileSummary {
        path: path.to_path_buf(),
        ..FileSummary::default()
    };

    for (offset, cells) in range.rows().enumerate() {
        let row = first_row as usize + offset;
        if layout.has_header && row == 0 {
            continue;
        }
        let fields: Vec<String> = std::iter::repeat_n(String::new(), first_col as usize)
            .chain(cells.iter().map(cell_text))
            .collect();
        let outcome = ingest_record(graph, &StringRecord::from(fields), layout);
        if outcome == RowOutcome::MissingField {
            debug!(file = %path.display(), line = row + 1, "skipping row without tweet or author");
        }
        summary.record(outcome);
    }

    Ok(summary)
}

/// Build one graph from every file in `paths`, in order.
///
/// # Errors
///
/// Returns [`LoadError::NoInput`] for an empty list, [`LoadError::Open`]
/// for a missing or unreadable file, and a decode error for the first bad
/// record or workbook. Nothing is returned on failure.
#[instrument(skip(paths, layout), fields(files = paths.len()))]
pub fn load_files(
    paths: &[PathBuf],
    layout: &ColumnLayout,
) -> Result<(RetweetGraph, LoadSummary), LoadError> {
    if paths.is_empty() {
        return Err(LoadError::NoInput);
    }

    let mut graph = RetweetGraph::new();
    let mut summary = LoadSummary::default();

    for path in paths {
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.clone(),
            source,
        })?;
        let file_summary = match InputFormat::from_path(path) {
            InputFormat::Delimited => load_reader(&mut graph, file, layout, path)?,
            InputFormat::Workbook => {
                drop(file);
                load_workbook(&mut graph, path, layout)?
            }
        };
        info!(
            file = %path.display(),
            rows = file_summary.rows,
            retweets = file_summary.retweets,
            "loaded export"
        );
        summary.files.push(file_summary);
    }

    info!(
        files = summary.files.len(),
        rows = summary.rows(),
        retweets = summary.retweets(),
        skipped = summary.skipped(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "retweet graph built"
    );
    Ok((graph, summary))
}
