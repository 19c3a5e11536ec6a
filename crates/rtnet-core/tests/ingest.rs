//! File-level ingestion tests: multi-file loads, failure modes, and
//! order-independence of the resulting node/edge sets.

use std::io::Write;
use std::path::PathBuf;

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

use rtnet_core::config::ColumnsConfig;
use rtnet_core::error::LoadError;
use rtnet_core::graph::RetweetGraph;
use rtnet_core::ingest::{ColumnLayout, ingest_record, load_files, parse_retweet_source};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const HEADER: &str = "GUID,Date,URL,Contents,Author,Name,Location,Country,Klout,Posts,Followers,Following,Gender";

fn export_line(date: &str, tweet: &str, author: &str, klout: &str, gender: &str) -> String {
    format!("1,{date},http://t.co/x,\"{tweet}\",{author},{author} name,Somewhere,HN,{klout},10,20,30,{gender}")
}

fn write_export(dir: &TempDir, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "{HEADER}").unwrap();
    for line in lines {
        writeln!(f, "{line}").unwrap();
    }
    path
}

// ---------------------------------------------------------------------------
// Multi-file loads
// ---------------------------------------------------------------------------

#[test]
fn two_files_merge_into_one_graph() {
    let dir = TempDir::new().unwrap();
    let a = write_export(
        &dir,
        "week1.csv",
        &[
            export_line("2014-06-01", "RT @alice: hello", "bob", "40", "male"),
            export_line("2014-06-01", "just tweeting", "carol", "10", "female"),
        ],
    );
    let b = write_export(
        &dir,
        "week2.csv",
        &[
            export_line("2014-06-08", "RT @alice: hello again", "bob", "44", "male"),
            export_line("2014-06-08", "RT @bob: thanks", "carol", "11", "female"),
        ],
    );

    let (graph, summary) = load_files(&[a, b], &ColumnLayout::default()).unwrap();

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(summary.rows(), 4);
    assert_eq!(summary.retweets(), 3);
    assert_eq!(summary.skipped(), 1);

    // Last-seen occurrence wins for both edge and node attributes.
    let edge = graph.retweet("alice", "bob").unwrap();
    assert_eq!(edge.content, "RT @alice: hello again");
    assert_eq!(edge.date.as_deref(), Some("2014-06-08"));
    assert_eq!(graph.author("bob").unwrap().influence, Some(44.0));
    assert_eq!(graph.author("carol").unwrap().gender.as_deref(), Some("female"));
}

#[test]
fn missing_file_fails_fast() {
    let dir = TempDir::new().unwrap();
    let good = write_export(
        &dir,
        "ok.csv",
        &[export_line("d", "RT @alice: x", "bob", "1", "")],
    );
    let missing = dir.path().join("missing.csv");

    let err = load_files(&[good, missing.clone()], &ColumnLayout::default()).unwrap_err();
    match err {
        LoadError::Open { path, .. } => assert_eq!(path, missing),
        other => panic!("expected open error, got {other}"),
    }
}

#[test]
fn unbalanced_quote_is_tolerated_or_reported_with_file() {
    // The csv reader treats an unterminated quote as running to EOF; either
    // way the load must not panic, and errors must name the file.
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.csv");
    std::fs::write(&path, format!("{HEADER}\n1,d,u,\"RT @alice: x,bob\n")).unwrap();

    match load_files(&[path.clone()], &ColumnLayout::default()) {
        Ok((graph, _)) => assert!(graph.edge_count() <= 1),
        Err(err) => assert!(err.to_string().contains("broken.csv")),
    }
}

#[test]
fn tab_separated_exports_load_with_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("export.tsv");
    std::fs::write(
        &path,
        "h0\th1\th2\th3\th4\n1\t2014-01-01\t\tRT @alice: tabbed, with commas\tbob\n",
    )
    .unwrap();

    let columns = ColumnsConfig {
        delimiter: "tab".into(),
        ..ColumnsConfig::default()
    };
    let layout = ColumnLayout::from_config(&columns).unwrap();
    let (graph, _) = load_files(&[path], &layout).unwrap();

    assert_eq!(
        graph.retweet("alice", "bob").unwrap().content,
        "RT @alice: tabbed, with commas"
    );
}

#[test]
fn headerless_exports_keep_first_row() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("noheader.csv");
    std::fs::write(&path, "1,d,,RT @alice: x,bob\n").unwrap();

    let columns = ColumnsConfig {
        has_header: false,
        ..ColumnsConfig::default()
    };
    let layout = ColumnLayout::from_config(&columns).unwrap();
    let (graph, summary) = load_files(&[path], &layout).unwrap();
    assert_eq!(summary.rows(), 1);
    assert_eq!(graph.edge_count(), 1);
}

// ---------------------------------------------------------------------------
// Workbooks
// ---------------------------------------------------------------------------

/// Write an `.xlsx` export. Column A (GUID) is left blank throughout, so the
/// sheet's used range starts at column B.
fn write_workbook(dir: &TempDir, name: &str, rows: &[(&str, &str, &str, f64)]) -> PathBuf {
    let path = dir.path().join(name);
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, title) in HEADER.split(',').enumerate().skip(1) {
        sheet
            .write_string(0, u16::try_from(col).unwrap(), title)
            .unwrap();
    }
    for (i, (date, tweet, author, klout)) in rows.iter().enumerate() {
        let r = u32::try_from(i + 1).unwrap();
        sheet.write_string(r, 1, *date).unwrap();
        sheet.write_string(r, 3, *tweet).unwrap();
        sheet.write_string(r, 4, *author).unwrap();
        sheet.write_string(r, 6, "Tegucigalpa").unwrap();
        sheet.write_number(r, 8, *klout).unwrap();
    }
    workbook.save(&path).unwrap();
    path
}

#[test]
fn xlsx_export_loads_first_sheet_with_same_columns() {
    let dir = TempDir::new().unwrap();
    let path = write_workbook(
        &dir,
        "june.xlsx",
        &[
            ("2014-06-01", "RT @alice: hello", "bob", 40.0),
            ("2014-06-01", "just tweeting", "carol", 10.0),
            ("2014-06-02", "RT @bob: thanks", "carol", 12.5),
        ],
    );

    let (graph, summary) = load_files(&[path], &ColumnLayout::default()).unwrap();

    assert_eq!(summary.rows(), 3, "header row skipped");
    assert_eq!(summary.retweets(), 2);
    assert_eq!(graph.node_count(), 3);
    let edge = graph.retweet("alice", "bob").unwrap();
    assert_eq!(edge.content, "RT @alice: hello");
    assert_eq!(edge.date.as_deref(), Some("2014-06-01"));
    let bob = graph.author("bob").unwrap();
    assert_eq!(bob.influence, Some(40.0));
    assert_eq!(bob.location.as_deref(), Some("Tegucigalpa"));
    assert_eq!(graph.author("carol").unwrap().influence, Some(12.5));
}

#[test]
fn workbook_and_csv_exports_merge() {
    let dir = TempDir::new().unwrap();
    let xlsx = write_workbook(&dir, "a.xlsx", &[("d", "RT @alice: hi", "bob", 1.0)]);
    let csv = write_export(
        &dir,
        "b.csv",
        &[export_line("d", "RT @bob: yo", "carol", "2", "")],
    );

    let (graph, _) = load_files(&[xlsx, csv], &ColumnLayout::default()).unwrap();
    assert_eq!(graph.edge_count(), 2);
    assert!(graph.retweet("bob", "carol").is_some());
}

#[test]
fn corrupt_workbook_is_a_load_error_naming_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("export.xlsx");
    std::fs::write(&path, "GUID,Date\n1,2014-06-01\n").unwrap();

    let err = load_files(&[path.clone()], &ColumnLayout::default()).unwrap_err();
    match &err {
        LoadError::Workbook { path: p, .. } => assert_eq!(p, &path),
        other => panic!("expected workbook error, got {other}"),
    }
    assert!(err.to_string().contains("export.xlsx"));
}

#[test]
fn missing_workbook_is_an_open_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("gone.xlsx");
    assert!(matches!(
        load_files(&[missing], &ColumnLayout::default()),
        Err(LoadError::Open { .. })
    ));
}

// ---------------------------------------------------------------------------
// Filter rule
// ---------------------------------------------------------------------------

/// The qualifying rule, stated directly on the tokens.
fn qualifies(first: &str, second: &str) -> bool {
    first.contains("RT") && second.starts_with('@')
}

#[test]
fn filter_truth_table() {
    let cases = [
        ("RT @alice: hello", true),
        ("RT @alice hello", true),
        ("RT @: hi", true),
        ("RT @", true),
        ("MRT @alice: modified", true),
        ("\"RT @alice: quoted", true),
        ("rt @alice: lowercase", false),
        ("RT alice: no at", false),
        ("just tweeting", false),
        ("RT", false),
        ("", false),
    ];
    for (text, expected) in cases {
        let graph = build(&[(text.to_string(), "zed".to_string())]);
        assert_eq!(graph.edge_count(), usize::from(expected), "{text:?}");
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn handle() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["alice", "bob", "carol", "dave", "erin", "frank"])
        .prop_map(str::to_string)
}

fn tweet() -> impl Strategy<Value = String> {
    prop_oneof![
        handle().prop_map(|h| format!("RT @{h}: news")),
        handle().prop_map(|h| format!("RT @{h} no colon")),
        Just("just tweeting".to_string()),
        Just("RT".to_string()),
        Just(String::new()),
    ]
}

fn build(rows: &[(String, String)]) -> RetweetGraph {
    let layout = ColumnLayout::default();
    let mut graph = RetweetGraph::new();
    for (text, author) in rows {
        let record = csv::StringRecord::from(vec!["", "date", "", text.as_str(), author.as_str()]);
        ingest_record(&mut graph, &record, &layout);
    }
    graph
}

proptest! {
    #[test]
    fn node_and_edge_sets_ignore_row_order(
        rows in prop::collection::vec((tweet(), handle()), 0..40),
        seed in any::<u64>(),
    ) {
        let forward = build(&rows);

        let mut shuffled = rows.clone();
        shuffled.shuffle(&mut StdRng::seed_from_u64(seed));
        let permuted = build(&shuffled);

        prop_assert_eq!(forward.handles(), permuted.handles());
        prop_assert_eq!(forward.edge_pairs(), permuted.edge_pairs());
    }

    #[test]
    fn edge_exists_iff_row_is_retweet(text in tweet(), author in handle()) {
        let graph = build(&[(text.clone(), author.clone())]);
        match parse_retweet_source(&text) {
            Some(source) => {
                prop_assert!(graph.retweet(source, &author).is_some());
                prop_assert_eq!(graph.edge_count(), 1);
            }
            None => prop_assert!(graph.is_empty()),
        }
    }

    #[test]
    fn edge_iff_tokens_qualify(
        first in prop::sample::select(vec!["RT", "MRT", "\"RT", "rt", "RT:", "hello", "@RT"]),
        second in prop::sample::select(vec!["@alice", "@alice:", "@", "@:", "alice", "@bob::", ":@x", "RT"]),
        rest in prop::sample::select(vec!["", "news", "a b c"]),
    ) {
        let text = format!("{first} {second} {rest}");
        let graph = build(&[(text, "zed".to_string())]);
        prop_assert_eq!(graph.edge_count(), usize::from(qualifies(first, second)));
    }

    #[test]
    fn filter_never_panics(text in ".*") {
        let _ = parse_retweet_source(&text);
    }
}
