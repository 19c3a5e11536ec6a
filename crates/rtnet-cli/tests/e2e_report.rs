//! E2E tests for the analysis commands:
//! `rtnet report`, `rtnet pagerank`, `rtnet centrality`, `rtnet scc`, `rtnet plot`.
//!
//! Each test writes a small export into a temp dir and runs the binary
//! against it.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test harness helpers
// ---------------------------------------------------------------------------

fn rtnet_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rtnet"));
    cmd.current_dir(dir);
    cmd.env("RTNET_LOG", "error");
    cmd.env("XDG_CONFIG_HOME", dir);
    cmd.env("HOME", dir);
    cmd.env_remove("RTNET_FORMAT");
    cmd
}

const HEADER: &str = "id,date,type,tweet,author,name,location,url,influence,followers,following,posts,gender";

/// One export row in the default column layout.
fn row(id: usize, tweet: &str, author: &str) -> String {
    format!(
        "{id},2014-03-0{},post,\"{tweet}\",{author},{author} name,Tegucigalpa,,{},10,10,10,F",
        id % 9 + 1,
        id * 3
    )
}

/// A broadcaster retweeted by a small chatty cluster, plus one plain post.
fn newsroom_rows() -> Vec<String> {
    let retweets = [
        ("news", "ana"),
        ("news", "ben"),
        ("news", "cat"),
        ("news", "dan"),
        ("ana", "ben"),
        ("ben", "cat"),
        ("cat", "ana"),
        ("dan", "eve"),
    ];
    let mut rows: Vec<String> = retweets
        .iter()
        .enumerate()
        .map(|(i, (source, author))| row(i, &format!("RT @{source}: big story, read it"), author))
        .collect();
    rows.push(row(99, "just tweeting", "zed"));
    rows
}

fn write_export(dir: &Path, name: &str, rows: &[String]) -> PathBuf {
    let path = dir.join(name);
    let mut body = String::from(HEADER);
    body.push('\n');
    for r in rows {
        body.push_str(r);
        body.push('\n');
    }
    fs::write(&path, body).unwrap();
    path
}

fn newsroom(dir: &Path) -> PathBuf {
    write_export(dir, "newsroom.csv", &newsroom_rows())
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("rtnet should not crash");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON on stdout")
}

// ---------------------------------------------------------------------------
// rtnet report
// ---------------------------------------------------------------------------

#[test]
fn report_prints_all_sections_in_order() {
    let dir = TempDir::new().unwrap();
    let file = newsroom(dir.path());

    let output = rtnet_cmd(dir.path())
        .arg("report")
        .arg(&file)
        .arg("--no-plot")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert!(stdout.starts_with(
        "Nodes: 6\nEdges: 8\nConnected component nodes: 6\nConnected component edges: 8\n\n"
    ));
    let pr = stdout.find("Handle\tPageRank\nnews\t").expect("pagerank section");
    let bc = stdout
        .find("Rank\tHandle\tcentrality\tin_deg\tout_deg\n")
        .expect("centrality section");
    let scc = stdout
        .find("3 of 6 nodes in largest SCC\nHighest-PageRank nodes in SCC:\nHandle\tPageRank\n")
        .expect("scc section");
    assert!(pr < bc && bc < scc);
    assert!(!stdout.contains("zed"), "plain posts never enter the graph");
}

#[test]
fn report_json_has_every_section() {
    let dir = TempDir::new().unwrap();
    let file = newsroom(dir.path());

    let json = stdout_json(
        rtnet_cmd(dir.path())
            .args(["--format", "json", "report"])
            .arg(&file)
            .arg("--no-plot"),
    );

    assert_eq!(json["stats"]["nodes"], 6);
    assert_eq!(json["stats"]["edges"], 8);
    assert_eq!(json["pagerank"][0]["handle"], "news");
    assert_eq!(json["centrality"][0]["rank"], 1);
    assert_eq!(json["scc"]["scc_size"], 3);
    assert_eq!(json["scc"]["total_nodes"], 6);
    assert!(json.get("plot").is_none());
}

#[test]
fn report_writes_svg_when_asked() {
    let dir = TempDir::new().unwrap();
    let file = newsroom(dir.path());
    let svg = dir.path().join("network.svg");

    let json = stdout_json(
        rtnet_cmd(dir.path())
            .arg("--json")
            .arg("report")
            .arg(&file)
            .arg("--output")
            .arg(&svg),
    );
    assert_eq!(json["plot"]["nodes"], 6);
    assert_eq!(json["plot"]["edges"], 8);

    let body = fs::read_to_string(&svg).unwrap();
    assert!(body.starts_with("<svg"));
    assert_eq!(body.matches("<line").count(), 8);
}

#[test]
fn report_without_terminal_skips_interactive_plot() {
    let dir = TempDir::new().unwrap();
    let file = newsroom(dir.path());

    rtnet_cmd(dir.path())
        .arg("report")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("nodes in largest SCC"));
}

#[test]
fn files_merge_into_one_graph() {
    let dir = TempDir::new().unwrap();
    let rows = newsroom_rows();
    let (first, second) = rows.split_at(4);
    let a = write_export(dir.path(), "week1.csv", first);
    let b = write_export(dir.path(), "week2.csv", second);

    rtnet_cmd(dir.path())
        .arg("report")
        .args([&a, &b])
        .arg("--no-plot")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Nodes: 6\nEdges: 8\n"));
}

// ---------------------------------------------------------------------------
// Individual reports
// ---------------------------------------------------------------------------

#[test]
fn pagerank_top_clamps_rows() {
    let dir = TempDir::new().unwrap();
    let file = newsroom(dir.path());

    let output = rtnet_cmd(dir.path())
        .arg("pagerank")
        .arg(&file)
        .args(["--top", "2"])
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Handle\tPageRank");
    assert!(lines[1].starts_with("news\t"));
}

#[test]
fn pagerank_json_scores_sum_to_one() {
    let dir = TempDir::new().unwrap();
    let file = newsroom(dir.path());

    let json = stdout_json(rtnet_cmd(dir.path()).args(["pagerank", "--json"]).arg(&file));
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 6);
    let total: f64 = rows.iter().map(|r| r["score"].as_f64().unwrap()).sum();
    assert!((total - 1.0).abs() < 1e-6, "total = {total}");
}

#[test]
fn centrality_names_the_bridge() {
    let dir = TempDir::new().unwrap();
    let file = newsroom(dir.path());

    let json = stdout_json(rtnet_cmd(dir.path()).args(["centrality", "--json"]).arg(&file));
    let dan = json
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["handle"] == "dan")
        .expect("dan is ranked");
    assert!(dan["centrality"].as_f64().unwrap() > 0.0);
    assert_eq!(dan["in_degree"], 1);
    assert_eq!(dan["out_degree"], 1);
}

#[test]
fn scc_lists_only_members() {
    let dir = TempDir::new().unwrap();
    let file = newsroom(dir.path());

    let json = stdout_json(rtnet_cmd(dir.path()).args(["scc", "--json"]).arg(&file));
    let mut handles: Vec<&str> = json["top_pagerank"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["handle"].as_str().unwrap())
        .collect();
    handles.sort_unstable();
    assert_eq!(handles, ["ana", "ben", "cat"]);
}

#[test]
fn plot_directed_svg_has_arrows() {
    let dir = TempDir::new().unwrap();
    let file = newsroom(dir.path());
    let svg = dir.path().join("directed.svg");

    rtnet_cmd(dir.path())
        .arg("plot")
        .arg(&file)
        .arg("--directed")
        .arg("-o")
        .arg(&svg)
        .assert()
        .success()
        .stdout(predicate::str::contains("6 nodes, 8 edges"));

    let body = fs::read_to_string(&svg).unwrap();
    assert_eq!(body.matches(r#"marker-end="url(#arrow)""#).count(), 8);
}

#[test]
fn plot_json_prints_layout() {
    let dir = TempDir::new().unwrap();
    let file = newsroom(dir.path());

    let json = stdout_json(rtnet_cmd(dir.path()).args(["plot", "--json"]).arg(&file));
    let nodes = json["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 6);
    for n in nodes {
        let x = n["x"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&x));
    }
}

#[test]
fn plot_rejects_non_svg_output_name() {
    let dir = TempDir::new().unwrap();
    let file = newsroom(dir.path());
    let png = dir.path().join("graph.png");

    rtnet_cmd(dir.path())
        .arg("plot")
        .arg(&file)
        .arg("-o")
        .arg(&png)
        .assert()
        .failure()
        .stderr(predicate::str::contains(".svg"));
    assert!(!png.exists());

    rtnet_cmd(dir.path())
        .arg("report")
        .arg(&file)
        .arg("--output")
        .arg(&png)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());
    assert!(!png.exists());
}

#[test]
fn plot_without_terminal_or_output_fails() {
    let dir = TempDir::new().unwrap();
    let file = newsroom(dir.path());

    rtnet_cmd(dir.path())
        .arg("plot")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output"));
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn project_config_sets_default_top() {
    let dir = TempDir::new().unwrap();
    let file = newsroom(dir.path());
    fs::write(dir.path().join("rtnet.toml"), "[report]\ntop_n = 1\n").unwrap();

    rtnet_cmd(dir.path())
        .arg("pagerank")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::function(|s: &str| s.lines().count() == 2));
}

#[test]
fn tab_separated_exports_via_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("export.tsv");
    fs::write(
        &path,
        "date\ttweet\tauthor\nmon\tRT @alice: hello\tbob\ntue\tRT @bob: hi\talice\n",
    )
    .unwrap();
    let config = dir.path().join("tsv.toml");
    fs::write(
        &config,
        "[columns]\ndelimiter = \"tab\"\ndate = 0\ntweet = 1\nauthor = 2\n",
    )
    .unwrap();

    rtnet_cmd(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("scc")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("2 of 2 nodes in largest SCC\n"));
}

#[test]
fn broken_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let file = newsroom(dir.path());
    fs::write(dir.path().join("rtnet.toml"), "[report\ntop_n = ").unwrap();

    rtnet_cmd(dir.path())
        .arg("pagerank")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("rtnet.toml"));
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn missing_file_names_the_path() {
    let dir = TempDir::new().unwrap();
    let good = newsroom(dir.path());

    rtnet_cmd(dir.path())
        .arg("report")
        .arg(&good)
        .arg("missing.csv")
        .arg("--no-plot")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("missing.csv"))
        .stderr(predicate::str::contains("suggestion:"));
}

#[test]
fn json_errors_carry_a_code() {
    let dir = TempDir::new().unwrap();

    let output = rtnet_cmd(dir.path())
        .args(["--format", "json", "pagerank", "missing.csv"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let json: Value = serde_json::from_slice(&output.stderr).expect("JSON error on stderr");
    assert_eq!(json["error"]["error_code"], "input_unreadable");
}

#[test]
fn undecodable_record_fails_the_run() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.csv");
    let mut body = format!("{HEADER}\n").into_bytes();
    body.extend_from_slice(b"1,d,post,RT @a: \xff\xfe,b,n,l,,1,1,1,1,F\n");
    fs::write(&path, body).unwrap();

    rtnet_cmd(dir.path())
        .arg("pagerank")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken.csv"))
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn graph_summary_is_logged_once() {
    let dir = TempDir::new().unwrap();
    let file = newsroom(dir.path());

    let output = rtnet_cmd(dir.path())
        .env("RTNET_LOG", "info")
        .arg("pagerank")
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert_eq!(stderr.matches("retweet graph built").count(), 1, "{stderr}");
}

#[test]
fn completions_generate_for_bash() {
    let dir = TempDir::new().unwrap();
    rtnet_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rtnet"));
}
