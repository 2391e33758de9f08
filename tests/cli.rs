mod common;

use std::fs;

use assert_cmd::Command;
use common::{TestWorkspace, fixture_path};
use predicates::str::contains;
use schema_standardizer::metadata::RunMetadata;
use serde_json::Value as JsonValue;

fn bin() -> Command {
    Command::cargo_bin("schema-standardizer").expect("binary exists")
}

fn path_str(path: &std::path::Path) -> &str {
    path.to_str().expect("utf-8 path")
}

#[test]
fn standardize_writes_csv_and_metadata() {
    let workspace = TestWorkspace::new();
    let input = fixture_path("google_ads_campaigns.csv");
    let output = workspace.join("ads.csv");
    let metadata = workspace.join("ads.meta.json");
    bin()
        .args([
            "standardize",
            "-i",
            path_str(&input),
            "-p",
            "google_ads",
            "-r",
            "campaigns",
            "-o",
            path_str(&output),
            "-m",
            path_str(&metadata),
        ])
        .assert()
        .success();

    let csv = fs::read_to_string(&output).expect("read output");
    let mut lines = csv.lines();
    let header = lines.next().expect("header line");
    assert!(header.starts_with("\"platform\",\"date\",\"account_id\",\"campaign_id\""));
    assert!(header.ends_with("\"ctr\",\"cpc\",\"cpa\",\"roas\""));
    assert_eq!(lines.count(), 4);

    let meta = RunMetadata::load(&metadata).expect("load metadata");
    assert_eq!(meta.asset, "google_ads_campaigns");
    assert_eq!(meta.rows_before, 4);
    assert_eq!(meta.rows_after, 4);
    assert_eq!(meta.resolved_fields["spend"], "cost_micros");
    assert_eq!(meta.sums["clicks"], 45.0);
    assert_eq!(meta.unique_counts["campaign_id"], 2);
}

#[test]
fn standardize_aggregates_into_json() {
    let workspace = TestWorkspace::new();
    let input = fixture_path("google_ads_campaigns.csv");
    let output = workspace.join("ads.json");
    bin()
        .args([
            "standardize",
            "-i",
            path_str(&input),
            "-p",
            "google_ads",
            "-r",
            "campaigns",
            "--aggregate",
            "-o",
            path_str(&output),
        ])
        .assert()
        .success();

    let records: Vec<JsonValue> =
        serde_json::from_str(&fs::read_to_string(&output).expect("read json")).expect("parse json");
    assert_eq!(records.len(), 3);
    let first = &records[0];
    assert_eq!(first["campaign_id"], "c1");
    assert_eq!(first["clicks"], 40);
    assert_eq!(first["spend"].as_f64(), Some(8.0));
    assert_eq!(first["ctr"].as_f64(), Some(4.0));
    assert_eq!(first["cpc"].as_f64(), Some(0.2));
}

#[test]
fn standardize_reads_config_file_and_named_inputs() {
    let workspace = TestWorkspace::new();
    let config = fixture_path("zendesk_config.yaml");
    let input = fixture_path("zendesk_tickets.json");
    let output = workspace.join("tickets.ndjson");
    let metadata = workspace.join("tickets.meta.json");
    bin()
        .args([
            "standardize",
            "-c",
            path_str(&config),
            "-i",
            &format!("tickets={}", path_str(&input)),
            "-o",
            path_str(&output),
            "-m",
            path_str(&metadata),
        ])
        .assert()
        .success();

    let text = fs::read_to_string(&output).expect("read ndjson");
    let rows = text
        .lines()
        .map(|line| serde_json::from_str::<JsonValue>(line).expect("parse line"))
        .collect::<Vec<_>>();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["ticket_id"], "101");
    assert_eq!(rows[0]["channel"], "email");
    assert_eq!(rows[0]["is_email"], "true");
    assert_eq!(rows[0]["resolution_time_hours"].as_f64(), Some(5.5));
    assert_eq!(rows[1]["is_email"], "false");
    assert!(rows[1]["resolution_time_hours"].is_null());

    let meta = RunMetadata::load(&metadata).expect("load metadata");
    assert_eq!(meta.asset, "support_tickets");
    assert_eq!(meta.group_name.as_deref(), Some("support"));
    assert_eq!(meta.rows_filtered, 1);
    assert!(meta.derived_fields.contains(&"is_email".to_string()));
}

#[test]
fn standardize_reports_missing_upstream() {
    let config = fixture_path("zendesk_config.yaml");
    let input = fixture_path("zendesk_tickets.json");
    bin()
        .args([
            "standardize",
            "-c",
            path_str(&config),
            "-i",
            &format!("other={}", path_str(&input)),
        ])
        .assert()
        .failure()
        .stderr(contains("upstream table 'tickets' was not provided"));
}

#[test]
fn standardize_rejects_unsupported_pairs() {
    let input = fixture_path("zendesk_tickets.json");
    bin()
        .args([
            "standardize",
            "-i",
            path_str(&input),
            "-p",
            "zendesk",
            "-r",
            "campaigns",
        ])
        .assert()
        .failure()
        .stderr(contains("does not support resource type 'campaigns'"));
}

#[test]
fn standardize_rejects_unknown_override_fields() {
    let input = fixture_path("google_ads_campaigns.csv");
    bin()
        .args([
            "standardize",
            "-i",
            path_str(&input),
            "-p",
            "google_ads",
            "-r",
            "campaigns",
            "--override",
            "budget=cost",
        ])
        .assert()
        .failure()
        .stderr(contains("unknown canonical field 'budget'"));
}

#[test]
fn standardize_streams_stdin_to_stdout_with_filters() {
    let csv = fs::read_to_string(fixture_path("google_ads_campaigns.csv")).expect("fixture");
    let assert = bin()
        .args([
            "standardize",
            "-i",
            "-",
            "-p",
            "google_ads",
            "-r",
            "campaigns",
            "--filter",
            "clicks >= 10",
            "--derive",
            "cost_per_conversion=spend / conversions",
        ])
        .write_stdin(csv)
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf-8 stdout");
    let lines = stdout.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("\"cost_per_conversion\""));
    assert!(lines[1].starts_with("\"google_ads\",\"2024-03-01\""));
    assert!(lines[1].ends_with("\"2\""));
}

#[test]
fn standardize_renders_a_table() {
    let input = fixture_path("google_ads_campaigns.csv");
    bin()
        .args([
            "standardize",
            "-i",
            path_str(&input),
            "-p",
            "google_ads",
            "-r",
            "campaigns",
            "--filter",
            "campaign_id = c2",
            "--table",
        ])
        .assert()
        .success()
        .stdout(contains("platform"))
        .stdout(contains("Brand"));
}

#[test]
fn mappings_lists_candidates_in_priority_order() {
    bin()
        .args(["mappings", "-p", "google_ads", "-r", "campaigns"])
        .assert()
        .success()
        .stdout(contains("cost_micros (micros) > metrics_cost_micros (micros)"))
        .stdout(contains("clicks / impressions * 100"));
}

#[test]
fn platforms_lists_supported_pairs() {
    bin()
        .arg("platforms")
        .assert()
        .success()
        .stdout(contains("freshdesk"))
        .stdout(contains("contacts, companies, deals"));
}
