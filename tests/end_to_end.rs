// End-to-end: CSV files in, annotated CSV / HTML / summary out

use pretty_assertions::assert_eq;
use presence_check::{run_check, CheckConfig, MatchMode, MatchRule, Table};
use std::fs;
use std::path::Path;

const RECORDS_CSV: &str = "\
Ticket,MRS Long Text
T-1,\"Contact John Smith at 12345\"
T-2,no relevant content here
T-3,\"reach me at foo@bar.com\"
T-4,
T-5,\"escalated to
smith, john (ref 11234)\"
T-6,ticket 99999 closed
";

const ROSTER_CSV: &str = "\
NOKIA ID,Email Address,NameFirstLast,NameLastFirst
12345,x@y.com,John Smith,Smith John
999,jane@corp.com,Jane Doe,Doe Jane
";

fn write_inputs(dir: &Path) -> CheckConfig {
    let records = dir.join("records.csv");
    let roster = dir.join("roster.csv");
    fs::write(&records, RECORDS_CSV).unwrap();
    fs::write(&roster, ROSTER_CSV).unwrap();

    CheckConfig {
        records_path: Some(records),
        roster_path: Some(roster),
        output_path: dir.join("out.csv"),
        html_path: Some(dir.join("out.html")),
        summary_path: Some(dir.join("summary.json")),
        ..Default::default()
    }
}

fn presence_column(path: &Path) -> Vec<String> {
    let table = Table::from_path(path).unwrap();
    let col = table.column_index("Presence").unwrap();
    (0..table.len())
        .map(|row| table.cell(row, col).unwrap_or("").to_string())
        .collect()
}

#[test]
fn test_legacy_mode_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_inputs(dir.path());

    let (inputs, stats) = run_check(&config).unwrap();

    // T-3: any email; T-6: a 5 digit number like the first id
    assert_eq!(
        presence_column(&config.output_path),
        vec!["Yes", "No", "Yes", "No", "Yes", "Yes"]
    );
    assert_eq!(stats.total, 6);
    assert_eq!(stats.matched, 4);
    assert_eq!(
        inputs.records[2].outcome().map(|o| o.rule),
        Some(MatchRule::EmailPresent)
    );
    assert_eq!(
        inputs.records[5].outcome().map(|o| o.rule),
        Some(MatchRule::NumberLength)
    );
}

#[test]
fn test_strict_mode_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = write_inputs(dir.path());
    config.mode = MatchMode::Strict;

    let (inputs, stats) = run_check(&config).unwrap();

    assert_eq!(
        presence_column(&config.output_path),
        vec!["Yes", "No", "No", "No", "Yes", "No"]
    );
    assert_eq!(stats.matched, 2);
    assert_eq!(
        inputs.records[4].outcome().map(|o| o.rule),
        Some(MatchRule::NameLastFirst)
    );
}

#[test]
fn test_output_keeps_original_columns() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_inputs(dir.path());

    run_check(&config).unwrap();
    let out = Table::from_path(&config.output_path).unwrap();

    assert_eq!(out.headers(), &["Ticket", "MRS Long Text", "Presence"]);
    assert_eq!(out.cell(0, 0), Some("T-1"));
    assert_eq!(out.cell(3, 1), None);
    assert_eq!(out.cell(4, 1), Some("escalated to\nsmith, john (ref 11234)"));
}

#[test]
fn test_html_and_summary_written() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_inputs(dir.path());

    run_check(&config).unwrap();

    let html = fs::read_to_string(config.html_path.as_ref().unwrap()).unwrap();
    assert!(html.contains("background-color: #90EE90"));
    assert!(html.contains("background-color: #FF9999"));
    assert!(html.contains("font-weight: bold"));

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(config.summary_path.as_ref().unwrap()).unwrap())
            .unwrap();
    assert_eq!(summary["identities"], 2);
    assert_eq!(summary["stats"]["total"], 6);
}

#[test]
fn test_missing_column_fails_before_matching() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = write_inputs(dir.path());
    config.columns.text = "Long Text".to_string();

    let err = run_check(&config).unwrap_err();

    assert!(format!("{:#}", err).contains("Long Text"));
    assert!(!config.output_path.exists());
}
