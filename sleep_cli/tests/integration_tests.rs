//! Integration tests for the sleepq binary.
//!
//! These tests verify end-to-end behavior including:
//! - Logging entries to the CSV store
//! - Input validation before scoring
//! - Text and JSON reports over the stored history

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("sleepq"))
}

/// `log` invocation for a night; the defaults score 6.0 with refined weights
fn log_cmd(data_dir: &Path, timestamp: &str, overrides: &[(&str, &str)]) -> Command {
    let mut args = vec![
        ("--name", "Jordan"),
        ("--age", "27"),
        ("--heart-rate", "65"),
        ("--activity-level", "2500"),
        ("--sleep-duration", "7"),
        ("--room-temp", "20"),
        ("--caffeine", "0"),
        ("--alcohol", "0"),
        ("--screen-time", "0"),
        ("--timestamp", timestamp),
    ];
    for &(flag, value) in overrides {
        match args.iter().position(|(f, _)| *f == flag) {
            Some(idx) => args[idx].1 = value,
            None => args.push((flag, value)),
        }
    }

    let mut cmd = cli();
    cmd.arg("log").arg("--data-dir").arg(data_dir);
    for (flag, value) in args {
        cmd.arg(flag).arg(value);
    }
    cmd
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Sleep quality tracker with trend reports",
        ));
}

#[test]
fn test_log_saves_entry_with_score() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    log_cmd(data_dir, "2024-06-01T07:00:00Z", &[])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Entry saved! Your sleep quality: 6.0/10",
        ));

    let csv_content =
        fs::read_to_string(data_dir.join("sleep_data.csv")).expect("Failed to read CSV");
    let lines: Vec<&str> = csv_content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("timestamp,name,age,heart_rate"));
    assert!(lines[1].starts_with("2024-06-01T07:00:00+00:00,Jordan,27,65,2500"));
    assert!(lines[1].ends_with(",6.0") || lines[1].ends_with(",6"));
}

#[test]
fn test_invalid_input_is_rejected_before_saving() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    let output = log_cmd(data_dir, "2024-06-01T07:00:00Z", &[("--heart-rate", "250")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input"))
        .stderr(predicate::str::contains("heart rate"))
        .get_output()
        .stderr
        .clone();

    // Reported once, not echoed again as a debug dump
    let stderr = String::from_utf8_lossy(&output);
    assert_eq!(stderr.matches("heart rate").count(), 1);
    assert!(!stderr.contains("InvalidInput"));

    assert!(!data_dir.join("sleep_data.csv").exists());
}

#[test]
fn test_log_requires_every_field() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    for missing in ["--caffeine", "--alcohol", "--screen-time"] {
        let mut cmd = cli();
        cmd.arg("log").arg("--data-dir").arg(data_dir);
        for (flag, value) in [
            ("--name", "Jordan"),
            ("--age", "27"),
            ("--heart-rate", "65"),
            ("--activity-level", "2500"),
            ("--sleep-duration", "7"),
            ("--room-temp", "20"),
            ("--caffeine", "0"),
            ("--alcohol", "0"),
            ("--screen-time", "0"),
        ] {
            if flag != missing {
                cmd.arg(flag).arg(value);
            }
        }

        cmd.assert()
            .failure()
            .stderr(predicate::str::contains(missing));
    }

    assert!(!data_dir.join("sleep_data.csv").exists());
}

#[test]
fn test_dry_run_does_not_save() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    log_cmd(data_dir, "2024-06-01T07:00:00Z", &[])
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Your sleep quality: 6.0/10"))
        .stdout(predicate::str::contains("Dry run"));

    assert!(!data_dir.join("sleep_data.csv").exists());
}

#[test]
fn test_legacy_estimator_flag() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    let night = |estimator: &str| {
        let mut cmd = log_cmd(
            data_dir,
            "2024-06-01T07:00:00Z",
            &[
                ("--sleep-duration", "8"),
                ("--heart-rate", "66"),
                ("--screen-time", "1"),
                ("--caffeine", "1"),
                ("--activity-level", "5000"),
                ("--estimator", estimator),
            ],
        );
        cmd.arg("--dry-run");
        cmd
    };

    night("refined")
        .assert()
        .success()
        .stdout(predicate::str::contains("6.9/10"));
    night("legacy")
        .assert()
        .success()
        .stdout(predicate::str::contains("7.7/10"));
}

#[test]
fn test_unknown_estimator_is_rejected() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    log_cmd(data_dir, "2024-06-01T07:00:00Z", &[("--estimator", "v9")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown estimator"));

    assert!(!data_dir.join("sleep_data.csv").exists());
}

#[test]
fn test_report_needs_two_nights() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli()
        .arg("report")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Not enough data yet: 0 night(s)"));

    log_cmd(data_dir, "2024-06-01T07:00:00Z", &[]).assert().success();

    cli()
        .arg("report")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Not enough data yet: 1 night(s)"));
}

#[test]
fn test_text_report() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    log_cmd(data_dir, "2024-06-01T07:00:00Z", &[]).assert().success();
    log_cmd(
        data_dir,
        "2024-06-02T07:00:00Z",
        &[("--caffeine", "4"), ("--screen-time", "3")],
    )
    .assert()
    .success();

    cli()
        .arg("report")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("SLEEP REPORT"))
        .stdout(predicate::str::contains("Nights logged:    2"))
        .stdout(predicate::str::contains("Declining"))
        .stdout(predicate::str::contains("Screen Time: You had 3.0 hours"))
        .stdout(predicate::str::contains("Caffeine: You had 4 servings"))
        .stdout(predicate::str::contains("Physical Activity: You logged 2500 steps"));
}

#[test]
fn test_json_report_series_in_timestamp_order() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    // Logged out of chronological order
    for ts in [
        "2024-06-03T07:00:00Z",
        "2024-06-01T07:00:00Z",
        "2024-06-04T07:00:00Z",
        "2024-06-02T07:00:00Z",
    ] {
        log_cmd(data_dir, ts, &[]).assert().success();
    }

    let output = cli()
        .arg("report")
        .arg("--json")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value =
        serde_json::from_slice(&output).expect("report should be valid JSON");

    let series = report["aggregate"]["series"].as_array().unwrap();
    assert_eq!(series.len(), 4);
    let timestamps: Vec<&str> = series
        .iter()
        .map(|p| p["timestamp"].as_str().unwrap())
        .collect();
    let mut sorted = timestamps.clone();
    sorted.sort();
    assert_eq!(timestamps, sorted);

    // All nights scored the same, so the fit is flat
    assert_eq!(report["trend_direction"], "stable");
    assert_eq!(report["aggregate"]["trend"]["slope"], 0.0);
    assert_eq!(report["chart"]["panels"].as_array().unwrap().len(), 4);
}
