//! CLI binary smoke tests using assert_cmd.
//!
//! These tests exercise the compiled `iris-trainer` binary to verify that
//! argument parsing, help text, and error handling work end-to-end.

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("iris-trainer").unwrap()
}

// ---------------------------------------------------------------------------
// Top-level
// ---------------------------------------------------------------------------

#[test]
fn no_args_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("train"))
        .stdout(predicate::str::contains("default-config"));
}

#[test]
fn default_config_prints_json() {
    cmd()
        .arg("default-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"model_name\": \"my_model\""))
        .stdout(predicate::str::contains("\"test_size\": 0.2"))
        .stdout(predicate::str::contains("\"random_forest\""));
}

// ---------------------------------------------------------------------------
// train
// ---------------------------------------------------------------------------

#[test]
fn train_without_data_errors() {
    cmd().arg("train").assert().failure();
}

#[test]
fn train_rejects_wrong_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.txt");
    std::fs::write(&path, "a,species\n1,x\n").unwrap();
    cmd().arg("train").arg(&path).assert().failure();
}

#[test]
fn train_synthetic_dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let runs = dir.path().join("runs");
    cmd()
        .args(["train", "--synthetic", "--dry-run", "--model-type", "decision_tree"])
        .arg("--tracking-dir")
        .arg(&runs)
        .assert()
        .success()
        .stderr(predicate::str::contains("evaluated on 30 rows"));
    assert!(!runs.exists());
}

#[test]
fn train_synthetic_writes_run_directory() {
    let dir = tempfile::tempdir().unwrap();
    let runs = dir.path().join("runs");
    cmd()
        .args(["train", "--synthetic", "--no-report"])
        .arg("--tracking-dir")
        .arg(&runs)
        .assert()
        .success()
        .stderr(predicate::str::contains("Run directory"));
    assert!(runs.join("registrations.jsonl").exists());
    assert!(runs.join("my_model").is_dir());
}

#[test]
fn train_missing_label_column_exits_with_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.csv");
    std::fs::write(&path, "a,b\n1,2\n3,4\n5,6\n7,8\n9,10\n").unwrap();
    cmd()
        .arg("train")
        .arg(&path)
        .args(["--label-column", "species", "--dry-run"])
        .assert()
        .failure()
        .code(1);
}
