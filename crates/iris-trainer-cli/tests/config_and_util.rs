//! Integration tests for CLI config overrides, util helpers and the runner.

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};
use iris_trainer::config::ModelType;
use iris_trainer_cli::train::input::{DataSource, TrainRequest};
use iris_trainer_cli::train::runner::run_training;
use iris_trainer_cli::util::{default_config_json, validate_tsv_or_csv_file};

fn train_command() -> Command {
    Command::new("train")
        .arg(Arg::new("data").value_parser(clap::value_parser!(PathBuf)))
        .arg(Arg::new("label_column").long("label-column"))
        .arg(Arg::new("config").long("config").value_parser(clap::value_parser!(PathBuf)))
        .arg(Arg::new("model_name").long("model-name"))
        .arg(Arg::new("model_type").long("model-type"))
        .arg(
            Arg::new("tracking_dir")
                .long("tracking-dir")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(Arg::new("no_report").long("no-report").action(ArgAction::SetTrue))
        .arg(Arg::new("synthetic").long("synthetic").action(ArgAction::SetTrue))
        .arg(Arg::new("dry_run").long("dry-run").action(ArgAction::SetTrue))
}

// ---------------------------------------------------------------------------
// validate_tsv_or_csv_file
// ---------------------------------------------------------------------------

#[test]
fn validate_csv_file_exists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.csv");
    std::fs::File::create(&path).unwrap();
    assert!(validate_tsv_or_csv_file(&path).is_ok());
}

#[test]
fn validate_wrong_extension_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.txt");
    std::fs::File::create(&path).unwrap();
    assert!(validate_tsv_or_csv_file(&path).is_err());
}

#[test]
fn validate_nonexistent_file_errors() {
    assert!(validate_tsv_or_csv_file("/nonexistent/path/data.tsv").is_err());
}

#[test]
fn default_config_json_parses_back() {
    let json = default_config_json().unwrap();
    let cfg: iris_trainer::config::TrainConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(cfg, iris_trainer::config::TrainConfig::default());
}

// ---------------------------------------------------------------------------
// TrainRequest overrides
// ---------------------------------------------------------------------------

#[test]
fn cli_flags_override_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("train.json");
    std::fs::write(&config_path, r#"{"model_name": "from_file", "test_size": 0.25}"#).unwrap();

    let matches = train_command()
        .try_get_matches_from([
            "train",
            "--synthetic",
            "--config",
            config_path.to_str().unwrap(),
            "--model-name",
            "from_cli",
            "--model-type",
            "decision_tree",
            "--no-report",
        ])
        .unwrap();
    let request = TrainRequest::from_arguments(&matches).unwrap();

    assert_eq!(request.data, DataSource::Synthetic);
    assert_eq!(request.label_column, "species");
    assert_eq!(request.config.model_name, "from_cli");
    assert_eq!(request.config.test_size, 0.25);
    assert!(matches!(request.config.model.model_type, ModelType::DecisionTree { .. }));
    assert!(!request.config.tracking.write_report);
}

#[test]
fn missing_data_without_synthetic_errors() {
    let matches = train_command().try_get_matches_from(["train"]).unwrap();
    assert!(TrainRequest::from_arguments(&matches).is_err());
}

// ---------------------------------------------------------------------------
// run_training
// ---------------------------------------------------------------------------

#[test]
fn run_training_on_csv_file_persists_run() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("iris.csv");
    let mut body = String::from("f1,f2,label\n");
    for i in 0..20 {
        let label = if i % 2 == 0 { "a" } else { "b" };
        let offset = if i % 2 == 0 { 0.0 } else { 10.0 };
        body.push_str(&format!("{},{},{}\n", offset + i as f64 * 0.1, offset, label));
    }
    std::fs::write(&data, body).unwrap();

    let runs = dir.path().join("runs");
    let matches = train_command()
        .try_get_matches_from([
            "train",
            data.to_str().unwrap(),
            "--label-column",
            "label",
            "--tracking-dir",
            runs.to_str().unwrap(),
        ])
        .unwrap();
    let request = TrainRequest::from_arguments(&matches).unwrap();
    let summary = run_training(&request).unwrap();

    assert_eq!((summary.n_train, summary.n_test), (16, 4));
    assert_eq!(summary.classes, vec!["a".to_string(), "b".to_string()]);
    let run_dir = summary.run_dir.unwrap();
    assert!(run_dir.join("run.json").exists());
    assert!(run_dir.join("model.json").exists());
    assert!(run_dir.join("report.html").exists());
}
