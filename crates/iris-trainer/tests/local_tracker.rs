//! Filesystem tracker layout and read-back.

use iris_trainer::config::{TrackingConfig, TrainConfig};
use iris_trainer::datasets::{iris_like, IRIS_LABEL};
use iris_trainer::tracking::LocalTracker;
use iris_trainer::{train_iris, train_with_config};

#[test]
fn test_local_tracker_writes_run_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut tracker = LocalTracker::new(dir.path());
    train_iris(&iris_like(20, 5), IRIS_LABEL, &mut tracker).unwrap();

    assert_eq!(tracker.written_runs().len(), 1);
    let run_dir = &tracker.written_runs()[0];
    assert!(run_dir.starts_with(dir.path().join("my_model")));
    assert!(run_dir.join("run.json").is_file());
    assert!(run_dir.join("model.json").is_file());

    let report = std::fs::read_to_string(run_dir.join("report.html")).unwrap();
    assert!(report.starts_with("<!DOCTYPE html>"));
    assert!(report.contains("Confusion matrix"));
    assert!(report.contains("setosa"));

    let registrations = tracker.load_registrations().unwrap();
    assert_eq!(registrations.len(), 1);
    assert_eq!(registrations[0].n_test_rows, 12);

    let runs = tracker.load_runs("my_model").unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].n_train_rows, 48);
    assert!(runs[0].run_id.starts_with("my_model-"));
}

#[test]
fn test_local_tracker_respects_flags() {
    let dir = tempfile::tempdir().unwrap();
    let config = TrainConfig {
        model_name: "iris_tree".to_string(),
        model: iris_trainer::config::ModelConfig::new("decision_tree".parse().unwrap()),
        tracking: TrackingConfig {
            output_dir: dir.path().to_path_buf(),
            write_report: false,
            save_model: false,
        },
        ..TrainConfig::default()
    };
    let mut tracker = LocalTracker::from_config(&config.tracking);
    train_with_config(&iris_like(10, 2), IRIS_LABEL, &config, &mut tracker).unwrap();

    let run_dir = &tracker.written_runs()[0];
    assert!(run_dir.join("run.json").is_file());
    assert!(!run_dir.join("model.json").exists());
    assert!(!run_dir.join("report.html").exists());
    assert_eq!(tracker.load_runs("iris_tree").unwrap()[0].model_kind, "decision_tree");
}

#[test]
fn test_failed_training_writes_no_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut tracker = LocalTracker::new(dir.path());
    assert!(train_iris(&iris_like(10, 2), "missing", &mut tracker).is_err());
    assert!(tracker.load_registrations().unwrap().is_empty());
    assert!(tracker.load_runs("my_model").unwrap().is_empty());
}
