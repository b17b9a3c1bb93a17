//! End-to-end tests of the training routine with an in-memory tracker.

use iris_trainer::data_handling::{Column, CsvDataItem, Table, Value};
use iris_trainer::datasets::{iris_like, IRIS_LABEL};
use iris_trainer::tracking::MemoryTracker;
use iris_trainer::{train_iris, TrainError};

fn numeric_table(n_rows: usize, label: impl Fn(usize) -> Value) -> Table {
    Table::new(vec![
        Column::new("x1", (0..n_rows).map(|i| Value::Number(i as f64)).collect()),
        Column::new("x2", (0..n_rows).map(|i| Value::Number((i % 3) as f64)).collect()),
        Column::new("target", (0..n_rows).map(label).collect()),
    ])
    .unwrap()
}

#[test]
fn test_iris_end_to_end() {
    let _ = env_logger::builder().is_test(true).try_init();

    let dataset = iris_like(50, 42);
    let mut tracker = MemoryTracker::new();
    let trained = train_iris(&dataset, IRIS_LABEL, &mut tracker).unwrap();

    assert!(trained.model.is_fitted());
    assert_eq!(trained.split_sizes, (120, 30));
    assert_eq!(trained.classes, vec!["setosa", "versicolor", "virginica"]);
    assert_eq!(trained.feature_names.len(), 4);

    let registrations = tracker.registrations();
    assert_eq!(registrations.len(), 1);
    assert_eq!(registrations[0].model_name, "my_model");
    assert_eq!(registrations[0].model_kind, "random_forest");
    assert_eq!(registrations[0].n_test_rows, 30);

    assert_eq!(tracker.runs().len(), 1);
    let run = tracker.last_run().unwrap();
    assert_eq!(run.n_train_rows, 120);
    assert_eq!(run.n_test_rows, 30);
    assert_eq!(run.metrics.n_samples, 30);
    assert!(run.metrics.accuracy > 0.8, "accuracy {}", run.metrics.accuracy);
    assert_eq!(run.feature_importances.len(), 4);

    let predicted = trained.predict_labels(&dataset).unwrap();
    assert_eq!(predicted.len(), 150);
    assert!(predicted.iter().all(|p| trained.classes.contains(p)));
}

#[test]
fn test_split_is_deterministic_across_runs() {
    let dataset = iris_like(10, 3);
    let mut first = MemoryTracker::new();
    let mut second = MemoryTracker::new();
    train_iris(&dataset, IRIS_LABEL, &mut first).unwrap();
    train_iris(&dataset, IRIS_LABEL, &mut second).unwrap();

    let a = &first.runs()[0].0.metrics;
    let b = &second.runs()[0].0.metrics;
    assert_eq!(a.n_samples, 6);
    // Same test rows in the same order: the true-class totals match.
    let totals = |m: &iris_trainer::tracking::EvaluationMetrics| -> Vec<usize> {
        m.confusion_matrix.iter().map(|row| row.iter().sum()).collect()
    };
    assert_eq!(totals(a), totals(b));
}

#[test]
fn test_missing_label_column_fails_before_registration() {
    let mut tracker = MemoryTracker::new();
    match train_iris(&iris_like(5, 1), "label", &mut tracker) {
        Err(TrainError::MissingColumn { column, available }) => {
            assert_eq!(column, "label");
            assert!(available.contains(&"species".to_string()));
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
    assert!(tracker.registrations().is_empty());
    assert!(tracker.runs().is_empty());
}

#[test]
fn test_five_rows_split_one_test_four_train() {
    let table = numeric_table(5, |i| Value::from(if i < 3 { "a" } else { "b" }));
    let mut tracker = MemoryTracker::new();
    let trained = train_iris(&table, "target", &mut tracker).unwrap();
    assert_eq!(trained.split_sizes, (4, 1));
    assert_eq!(tracker.registrations()[0].n_test_rows, 1);
}

#[test]
fn test_single_row_is_degenerate() {
    let table = numeric_table(1, |_| Value::from("a"));
    let mut tracker = MemoryTracker::new();
    assert!(matches!(
        train_iris(&table, "target", &mut tracker),
        Err(TrainError::DegenerateSplit { n_samples: 1, .. })
    ));
    assert!(tracker.registrations().is_empty());
}

#[test]
fn test_continuous_labels_rejected_without_run() {
    let table = numeric_table(20, |i| Value::Number(i as f64 * 0.37));
    let mut tracker = MemoryTracker::new();
    assert!(matches!(
        train_iris(&table, "target", &mut tracker),
        Err(TrainError::ContinuousLabels(_))
    ));
    assert!(tracker.runs().is_empty());
}

#[test]
fn test_integer_labels_are_classes() {
    let table = numeric_table(20, |i| Value::Number((i % 2) as f64));
    let mut tracker = MemoryTracker::new();
    let trained = train_iris(&table, "target", &mut tracker).unwrap();
    assert_eq!(trained.classes, vec!["0", "1"]);
}

#[test]
fn test_text_feature_propagates_error() {
    let table = Table::new(vec![
        Column::new("color", (0..10).map(|i| Value::from(format!("c{}", i))).collect()),
        Column::new("target", (0..10).map(|i| Value::from(if i % 2 == 0 { "a" } else { "b" })).collect()),
    ])
    .unwrap();
    let mut tracker = MemoryTracker::new();
    assert!(matches!(
        train_iris(&table, "target", &mut tracker),
        Err(TrainError::NonNumericFeature { .. })
    ));
    assert!(tracker.runs().is_empty());
}

#[test]
fn test_trains_from_csv_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("iris.csv");
    let table = iris_like(10, 9);

    let mut writer = csv::Writer::from_path(&path).unwrap();
    writer.write_record(table.column_names()).unwrap();
    for r in 0..table.n_rows() {
        writer
            .write_record(table.row(r).iter().map(|v| v.to_string()))
            .unwrap();
    }
    writer.flush().unwrap();

    let mut tracker = MemoryTracker::new();
    let trained = train_iris(&CsvDataItem::new(&path), IRIS_LABEL, &mut tracker).unwrap();
    assert_eq!(trained.split_sizes, (24, 6));
    assert_eq!(tracker.runs().len(), 1);
}
