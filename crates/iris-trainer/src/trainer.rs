//! The training routine: materialize, split, wrap for tracking, fit.
use crate::config::TrainConfig;
use crate::data_handling::{Column, DataItem, Table};
use crate::error::{Result, TrainError};
use crate::features::{feature_matrix, LabelEncoder};
use crate::model_selection::train_test_split;
use crate::models::factory::build_model;
use crate::models::ClassifierModel;
use crate::tracking::{apply_tracking, Tracker};

/// A fitted classifier together with what is needed to use it on new rows.
pub struct TrainedModel {
    pub model: Box<dyn ClassifierModel + Send>,
    /// Class labels, indexed by the model's class indices.
    pub classes: Vec<String>,
    /// Feature columns in the order the model expects them.
    pub feature_names: Vec<String>,
    /// `(n_train, n_test)`.
    pub split_sizes: (usize, usize),
}

impl TrainedModel {
    /// Predict label values for `table`, which must contain every feature
    /// column. Extra columns (the label column included) are ignored.
    pub fn predict_labels(&self, table: &Table) -> Result<Vec<String>> {
        let columns = self
            .feature_names
            .iter()
            .map(|name| table.column(name).cloned())
            .collect::<Result<Vec<Column>>>()?;
        let x = feature_matrix(&Table::new(columns)?)?;

        let predictions = self.model.predict(&x)?;
        predictions
            .iter()
            .map(|&idx| {
                self.classes
                    .get(idx)
                    .cloned()
                    .ok_or_else(|| TrainError::UnknownLabel(idx.to_string()))
            })
            .collect()
    }
}

/// Train a random forest with default hyper-parameters on `dataset`,
/// holding out 20% of the rows (seed 42) for evaluation, and report the run
/// to `tracker` under the name `my_model`.
pub fn train_iris(
    dataset: &dyn DataItem,
    label_column: &str,
    tracker: &mut dyn Tracker,
) -> Result<TrainedModel> {
    train_with_config(dataset, label_column, &TrainConfig::default(), tracker)
}

/// Same as [`train_iris`] with explicit split, model and naming parameters.
///
/// Fails with `MissingColumn` before anything is split or fitted when
/// `label_column` is absent. Errors from the split, the tracker and the fit
/// are returned unchanged.
pub fn train_with_config(
    dataset: &dyn DataItem,
    label_column: &str,
    config: &TrainConfig,
    tracker: &mut dyn Tracker,
) -> Result<TrainedModel> {
    log::info!("Loading dataset from {}", dataset.describe());
    let table = dataset.as_table()?;

    let (features, labels) = table.drop_column(label_column)?;
    if features.n_cols() == 0 {
        return Err(TrainError::NoFeatureColumns(label_column.to_string()));
    }
    config.validate()?;
    log::info!(
        "Loaded {} rows, {} feature columns, label column '{}'",
        table.n_rows(),
        features.n_cols(),
        label_column
    );

    let encoder = LabelEncoder::fit(&labels)?;
    log::debug!("Classes: {:?}", encoder.classes());

    let split = train_test_split(&features, &labels, config.test_size, config.random_state)?;
    let x_train = feature_matrix(&split.x_train)?;
    let x_test = feature_matrix(&split.x_test)?;
    let y_train = encoder.transform(&split.y_train)?;
    let y_test = encoder.transform(&split.y_test)?;

    let mut model = build_model(&config.model);
    model.set_n_classes(encoder.n_classes());
    let feature_names = features.column_names();
    let mut tracked = apply_tracking(model, &config.model_name, x_test, y_test, tracker)?
        .with_feature_names(feature_names.clone())
        .with_classes(encoder.classes().to_vec());

    log::info!(
        "Fitting {} on {} rows ({} held out)",
        config.model.model_type.kind(),
        split.n_train(),
        split.n_test()
    );
    tracked.fit(&x_train, &y_train)?;

    Ok(TrainedModel {
        model: tracked.into_inner(),
        classes: encoder.classes().to_vec(),
        feature_names,
        split_sizes: (split.n_train(), split.n_test()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_handling::Value;
    use crate::tracking::MemoryTracker;

    fn tiny_table(n: usize) -> Table {
        let x: Vec<Value> = (0..n).map(|i| Value::Number(i as f64)).collect();
        let y: Vec<Value> = (0..n)
            .map(|i| Value::from(if i % 2 == 0 { "even" } else { "odd" }))
            .collect();
        Table::new(vec![Column::new("x", x), Column::new("label", y)]).unwrap()
    }

    #[test]
    fn test_five_rows_hold_out_one() {
        let mut tracker = MemoryTracker::new();
        let trained = train_iris(&tiny_table(5), "label", &mut tracker).unwrap();
        assert_eq!(trained.split_sizes, (4, 1));
        assert_eq!(tracker.registrations()[0].n_test_rows, 1);
        assert_eq!(tracker.runs().len(), 1);
    }

    #[test]
    fn test_label_only_table_has_no_features() {
        let table = Table::new(vec![Column::new("label", vec!["a".into(), "b".into()])]).unwrap();
        let mut tracker = MemoryTracker::new();
        assert!(matches!(
            train_iris(&table, "label", &mut tracker),
            Err(TrainError::NoFeatureColumns(_))
        ));
        assert!(tracker.registrations().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected_before_registration() {
        let config = TrainConfig {
            test_size: 0.0,
            ..TrainConfig::default()
        };
        let mut tracker = MemoryTracker::new();
        let res = train_with_config(&tiny_table(10), "label", &config, &mut tracker);
        assert!(matches!(res, Err(TrainError::InvalidTestSize(_))));
        assert!(tracker.registrations().is_empty());
    }

    #[test]
    fn test_class_only_in_test_rows_keeps_full_width() {
        // Rare class appears once; with 5 rows one lands in the test set.
        let labels = ["a", "a", "b", "b", "c"];
        let x: Vec<Value> = (0..5).map(|i| Value::Number(i as f64)).collect();
        let y: Vec<Value> = labels.iter().map(|&l| Value::from(l)).collect();
        let table = Table::new(vec![Column::new("x", x), Column::new("label", y)]).unwrap();

        let mut tracker = MemoryTracker::new();
        let trained = train_iris(&table, "label", &mut tracker).unwrap();
        let x_all = feature_matrix(&Table::new(vec![table.column("x").unwrap().clone()]).unwrap()).unwrap();
        let proba = trained.model.predict_proba(&x_all).unwrap();
        assert_eq!(proba.ncols(), trained.classes.len());
        assert_eq!(tracker.runs()[0].0.metrics.confusion_matrix.len(), 3);
    }

    #[test]
    fn test_predict_labels_uses_feature_names() {
        let mut tracker = MemoryTracker::new();
        let trained = train_iris(&tiny_table(20), "label", &mut tracker).unwrap();
        let predicted = trained.predict_labels(&tiny_table(4)).unwrap();
        assert_eq!(predicted.len(), 4);
        assert!(predicted.iter().all(|p| p == "even" || p == "odd"));

        let other = Table::new(vec![Column::new("z", vec![1.0.into()])]).unwrap();
        assert!(matches!(
            trained.predict_labels(&other),
            Err(TrainError::MissingColumn { .. })
        ));
    }
}
