//! Wraps a classifier so that fitting it also evaluates and logs it.
use std::collections::BTreeMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2};

use crate::error::{Result, TrainError};
use crate::models::{ClassifierModel, ModelArtifact};
use crate::tracking::metrics::EvaluationMetrics;
use crate::tracking::tracker::{run_id, FeatureImportance, ModelRegistration, RunRecord, Tracker};

/// A classifier whose `fit` is observed by a [`Tracker`].
///
/// Created by [`apply_tracking`]. After the wrapped model finishes fitting,
/// the held-out set is scored and a [`RunRecord`] plus the model artifact are
/// handed to the tracker. Prediction is forwarded untouched.
pub struct Instrumented<'t, M> {
    model: M,
    model_name: String,
    x_test: Array2<f64>,
    y_test: Array1<usize>,
    feature_names: Vec<String>,
    classes: Vec<String>,
    tracker: &'t mut dyn Tracker,
    last_run: Option<RunRecord>,
}

/// Register `model` under `model_name` with the tracker and return the
/// instrumented wrapper. Must be called before the model is fitted.
pub fn apply_tracking<'t, M: ClassifierModel>(
    model: M,
    model_name: &str,
    x_test: Array2<f64>,
    y_test: Array1<usize>,
    tracker: &'t mut dyn Tracker,
) -> Result<Instrumented<'t, M>> {
    if x_test.nrows() != y_test.len() {
        return Err(TrainError::ShapeMismatch {
            expected: format!("{} test labels", x_test.nrows()),
            actual: format!("{} test labels", y_test.len()),
        });
    }
    if x_test.nrows() == 0 {
        return Err(TrainError::Tracking("test set is empty".to_string()));
    }

    let registration = ModelRegistration {
        model_name: model_name.to_string(),
        model_kind: model.name().to_string(),
        n_test_rows: x_test.nrows(),
        n_features: x_test.ncols(),
        registered_at: Utc::now(),
    };
    tracker.register(&registration)?;
    log::info!(
        "Registered model '{}' ({}) with {} test rows",
        registration.model_name,
        registration.model_kind,
        registration.n_test_rows
    );

    let feature_names = (0..x_test.ncols()).map(|i| format!("feature_{}", i)).collect();
    Ok(Instrumented {
        model,
        model_name: model_name.to_string(),
        x_test,
        y_test,
        feature_names,
        classes: Vec::new(),
        tracker,
        last_run: None,
    })
}

impl<'t, M: ClassifierModel> Instrumented<'t, M> {
    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        if names.len() == self.x_test.ncols() {
            self.feature_names = names;
        } else {
            log::warn!(
                "Ignoring {} feature names for {} feature columns",
                names.len(),
                self.x_test.ncols()
            );
        }
        self
    }

    pub fn with_classes(mut self, classes: Vec<String>) -> Self {
        self.classes = classes;
        self
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn inner(&self) -> &M {
        &self.model
    }

    /// The record logged by the most recent successful fit.
    pub fn last_run(&self) -> Option<&RunRecord> {
        self.last_run.as_ref()
    }

    /// Release the tracker and hand back the wrapped model.
    pub fn into_inner(self) -> M {
        self.model
    }

    fn record_run(
        &self,
        started_at: DateTime<Utc>,
        fit_seconds: f64,
        n_train_rows: usize,
    ) -> Result<RunRecord> {
        let predictions = self.model.predict(&self.x_test)?;
        let metrics = EvaluationMetrics::compute(&self.y_test, &predictions, &self.classes)?;

        let params: BTreeMap<String, String> = self.model.params().into_iter().collect();
        let feature_importances = self
            .model
            .feature_importances()
            .map(|values| {
                self.feature_names
                    .iter()
                    .zip(values)
                    .map(|(feature, importance)| FeatureImportance {
                        feature: feature.clone(),
                        importance,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(RunRecord {
            run_id: run_id(&self.model_name, &started_at),
            model_name: self.model_name.clone(),
            model_kind: self.model.name().to_string(),
            started_at,
            finished_at: Utc::now(),
            fit_seconds,
            n_train_rows,
            n_test_rows: self.y_test.len(),
            params,
            metrics,
            feature_importances,
        })
    }
}

impl<'t, M: ClassifierModel> ClassifierModel for Instrumented<'t, M> {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<()> {
        let started_at = Utc::now();
        let timer = Instant::now();
        self.model.fit(x, y)?;
        let fit_seconds = timer.elapsed().as_secs_f64();
        log::info!("Fitted '{}' on {} rows in {:.3}s", self.model_name, x.nrows(), fit_seconds);

        let run = self.record_run(started_at, fit_seconds, x.nrows())?;
        let artifact = self.model.to_artifact(&self.model_name)?;
        self.tracker.log_run(&run, &artifact)?;
        log::info!(
            "Logged run {} (accuracy={:.4}, f1={:.4})",
            run.run_id,
            run.metrics.accuracy,
            run.metrics.f1_score
        );

        self.last_run = Some(run);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        self.model.predict(x)
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.model.predict_proba(x)
    }

    fn is_fitted(&self) -> bool {
        self.model.is_fitted()
    }

    fn set_n_classes(&mut self, n_classes: usize) {
        self.model.set_n_classes(n_classes)
    }

    fn name(&self) -> &str {
        self.model.name()
    }

    fn params(&self) -> Vec<(String, String)> {
        self.model.params()
    }

    fn feature_importances(&self) -> Option<Vec<f64>> {
        self.model.feature_importances()
    }

    fn to_artifact(&self, model_name: &str) -> Result<ModelArtifact> {
        self.model.to_artifact(model_name)
    }
}
