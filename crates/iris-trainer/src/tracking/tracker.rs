//! Tracker contract and the records it receives.
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::ModelArtifact;
use crate::tracking::metrics::EvaluationMetrics;

/// Emitted once when a model is wrapped for tracking, before it is fitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRegistration {
    pub model_name: String,
    pub model_kind: String,
    pub n_test_rows: usize,
    pub n_features: usize,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// Everything observed around one fit of a tracked model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: String,
    pub model_name: String,
    pub model_kind: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub fit_seconds: f64,
    pub n_train_rows: usize,
    pub n_test_rows: usize,
    pub params: BTreeMap<String, String>,
    pub metrics: EvaluationMetrics,
    pub feature_importances: Vec<FeatureImportance>,
}

/// Sink for registrations, metrics and model artifacts.
pub trait Tracker {
    fn register(&mut self, registration: &ModelRegistration) -> Result<()>;

    fn log_run(&mut self, run: &RunRecord, artifact: &ModelArtifact) -> Result<()>;
}

/// Keeps everything in memory. Used for dry runs and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryTracker {
    registrations: Vec<ModelRegistration>,
    runs: Vec<(RunRecord, ModelArtifact)>,
}

impl MemoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registrations(&self) -> &[ModelRegistration] {
        &self.registrations
    }

    pub fn runs(&self) -> &[(RunRecord, ModelArtifact)] {
        &self.runs
    }

    pub fn last_run(&self) -> Option<&RunRecord> {
        self.runs.last().map(|(run, _)| run)
    }
}

impl Tracker for MemoryTracker {
    fn register(&mut self, registration: &ModelRegistration) -> Result<()> {
        self.registrations.push(registration.clone());
        Ok(())
    }

    fn log_run(&mut self, run: &RunRecord, artifact: &ModelArtifact) -> Result<()> {
        self.runs.push((run.clone(), artifact.clone()));
        Ok(())
    }
}

pub(crate) fn run_id(model_name: &str, started_at: &DateTime<Utc>) -> String {
    format!("{}-{}", model_name, started_at.format("%Y%m%dT%H%M%S%3f"))
}
