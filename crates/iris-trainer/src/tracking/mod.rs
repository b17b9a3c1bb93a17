//! Experiment tracking: registration of models, evaluation on a held-out
//! set after fitting, and persistence of metrics and model artifacts.
pub mod instrument;
pub mod local;
pub mod metrics;
pub mod report;
pub mod tracker;

pub use instrument::{apply_tracking, Instrumented};
pub use local::LocalTracker;
pub use metrics::EvaluationMetrics;
pub use tracker::{FeatureImportance, MemoryTracker, ModelRegistration, RunRecord, Tracker};
