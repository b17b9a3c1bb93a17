//! iris-trainer: train a tracked random-forest classifier on tabular data.
//!
//! The entry point is [`trainer::train_iris`]: it materializes a
//! [`DataItem`](data_handling::DataItem), separates the label column,
//! holds out 20% of the rows with a fixed seed, wraps a default
//! [`RandomForestClassifier`](models::RandomForestClassifier) with
//! [`tracking::apply_tracking`] and fits it. The tracker registers the model
//! before the fit and records metrics on the held-out rows plus the model
//! artifact after it.
pub mod config;
pub mod data_handling;
pub mod datasets;
pub mod error;
pub mod features;
pub mod io;
pub mod model_selection;
pub mod models;
pub mod tracking;
pub mod trainer;

pub use error::{Result, TrainError};
pub use trainer::{train_iris, train_with_config, TrainedModel};
