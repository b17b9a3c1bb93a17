use anyhow::{Context, Result};
use std::path::PathBuf;

use iris_trainer::data_handling::{CsvDataItem, DataItem};
use iris_trainer::datasets::iris_like;
use iris_trainer::tracking::{LocalTracker, MemoryTracker, Tracker};
use iris_trainer::train_with_config;

use crate::train::input::{DataSource, TrainRequest};

/// What a finished `train` invocation reports back.
#[derive(Debug, Clone)]
pub struct TrainSummary {
    pub model_name: String,
    pub classes: Vec<String>,
    pub n_train: usize,
    pub n_test: usize,
    /// Directory of the persisted run, `None` for dry runs.
    pub run_dir: Option<PathBuf>,
}

pub fn run_training(request: &TrainRequest) -> Result<TrainSummary> {
    let dataset: Box<dyn DataItem> = match &request.data {
        DataSource::File(path) => Box::new(CsvDataItem::new(path)),
        DataSource::Synthetic => Box::new(iris_like(50, 42)),
    };

    if request.dry_run {
        let mut tracker = MemoryTracker::new();
        let summary = train_into(dataset.as_ref(), request, &mut tracker)?;
        if let Some(run) = tracker.last_run() {
            log::info!(
                "Dry run finished: accuracy={:.4} f1={:.4} (nothing persisted)",
                run.metrics.accuracy,
                run.metrics.f1_score
            );
        }
        return Ok(summary);
    }

    let mut tracker = LocalTracker::from_config(&request.config.tracking);
    let mut summary = train_into(dataset.as_ref(), request, &mut tracker)?;
    summary.run_dir = tracker.written_runs().last().cloned();
    if let Some(dir) = &summary.run_dir {
        log::info!("Run written to {}", dir.display());
    }
    Ok(summary)
}

fn train_into(
    dataset: &dyn DataItem,
    request: &TrainRequest,
    tracker: &mut dyn Tracker,
) -> Result<TrainSummary> {
    let trained = train_with_config(dataset, &request.label_column, &request.config, tracker)
        .with_context(|| format!("Training on {} failed", dataset.describe()))?;

    Ok(TrainSummary {
        model_name: request.config.model_name.clone(),
        classes: trained.classes,
        n_train: trained.split_sizes.0,
        n_test: trained.split_sizes.1,
        run_dir: None,
    })
}
