use anyhow::{Context, Result};
use clap::ArgMatches;
use std::path::PathBuf;
use std::str::FromStr;

use iris_trainer::config::{load_train_config, ModelType, TrainConfig};

use crate::util::validate_tsv_or_csv_file;

/// Where the training rows come from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    File(PathBuf),
    Synthetic,
}

/// Everything the `train` subcommand needs, after CLI overrides.
#[derive(Debug, Clone)]
pub struct TrainRequest {
    pub data: DataSource,
    pub label_column: String,
    pub dry_run: bool,
    pub config: TrainConfig,
}

impl TrainRequest {
    pub fn from_arguments(matches: &ArgMatches) -> Result<Self> {
        let mut config = match matches.get_one::<PathBuf>("config") {
            Some(path) => load_train_config(path)
                .with_context(|| format!("Failed to load config file: {:?}", path))?,
            None => TrainConfig::default(),
        };

        // Apply CLI overrides
        if let Some(model_name) = matches.get_one::<String>("model_name") {
            config.model_name = model_name.clone();
        }
        if let Some(model_type) = matches.get_one::<String>("model_type") {
            config.model.model_type = ModelType::from_str(model_type).map_err(anyhow::Error::msg)?;
        }
        if let Some(dir) = matches.get_one::<PathBuf>("tracking_dir") {
            config.tracking.output_dir = dir.clone();
        }
        if matches.get_flag("no_report") {
            config.tracking.write_report = false;
        }
        config.validate()?;

        let data = if matches.get_flag("synthetic") {
            DataSource::Synthetic
        } else {
            let path = matches
                .get_one::<PathBuf>("data")
                .context("A data file is required unless --synthetic is given")?;
            validate_tsv_or_csv_file(path)?;
            DataSource::File(path.clone())
        };

        let label_column = matches
            .get_one::<String>("label_column")
            .cloned()
            .unwrap_or_else(|| iris_trainer::datasets::IRIS_LABEL.to_string());

        Ok(Self {
            data,
            label_column,
            dry_run: matches.get_flag("dry_run"),
            config,
        })
    }
}
