use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Result, TrainError};

/// Number of features each tree of a forest may look at.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    Sqrt,
    Log2,
    Fraction(f64),
    Fixed(usize),
    All,
}

impl MaxFeatures {
    /// Resolve to a concrete count in `1..=n_features`.
    pub fn resolve(&self, n_features: usize) -> usize {
        let n = match *self {
            MaxFeatures::Sqrt => (n_features as f64).sqrt().floor() as usize,
            MaxFeatures::Log2 => (n_features as f64).log2().floor() as usize,
            MaxFeatures::Fraction(f) => (n_features as f64 * f).floor() as usize,
            MaxFeatures::Fixed(n) => n,
            MaxFeatures::All => n_features,
        };
        n.clamp(1, n_features.max(1))
    }
}

/// Supported model types and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ModelType {
    RandomForest {
        n_estimators: usize,
        max_depth: Option<usize>,
        min_samples_split: usize,
        min_samples_leaf: usize,
        max_features: MaxFeatures,
        bootstrap: bool,
        random_state: Option<u64>,
    },
    DecisionTree {
        max_depth: Option<usize>,
        min_samples_split: usize,
        min_samples_leaf: usize,
    },
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::RandomForest {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            random_state: None,
        }
    }
}

impl ModelType {
    pub fn kind(&self) -> &'static str {
        match self {
            ModelType::RandomForest { .. } => "random_forest",
            ModelType::DecisionTree { .. } => "decision_tree",
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "random_forest" | "rf" => Ok(ModelType::default()),
            "decision_tree" | "tree" => Ok(ModelType::DecisionTree {
                max_depth: None,
                min_samples_split: 2,
                min_samples_leaf: 1,
            }),
            _ => Err(format!(
                "Unknown model type: {}. Valid options are: random_forest, decision_tree",
                s
            )),
        }
    }
}

/// Central configuration for models in the crate.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ModelConfig {
    #[serde(flatten)]
    pub model_type: ModelType,
}

impl ModelConfig {
    pub fn new(model_type: ModelType) -> Self {
        Self { model_type }
    }
}

/// Where and how the filesystem tracker persists runs.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TrackingConfig {
    pub output_dir: PathBuf,
    pub write_report: bool,
    pub save_model: bool,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("runs"),
            write_report: true,
            save_model: true,
        }
    }
}

/// Parameters of one training run.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TrainConfig {
    pub model_name: String,
    pub test_size: f64,
    pub random_state: u64,
    pub model: ModelConfig,
    pub tracking: TrackingConfig,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            model_name: "my_model".to_string(),
            test_size: 0.2,
            random_state: 42,
            model: ModelConfig::default(),
            tracking: TrackingConfig::default(),
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(TrainError::InvalidTestSize(self.test_size));
        }
        if self.model_name.trim().is_empty() {
            return Err(TrainError::InvalidConfig("model_name must not be empty".to_string()));
        }
        if let ModelType::RandomForest {
            n_estimators,
            min_samples_split,
            ..
        } = &self.model.model_type
        {
            if *n_estimators == 0 {
                return Err(TrainError::InvalidConfig(
                    "n_estimators must be at least 1".to_string(),
                ));
            }
            if *min_samples_split < 2 {
                return Err(TrainError::InvalidConfig(
                    "min_samples_split must be at least 2".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Load a training configuration from a JSON file. Missing fields take
/// their default values.
pub fn load_train_config<P: AsRef<Path>>(path: P) -> Result<TrainConfig> {
    let content = std::fs::read_to_string(&path)?;
    let config: TrainConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}
