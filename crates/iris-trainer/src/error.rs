use thiserror::Error;

/// Errors raised while loading data, splitting, fitting or tracking a model.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("missing column '{column}' (available: {})", available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("no feature columns left after removing label column '{0}'")]
    NoFeatureColumns(String),

    #[error("dataset has no rows")]
    EmptyDataset,

    #[error(
        "degenerate split: {n_samples} rows with test_size={test_size} gives {n_train} train and {n_test} test rows"
    )]
    DegenerateSplit {
        n_samples: usize,
        test_size: f64,
        n_train: usize,
        n_test: usize,
    },

    #[error("test_size must be in (0, 1), got {0}")]
    InvalidTestSize(f64),

    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("non-numeric value {value:?} in feature column '{column}' at row {row}")]
    NonNumericFeature {
        column: String,
        row: usize,
        value: String,
    },

    #[error("missing label in column '{column}' at row {row}")]
    MissingLabel { column: String, row: usize },

    #[error("label column '{0}' holds continuous values; a classifier needs discrete classes")]
    ContinuousLabels(String),

    #[error("label {0:?} was not seen when the encoder was fitted")]
    UnknownLabel(String),

    #[error("model '{0}' has not been fitted")]
    NotFitted(String),

    #[error("fit failed: {0}")]
    Fit(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("tracking failed: {0}")]
    Tracking(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TrainError>;

impl From<linfa::Error> for TrainError {
    fn from(e: linfa::Error) -> Self {
        TrainError::Fit(e.to_string())
    }
}
