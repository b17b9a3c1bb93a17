use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Serialized form of a trained model, handed to the tracker for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model_name: String,
    pub model_kind: String,
    pub format: String,
    pub bytes: Vec<u8>,
}

/// The contract shared by every classifier in the crate and by the tracking
/// wrapper around them.
///
/// Labels are class indices `0..n_classes` as produced by
/// [`LabelEncoder`](crate::features::LabelEncoder).
pub trait ClassifierModel {
    /// Fit the model on a feature matrix and aligned class indices.
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<()>;

    /// Predict one class index per row.
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>>;

    /// Per-class probabilities, shape `(n_rows, n_classes)`.
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>>;

    fn is_fitted(&self) -> bool;

    /// Declare how many classes the label encoding has, so probability
    /// outputs stay that wide even when the highest classes are absent from
    /// the training rows. Call before `fit`.
    fn set_n_classes(&mut self, _n_classes: usize) {}

    /// Short identifier of the model family, e.g. `random_forest`.
    fn name(&self) -> &str {
        "classifier"
    }

    /// Hyper-parameters as flat key/value strings for run records.
    fn params(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Normalized importances, one per feature column, when the model has them.
    fn feature_importances(&self) -> Option<Vec<f64>> {
        None
    }

    fn to_artifact(&self, model_name: &str) -> Result<ModelArtifact>;
}

impl<M: ClassifierModel + ?Sized> ClassifierModel for Box<M> {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<()> {
        (**self).fit(x, y)
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        (**self).predict(x)
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        (**self).predict_proba(x)
    }

    fn is_fitted(&self) -> bool {
        (**self).is_fitted()
    }

    fn set_n_classes(&mut self, n_classes: usize) {
        (**self).set_n_classes(n_classes)
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn params(&self) -> Vec<(String, String)> {
        (**self).params()
    }

    fn feature_importances(&self) -> Option<Vec<f64>> {
        (**self).feature_importances()
    }

    fn to_artifact(&self, model_name: &str) -> Result<ModelArtifact> {
        (**self).to_artifact(model_name)
    }
}

/// Check that `x` and `y` describe the same, non-empty set of rows.
pub(crate) fn check_fit_input(x: &Array2<f64>, y: &Array1<usize>) -> Result<()> {
    use crate::error::TrainError;

    if x.nrows() != y.len() {
        return Err(TrainError::ShapeMismatch {
            expected: format!("{} labels", x.nrows()),
            actual: format!("{} labels", y.len()),
        });
    }
    if x.nrows() == 0 {
        return Err(TrainError::EmptyDataset);
    }
    if x.ncols() == 0 {
        return Err(TrainError::Fit("feature matrix has no columns".to_string()));
    }
    Ok(())
}
