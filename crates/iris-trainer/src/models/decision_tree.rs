use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::config::ModelType;
use crate::error::{Result, TrainError};
use crate::models::cart::{CartParams, CartTree};
use crate::models::classifier_trait::{check_fit_input, ClassifierModel, ModelArtifact};

pub(crate) fn fit_tree(params: &CartParams, x: Array2<f64>, y: Array1<usize>) -> Result<CartTree> {
    params.fit(&DatasetBase::new(x, y))
}

/// Single CART tree classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeClassifier {
    max_depth: Option<usize>,
    min_samples_split: usize,
    min_samples_leaf: usize,
    /// Class count declared before fitting; see `ClassifierModel::set_n_classes`.
    declared_classes: usize,
    n_features: usize,
    tree: Option<CartTree>,
}

impl DecisionTreeClassifier {
    pub fn new(max_depth: Option<usize>, min_samples_split: usize, min_samples_leaf: usize) -> Self {
        Self {
            max_depth,
            min_samples_split,
            min_samples_leaf,
            declared_classes: 0,
            n_features: 0,
            tree: None,
        }
    }

    pub fn from_model_type(model_type: &ModelType) -> Option<Self> {
        match model_type {
            ModelType::DecisionTree {
                max_depth,
                min_samples_split,
                min_samples_leaf,
            } => Some(Self::new(*max_depth, *min_samples_split, *min_samples_leaf)),
            _ => None,
        }
    }

    fn fitted_tree(&self) -> Result<&CartTree> {
        self.tree
            .as_ref()
            .ok_or_else(|| TrainError::NotFitted(self.name().to_string()))
    }
}

impl Default for DecisionTreeClassifier {
    fn default() -> Self {
        Self::new(None, 2, 1)
    }
}

impl ClassifierModel for DecisionTreeClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<()> {
        check_fit_input(x, y)?;
        let params = CartParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            max_features: None,
            n_classes: self.declared_classes,
            seed: 0,
        };
        let tree = fit_tree(&params, x.to_owned(), y.to_owned())?;

        self.n_features = x.ncols();
        self.tree = Some(tree);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        let tree = self.fitted_tree()?;
        if x.ncols() != self.n_features {
            return Err(TrainError::ShapeMismatch {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.ncols()),
            });
        }
        Ok(tree.predict(x))
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.predict(x)?;
        Ok(self.fitted_tree()?.predict_proba(x))
    }

    fn is_fitted(&self) -> bool {
        self.tree.is_some()
    }

    fn set_n_classes(&mut self, n_classes: usize) {
        self.declared_classes = n_classes;
    }

    fn name(&self) -> &str {
        "decision_tree"
    }

    fn params(&self) -> Vec<(String, String)> {
        vec![
            ("max_depth".to_string(), format!("{:?}", self.max_depth)),
            ("min_samples_split".to_string(), self.min_samples_split.to_string()),
            ("min_samples_leaf".to_string(), self.min_samples_leaf.to_string()),
        ]
    }

    fn feature_importances(&self) -> Option<Vec<f64>> {
        self.tree.as_ref().map(|t| t.feature_importance().to_vec())
    }

    fn to_artifact(&self, model_name: &str) -> Result<ModelArtifact> {
        self.fitted_tree()?;
        Ok(ModelArtifact {
            model_name: model_name.to_string(),
            model_kind: self.name().to_string(),
            format: "json".to_string(),
            bytes: serde_json::to_vec(self)?,
        })
    }
}
