//! Random forest classifier: bagged Gini trees with per-split feature sampling.
use linfa::traits::Predict;
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{MaxFeatures, ModelType};
use crate::error::{Result, TrainError};
use crate::models::classifier_trait::{check_fit_input, ClassifierModel, ModelArtifact};
use crate::models::cart::{CartParams, CartTree};
use crate::models::decision_tree::fit_tree;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeatures,
    pub bootstrap: bool,
    /// Seed for bootstrap and per-split feature sampling. `None` draws a fresh seed per fit.
    pub random_state: Option<u64>,
    /// Class count declared before fitting; see `ClassifierModel::set_n_classes`.
    declared_classes: usize,
    members: Vec<CartTree>,
    n_classes: usize,
    n_features: usize,
}

impl Default for RandomForestClassifier {
    fn default() -> Self {
        Self::new(100)
    }
}

impl RandomForestClassifier {
    pub fn new(n_estimators: usize) -> Self {
        Self {
            n_estimators,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            random_state: None,
            declared_classes: 0,
            members: Vec::new(),
            n_classes: 0,
            n_features: 0,
        }
    }

    pub fn from_model_type(model_type: &ModelType) -> Option<Self> {
        match model_type {
            ModelType::RandomForest {
                n_estimators,
                max_depth,
                min_samples_split,
                min_samples_leaf,
                max_features,
                bootstrap,
                random_state,
            } => Some(Self {
                max_depth: *max_depth,
                min_samples_split: *min_samples_split,
                min_samples_leaf: *min_samples_leaf,
                max_features: *max_features,
                bootstrap: *bootstrap,
                random_state: *random_state,
                ..Self::new(*n_estimators)
            }),
            _ => None,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    pub fn with_bootstrap(mut self, bootstrap: bool) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    pub fn n_trees(&self) -> usize {
        self.members.len()
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn check_predict_input(&self, x: &Array2<f64>) -> Result<()> {
        if self.members.is_empty() {
            return Err(TrainError::NotFitted(self.name().to_string()));
        }
        if x.ncols() != self.n_features {
            return Err(TrainError::ShapeMismatch {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.ncols()),
            });
        }
        Ok(())
    }

    /// Vote counts per (row, class).
    fn votes(&self, x: &Array2<f64>) -> Array2<f64> {
        let per_tree: Vec<Array1<usize>> = self
            .members
            .par_iter()
            .map(|tree| tree.predict(x))
            .collect();

        let mut votes = Array2::<f64>::zeros((x.nrows(), self.n_classes));
        for predictions in &per_tree {
            for (row, &class) in predictions.iter().enumerate() {
                if class < self.n_classes {
                    votes[[row, class]] += 1.0;
                }
            }
        }
        votes
    }
}

impl ClassifierModel for RandomForestClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<()> {
        check_fit_input(x, y)?;
        if self.n_estimators == 0 {
            return Err(TrainError::InvalidConfig(
                "n_estimators must be at least 1".to_string(),
            ));
        }

        let (n_samples, n_features) = x.dim();
        let k = self.max_features.resolve(n_features);
        let n_classes = self
            .declared_classes
            .max(y.iter().copied().max().map_or(0, |m| m + 1));

        let base_seed = self.random_state.unwrap_or_else(rand::random);
        let mut seeder = StdRng::seed_from_u64(base_seed);
        let seeds: Vec<u64> = (0..self.n_estimators).map(|_| seeder.gen()).collect();

        log::debug!(
            "Fitting {} trees on {} samples, {} of {} features per split (bootstrap={})",
            self.n_estimators,
            n_samples,
            k,
            n_features,
            self.bootstrap
        );

        let bootstrap = self.bootstrap;
        let (max_depth, min_samples_split, min_samples_leaf) =
            (self.max_depth, self.min_samples_split, self.min_samples_leaf);
        let members = seeds
            .into_par_iter()
            .enumerate()
            .map(|(tree_idx, seed)| {
                let mut rng = StdRng::seed_from_u64(seed);

                let rows: Vec<usize> = if bootstrap {
                    (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
                } else {
                    (0..n_samples).collect()
                };

                let params = CartParams {
                    max_depth,
                    min_samples_split,
                    min_samples_leaf,
                    max_features: Some(k),
                    n_classes,
                    seed: rng.gen(),
                };
                fit_tree(&params, x.select(Axis(0), &rows), y.select(Axis(0), &rows)).map(|tree| {
                    log::trace!("Tree {} fitted with {} leaves", tree_idx, tree.n_leaves());
                    tree
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.members = members;
        self.n_classes = n_classes;
        self.n_features = n_features;
        Ok(())
    }

    /// Majority vote; ties go to the lowest class index.
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        self.check_predict_input(x)?;
        let votes = self.votes(x);
        Ok(votes
            .rows()
            .into_iter()
            .map(|row| {
                let mut best = 0;
                for (class, &count) in row.iter().enumerate() {
                    if count > row[best] {
                        best = class;
                    }
                }
                best
            })
            .collect())
    }

    /// Fraction of trees voting for each class.
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_predict_input(x)?;
        let n_trees = self.members.len() as f64;
        Ok(self.votes(x) / n_trees)
    }

    fn is_fitted(&self) -> bool {
        !self.members.is_empty()
    }

    fn set_n_classes(&mut self, n_classes: usize) {
        self.declared_classes = n_classes;
    }

    fn name(&self) -> &str {
        "random_forest"
    }

    fn params(&self) -> Vec<(String, String)> {
        vec![
            ("n_estimators".to_string(), self.n_estimators.to_string()),
            ("max_depth".to_string(), format!("{:?}", self.max_depth)),
            ("min_samples_split".to_string(), self.min_samples_split.to_string()),
            ("min_samples_leaf".to_string(), self.min_samples_leaf.to_string()),
            ("max_features".to_string(), format!("{:?}", self.max_features)),
            ("bootstrap".to_string(), self.bootstrap.to_string()),
            ("random_state".to_string(), format!("{:?}", self.random_state)),
        ]
    }

    /// Mean per-tree importance mapped back onto all feature columns, normalized.
    fn feature_importances(&self) -> Option<Vec<f64>> {
        if self.members.is_empty() {
            return None;
        }

        let mut total = vec![0.0; self.n_features];
        for tree in &self.members {
            for (slot, value) in total.iter_mut().zip(tree.feature_importance()) {
                *slot += value;
            }
        }

        let sum: f64 = total.iter().sum();
        if sum > 0.0 {
            for v in &mut total {
                *v /= sum;
            }
        }
        Some(total)
    }

    fn to_artifact(&self, model_name: &str) -> Result<ModelArtifact> {
        if !self.is_fitted() {
            return Err(TrainError::NotFitted(self.name().to_string()));
        }
        Ok(ModelArtifact {
            model_name: model_name.to_string(),
            model_kind: self.name().to_string(),
            format: "json".to_string(),
            bytes: serde_json::to_vec(self)?,
        })
    }
}
