//! Gini classification tree (CART) plugged into linfa's `Fit` / `PredictInplace`.
//!
//! Growth is fully deterministic for a given seed: candidate features are
//! scanned in ascending order, thresholds in ascending value order, a split
//! only replaces the current best when strictly better, and leaf classes
//! break count ties towards the lowest class index.
use linfa::traits::{Fit, PredictInplace};
use linfa::DatasetBase;
use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrainError};

/// Minimum weighted impurity decrease for a split to be kept.
const MIN_DECREASE: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
pub struct CartParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features examined at each split. `None` examines all of them.
    pub max_features: Option<usize>,
    /// Lower bound on the class count; labels at or above it widen it.
    pub n_classes: usize,
    /// Seed for per-split feature sampling.
    pub seed: u64,
}

impl Default for CartParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            n_classes: 0,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Leaf {
        counts: Vec<usize>,
        class: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// A fitted tree. Rows with `x[feature] <= threshold` go left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartTree {
    root: Node,
    n_features: usize,
    n_classes: usize,
    importances: Vec<f64>,
}

struct Candidate {
    feature: usize,
    threshold: f64,
    /// `n_left * gini_left + n_right * gini_right`
    weighted: f64,
}

struct Grower<'a> {
    params: &'a CartParams,
    x: &'a Array2<f64>,
    y: &'a Array1<usize>,
    n_classes: usize,
    rng: StdRng,
    importances: Vec<f64>,
}

fn gini(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum::<f64>()
}

/// Most frequent class; ties go to the lowest index.
fn majority(counts: &[usize]) -> usize {
    let mut best = 0;
    for (class, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = class;
        }
    }
    best
}

impl<'a> Grower<'a> {
    fn class_counts(&self, indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &i in indices {
            counts[self.y[i]] += 1;
        }
        counts
    }

    fn grow(&mut self, indices: Vec<usize>, depth: usize) -> Node {
        let n = indices.len();
        let counts = self.class_counts(&indices);
        let impurity = gini(&counts, n);

        let stop = n < self.params.min_samples_split
            || n < 2 * self.params.min_samples_leaf.max(1)
            || self.params.max_depth.map_or(false, |d| depth >= d)
            || impurity <= 0.0;

        if !stop {
            if let Some(split) = self.best_split(&indices, &counts, impurity) {
                self.importances[split.feature] += n as f64 * impurity - split.weighted;

                let (left, right): (Vec<usize>, Vec<usize>) = indices
                    .into_iter()
                    .partition(|&i| self.x[[i, split.feature]] <= split.threshold);
                return Node::Split {
                    feature: split.feature,
                    threshold: split.threshold,
                    left: Box::new(self.grow(left, depth + 1)),
                    right: Box::new(self.grow(right, depth + 1)),
                };
            }
        }

        let class = majority(&counts);
        Node::Leaf { counts, class }
    }

    fn candidate_features(&mut self) -> Vec<usize> {
        let n_features = self.x.ncols();
        match self.params.max_features {
            Some(k) if k < n_features => {
                let mut features =
                    rand::seq::index::sample(&mut self.rng, n_features, k.max(1)).into_vec();
                features.sort_unstable();
                features
            }
            _ => (0..n_features).collect(),
        }
    }

    fn best_split(&mut self, indices: &[usize], total: &[usize], impurity: f64) -> Option<Candidate> {
        let features = self.candidate_features();
        let n = indices.len();
        let min_leaf = self.params.min_samples_leaf.max(1);
        let mut order = indices.to_vec();
        let mut best: Option<Candidate> = None;

        for feature in features {
            let column = self.x.column(feature);
            order.sort_by(|&a, &b| column[a].total_cmp(&column[b]).then(a.cmp(&b)));

            let mut left = vec![0usize; self.n_classes];
            for pos in 0..n - 1 {
                left[self.y[order[pos]]] += 1;
                let (value, next) = (column[order[pos]], column[order[pos + 1]]);
                let n_left = pos + 1;
                let n_right = n - n_left;
                if value == next || n_left < min_leaf || n_right < min_leaf {
                    continue;
                }

                let right: Vec<usize> = total.iter().zip(&left).map(|(t, l)| t - l).collect();
                let weighted =
                    n_left as f64 * gini(&left, n_left) + n_right as f64 * gini(&right, n_right);
                if best.as_ref().map_or(true, |b| weighted < b.weighted) {
                    let mut threshold = value + (next - value) / 2.0;
                    if threshold >= next {
                        threshold = value;
                    }
                    best = Some(Candidate {
                        feature,
                        threshold,
                        weighted,
                    });
                }
            }
        }

        best.filter(|b| n as f64 * impurity - b.weighted > MIN_DECREASE)
    }
}

impl Fit<Array2<f64>, Array1<usize>, TrainError> for CartParams {
    type Object = CartTree;

    fn fit(&self, dataset: &DatasetBase<Array2<f64>, Array1<usize>>) -> Result<CartTree> {
        let (x, y) = (dataset.records(), dataset.targets());
        if x.nrows() != y.len() {
            return Err(linfa::Error::MismatchedShapes(x.nrows(), y.len()).into());
        }
        if x.nrows() == 0 {
            return Err(linfa::Error::NotEnoughSamples.into());
        }

        let n_classes = self
            .n_classes
            .max(y.iter().copied().max().map_or(0, |m| m + 1));
        let mut grower = Grower {
            params: self,
            x,
            y,
            n_classes,
            rng: StdRng::seed_from_u64(self.seed),
            importances: vec![0.0; x.ncols()],
        };
        let root = grower.grow((0..x.nrows()).collect(), 0);

        let mut importances = grower.importances;
        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            importances.iter_mut().for_each(|v| *v /= total);
        }

        Ok(CartTree {
            root,
            n_features: x.ncols(),
            n_classes,
            importances,
        })
    }
}

impl CartTree {
    fn leaf(&self, row: ArrayView1<f64>) -> (&[usize], usize) {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { counts, class } => return (counts.as_slice(), *class),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold { left } else { right };
                }
            }
        }
    }

    /// Class frequencies of the leaf each row falls into.
    pub fn predict_proba(&self, x: &Array2<f64>) -> Array2<f64> {
        let mut proba = Array2::<f64>::zeros((x.nrows(), self.n_classes));
        for (r, row) in x.rows().into_iter().enumerate() {
            let (counts, _) = self.leaf(row);
            let n: usize = counts.iter().sum();
            if n > 0 {
                for (c, &count) in counts.iter().enumerate() {
                    proba[[r, c]] = count as f64 / n as f64;
                }
            }
        }
        proba
    }

    /// Impurity decrease per feature, normalized to sum to 1 (all zeros for a stump).
    pub fn feature_importance(&self) -> &[f64] {
        &self.importances
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn n_leaves(&self) -> usize {
        fn count(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 1,
                Node::Split { left, right, .. } => count(left) + count(right),
            }
        }
        count(&self.root)
    }
}

impl PredictInplace<Array2<f64>, Array1<usize>> for CartTree {
    fn predict_inplace<'a>(&'a self, x: &'a Array2<f64>, y: &mut Array1<usize>) {
        for (row, target) in x.rows().into_iter().zip(y.iter_mut()) {
            *target = self.leaf(row).1;
        }
    }

    fn default_target(&self, x: &Array2<f64>) -> Array1<usize> {
        Array1::zeros(x.nrows())
    }
}
