//! Test-set evaluation metrics recorded for each tracked run.
//!
//! Every scalar is derived from the full `n_classes x n_classes` confusion
//! matrix, so predicted classes that never occur in the truth still count.
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrainError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub accuracy: f64,
    /// Macro-averaged over classes for multi-class problems.
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub mcc: f64,
    pub n_samples: usize,
    /// Class names, indexing both axes of `confusion_matrix`.
    pub classes: Vec<String>,
    /// `confusion_matrix[truth][predicted]` counts.
    pub confusion_matrix: Vec<Vec<usize>>,
}

impl EvaluationMetrics {
    /// Score `predictions` against `truth`.
    ///
    /// `classes` names the class indices; unnamed indices are labelled by number.
    pub fn compute(
        truth: &Array1<usize>,
        predictions: &Array1<usize>,
        classes: &[String],
    ) -> Result<Self> {
        if truth.len() != predictions.len() {
            return Err(TrainError::ShapeMismatch {
                expected: format!("{} predictions", truth.len()),
                actual: format!("{} predictions", predictions.len()),
            });
        }
        if truth.is_empty() {
            return Err(TrainError::EmptyDataset);
        }

        let max_seen = truth
            .iter()
            .chain(predictions.iter())
            .copied()
            .max()
            .map_or(0, |m| m + 1);
        let n_classes = classes.len().max(max_seen);

        let mut confusion = vec![vec![0usize; n_classes]; n_classes];
        for (&t, &p) in truth.iter().zip(predictions.iter()) {
            confusion[t][p] += 1;
        }

        let (precision, recall, f1_score) = macro_scores(&confusion);
        let names = (0..n_classes)
            .map(|i| classes.get(i).cloned().unwrap_or_else(|| i.to_string()))
            .collect();

        Ok(EvaluationMetrics {
            accuracy: accuracy(&confusion),
            precision,
            recall,
            f1_score,
            mcc: mcc(&confusion),
            n_samples: truth.len(),
            classes: names,
            confusion_matrix: confusion,
        })
    }

    /// Scalar metrics as (name, value) pairs, in a stable order.
    pub fn scalars(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("accuracy", self.accuracy),
            ("precision", self.precision),
            ("recall", self.recall),
            ("f1_score", self.f1_score),
            ("mcc", self.mcc),
        ]
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

fn row_sums(cm: &[Vec<usize>]) -> Vec<f64> {
    cm.iter().map(|row| row.iter().sum::<usize>() as f64).collect()
}

fn col_sums(cm: &[Vec<usize>]) -> Vec<f64> {
    (0..cm.len())
        .map(|j| cm.iter().map(|row| row[j]).sum::<usize>() as f64)
        .collect()
}

fn accuracy(cm: &[Vec<usize>]) -> f64 {
    let correct: usize = (0..cm.len()).map(|k| cm[k][k]).sum();
    let total: f64 = row_sums(cm).iter().sum();
    ratio(correct as f64, total)
}

/// Macro precision, recall and F1 over every class that occurs in the truth
/// or the predictions. Undefined per-class ratios count as 0.
fn macro_scores(cm: &[Vec<usize>]) -> (f64, f64, f64) {
    let truth = row_sums(cm);
    let predicted = col_sums(cm);

    let (mut precision, mut recall, mut f1, mut n) = (0.0, 0.0, 0.0, 0usize);
    for k in 0..cm.len() {
        if truth[k] == 0.0 && predicted[k] == 0.0 {
            continue;
        }
        let tp = cm[k][k] as f64;
        let p = ratio(tp, predicted[k]);
        let r = ratio(tp, truth[k]);
        precision += p;
        recall += r;
        f1 += ratio(2.0 * p * r, p + r);
        n += 1;
    }
    let n = n as f64;
    (ratio(precision, n), ratio(recall, n), ratio(f1, n))
}

/// Multi-class Matthews correlation (Gorodkin's R_K); 0 when undefined.
fn mcc(cm: &[Vec<usize>]) -> f64 {
    let truth = row_sums(cm);
    let predicted = col_sums(cm);
    let s: f64 = truth.iter().sum();
    let c = (0..cm.len()).map(|k| cm[k][k]).sum::<usize>() as f64;

    let pt: f64 = predicted.iter().zip(&truth).map(|(p, t)| p * t).sum();
    let pp: f64 = predicted.iter().map(|p| p * p).sum();
    let tt: f64 = truth.iter().map(|t| t * t).sum();

    let den = ((s * s - pp) * (s * s - tt)).sqrt();
    if den.is_finite() {
        ratio(c * s - pt, den)
    } else {
        0.0
    }
}
