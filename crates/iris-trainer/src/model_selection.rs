//! Randomized train/test partitioning.
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::data_handling::{Column, Table};
use crate::error::{Result, TrainError};

/// Guards against `0.2 * 150` landing a hair above 30.
const ROUNDING_EPS: f64 = 1e-9;

/// The four partitions of a split, plus the source row indices of each side.
#[derive(Debug, Clone)]
pub struct TrainTestSplit<X, Y> {
    pub x_train: X,
    pub x_test: X,
    pub y_train: Y,
    pub y_test: Y,
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

impl<X, Y> TrainTestSplit<X, Y> {
    pub fn n_train(&self) -> usize {
        self.train_indices.len()
    }

    pub fn n_test(&self) -> usize {
        self.test_indices.len()
    }
}

/// Number of (train, test) rows for `n_samples` at `test_size`.
///
/// The test side is rounded up; both sides must end up non-empty.
pub fn split_sizes(n_samples: usize, test_size: f64) -> Result<(usize, usize)> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(TrainError::InvalidTestSize(test_size));
    }

    let n_test = ((test_size * n_samples as f64) - ROUNDING_EPS).ceil().max(0.0) as usize;
    let n_test = n_test.min(n_samples);
    let n_train = n_samples - n_test;

    if n_train == 0 || n_test == 0 {
        return Err(TrainError::DegenerateSplit {
            n_samples,
            test_size,
            n_train,
            n_test,
        });
    }

    Ok((n_train, n_test))
}

/// Seeded permutation of `0..n_samples` cut into (train, test) index lists.
pub fn split_indices(
    n_samples: usize,
    test_size: f64,
    random_state: u64,
) -> Result<(Vec<usize>, Vec<usize>)> {
    let (_, n_test) = split_sizes(n_samples, test_size)?;

    let mut rng = StdRng::seed_from_u64(random_state);
    let mut permutation: Vec<usize> = (0..n_samples).collect();
    permutation.shuffle(&mut rng);

    let train = permutation.split_off(n_test);
    Ok((train, permutation))
}

/// Randomly partition rows of `features` and `labels` into train and test sets.
///
/// No stratification is performed. The same inputs and `random_state` always
/// produce the same partition.
pub fn train_test_split(
    features: &Table,
    labels: &Column,
    test_size: f64,
    random_state: u64,
) -> Result<TrainTestSplit<Table, Column>> {
    let n_samples = features.n_rows();
    if labels.len() != n_samples {
        return Err(TrainError::ShapeMismatch {
            expected: format!("{} labels", n_samples),
            actual: format!("{} labels", labels.len()),
        });
    }

    let (train_indices, test_indices) = split_indices(n_samples, test_size, random_state)?;
    log::debug!(
        "Split {} rows into {} train / {} test (test_size={}, random_state={})",
        n_samples,
        train_indices.len(),
        test_indices.len(),
        test_size,
        random_state
    );

    Ok(TrainTestSplit {
        x_train: features.select_rows(&train_indices),
        x_test: features.select_rows(&test_indices),
        y_train: labels.select(&train_indices),
        y_test: labels.select(&test_indices),
        train_indices,
        test_indices,
    })
}
