//! Conversion of tables into the numeric arrays the models consume.
//!
//! Features become an `Array2<f64>` (rows are samples); labels become class
//! indices through a `LabelEncoder` fitted on the full label column.
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use ndarray::{Array1, Array2};

use crate::data_handling::{Column, Table, Value};
use crate::error::{Result, TrainError};

/// Build a dense feature matrix from every column of `table`.
///
/// Text or missing cells are rejected: the forest only handles numeric input.
pub fn feature_matrix(table: &Table) -> Result<Array2<f64>> {
    let (nrows, ncols) = (table.n_rows(), table.n_cols());
    let mut x = Array2::<f64>::zeros((nrows, ncols));

    for (c, column) in table.columns().iter().enumerate() {
        for (r, value) in column.values.iter().enumerate() {
            x[[r, c]] = value.as_f64().ok_or_else(|| TrainError::NonNumericFeature {
                column: column.name.clone(),
                row: r,
                value: value.to_string(),
            })?;
        }
    }

    Ok(x)
}

/// Maps label values to contiguous class indices.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelEncoder {
    column: String,
    classes: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelEncoder {
    /// Learn the set of classes from a label column.
    ///
    /// Numeric labels are sorted numerically, text labels lexicographically.
    /// A column whose values are all numbers with at least one non-integral
    /// value is treated as a regression target and rejected.
    pub fn fit(labels: &Column) -> Result<Self> {
        if labels.is_empty() {
            return Err(TrainError::EmptyDataset);
        }

        for (row, value) in labels.values.iter().enumerate() {
            if value.is_missing() {
                return Err(TrainError::MissingLabel {
                    column: labels.name.clone(),
                    row,
                });
            }
        }

        let all_numeric = labels.values.iter().all(|v| matches!(v, Value::Number(_)));
        if all_numeric
            && labels
                .values
                .iter()
                .filter_map(Value::as_f64)
                .any(|v| v.fract() != 0.0)
        {
            return Err(TrainError::ContinuousLabels(labels.name.clone()));
        }

        // Dedupe on the same key `transform` looks up.
        let mut seen = HashSet::new();
        let mut distinct: Vec<&Value> = Vec::new();
        for value in &labels.values {
            if seen.insert(value.to_string()) {
                distinct.push(value);
            }
        }
        distinct.sort_by(|a, b| compare_labels(a, b));

        let classes: Vec<String> = distinct.iter().map(|v| v.to_string()).collect();
        if classes.len() < 2 {
            log::warn!(
                "Label column '{}' holds a single class; the classifier will be trivial",
                labels.name
            );
        }

        Ok(Self::from_classes(labels.name.clone(), classes))
    }

    fn from_classes(column: String, classes: Vec<String>) -> Self {
        let index = classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        LabelEncoder {
            column,
            classes,
            index,
        }
    }

    pub fn transform(&self, labels: &Column) -> Result<Array1<usize>> {
        labels
            .values
            .iter()
            .enumerate()
            .map(|(row, value)| {
                if value.is_missing() {
                    return Err(TrainError::MissingLabel {
                        column: labels.name.clone(),
                        row,
                    });
                }
                let key = value.to_string();
                self.index
                    .get(&key)
                    .copied()
                    .ok_or(TrainError::UnknownLabel(key))
            })
            .collect::<Result<Vec<_>>>()
            .map(Array1::from_vec)
    }

    pub fn inverse_transform(&self, indices: &Array1<usize>) -> Vec<String> {
        indices
            .iter()
            .map(|&i| self.classes.get(i).cloned().unwrap_or_default())
            .collect()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn column(&self) -> &str {
        &self.column
    }
}

fn compare_labels(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Value::Number(_), _) => Ordering::Less,
        (_, Value::Number(_)) => Ordering::Greater,
        _ => a.to_string().cmp(&b.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_matrix() {
        let table = Table::new(vec![
            Column::new("a", vec![1.0.into(), 2.0.into()]),
            Column::new("b", vec![3.0.into(), 4.0.into()]),
        ])
        .unwrap();
        let x = feature_matrix(&table).unwrap();
        assert_eq!(x.shape(), &[2, 2]);
        assert_eq!(x[[1, 0]], 2.0);
        assert_eq!(x[[0, 1]], 3.0);
    }

    #[test]
    fn test_feature_matrix_rejects_text() {
        let table = Table::new(vec![Column::new("a", vec![1.0.into(), "oops".into()])]).unwrap();
        match feature_matrix(&table) {
            Err(TrainError::NonNumericFeature { column, row, .. }) => {
                assert_eq!(column, "a");
                assert_eq!(row, 1);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_label_encoder_text() {
        let labels = Column::new(
            "species",
            vec!["virginica".into(), "setosa".into(), "versicolor".into(), "setosa".into()],
        );
        let enc = LabelEncoder::fit(&labels).unwrap();
        assert_eq!(enc.classes(), &["setosa", "versicolor", "virginica"]);
        let y = enc.transform(&labels).unwrap();
        assert_eq!(y.to_vec(), vec![2, 0, 1, 0]);
        assert_eq!(enc.inverse_transform(&y)[0], "virginica");
    }

    #[test]
    fn test_label_encoder_integer_classes() {
        let labels = Column::new("target", vec![2.0.into(), 0.0.into(), 1.0.into(), 10.0.into()]);
        let enc = LabelEncoder::fit(&labels).unwrap();
        assert_eq!(enc.classes(), &["0", "1", "2", "10"]);
    }

    #[test]
    fn test_label_encoder_mixed_number_and_text() {
        let labels = Column::new("y", vec![1.0.into(), "1".into(), "2".into(), 2.0.into()]);
        let enc = LabelEncoder::fit(&labels).unwrap();
        assert_eq!(enc.classes(), &["1", "2"]);
        assert_eq!(enc.n_classes(), 2);
        let y = enc.transform(&labels).unwrap();
        assert_eq!(y.to_vec(), vec![0, 0, 1, 1]);
    }

    #[test]
    fn test_label_encoder_rejects_continuous() {
        let labels = Column::new("width", vec![0.2.into(), 1.4.into(), 2.0.into()]);
        assert!(matches!(
            LabelEncoder::fit(&labels),
            Err(TrainError::ContinuousLabels(_))
        ));
    }

    #[test]
    fn test_label_encoder_rejects_missing() {
        let labels = Column::new("y", vec!["a".into(), Value::Missing]);
        assert!(matches!(
            LabelEncoder::fit(&labels),
            Err(TrainError::MissingLabel { row: 1, .. })
        ));
    }

    #[test]
    fn test_transform_unknown_label() {
        let enc = LabelEncoder::fit(&Column::new("y", vec!["a".into(), "b".into()])).unwrap();
        let res = enc.transform(&Column::new("y", vec!["c".into()]));
        assert!(matches!(res, Err(TrainError::UnknownLabel(_))));
    }
}
