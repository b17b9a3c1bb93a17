//! Synthetic datasets for demos and tests.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data_handling::{Column, Table, Value};

pub const IRIS_FEATURES: [&str; 4] = ["sepal_length", "sepal_width", "petal_length", "petal_width"];
pub const IRIS_LABEL: &str = "species";

/// Per-class feature means and half-widths, in `IRIS_FEATURES` order.
const IRIS_CLASSES: [(&str, [f64; 4], [f64; 4]); 3] = [
    ("setosa", [5.0, 3.4, 1.5, 0.25], [0.5, 0.4, 0.2, 0.1]),
    ("versicolor", [5.9, 2.8, 4.3, 1.3], [0.6, 0.4, 0.5, 0.2]),
    ("virginica", [6.6, 3.0, 5.6, 2.0], [0.7, 0.4, 0.6, 0.3]),
];

/// An iris-shaped table: four numeric measurement columns and a `species`
/// text column with three balanced classes, `3 * n_per_class` rows in total.
///
/// Rows are grouped by class. The same `seed` always gives the same table.
pub fn iris_like(n_per_class: usize, seed: u64) -> Table {
    let mut rng = StdRng::seed_from_u64(seed);
    let n_rows = n_per_class * IRIS_CLASSES.len();

    let mut features: Vec<Vec<Value>> = vec![Vec::with_capacity(n_rows); IRIS_FEATURES.len()];
    let mut species = Vec::with_capacity(n_rows);

    for (name, means, spreads) in IRIS_CLASSES.iter() {
        for _ in 0..n_per_class {
            for (j, values) in features.iter_mut().enumerate() {
                // Sum of two uniforms: triangular noise around the mean.
                let noise = rng.gen_range(-0.5..0.5) + rng.gen_range(-0.5..0.5);
                let value = (means[j] + noise * spreads[j]).max(0.1);
                values.push(Value::Number((value * 10.0).round() / 10.0));
            }
            species.push(Value::Text(name.to_string()));
        }
    }

    let mut columns: Vec<Column> = IRIS_FEATURES
        .iter()
        .zip(features)
        .map(|(name, values)| Column::new(*name, values))
        .collect();
    columns.push(Column::new(IRIS_LABEL, species));

    Table { columns, n_rows }
}
