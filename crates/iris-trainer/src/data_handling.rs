//! In-memory tabular data and the dataset reference abstraction.
//!
//! A `Table` is an ordered list of named columns of equal length. Tables are
//! never mutated by the training routine: dropping the label column and
//! selecting train/test rows always produce new tables.
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Result, TrainError};
use crate::io::{read_delimited_with_config, ReaderConfig};

/// A single cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Missing,
}

impl Value {
    /// Parse a raw cell. Empty strings and the usual NA spellings become `Missing`.
    pub fn parse(raw: &str) -> Value {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Value::Missing;
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "na" | "nan" | "null" | "none" => return Value::Missing,
            _ => {}
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Value::Number(v),
            _ => Value::Text(trimmed.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) => write!(f, "{}", v),
            Value::Text(s) => write!(f, "{}", s),
            Value::Missing => write!(f, "NA"),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Column {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Gather the values at `indices`, in the given order.
    pub fn select(&self, indices: &[usize]) -> Column {
        Column {
            name: self.name.clone(),
            values: indices.iter().map(|&i| self.values[i].clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub(crate) columns: Vec<Column>,
    pub(crate) n_rows: usize,
}

impl Table {
    /// Build a table, checking that column names are unique and lengths agree.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let n_rows = columns.first().map(|c| c.len()).unwrap_or(0);

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(TrainError::DuplicateColumn(column.name.clone()));
            }
            if column.len() != n_rows {
                return Err(TrainError::ShapeMismatch {
                    expected: format!("{} rows in column '{}'", n_rows, column.name),
                    actual: format!("{} rows", column.len()),
                });
            }
        }

        Ok(Table { columns, n_rows })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| TrainError::MissingColumn {
                column: name.to_string(),
                available: self.column_names(),
            })
    }

    /// Split off the named column, returning the remaining table (column order
    /// preserved) and the removed column.
    pub fn drop_column(&self, name: &str) -> Result<(Table, Column)> {
        let Some(idx) = self.columns.iter().position(|c| c.name == name) else {
            return Err(TrainError::MissingColumn {
                column: name.to_string(),
                available: self.column_names(),
            });
        };

        let mut rest = self.columns.clone();
        let removed = rest.remove(idx);
        Ok((
            Table {
                columns: rest,
                n_rows: self.n_rows,
            },
            removed,
        ))
    }

    /// Gather rows by index into a new table.
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        Table {
            columns: self.columns.iter().map(|c| c.select(indices)).collect(),
            n_rows: indices.len(),
        }
    }

    pub fn row(&self, idx: usize) -> Vec<&Value> {
        self.columns.iter().map(|c| &c.values[idx]).collect()
    }
}

/// Opaque handle to tabular data that can be materialized on demand.
pub trait DataItem {
    fn as_table(&self) -> Result<Table>;

    /// Human readable description used in log lines.
    fn describe(&self) -> String;
}

impl DataItem for Table {
    fn as_table(&self) -> Result<Table> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory table ({} rows x {} columns)", self.n_rows, self.n_cols())
    }
}

/// A delimited text file on disk (`.csv` or `.tsv`).
#[derive(Debug, Clone)]
pub struct CsvDataItem {
    path: PathBuf,
    config: ReaderConfig,
}

impl CsvDataItem {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config: ReaderConfig::default(),
        }
    }

    pub fn with_config<P: AsRef<Path>>(path: P, config: ReaderConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataItem for CsvDataItem {
    fn as_table(&self) -> Result<Table> {
        read_delimited_with_config(&self.path, &self.config)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
