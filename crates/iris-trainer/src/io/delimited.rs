//! CSV / TSV reader producing a `Table`.
use std::path::Path;

use csv::StringRecord;

use crate::data_handling::{Column, Table, Value};
use crate::error::{Result, TrainError};

/// Configuration for reading delimited text files.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Field delimiter. When `None` it is inferred from the file extension
    /// (`.tsv` -> tab, anything else -> comma).
    pub delimiter: Option<u8>,
    /// Whether the first row holds column names. Without headers, columns
    /// are named `column_0`, `column_1`, ...
    pub has_headers: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_headers: true,
        }
    }
}

/// Read a `.csv` or `.tsv` file with default settings.
pub fn read_delimited<P: AsRef<Path>>(path: P) -> Result<Table> {
    read_delimited_with_config(path, &ReaderConfig::default())
}

/// Read a delimited file using a custom configuration.
pub fn read_delimited_with_config<P: AsRef<Path>>(path: P, config: &ReaderConfig) -> Result<Table> {
    let path = path.as_ref();
    let delimiter = config.delimiter.unwrap_or_else(|| infer_delimiter(path));

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(config.has_headers)
        .flexible(false)
        .from_path(path)?;

    let headers: Option<StringRecord> = if config.has_headers {
        Some(reader.headers()?.clone())
    } else {
        None
    };

    let mut cells: Vec<Vec<Value>> = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        if cells.is_empty() {
            cells = (0..record.len()).map(|_| Vec::new()).collect();
        }
        if record.len() != cells.len() {
            return Err(TrainError::ShapeMismatch {
                expected: format!("{} fields", cells.len()),
                actual: format!("{} fields at row {}", record.len(), row_idx + 1),
            });
        }
        for (col, field) in record.iter().enumerate() {
            cells[col].push(Value::parse(field));
        }
    }

    let names: Vec<String> = match &headers {
        Some(h) => h.iter().map(|s| s.trim().to_string()).collect(),
        None => (0..cells.len()).map(|i| format!("column_{}", i)).collect(),
    };

    // A header-only file still yields its (empty) columns.
    if cells.is_empty() {
        cells = names.iter().map(|_| Vec::new()).collect();
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::new(name, values))
        .collect();

    let table = Table::new(columns)?;
    log::debug!(
        "Read {} rows x {} columns from {}",
        table.n_rows(),
        table.n_cols(),
        path.display()
    );
    Ok(table)
}

/// Check that `path` exists and has a `.tsv` or `.csv` extension.
pub fn validate_tsv_or_csv_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    match ext.as_deref() {
        Some("tsv") | Some("csv") => {}
        _ => {
            return Err(TrainError::InvalidConfig(format!(
                "file must have a .tsv or .csv extension: {}",
                path.display()
            )))
        }
    }

    if !path.exists() {
        return Err(TrainError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("file does not exist: {}", path.display()),
        )));
    }

    Ok(())
}

fn infer_delimiter(path: &Path) -> u8 {
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}
