//! IO utilities for loading delimited tabular files.

pub mod delimited;

pub use delimited::{
    read_delimited, read_delimited_with_config, validate_tsv_or_csv_file, ReaderConfig,
};
