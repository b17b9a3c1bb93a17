use anyhow::Result;
use std::path::Path;

/// Check that `path` names an existing `.tsv` or `.csv` file.
pub fn validate_tsv_or_csv_file<P: AsRef<Path>>(path: P) -> Result<()> {
    iris_trainer::io::validate_tsv_or_csv_file(path.as_ref())?;
    Ok(())
}

/// Pretty JSON of the default training configuration, as printed by
/// `iris-trainer default-config`.
pub fn default_config_json() -> Result<String> {
    let config = iris_trainer::config::TrainConfig::default();
    Ok(serde_json::to_string_pretty(&config)?)
}
