//! Filesystem run store.
//!
//! Layout under the root directory:
//!
//! ```text
//! registrations.jsonl
//! <model_name>/<run_id>/run.json
//! <model_name>/<run_id>/model.json     (when save_model)
//! <model_name>/<run_id>/report.html    (when write_report)
//! ```
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::TrackingConfig;
use crate::error::Result;
use crate::models::ModelArtifact;
use crate::tracking::report::render_run_report;
use crate::tracking::tracker::{ModelRegistration, RunRecord, Tracker};

pub struct LocalTracker {
    root: PathBuf,
    write_report: bool,
    save_model: bool,
    written: Vec<PathBuf>,
}

impl LocalTracker {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self::from_config(&TrackingConfig {
            output_dir: root.as_ref().to_path_buf(),
            ..TrackingConfig::default()
        })
    }

    pub fn from_config(config: &TrackingConfig) -> Self {
        Self {
            root: config.output_dir.clone(),
            write_report: config.write_report,
            save_model: config.save_model,
            written: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn run_dir(&self, model_name: &str, run_id: &str) -> PathBuf {
        self.root.join(model_name).join(run_id)
    }

    /// Directories of the runs logged through this tracker, in order.
    pub fn written_runs(&self) -> &[PathBuf] {
        &self.written
    }

    /// Read back every stored run of `model_name`, oldest first.
    pub fn load_runs(&self, model_name: &str) -> Result<Vec<RunRecord>> {
        let model_dir = self.root.join(model_name);
        if !model_dir.exists() {
            return Ok(Vec::new());
        }

        let mut runs = Vec::new();
        for entry in fs::read_dir(&model_dir)? {
            let path = entry?.path().join("run.json");
            if path.is_file() {
                let content = fs::read_to_string(&path)?;
                runs.push(serde_json::from_str::<RunRecord>(&content)?);
            }
        }
        runs.sort_by(|a, b| a.started_at.cmp(&b.started_at));
        Ok(runs)
    }

    /// Read back every registration, in the order they were made.
    pub fn load_registrations(&self) -> Result<Vec<ModelRegistration>> {
        let path = self.root.join("registrations.jsonl");
        if !path.exists() {
            return Ok(Vec::new());
        }
        fs::read_to_string(&path)?
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(Into::into))
            .collect()
    }
}

impl Tracker for LocalTracker {
    fn register(&mut self, registration: &ModelRegistration) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.root.join("registrations.jsonl"))?;
        writeln!(file, "{}", serde_json::to_string(registration)?)?;
        Ok(())
    }

    fn log_run(&mut self, run: &RunRecord, artifact: &ModelArtifact) -> Result<()> {
        let dir = self.run_dir(&run.model_name, &run.run_id);
        fs::create_dir_all(&dir)?;

        fs::write(dir.join("run.json"), serde_json::to_vec_pretty(run)?)?;
        if self.save_model {
            fs::write(dir.join(format!("model.{}", artifact.format)), &artifact.bytes)?;
        }
        if self.write_report {
            fs::write(dir.join("report.html"), render_run_report(run))?;
        }

        log::debug!("Wrote run {} to {}", run.run_id, dir.display());
        self.written.push(dir);
        Ok(())
    }
}
