use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::RunlogError;
use crate::types::RunRecord;

pub const CONFIG_FILE: &str = "mlt.json";
pub const RUN_RECORD_FILE: &str = ".push.json";

/// Project config written when the app was created.
#[derive(Debug, Deserialize)]
struct AppConfig {
    name: String,
    namespace: String,
}

/// Record the deploy flow leaves behind after pushing a run.
#[derive(Debug, Deserialize)]
struct PushRecord {
    app_run_id: String,
}

/// Reads the run record of the latest deploy from an app directory.
#[derive(Debug, Clone)]
pub struct RunRecordStore {
    app_dir: PathBuf,
    namespace_override: Option<String>,
}

impl RunRecordStore {
    pub fn new(app_dir: impl Into<PathBuf>) -> Self {
        RunRecordStore {
            app_dir: app_dir.into(),
            namespace_override: None,
        }
    }

    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace_override = namespace;
        self
    }

    pub fn load(&self) -> Result<RunRecord, RunlogError> {
        let record_path = self.app_dir.join(RUN_RECORD_FILE);
        if !record_path.exists() {
            debug!("No run record at {}", record_path.display());
            return Err(RunlogError::NotDeployed);
        }
        let push: PushRecord = serde_json::from_str(&read(&record_path)?).map_err(|source| {
            RunlogError::MalformedRecord {
                path: record_path.clone(),
                source,
            }
        })?;

        let config_path = self.app_dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Err(RunlogError::ConfigNotFound { path: config_path });
        }
        let config: AppConfig = serde_json::from_str(&read(&config_path)?).map_err(|source| {
            RunlogError::InvalidConfig {
                path: config_path.clone(),
                source,
            }
        })?;

        let record = RunRecord {
            job_name: config.name,
            namespace: self
                .namespace_override
                .clone()
                .unwrap_or(config.namespace),
            run_id: push.app_run_id,
        };
        if record.run_id_segments().len() < 2 {
            debug!("Run id {:?} has fewer than two segments", record.run_id);
            return Err(RunlogError::CorruptRunId);
        }

        debug!(
            "Loaded run {} of job {} in namespace {}",
            record.run_id, record.job_name, record.namespace
        );
        Ok(record)
    }
}

fn read(path: &Path) -> Result<String, RunlogError> {
    std::fs::read_to_string(path).map_err(|source| RunlogError::Read {
        path: path.to_path_buf(),
        source,
    })
}
