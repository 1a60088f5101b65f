use std::path::PathBuf;
use thiserror::Error;

use crate::utils::missing_tool_name;

#[derive(Debug, Error)]
pub enum RunlogError {
    #[error("This app has not been deployed yet, there are no logs to display.")]
    NotDeployed,

    #[error("Please re-deploy app again, something went wrong.")]
    CorruptRunId,

    #[error("Please re-deploy app again, something went wrong. ({}: {source})", path.display())]
    MalformedRecord {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No app config found at {}", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid app config {}: {source}", path.display())]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No pods found in namespace: {namespace}")]
    NoPodsInNamespace { namespace: String },

    #[error("No logs to show because no pods founds for this job.")]
    NoPodsForJob,

    #[error("Please install `{tool}`. It is a prerequisite for `runlog` to work")]
    MissingTool { tool: String },

    #[error("Exception: {0}")]
    Tool(String),

    #[error("Failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

impl RunlogError {
    /// Maps a failed launch of `program` to the error shown to the operator.
    pub fn launch(program: &str, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            RunlogError::MissingTool {
                tool: program.to_string(),
            }
        } else {
            Self::from_tool_output(&err.to_string())
        }
    }

    /// Classifies text an external tool wrote to stderr.
    pub fn from_tool_output(text: &str) -> Self {
        match missing_tool_name(text) {
            Some(tool) => RunlogError::MissingTool { tool },
            None => RunlogError::Tool(text.trim().to_string()),
        }
    }

    pub fn exit_code(&self) -> i32 {
        1
    }
}
