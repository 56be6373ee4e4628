//! Typed error hierarchy for the setup runner.
//!
//! Every variant is fatal: the binary prints the message and exits with
//! status 1. Variants fall into three groups:
//! - environment problems detected before or between steps
//! - step execution failures
//! - configuration loading failures

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a setup run.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Please make sure to run this script from the root directory of this repo.")]
    MissingProjectRoot { marker: PathBuf },

    #[error("{} file not found.", .path.display())]
    MissingEnvFile { path: PathBuf },

    #[error("Failed to update {}: {source}", .path.display())]
    EnvFileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid installed flag key '{key}': {source}")]
    InvalidKey {
        key: String,
        #[source]
        source: regex::Error,
    },

    #[error("Error occurred while executing: {command}")]
    StepFailed { command: String, exit_code: Option<i32> },

    #[error("Error occurred while executing: {command}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid setup configuration: {0}")]
    Config(#[source] anyhow::Error),
}

impl SetupError {
    /// The shell command associated with a step failure, if any.
    pub fn command(&self) -> Option<&str> {
        match self {
            SetupError::StepFailed { command, .. } | SetupError::SpawnFailed { command, .. } => {
                Some(command)
            }
            _ => None,
        }
    }
}
