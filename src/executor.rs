//! Command execution for setup steps.
//!
//! Commands run through a shell (`sh -c` by default) with the parent's
//! stdin, stdout and stderr inherited, so installers and build tools stream
//! their output live. Only the exit status is inspected.

use async_trait::async_trait;
use console::Emoji;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::errors::SetupError;
use crate::ui;

/// Runs a shell command to completion and reports its exit code.
///
/// `Ok(None)` means the child was terminated by a signal.
#[async_trait]
pub trait Shell: Send + Sync {
    async fn run(&self, command: &str) -> std::io::Result<Option<i32>>;
}

/// Spawns real child processes via `<program> -c <command>`.
pub struct SystemShell {
    program: String,
    /// Working directory for every child
    project_dir: PathBuf,
}

impl SystemShell {
    pub fn new(program: impl Into<String>, project_dir: impl AsRef<Path>) -> Self {
        Self {
            program: program.into(),
            project_dir: project_dir.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl Shell for SystemShell {
    async fn run(&self, command: &str) -> std::io::Result<Option<i32>> {
        tracing::debug!(shell = %self.program, command, "spawning step command");

        let status = Command::new(&self.program)
            .arg("-c")
            .arg(command)
            .current_dir(&self.project_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;

        tracing::debug!(command, exit_code = ?status.code(), "step command finished");
        Ok(status.code())
    }
}

/// Print `message`, run `command`, and fail unless it exits with status 0.
pub async fn execute_command(
    shell: &dyn Shell,
    command: &str,
    icon: &Emoji<'_, '_>,
    message: &str,
) -> Result<(), SetupError> {
    ui::info(icon, message);

    let exit_code = shell
        .run(command)
        .await
        .map_err(|source| SetupError::SpawnFailed {
            command: command.to_string(),
            source,
        })?;

    match exit_code {
        Some(0) => Ok(()),
        exit_code => {
            tracing::warn!(command, ?exit_code, "step command failed");
            Err(SetupError::StepFailed {
                command: command.to_string(),
                exit_code,
            })
        }
    }
}
