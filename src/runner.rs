//! Sequential step runner.
//!
//! A run is strictly ordered:
//!
//! ```text
//! validate root marker
//! app_installed = false
//! cp_env → composer → key_generate → storage_link → npm_install
//!        → npm_build → migrate → seed → optimize → ide_helper
//! app_installed = true
//! success message (untargeted runs only)
//! ```
//!
//! Every step, the two flag toggles included, passes through the same gate.
//! The first failure aborts the run; completed steps are not rolled back.

use std::path::{Path, PathBuf};

use crate::config::SetupConfig;
use crate::env_file;
use crate::errors::SetupError;
use crate::executor::{Shell, SystemShell, execute_command};
use crate::filter::Filters;
use crate::steps::{self, Step, StepAction};
use crate::ui::{self, icons};

/// What a completed run did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Steps that ran, in order
    pub executed: Vec<&'static str>,
    /// Steps rejected by the gate, in order
    pub skipped: Vec<&'static str>,
    /// Whether the installed flag was written at the end of the run
    pub marked_installed: bool,
}

pub struct StepRunner {
    project_dir: PathBuf,
    config: SetupConfig,
    filters: Filters,
    shell: Box<dyn Shell>,
}

impl StepRunner {
    /// Create a runner that spawns real child processes.
    pub fn new(project_dir: impl AsRef<Path>, config: SetupConfig, filters: Filters) -> Self {
        let shell = SystemShell::new(config.shell(), project_dir.as_ref());
        Self::with_shell(project_dir, config, filters, Box::new(shell))
    }

    pub fn with_shell(
        project_dir: impl AsRef<Path>,
        config: SetupConfig,
        filters: Filters,
        shell: Box<dyn Shell>,
    ) -> Self {
        Self {
            project_dir: project_dir.as_ref().to_path_buf(),
            config,
            filters,
            shell,
        }
    }

    /// Confirm the working directory is the project root.
    pub fn validate_environment(&self) -> Result<(), SetupError> {
        let marker = self.project_dir.join(&self.config.project.marker);
        if !marker.exists() {
            return Err(SetupError::MissingProjectRoot { marker });
        }
        Ok(())
    }

    /// Execute the whole sequence. Returns on the first failure.
    pub async fn run(&self) -> Result<RunSummary, SetupError> {
        self.validate_environment()?;

        let mut summary = RunSummary::default();

        self.set_app_installed(false)?;

        for step in steps::build_steps(&self.config) {
            if !self.filters.should_run(step.name) {
                tracing::debug!(step = step.name, "step filtered out");
                summary.skipped.push(step.name);
                continue;
            }

            self.run_step(&step).await?;
            summary.executed.push(step.name);
        }

        summary.marked_installed = self.set_app_installed(true)?;

        if !self.filters.is_targeted() {
            ui::info(&icons::PARTY, "All tasks completed successfully.");
        }

        Ok(summary)
    }

    async fn run_step(&self, step: &Step) -> Result<(), SetupError> {
        tracing::debug!(step = step.name, "running step");
        match &step.action {
            StepAction::Shell(command) => {
                execute_command(self.shell.as_ref(), command, step.icon, step.message).await
            }
            StepAction::CopyEnvExample => self.copy_env_file(step),
        }
    }

    fn copy_env_file(&self, step: &Step) -> Result<(), SetupError> {
        ui::info(step.icon, step.message);

        let project = &self.config.project;
        let from = self.project_dir.join(&project.env_example);
        let to = self.project_dir.join(&project.env_file);

        if let Err(err) = std::fs::copy(&from, &to) {
            tracing::warn!(from = %from.display(), to = %to.display(), error = %err, "env copy failed");
            return Err(SetupError::StepFailed {
                command: format!(
                    "cp {} {}",
                    project.env_example.display(),
                    project.env_file.display()
                ),
                exit_code: None,
            });
        }
        Ok(())
    }

    /// Write the installed flag if `app_installed` passes the gate.
    ///
    /// Returns whether the flag was written.
    fn set_app_installed(&self, value: bool) -> Result<bool, SetupError> {
        if !self.filters.should_run(steps::APP_INSTALLED) {
            tracing::debug!(value, "installed flag toggle filtered out");
            return Ok(false);
        }

        let project = &self.config.project;
        let path = self.project_dir.join(&project.env_file);
        env_file::set_flag(&path, &project.installed_key, value)?;

        ui::info(
            &icons::CHECK,
            &format!(
                "{} set to {} in {}.",
                project.installed_key,
                value,
                project.env_file.display()
            ),
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Records every command and fails the ones listed in `failures`.
    #[derive(Default)]
    struct RecordingShell {
        calls: Arc<Mutex<Vec<String>>>,
        failures: Vec<(String, i32)>,
    }

    #[async_trait]
    impl Shell for RecordingShell {
        async fn run(&self, command: &str) -> std::io::Result<Option<i32>> {
            self.calls.lock().unwrap().push(command.to_string());
            let code = self
                .failures
                .iter()
                .find(|(cmd, _)| cmd == command)
                .map(|(_, code)| *code)
                .unwrap_or(0);
            Ok(Some(code))
        }
    }

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("composer.json"), "{}").unwrap();
        std::fs::write(
            dir.path().join(".env"),
            "APP_NAME=Demo\nAPP_INSTALLED=true\nDB_HOST=localhost\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join(".env.example"),
            "APP_NAME=Example\nAPP_INSTALLED=false\n",
        )
        .unwrap();
        dir
    }

    fn runner(
        dir: &TempDir,
        filters: Filters,
        failures: Vec<(String, i32)>,
    ) -> (StepRunner, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let shell = RecordingShell {
            calls: calls.clone(),
            failures,
        };
        let runner =
            StepRunner::with_shell(dir.path(), SetupConfig::default(), filters, Box::new(shell));
        (runner, calls)
    }

    fn env_flag(dir: &TempDir) -> Option<String> {
        let content = std::fs::read_to_string(dir.path().join(".env")).unwrap();
        env_file::read_flag(&content, "APP_INSTALLED").unwrap()
    }

    #[tokio::test]
    async fn full_run_executes_every_step_in_order() {
        let dir = project();
        let (runner, calls) = runner(&dir, Filters::default(), vec![]);

        let summary = runner.run().await.unwrap();

        assert_eq!(summary.executed, steps::step_names().collect::<Vec<_>>());
        assert!(summary.skipped.is_empty());
        assert!(summary.marked_installed);
        assert_eq!(
            *calls.lock().unwrap(),
            vec![
                "composer install",
                "php artisan key:generate",
                "php artisan storage:link --force",
                "npm install",
                "npm run build",
                "php artisan migrate",
                "php artisan db:seed",
                "php artisan optimize:clear",
                "php artisan ide-helper:generate && php artisan ide-helper:meta",
            ]
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join(".env")).unwrap(),
            "APP_NAME=Example\nAPP_INSTALLED=true\n"
        );
    }

    #[tokio::test]
    async fn only_migrate_runs_migrate_and_leaves_flag_unset() {
        let dir = project();
        let (runner, calls) = runner(&dir, Filters::new(Vec::<String>::new(), ["migrate"]), vec![]);

        let summary = runner.run().await.unwrap();

        assert_eq!(summary.executed, vec!["migrate"]);
        assert!(!summary.marked_installed);
        assert_eq!(*calls.lock().unwrap(), vec!["php artisan migrate"]);
        // Neither toggle passed the gate, so the file is untouched.
        assert_eq!(env_flag(&dir), Some("true".to_string()));
    }

    #[tokio::test]
    async fn only_migrate_with_app_installed_toggles_flag() {
        let dir = project();
        let (runner, calls) = runner(
            &dir,
            Filters::new(Vec::<String>::new(), ["migrate", "app_installed"]),
            vec![],
        );

        let summary = runner.run().await.unwrap();

        assert!(summary.marked_installed);
        assert_eq!(calls.lock().unwrap().len(), 1);
        assert_eq!(env_flag(&dir), Some("true".to_string()));
    }

    #[tokio::test]
    async fn only_app_installed_toggles_and_runs_nothing_else() {
        let dir = project();
        let (runner, calls) = runner(&dir, Filters::new(Vec::<String>::new(), ["app_installed"]), vec![]);

        let summary = runner.run().await.unwrap();

        assert!(summary.executed.is_empty());
        assert!(summary.marked_installed);
        assert!(calls.lock().unwrap().is_empty());
        assert_eq!(
            std::fs::read_to_string(dir.path().join(".env")).unwrap(),
            "APP_NAME=Demo\nAPP_INSTALLED=true\nDB_HOST=localhost\n"
        );
    }

    #[tokio::test]
    async fn skip_frontend_runs_everything_else() {
        let dir = project();
        let (runner, calls) = runner(
            &dir,
            Filters::from_lists(Some("npm_install,npm_build"), None),
            vec![],
        );

        let summary = runner.run().await.unwrap();

        assert_eq!(summary.skipped, vec!["npm_install", "npm_build"]);
        assert_eq!(summary.executed.len(), 8);
        assert!(summary.marked_installed);
        let calls = calls.lock().unwrap();
        assert!(!calls.iter().any(|c| c.starts_with("npm")));
        assert_eq!(calls.len(), 7);
    }

    #[tokio::test]
    async fn failing_step_aborts_the_run() {
        let dir = project();
        let (runner, calls) = runner(
            &dir,
            Filters::default(),
            vec![("php artisan migrate".to_string(), 2)],
        );

        let err = runner.run().await.unwrap_err();

        match err {
            SetupError::StepFailed { command, exit_code } => {
                assert_eq!(command, "php artisan migrate");
                assert_eq!(exit_code, Some(2));
            }
            other => panic!("Expected StepFailed, got {other:?}"),
        }
        let calls = calls.lock().unwrap();
        assert_eq!(calls.last().map(String::as_str), Some("php artisan migrate"));
        assert!(!calls.iter().any(|c| c == "php artisan db:seed"));
        assert_eq!(env_flag(&dir), Some("false".to_string()));
    }

    #[tokio::test]
    async fn missing_marker_fails_before_anything_runs() {
        let dir = project();
        std::fs::remove_file(dir.path().join("composer.json")).unwrap();
        let (runner, calls) = runner(&dir, Filters::default(), vec![]);

        let err = runner.run().await.unwrap_err();

        assert!(matches!(err, SetupError::MissingProjectRoot { .. }));
        assert!(calls.lock().unwrap().is_empty());
        assert_eq!(env_flag(&dir), Some("true".to_string()));
    }

    #[tokio::test]
    async fn missing_env_file_is_fatal_and_not_created() {
        let dir = project();
        std::fs::remove_file(dir.path().join(".env")).unwrap();
        let (runner, calls) = runner(&dir, Filters::default(), vec![]);

        let err = runner.run().await.unwrap_err();

        assert!(matches!(err, SetupError::MissingEnvFile { .. }));
        assert!(calls.lock().unwrap().is_empty());
        assert!(!dir.path().join(".env").exists());
    }

    #[tokio::test]
    async fn missing_env_example_fails_cp_env() {
        let dir = project();
        std::fs::remove_file(dir.path().join(".env.example")).unwrap();
        let (runner, calls) = runner(&dir, Filters::default(), vec![]);

        let err = runner.run().await.unwrap_err();

        assert_eq!(err.command(), Some("cp .env.example .env"));
        assert!(calls.lock().unwrap().is_empty());
    }
}
