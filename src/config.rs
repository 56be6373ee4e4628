//! Project configuration read from `setup.toml`.
//!
//! The file is optional; without it every setting matches the built-in
//! defaults. Layering is file → environment (`SETUP_SHELL`).
//!
//! ```toml
//! [project]
//! marker = "composer.json"
//! env_file = ".env"
//! env_example = ".env.example"
//! installed_key = "APP_INSTALLED"
//! shell = "sh"
//!
//! [commands]
//! composer = "composer install --no-interaction"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::steps;

/// File name looked up in the project directory.
pub const CONFIG_FILE: &str = "setup.toml";

/// Paths and keys the runner works with.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// File that must exist for the working directory to count as the project root
    #[serde(default = "default_marker")]
    pub marker: PathBuf,
    /// Line-oriented `KEY=value` file holding the installed flag
    #[serde(default = "default_env_file")]
    pub env_file: PathBuf,
    /// Source copied over `env_file` by the `cp_env` step
    #[serde(default = "default_env_example")]
    pub env_example: PathBuf,
    #[serde(default = "default_installed_key")]
    pub installed_key: String,
    /// Program invoked as `<shell> -c <command>`
    #[serde(default)]
    pub shell: Option<String>,
}

fn default_marker() -> PathBuf {
    PathBuf::from("composer.json")
}

fn default_env_file() -> PathBuf {
    PathBuf::from(".env")
}

fn default_env_example() -> PathBuf {
    PathBuf::from(".env.example")
}

fn default_installed_key() -> String {
    "APP_INSTALLED".to_string()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            env_file: default_env_file(),
            env_example: default_env_example(),
            installed_key: default_installed_key(),
            shell: None,
        }
    }
}

/// The complete `setup.toml` structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetupConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    /// Per-step command overrides keyed by step name
    #[serde(default)]
    pub commands: BTreeMap<String, String>,
}

impl SetupConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse setup.toml")
    }

    /// Load `setup.toml` from the project directory, or defaults if absent.
    pub fn load_or_default(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(CONFIG_FILE);
        if config_path.exists() {
            tracing::debug!(path = %config_path.display(), "loading setup configuration");
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Shell program, with `SETUP_SHELL` taking precedence over the file.
    pub fn shell(&self) -> String {
        std::env::var("SETUP_SHELL")
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| self.project.shell.clone())
            .unwrap_or_else(|| "sh".to_string())
    }

    /// Override for a step's command. `cp_env` runs in process and cannot
    /// be overridden.
    pub fn command_override(&self, step: &str) -> Option<&str> {
        if step == steps::CP_ENV {
            return None;
        }
        self.commands
            .get(step)
            .map(String::as_str)
            .filter(|cmd| !cmd.trim().is_empty())
    }

    /// Validate the configuration and return human-readable warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for (name, command) in &self.commands {
            if name == steps::CP_ENV {
                warnings.push(format!(
                    "Command override for '{}' is ignored: the env file is copied in process",
                    name
                ));
            } else if steps::default_command(name).is_none() {
                warnings.push(format!("Unknown step '{}' in [commands]", name));
            } else if command.trim().is_empty() {
                warnings.push(format!(
                    "Empty command for step '{}'; using the default",
                    name
                ));
            }
        }

        if self.project.installed_key.is_empty() || self.project.installed_key.contains('=') {
            warnings.push(format!(
                "Invalid installed_key '{}': must be non-empty and contain no '='",
                self.project.installed_key
            ));
        }

        warnings
    }
}
