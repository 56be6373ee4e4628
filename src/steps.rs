//! The fixed, ordered table of setup steps.
//!
//! Step names double as filter tokens for `--only` and `--skip`, so they must
//! stay unique and stable across releases.

use console::Emoji;

use crate::config::SetupConfig;
use crate::ui::icons;

/// Pseudo-step name gating both installed-flag toggles.
pub const APP_INSTALLED: &str = "app_installed";

pub const CP_ENV: &str = "cp_env";
pub const COMPOSER: &str = "composer";
pub const KEY_GENERATE: &str = "key_generate";
pub const STORAGE_LINK: &str = "storage_link";
pub const NPM_INSTALL: &str = "npm_install";
pub const NPM_BUILD: &str = "npm_build";
pub const MIGRATE: &str = "migrate";
pub const SEED: &str = "seed";
pub const OPTIMIZE: &str = "optimize";
pub const IDE_HELPER: &str = "ide_helper";

/// What a step does when it passes the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    /// Run through the configured shell with inherited stdio.
    Shell(String),
    /// Copy the env example file over the env file, in process.
    CopyEnvExample,
}

/// A single named, independently skippable unit of setup work.
#[derive(Clone)]
pub struct Step {
    pub name: &'static str,
    /// Shown in the usage listing
    pub description: &'static str,
    /// Printed right before the step runs
    pub message: &'static str,
    pub icon: &'static Emoji<'static, 'static>,
    pub action: StepAction,
}

struct StepDef {
    name: &'static str,
    description: &'static str,
    message: &'static str,
    icon: &'static Emoji<'static, 'static>,
    command: Option<&'static str>,
}

static STEP_DEFS: [StepDef; 10] = [
    StepDef {
        name: CP_ENV,
        description: "Copy .env.example to .env",
        message: "Copying .env.example to .env...",
        icon: &icons::NEWSPAPER,
        command: None,
    },
    StepDef {
        name: COMPOSER,
        description: "Install Composer Dependencies",
        message: "Running composer install...",
        icon: &icons::ALEMBIC,
        command: Some("composer install"),
    },
    StepDef {
        name: KEY_GENERATE,
        description: "Generate Application Key",
        message: "Generating application key...",
        icon: &icons::KEY,
        command: Some("php artisan key:generate"),
    },
    StepDef {
        name: STORAGE_LINK,
        description: "Create Storage Symlink",
        message: "Linking storage...",
        icon: &icons::LINK,
        command: Some("php artisan storage:link --force"),
    },
    StepDef {
        name: NPM_INSTALL,
        description: "Install NPM Packages",
        message: "Installing npm packages...",
        icon: &icons::ALEMBIC,
        command: Some("npm install"),
    },
    StepDef {
        name: NPM_BUILD,
        description: "Build Frontend Assets",
        message: "Running npm build...",
        icon: &icons::BUILD,
        command: Some("npm run build"),
    },
    StepDef {
        name: MIGRATE,
        description: "Run Database Migrations",
        message: "Running migrations...",
        icon: &icons::CABINET,
        command: Some("php artisan migrate"),
    },
    StepDef {
        name: SEED,
        description: "Seed Database",
        message: "Seeding database...",
        icon: &icons::SEEDLING,
        command: Some("php artisan db:seed"),
    },
    StepDef {
        name: OPTIMIZE,
        description: "Clear Application Cache",
        message: "Clearing cache...",
        icon: &icons::BROOM,
        command: Some("php artisan optimize:clear"),
    },
    StepDef {
        name: IDE_HELPER,
        description: "Generate IDE Helper Files",
        message: "Generating IDE helper docs...",
        icon: &icons::MEMO,
        command: Some("php artisan ide-helper:generate && php artisan ide-helper:meta"),
    },
];

/// Names of every real step, in execution order.
pub fn step_names() -> impl Iterator<Item = &'static str> {
    STEP_DEFS.iter().map(|def| def.name)
}

/// `(name, description)` pairs for the usage listing, in execution order.
pub fn descriptions() -> impl Iterator<Item = (&'static str, &'static str)> {
    STEP_DEFS.iter().map(|def| (def.name, def.description))
}

/// The default command for a step, before any `setup.toml` override.
pub fn default_command(name: &str) -> Option<&'static str> {
    STEP_DEFS
        .iter()
        .find(|def| def.name == name)
        .and_then(|def| def.command)
}

/// Build the step table, applying command overrides from the configuration.
pub fn build_steps(config: &SetupConfig) -> Vec<Step> {
    STEP_DEFS
        .iter()
        .map(|def| {
            let action = match def.command {
                None => StepAction::CopyEnvExample,
                Some(default) => StepAction::Shell(
                    config
                        .command_override(def.name)
                        .unwrap_or(default)
                        .to_string(),
                ),
            };
            Step {
                name: def.name,
                description: def.description,
                message: def.message,
                icon: def.icon,
                action,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn step_names_are_unique() {
        let names: Vec<_> = step_names().collect();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(names.len(), unique.len());
        assert!(!names.contains(&APP_INSTALLED));
    }

    #[test]
    fn steps_run_in_fixed_order() {
        let names: Vec<_> = step_names().collect();
        assert_eq!(
            names,
            vec![
                "cp_env",
                "composer",
                "key_generate",
                "storage_link",
                "npm_install",
                "npm_build",
                "migrate",
                "seed",
                "optimize",
                "ide_helper",
            ]
        );
    }

    #[test]
    fn default_table_uses_builtin_commands() {
        let steps = build_steps(&SetupConfig::default());
        assert_eq!(steps[0].action, StepAction::CopyEnvExample);
        assert_eq!(
            steps[1].action,
            StepAction::Shell("composer install".to_string())
        );
        let ide = steps.iter().find(|s| s.name == IDE_HELPER).unwrap();
        assert_eq!(
            ide.action,
            StepAction::Shell(
                "php artisan ide-helper:generate && php artisan ide-helper:meta".to_string()
            )
        );
    }

    #[test]
    fn overrides_replace_commands() {
        let config = SetupConfig::parse(
            r#"
[commands]
migrate = "php artisan migrate --force"
cp_env = "ignored"
"#,
        )
        .unwrap();
        let steps = build_steps(&config);
        let migrate = steps.iter().find(|s| s.name == MIGRATE).unwrap();
        assert_eq!(
            migrate.action,
            StepAction::Shell("php artisan migrate --force".to_string())
        );
        assert_eq!(steps[0].action, StepAction::CopyEnvExample);
    }

    #[test]
    fn default_command_lookup() {
        assert_eq!(default_command(SEED), Some("php artisan db:seed"));
        assert_eq!(default_command(CP_ENV), None);
        assert_eq!(default_command("nope"), None);
    }
}
