use std::process::ExitCode;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt};

use setup_assistant::cli::{self, ParseOutcome, RunArgs};
use setup_assistant::config::SetupConfig;
use setup_assistant::errors::SetupError;
use setup_assistant::runner::StepRunner;
use setup_assistant::ui;

fn init_tracing(verbose: bool) {
    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "setup_assistant=debug,setup=debug"
        } else {
            "setup_assistant=warn,setup=warn"
        })
    });

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = match cli::parse_args(std::env::args_os().skip(1)) {
        ParseOutcome::Run(args) => args,
        ParseOutcome::ShowHelp => {
            ui::print_usage();
            return ExitCode::SUCCESS;
        }
        ParseOutcome::ShowVersion(version) => {
            print!("{version}");
            return ExitCode::SUCCESS;
        }
        ParseOutcome::Unknown(argument) => {
            ui::error(&format!("Unknown argument: {argument}"));
            ui::print_usage();
            return ExitCode::FAILURE;
        }
    };

    init_tracing(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "setup aborted");
            ui::error(&err.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run(args: RunArgs) -> Result<(), SetupError> {
    let project_dir = std::env::current_dir()
        .context("Failed to get current directory")
        .map_err(SetupError::Config)?;

    let config = SetupConfig::load_or_default(&project_dir).map_err(SetupError::Config)?;
    for warning in config.validate() {
        tracing::warn!("{}", warning);
    }

    let runner = StepRunner::new(&project_dir, config, args.filters);
    let summary = runner.run().await?;
    tracing::debug!(
        executed = summary.executed.len(),
        skipped = summary.skipped.len(),
        marked_installed = summary.marked_installed,
        "setup finished"
    );
    Ok(())
}
