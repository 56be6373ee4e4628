//! Command-line parsing.
//!
//! Tokens are consumed strictly in order. `--skip`/`--without`/`--only`
//! always take the following token as their value, whatever it looks like,
//! and the first `-h`/`--help` or unrecognised token ends parsing. The
//! accepted tokens are then handed to clap in `--flag=value` form to build
//! the typed [`Cli`].
//!
//! Parsing never exits the process. It produces a [`ParseOutcome`] and the
//! binary decides what to print and which status to exit with.

use clap::error::{ContextKind, ContextValue};
use clap::{ArgAction, CommandFactory, Parser};
use std::ffi::{OsStr, OsString};

use crate::filter::Filters;

#[derive(Parser, Debug)]
#[command(name = "setup", version, disable_help_flag = true)]
pub struct Cli {
    /// Skip specified commands (comma-separated)
    #[arg(long = "skip", visible_alias = "without", value_name = "LIST", allow_hyphen_values = true, action = ArgAction::Append)]
    pub skip: Vec<String>,

    /// Run only specified commands (comma-separated)
    #[arg(long, value_name = "LIST", allow_hyphen_values = true, action = ArgAction::Append)]
    pub only: Vec<String>,

    /// Show debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Arguments for a run that passed parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    pub filters: Filters,
    pub verbose: bool,
}

/// Result of parsing the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Run(RunArgs),
    /// `-h`/`--help`: print usage and exit 0
    ShowHelp,
    /// `-V`/`--version`: print the rendered version and exit 0
    ShowVersion(String),
    /// Unrecognised token: report it, print usage and exit 1
    Unknown(String),
}

impl Cli {
    fn into_run_args(self) -> RunArgs {
        // The last value given for a filter wins.
        let filters = Filters::from_lists(
            self.skip.last().map(String::as_str),
            self.only.last().map(String::as_str),
        );
        RunArgs {
            filters,
            verbose: self.verbose,
        }
    }
}

/// Parse an argument vector, program name excluded.
pub fn parse_args<I, T>(args: I) -> ParseOutcome
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let argv = match canonical_args(args.into_iter().map(Into::into)) {
        Ok(argv) => argv,
        Err(outcome) => return outcome,
    };

    match Cli::try_parse_from(argv) {
        Ok(cli) => ParseOutcome::Run(cli.into_run_args()),
        Err(err) => ParseOutcome::Unknown(invalid_arg(&err)),
    }
}

/// Walk the tokens in order and rewrite the accepted ones for clap.
///
/// Returns `Err` with the final outcome when a token short-circuits parsing.
fn canonical_args(
    mut tokens: impl Iterator<Item = OsString>,
) -> Result<Vec<OsString>, ParseOutcome> {
    let mut argv = vec![OsString::from("setup")];

    while let Some(token) = tokens.next() {
        let filter = match token.to_str() {
            Some("--without" | "--skip") => "--skip=",
            Some("--only") => "--only=",
            Some("-h" | "--help") => return Err(ParseOutcome::ShowHelp),
            Some("-V" | "--version") => {
                return Err(ParseOutcome::ShowVersion(
                    Cli::command().render_version().to_string(),
                ));
            }
            Some("-v" | "--verbose") => {
                argv.push(OsString::from("--verbose"));
                continue;
            }
            _ => return Err(ParseOutcome::Unknown(token.to_string_lossy().into_owned())),
        };

        // A filter flag in last position has no value and is ignored.
        if let Some(value) = tokens.next() {
            argv.push(attach(filter, &value));
        }
    }

    Ok(argv)
}

fn attach(flag: &str, value: &OsStr) -> OsString {
    let mut arg = OsString::from(flag);
    arg.push(value);
    arg
}

fn invalid_arg(err: &clap::Error) -> String {
    match err.get(ContextKind::InvalidArg) {
        Some(ContextValue::String(arg)) => arg.clone(),
        _ => err
            .to_string()
            .lines()
            .next()
            .unwrap_or_default()
            .trim_start_matches("error: ")
            .to_string(),
    }
}
