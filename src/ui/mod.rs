//! Console output for the setup runner.
//!
//! Progress and error lines go to stdout so they interleave with the live
//! output of child processes. Colours are dropped automatically when stdout
//! is not a terminal.

pub mod icons;

use console::{Emoji, style};

use crate::steps;

const BANNER: &str = r"
 ███████╗ ███████╗████████╗██╗   ██╗██████╗
 ██╔════╝ ██╔════╝╚══██╔══╝██║   ██║██╔══██╗
 ███████╗ █████╗     ██║   ██║   ██║██████╔╝
 ╚════██║ ██╔══╝     ██║   ██║   ██║██╔═══╝
 ███████║ ███████╗   ██║   ╚██████╔╝██║
 ╚══════╝ ╚══════╝   ╚═╝    ╚═════╝ ╚═╝
";

const OPTIONS: [(&str, &str); 4] = [
    ("--without COMMAND1,COMMAND2 ....", "Skip specified commands"),
    (
        "--skip COMMAND1,COMMAND2 .......",
        "Skip specified commands (alias for --without)",
    ),
    ("--only COMMAND1,COMMAND2 .......", "Run only specified commands"),
    ("-h, --help .....................", "Display this help message"),
];

/// Print a progress line, preceded by a blank line.
pub fn info(icon: &Emoji<'_, '_>, message: &str) {
    println!();
    println!("{}", style(format!("{icon}{message}")).green());
}

/// Print an error line with the siren marker.
pub fn error(message: &str) {
    println!(
        "{}",
        style(format!("{}{message}", icons::SIREN)).red().bright()
    );
}

/// Print the banner, options and the list of available steps.
pub fn print_usage() {
    print!("{}", render_usage());
}

/// Render the usage text; styling is applied only when stdout is a terminal.
pub fn render_usage() -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", style(BANNER).yellow()));
    out.push_str(&format!(
        "{}\n",
        style(format!(
            " Project Setup Assistant v{}\n -------------------------------------",
            env!("CARGO_PKG_VERSION")
        ))
        .yellow()
    ));

    out.push_str("Usage:\n");
    out.push_str(&format!("{}\n\n", style("  setup [options]").green()));

    out.push_str("Options:\n");
    for (flag, help) in OPTIONS {
        out.push_str(&format!("{} {help}\n", style(format!("  {flag}")).green()));
    }
    out.push('\n');

    out.push_str("Available Commands:\n");
    for (name, description) in steps::descriptions() {
        let padded = format!("{:.<30}", format!("{name} "));
        out.push_str(&format!(
            "{} {description}\n",
            style(format!("  {}{padded}", icons::ARROW)).green()
        ));
    }

    out
}
