//! Binary entry point for the `lingua` CLI.

use lingua::{cli::Cli, runner};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt;

fn init_logging(verbose: bool) {
    let max_level = if verbose { Level::DEBUG } else { Level::ERROR };
    fmt().with_max_level(max_level).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse_with_default();
    init_logging(cli.verbose);
    if let Err(err) = runner::run(&cli) {
        tracing::error!(error = %format!("{err:#}"), "command failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
