//! Packmule CLI - Command-line interface
//!
//! Installs, removes and restores a project's packages using the
//! repositories and install tree named by a settings document.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use packmule::config::ConfigFile;
use packmule::logging;

use commands::{Commands, DocumentOptions};
use error::CliError;

#[derive(Parser)]
#[command(name = "packmule")]
#[command(version = packmule::VERSION)]
#[command(about = "Install and restore project packages", long_about = None)]
struct Cli {
    /// Project document listing the dependencies
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    /// Settings document naming repositories, install and cache locations
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();

    let config = match ConfigFile::load() {
        Ok(config) => config,
        Err(e) => CliError::Config(e.to_string()).exit(),
    };

    let _logging_guard = match logging::init_logging(&config.logging.directory, verbosity(cli.verbose)) {
        Ok(guard) => guard,
        Err(e) => CliError::LoggingInit(e.to_string()).exit(),
    };

    tracing::debug!(version = packmule::VERSION, "Starting packmule");

    let options = DocumentOptions {
        project: cli.project,
        settings: cli.settings,
    };

    if let Err(e) = commands::run(cli.command, options, &config) {
        tracing::error!(error = %e, "Command failed");
        e.exit();
    }
}

fn verbosity(count: u8) -> Option<&'static str> {
    match count {
        0 => None,
        1 => Some("packmule=debug,info"),
        _ => Some("trace"),
    }
}
