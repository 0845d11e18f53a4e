//! Package commands.
//!
//! This module implements the Command Pattern with trait-based dependency
//! injection:
//!
//! - `traits`: Core interfaces (`Output`, `PackageService`, `CommandHandler`)
//! - `services`: Concrete implementations of the traits
//! - `args`: CLI argument types and parsing (clap-derived)
//! - `handlers`: Command handlers
//!
//! Every command needs a project document and a settings document. Missing
//! paths and missing `--name`/`--version` values are rejected before either
//! document is read.

mod args;
mod handlers;
mod services;
mod traits;

pub use args::{Commands, DocumentOptions};

use std::path::Path;
use std::time::Duration;

use packmule::config::{ConfigFile, PackageManagerSettings, Project};
use packmule::manager::{ManagerConfig, PackageManager};

use args::{Action, DocumentPaths};
use handlers::{
    InfoHandler, InstallHandler, ListHandler, OutdatedHandler, RestoreHandler, UninstallHandler,
    UpdateHandler,
};
use services::{ConsoleOutput, ManagerService};
use traits::{CommandContext, CommandHandler};

use crate::error::CliError;

/// Run a command.
pub fn run(command: Commands, options: DocumentOptions, config: &ConfigFile) -> Result<(), CliError> {
    let action = Action::try_from(command)?;
    let paths = options.resolve(config)?;

    let (project, settings) = load_documents(&paths)?;
    let manager_config =
        ManagerConfig::new().with_timeout(Duration::from_secs(config.network.timeout));
    let manager = PackageManager::with_config(&project, &settings, manager_config);

    let token = manager.cancellation_token();
    ctrlc::set_handler(move || {
        tracing::warn!("Interrupt received, cancelling");
        token.cancel();
    })
    .map_err(|e| CliError::SignalHandler(e.to_string()))?;

    tracing::debug!(
        project = %paths.project.display(),
        settings = %paths.settings.display(),
        "Loaded documents"
    );

    let output = ConsoleOutput::new();
    let service = ManagerService::new(&manager, &paths.project);
    let ctx = CommandContext::new(&output, &service);

    dispatch(action, &ctx)
}

fn load_documents(paths: &DocumentPaths) -> Result<(Project, PackageManagerSettings), CliError> {
    let project = Project::load(&paths.project).map_err(|e| document_error(&paths.project, e))?;
    let settings = PackageManagerSettings::load(&paths.settings)
        .map_err(|e| document_error(&paths.settings, e))?;
    Ok((project, settings))
}

fn document_error(path: &Path, error: packmule::manager::ManagerError) -> CliError {
    CliError::Document {
        path: path.to_path_buf(),
        error,
    }
}

fn dispatch(action: Action, ctx: &CommandContext<'_>) -> Result<(), CliError> {
    match action {
        Action::Install(args) => InstallHandler::execute(args, ctx),
        Action::Uninstall(args) => UninstallHandler::execute(args, ctx),
        Action::List(args) => ListHandler::execute(args, ctx),
        Action::Restore => RestoreHandler::execute((), ctx),
        Action::Outdated => OutdatedHandler::execute((), ctx),
        Action::Update => UpdateHandler::execute((), ctx),
        Action::Info(args) => InfoHandler::execute(args, ctx),
    }
}
