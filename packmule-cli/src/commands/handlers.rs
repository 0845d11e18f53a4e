//! Command handlers.
//!
//! Each handler implements the `CommandHandler` trait and contains the
//! presentation logic for its respective command.

use std::collections::HashMap;

use packmule::manager::{
    EnsureOutcome, InstallOutcome, ManagerError, UninstallOutcome, UpdateOutcome,
};
use packmule::package::{PackageVersion, Version};

use super::args::{InfoArgs, ListArgs, PackageArgs};
use super::traits::{CommandContext, CommandHandler};
use crate::error::CliError;

// ============================================================================
// Install Handler
// ============================================================================

/// Handler for the `install` command.
pub struct InstallHandler;

impl CommandHandler for InstallHandler {
    type Args = PackageArgs;

    fn execute(args: Self::Args, ctx: &CommandContext<'_>) -> Result<(), CliError> {
        let package = PackageVersion::new(args.name.clone(), args.version.clone());

        match ctx.packages.install(&args.name, &args.version)? {
            InstallOutcome::AlreadyInstalled => {
                ctx.output.println(&format!("{} is already installed", package));
            }
            InstallOutcome::Installed(summary) => {
                let source = if summary.from_cache {
                    "cache".to_string()
                } else {
                    summary.repository.clone()
                };
                ctx.output
                    .success(&format!("Installed {} from {}", package, source));
                ctx.output
                    .indented(&format!("Path: {}", summary.install_path.display()));
                ctx.output
                    .indented(&format!("Files: {}", summary.files_extracted));
            }
        }

        if args.save {
            match ctx.packages.save_dependency(package.clone())? {
                Some(previous) if previous != package => {
                    ctx.output.println(&format!(
                        "Replaced dependency {} with {}",
                        previous, package
                    ));
                }
                Some(_) => {}
                None => ctx.output.println(&format!("Added dependency {}", package)),
            }
        }

        Ok(())
    }
}

// ============================================================================
// Uninstall Handler
// ============================================================================

/// Handler for the `uninstall` command.
pub struct UninstallHandler;

impl CommandHandler for UninstallHandler {
    type Args = PackageArgs;

    fn execute(args: Self::Args, ctx: &CommandContext<'_>) -> Result<(), CliError> {
        let package = PackageVersion::new(args.name.clone(), args.version.clone());

        match ctx.packages.uninstall(&args.name, &args.version)? {
            UninstallOutcome::NotInstalled => {
                ctx.output.println(&format!("{} is not installed", package));
            }
            UninstallOutcome::Removed => {
                ctx.output.success(&format!("Removed {}", package));
            }
        }

        if args.save && ctx.packages.forget_dependency(&package)? {
            ctx.output
                .println(&format!("Removed dependency {}", package));
        }

        Ok(())
    }
}

// ============================================================================
// List Handler
// ============================================================================

/// Handler for the `list` command.
pub struct ListHandler;

impl CommandHandler for ListHandler {
    type Args = ListArgs;

    fn execute(args: Self::Args, ctx: &CommandContext<'_>) -> Result<(), CliError> {
        if args.available {
            return list_available(ctx);
        }

        let packages = ctx.packages.installed_packages()?;
        if packages.is_empty() {
            ctx.output.println("No packages installed.");
            return Ok(());
        }

        ctx.output
            .header(&format!("Installed Packages ({})", packages.len()));
        for package in &packages {
            ctx.output.indented(&package.to_string());
        }

        Ok(())
    }
}

fn list_available(ctx: &CommandContext<'_>) -> Result<(), CliError> {
    let scan = ctx.packages.scan_repositories();
    let manifests: Vec<_> = scan.manifests().collect();

    for (repository, error) in scan.failures() {
        ctx.output
            .warning(&format!("repository '{}': {}", repository.name, error));
    }

    if manifests.is_empty() {
        ctx.output.println("No packages available.");
        return Ok(());
    }

    ctx.output
        .header(&format!("Available Packages ({})", manifests.len()));
    for manifest in manifests {
        let installed = if ctx.packages.is_installed(&manifest.name, &manifest.version) {
            " [installed]"
        } else {
            ""
        };
        ctx.output.indented(&format!(
            "{} - {}{}",
            manifest.package_version(),
            manifest.title(),
            installed
        ));
    }

    Ok(())
}

// ============================================================================
// Restore Handler
// ============================================================================

/// Handler for the `restore` command.
pub struct RestoreHandler;

impl CommandHandler for RestoreHandler {
    type Args = ();

    fn execute(_args: Self::Args, ctx: &CommandContext<'_>) -> Result<(), CliError> {
        let report = ctx.packages.ensure_packages();

        if report.entries.is_empty() {
            ctx.output.println("The project declares no dependencies.");
            return Ok(());
        }

        ctx.output.header("Restoring Dependencies");
        for (package, outcome) in &report.entries {
            let status = match outcome {
                EnsureOutcome::AlreadyInstalled => "already installed".to_string(),
                EnsureOutcome::Installed(summary) if summary.from_cache => {
                    "installed from cache".to_string()
                }
                EnsureOutcome::Installed(summary) => {
                    format!("installed from {}", summary.repository)
                }
                EnsureOutcome::Failed(error) => format!("FAILED: {}", error),
            };
            ctx.output.indented(&format!("{} - {}", package, status));
        }
        ctx.output.newline();

        let total = report.entries.len();
        let failed = report.failures().count();
        if failed > 0 {
            return Err(CliError::Incomplete { failed, total });
        }

        let installed = report.installed().count();
        ctx.output.success(&format!(
            "{} installed, {} already present",
            installed,
            total - installed
        ));
        Ok(())
    }
}

// ============================================================================
// Outdated Handler
// ============================================================================

/// Handler for the `outdated` command.
pub struct OutdatedHandler;

impl CommandHandler for OutdatedHandler {
    type Args = ();

    fn execute(_args: Self::Args, ctx: &CommandContext<'_>) -> Result<(), CliError> {
        let updates = ctx.packages.updates_available()?;
        if updates.is_empty() {
            ctx.output.println("All packages are up to date.");
            return Ok(());
        }

        let installed_list = ctx.packages.installed_packages()?;
        let installed = highest_installed(&installed_list);

        ctx.output
            .header(&format!("Updates Available ({})", updates.len()));
        for update in &updates {
            match installed.get(update.name.as_str()) {
                Some(current) => ctx.output.indented(&format!(
                    "{} v{} -> v{}",
                    update.name, current, update.version
                )),
                None => ctx.output.indented(&update.to_string()),
            }
        }

        Ok(())
    }
}

fn highest_installed(packages: &[PackageVersion]) -> HashMap<&str, &Version> {
    let mut highest: HashMap<&str, &Version> = HashMap::new();
    for package in packages {
        highest
            .entry(package.name.as_str())
            .and_modify(|current| {
                if package.version > **current {
                    *current = &package.version;
                }
            })
            .or_insert(&package.version);
    }
    highest
}

// ============================================================================
// Update Handler
// ============================================================================

/// Handler for the `update` command.
pub struct UpdateHandler;

impl CommandHandler for UpdateHandler {
    type Args = ();

    fn execute(_args: Self::Args, ctx: &CommandContext<'_>) -> Result<(), CliError> {
        let report = ctx.packages.update_packages()?;
        if report.is_empty() {
            ctx.output.println("All packages are up to date.");
            return Ok(());
        }

        for (package, outcome) in &report.entries {
            match outcome {
                UpdateOutcome::Updated { removed, retained } => {
                    ctx.output.success(&format!("Updated to {}", package));
                    for old in removed {
                        ctx.output.indented(&format!("Removed {}", old));
                    }
                    for kept in retained {
                        ctx.output
                            .indented(&format!("Kept {} (declared by project)", kept));
                    }
                }
                UpdateOutcome::Failed(error) => {
                    ctx.output
                        .error(&format!("Failed to update to {}: {}", package, error));
                }
            }
        }

        let failed = report.failures().count();
        if failed > 0 {
            return Err(CliError::Incomplete {
                failed,
                total: report.entries.len(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Info Handler
// ============================================================================

/// Handler for the `info` command.
pub struct InfoHandler;

impl CommandHandler for InfoHandler {
    type Args = InfoArgs;

    fn execute(args: Self::Args, ctx: &CommandContext<'_>) -> Result<(), CliError> {
        let manifest = ctx
            .packages
            .get_manifest(&args.name, &args.version)?
            .ok_or_else(|| ManagerError::not_found(&args.name, &args.version))?;

        ctx.output.header(manifest.title());
        ctx.output.newline();
        ctx.output.println(&format!("Name:        {}", manifest.name));
        ctx.output
            .println(&format!("Version:     {}", manifest.version));
        if !manifest.category.is_empty() {
            ctx.output
                .println(&format!("Category:    {}", manifest.category));
        }
        if !manifest.keywords.is_empty() {
            ctx.output
                .println(&format!("Keywords:    {}", manifest.keywords.join(", ")));
        }
        let installed = ctx.packages.is_installed(&args.name, &args.version);
        ctx.output.println(&format!(
            "Installed:   {}",
            if installed { "yes" } else { "no" }
        ));

        if !manifest.description.is_empty() {
            ctx.output.newline();
            ctx.output.println(&manifest.description);
        }

        if !manifest.dependencies.is_empty() {
            ctx.output.newline();
            ctx.output.println("Dependencies:");
            for dependency in &manifest.dependencies {
                ctx.output.indented(&dependency.to_string());
            }
        }

        Ok(())
    }
}
