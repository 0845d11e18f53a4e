//! Core traits for the command handler pattern.
//!
//! Handlers depend on these interfaces rather than on the console or a
//! concrete [`PackageManager`](packmule::manager::PackageManager), so they can
//! be tested with recorded output and canned results.

use packmule::manager::{
    EnsureReport, InstallOutcome, ManagerResult, RepositoryScan, UninstallOutcome, UpdateReport,
};
use packmule::package::{PackageManifest, PackageVersion, Version};

use crate::error::CliError;

// ============================================================================
// Output Trait - Abstracts console output
// ============================================================================

/// Trait for outputting messages to the user.
pub trait Output: Send + Sync {
    /// Print a line of text.
    fn println(&self, message: &str);

    /// Print an empty line.
    fn newline(&self) {
        self.println("");
    }

    /// Print a section header.
    fn header(&self, title: &str) {
        self.println(title);
        self.println(&"=".repeat(title.len()));
    }

    /// Print an indented line.
    fn indented(&self, message: &str) {
        self.println(&format!("  {}", message));
    }

    /// Print a warning message.
    fn warning(&self, message: &str) {
        self.println(&format!("Warning: {}", message));
    }

    /// Print an error message.
    fn error(&self, message: &str) {
        self.println(&format!("Error: {}", message));
    }

    /// Print a success message.
    fn success(&self, message: &str) {
        self.println(&format!("Success: {}", message));
    }
}

// ============================================================================
// Package Service Trait
// ============================================================================

/// Package operations used by the command handlers.
pub trait PackageService {
    /// Install one package.
    fn install(&self, name: &str, version: &Version) -> ManagerResult<InstallOutcome>;

    /// Uninstall one package.
    fn uninstall(&self, name: &str, version: &Version) -> ManagerResult<UninstallOutcome>;

    /// Packages in the install tree.
    fn installed_packages(&self) -> ManagerResult<Vec<PackageVersion>>;

    /// Read every enabled repository.
    fn scan_repositories(&self) -> RepositoryScan;

    /// Ensure every declared dependency is installed.
    fn ensure_packages(&self) -> EnsureReport;

    /// Newer versions of installed packages.
    fn updates_available(&self) -> ManagerResult<Vec<PackageVersion>>;

    /// Apply every available update.
    fn update_packages(&self) -> ManagerResult<UpdateReport>;

    /// Manifest for `name` at `version`.
    fn get_manifest(&self, name: &str, version: &Version)
        -> ManagerResult<Option<PackageManifest>>;

    /// Whether `name` at `version` is installed.
    fn is_installed(&self, name: &str, version: &Version) -> bool;

    /// Declare a dependency in the project document.
    ///
    /// Returns the declaration it replaced.
    fn save_dependency(&self, dependency: PackageVersion) -> ManagerResult<Option<PackageVersion>>;

    /// Remove a declaration from the project document.
    fn forget_dependency(&self, dependency: &PackageVersion) -> ManagerResult<bool>;
}

// ============================================================================
// Command Context and Handler
// ============================================================================

/// Dependencies shared by all handlers.
pub struct CommandContext<'a> {
    pub output: &'a dyn Output,
    pub packages: &'a dyn PackageService,
}

impl<'a> CommandContext<'a> {
    pub fn new(output: &'a dyn Output, packages: &'a dyn PackageService) -> Self {
        Self { output, packages }
    }
}

/// A single command's behavior.
pub trait CommandHandler {
    /// The arguments type for this command.
    type Args;

    /// Execute the command.
    fn execute(args: Self::Args, ctx: &CommandContext) -> Result<(), CliError>;
}
