//! Concrete implementations of the service traits.

use std::path::{Path, PathBuf};

use console::style;

use packmule::config::Project;
use packmule::manager::{
    EnsureReport, InstallOutcome, ManagerResult, PackageManager, RepositoryScan,
    UninstallOutcome, UpdateReport,
};
use packmule::package::{PackageManifest, PackageVersion, Version};

use super::traits::{Output, PackageService};

// ============================================================================
// Console Output Implementation
// ============================================================================

/// Standard console output implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOutput;

impl ConsoleOutput {
    /// Create a new console output.
    pub fn new() -> Self {
        Self
    }
}

impl Output for ConsoleOutput {
    fn println(&self, message: &str) {
        println!("{}", message);
    }

    fn header(&self, title: &str) {
        println!("{}", style(title).bold());
        println!("{}", "=".repeat(title.len()));
    }

    fn warning(&self, message: &str) {
        println!("{} {}", style("Warning:").yellow(), message);
    }

    fn error(&self, message: &str) {
        println!("{} {}", style("Error:").red(), message);
    }

    fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }
}

// ============================================================================
// Package Manager Service Implementation
// ============================================================================

/// Package service backed by a [`PackageManager`] and the project document it
/// was loaded from.
pub struct ManagerService<'a> {
    manager: &'a PackageManager<'a>,
    project_path: PathBuf,
}

impl<'a> ManagerService<'a> {
    pub fn new(manager: &'a PackageManager<'a>, project_path: &Path) -> Self {
        Self {
            manager,
            project_path: project_path.to_path_buf(),
        }
    }
}

impl PackageService for ManagerService<'_> {
    fn install(&self, name: &str, version: &Version) -> ManagerResult<InstallOutcome> {
        self.manager.install(name, version)
    }

    fn uninstall(&self, name: &str, version: &Version) -> ManagerResult<UninstallOutcome> {
        self.manager.uninstall(name, version)
    }

    fn installed_packages(&self) -> ManagerResult<Vec<PackageVersion>> {
        self.manager.installed_packages()
    }

    fn scan_repositories(&self) -> RepositoryScan {
        self.manager.scan_repositories()
    }

    fn ensure_packages(&self) -> EnsureReport {
        self.manager.ensure_packages()
    }

    fn updates_available(&self) -> ManagerResult<Vec<PackageVersion>> {
        self.manager.updates_available()
    }

    fn update_packages(&self) -> ManagerResult<UpdateReport> {
        self.manager.update_packages()
    }

    fn get_manifest(
        &self,
        name: &str,
        version: &Version,
    ) -> ManagerResult<Option<PackageManifest>> {
        self.manager.get_manifest(name, version)
    }

    fn is_installed(&self, name: &str, version: &Version) -> bool {
        self.manager.is_installed(name, version)
    }

    fn save_dependency(&self, dependency: PackageVersion) -> ManagerResult<Option<PackageVersion>> {
        Project::add_dependency(&self.project_path, dependency)
    }

    fn forget_dependency(&self, dependency: &PackageVersion) -> ManagerResult<bool> {
        Project::remove_dependency(&self.project_path, dependency)
    }
}
