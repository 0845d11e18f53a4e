//! Outcomes of manager operations.
//!
//! Single-package operations return a small outcome enum; the aggregate
//! operations (`ensure_packages`, `update_packages`, `scan_repositories`)
//! return a report with one entry per item so that one failure does not hide
//! the results of the rest.

use std::path::PathBuf;

use super::error::ManagerError;
use crate::config::RepositorySettings;
use crate::package::{PackageManifest, PackageVersion};

/// Result of [`PackageManager::install`](super::PackageManager::install).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The install directory already existed; nothing was touched.
    AlreadyInstalled,
    /// The package was installed.
    Installed(InstallSummary),
}

impl InstallOutcome {
    /// Whether the install tree changed.
    pub fn changed(&self) -> bool {
        matches!(self, Self::Installed(_))
    }
}

/// Details of a completed install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallSummary {
    /// Final install directory.
    pub install_path: PathBuf,
    /// Name of the repository the manifest came from.
    pub repository: String,
    /// Whether the payload came from the local cache.
    pub from_cache: bool,
    /// Bytes fetched from the repository (0 on a cache hit).
    pub bytes_downloaded: u64,
    /// Number of files extracted.
    pub files_extracted: usize,
}

/// Result of [`PackageManager::uninstall`](super::PackageManager::uninstall).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UninstallOutcome {
    /// Nothing was installed at that version.
    NotInstalled,
    /// The install directory was removed.
    Removed,
}

/// Per-dependency result of ensuring a project.
#[derive(Debug)]
pub enum EnsureOutcome {
    AlreadyInstalled,
    Installed(InstallSummary),
    Failed(ManagerError),
}

/// Report of [`PackageManager::ensure_packages`](super::PackageManager::ensure_packages).
#[derive(Debug, Default)]
pub struct EnsureReport {
    /// One entry per declared dependency, in declaration order.
    pub entries: Vec<(PackageVersion, EnsureOutcome)>,
}

impl EnsureReport {
    /// True if no dependency failed.
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Dependencies that failed, with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&PackageVersion, &ManagerError)> {
        self.entries.iter().filter_map(|(package, outcome)| match outcome {
            EnsureOutcome::Failed(error) => Some((package, error)),
            _ => None,
        })
    }

    /// Dependencies installed by this run.
    pub fn installed(&self) -> impl Iterator<Item = &PackageVersion> {
        self.entries.iter().filter_map(|(package, outcome)| match outcome {
            EnsureOutcome::Installed(_) => Some(package),
            _ => None,
        })
    }

    pub(crate) fn push(&mut self, package: PackageVersion, outcome: EnsureOutcome) {
        self.entries.push((package, outcome));
    }
}

/// Per-package result of applying an update.
#[derive(Debug)]
pub enum UpdateOutcome {
    /// The newer version was installed and older versions removed.
    Updated {
        /// Versions that were uninstalled.
        removed: Vec<PackageVersion>,
        /// Older versions kept because the project declares them.
        retained: Vec<PackageVersion>,
    },
    /// Installing or cleaning up failed; the newer version may or may not be installed.
    Failed(ManagerError),
}

/// Report of [`PackageManager::update_packages`](super::PackageManager::update_packages).
#[derive(Debug, Default)]
pub struct UpdateReport {
    /// One entry per available update, keyed by the new version.
    pub entries: Vec<(PackageVersion, UpdateOutcome)>,
}

impl UpdateReport {
    /// True if every update applied.
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Updates that failed, with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&PackageVersion, &ManagerError)> {
        self.entries.iter().filter_map(|(package, outcome)| match outcome {
            UpdateOutcome::Failed(error) => Some((package, error)),
            _ => None,
        })
    }

    /// Whether there was nothing to update.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Report of [`PackageManager::scan_repositories`](super::PackageManager::scan_repositories).
#[derive(Debug, Default)]
pub struct RepositoryScan {
    /// One entry per enabled repository, in settings order.
    pub repositories: Vec<(RepositorySettings, Result<Vec<PackageManifest>, ManagerError>)>,
}

impl RepositoryScan {
    /// Manifests from every repository that could be read, in order.
    pub fn manifests(&self) -> impl Iterator<Item = &PackageManifest> {
        self.repositories
            .iter()
            .filter_map(|(_, result)| result.as_ref().ok())
            .flatten()
    }

    /// Repositories that could not be read.
    pub fn failures(&self) -> impl Iterator<Item = (&RepositorySettings, &ManagerError)> {
        self.repositories
            .iter()
            .filter_map(|(repository, result)| result.as_ref().err().map(|e| (repository, e)))
    }
}
