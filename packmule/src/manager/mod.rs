//! Package management.
//!
//! [`PackageManager`] is the entry point. It reads manifests from the
//! repositories configured in a [`PackageManagerSettings`] document and keeps
//! a project's direct dependencies installed under the settings' install
//! location.
//!
//! # Installed state
//!
//! A package is installed exactly when `<InstallLocation>/<name>/<version>/`
//! exists. There is no other database; deleting the directory uninstalls
//! the package.
//!
//! # Limitations
//!
//! Only direct dependencies are installed. The `Dependencies` listed in a
//! manifest are carried along for display but never resolved.
//!
//! [`PackageManagerSettings`]: crate::config::PackageManagerSettings

mod checksum;
mod config;
mod core;
mod error;
mod extractor;
mod installer;
mod report;
mod store;

pub use checksum::{calculate_file_checksum, verify_checksum};
pub use config::ManagerConfig;
pub use core::{Manifests, PackageManager};
pub use error::{ManagerError, ManagerResult};
pub use extractor::TarGzExtractor;
pub use installer::{InstallStage, PackageInstaller, ResolvedManifest};
pub use report::{
    EnsureOutcome, EnsureReport, InstallOutcome, InstallSummary, RepositoryScan,
    UninstallOutcome, UpdateOutcome, UpdateReport,
};
pub use store::LocalStore;
