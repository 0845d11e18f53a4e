//! Packmule - a local package manager
//!
//! This library installs a project's declared dependencies from file and
//! HTTP repositories into a local install tree, optionally through a
//! download cache.
//!
//! # High-Level API
//!
//! ```no_run
//! use std::path::Path;
//! use packmule::config::{PackageManagerSettings, Project};
//! use packmule::manager::PackageManager;
//! use packmule::package::Version;
//!
//! let project = Project::load(Path::new("project.json"))?;
//! let settings = PackageManagerSettings::load(Path::new("settings.json"))?;
//! let manager = PackageManager::new(&project, &settings);
//!
//! manager.install("com.example.core", &Version::parse("1.2.0")?)?;
//! for update in manager.updates_available()? {
//!     println!("update available: {}", update);
//! }
//! # Ok::<(), packmule::manager::ManagerError>(())
//! ```

pub mod config;
pub mod logging;
pub mod manager;
pub mod package;
pub mod repository;
pub mod serializer;

/// Version of the packmule library and CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
