//! Configuration types.
//!
//! - [`PackageManagerSettings`] / [`RepositorySettings`]: the JSON settings
//!   document (repositories, cache policy, install root)
//! - [`Project`]: the JSON project document (direct dependencies)
//! - [`ConfigFile`]: CLI defaults from `~/.packmule/config.ini`
//!
//! Settings and project values are read-only inputs to a
//! [`PackageManager`](crate::manager::PackageManager); the manager borrows
//! them for its lifetime and never mutates them.

mod file;
mod project;
mod settings;

pub use file::{
    config_directory, config_file_path, ConfigFile, ConfigFileError, LoggingSettings,
    NetworkSettings, PathsSettings, DEFAULT_TIMEOUT_SECS,
};
pub use project::Project;
pub use settings::{PackageManagerSettings, RepositorySettings};
