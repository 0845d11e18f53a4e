//! Centralized layout and naming conventions.
//!
//! This module is the single source of truth for where packages live on disk:
//! - Install directories (`<install_root>/<name>/<version>`)
//! - Cache directories (`<cache_root>/<name>/<version>`)
//! - Archive filenames (`<name>-<version>.tar.gz`)
//!
//! All other modules should use these functions rather than joining paths
//! directly, so the install and cache trees stay compatible with each other.

use std::path::{Path, PathBuf};

use super::version::Version;
use crate::manager::{ManagerError, ManagerResult};

/// Prefix of in-progress directories inside a package's name directory.
///
/// Entries with this prefix never parse as versions, so scans of the install
/// tree skip them.
pub const STAGING_PREFIX: &str = ".staging-";

/// Check that a package name is usable as a single path component.
///
/// # Examples
///
/// ```
/// use packmule::package::validate_package_name;
///
/// assert!(validate_package_name("com.example.core").is_ok());
/// assert!(validate_package_name("../escape").is_err());
/// assert!(validate_package_name("").is_err());
/// ```
pub fn validate_package_name(name: &str) -> ManagerResult<()> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.starts_with('.')
        && !name.contains(['/', '\\', '\0']);

    if valid {
        Ok(())
    } else {
        Err(ManagerError::InvalidPackageName {
            name: name.to_string(),
        })
    }
}

/// Directory that marks `name` at `version` as installed.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use packmule::package::{install_path, Version};
///
/// assert_eq!(
///     install_path(Path::new("/opt/packages"), "foo", &Version::new(1, 0, 0)),
///     Path::new("/opt/packages/foo/1.0.0")
/// );
/// ```
pub fn install_path(install_root: &Path, name: &str, version: &Version) -> PathBuf {
    install_root.join(name).join(version.to_string())
}

/// Directory holding the cached payload for `name` at `version`.
pub fn cache_path(cache_root: &Path, name: &str, version: &Version) -> PathBuf {
    cache_root.join(name).join(version.to_string())
}

/// Base archive filename for a package payload.
///
/// # Examples
///
/// ```
/// use packmule::package::{archive_filename, Version};
///
/// assert_eq!(archive_filename("foo", &Version::new(1, 2, 0)), "foo-1.2.0.tar.gz");
/// ```
pub fn archive_filename(name: &str, version: &Version) -> String {
    format!("{}-{}.tar.gz", name, version)
}

/// Staging directory used while materializing `version` next to its final path.
pub fn staging_path(parent: &Path, version: &Version) -> PathBuf {
    parent.join(format!(
        "{}{}-{}",
        STAGING_PREFIX,
        version,
        std::process::id()
    ))
}
