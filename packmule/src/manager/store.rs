//! The local install tree and download cache.
//!
//! Installed state is nothing more than the existence of
//! `<install_root>/<name>/<version>/`. New entries are built in a staging
//! directory beside their final location and renamed into place, so an
//! interrupted install or cache fill never leaves a `<version>` directory
//! behind.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::{ManagerError, ManagerResult};
use crate::config::PackageManagerSettings;
use crate::package::{
    archive_filename, cache_path, install_path, staging_path, PackageVersion, Version,
};

/// Filesystem view of the install and cache roots.
#[derive(Debug, Clone)]
pub struct LocalStore {
    install_root: PathBuf,
    cache_root: Option<PathBuf>,
}

impl LocalStore {
    /// Create a store. `cache_root` is `None` when caching is disabled.
    pub fn new(install_root: impl Into<PathBuf>, cache_root: Option<PathBuf>) -> Self {
        Self {
            install_root: install_root.into(),
            cache_root,
        }
    }

    /// Create a store for the roots named by `settings`.
    pub fn from_settings(settings: &PackageManagerSettings) -> Self {
        Self::new(
            settings.install_location.clone(),
            settings.cache_root().map(Path::to_path_buf),
        )
    }

    /// Root of the install tree.
    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    /// Root of the cache, if caching is enabled.
    pub fn cache_root(&self) -> Option<&Path> {
        self.cache_root.as_deref()
    }

    // =========================================================================
    // Install tree
    // =========================================================================

    /// Install directory of `name` at `version`.
    pub fn install_dir(&self, name: &str, version: &Version) -> PathBuf {
        install_path(&self.install_root, name, version)
    }

    /// Whether `name` at `version` is installed.
    pub fn is_installed(&self, name: &str, version: &Version) -> bool {
        self.install_dir(name, version).is_dir()
    }

    /// Every installed package, sorted by name then version.
    ///
    /// Entries that are not `<name>/<version>` directories, hidden entries and
    /// staging directories are skipped. A missing install root is empty.
    pub fn installed_packages(&self) -> ManagerResult<Vec<PackageVersion>> {
        let mut installed = Vec::new();

        for (name, name_dir) in subdirectories(&self.install_root)? {
            for (entry, _) in subdirectories(&name_dir)? {
                match Version::parse(&entry) {
                    Ok(version) => installed.push(PackageVersion::new(name.clone(), version)),
                    Err(_) => {
                        tracing::debug!(path = %name_dir.join(&entry).display(), "Skipping non-version entry")
                    }
                }
            }
        }

        installed.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.cmp_version(b)));
        Ok(installed)
    }

    /// Installed versions of `name`, ascending.
    pub fn installed_versions(&self, name: &str) -> ManagerResult<Vec<Version>> {
        let mut versions: Vec<Version> = subdirectories(&self.install_root.join(name))?
            .into_iter()
            .filter_map(|(entry, _)| Version::parse(&entry).ok())
            .collect();
        versions.sort();
        Ok(versions)
    }

    /// Build the install directory of `name` at `version` through `fill`.
    ///
    /// `fill` receives an empty staging directory. On success the staging
    /// directory becomes the install directory; on failure it is removed.
    pub fn install_with<F>(&self, name: &str, version: &Version, fill: F) -> ManagerResult<PathBuf>
    where
        F: FnOnce(&Path) -> ManagerResult<()>,
    {
        let target = self.install_dir(name, version);
        materialize(&target, version, fill)?;
        Ok(target)
    }

    /// Remove the install directory of `name` at `version`.
    ///
    /// Returns `false` if it was not installed. An empty `<name>` directory
    /// is pruned afterwards.
    pub fn remove_installed(&self, name: &str, version: &Version) -> ManagerResult<bool> {
        remove_entry(&self.install_dir(name, version))
    }

    // =========================================================================
    // Cache
    // =========================================================================

    /// Whether a cache entry exists. Always `false` when caching is disabled.
    pub fn is_cached(&self, name: &str, version: &Version) -> bool {
        self.cache_dir(name, version)
            .map(|dir| dir.is_dir())
            .unwrap_or(false)
    }

    /// Cache directory of `name` at `version`, if caching is enabled.
    pub fn cache_dir(&self, name: &str, version: &Version) -> Option<PathBuf> {
        self.cache_root
            .as_deref()
            .map(|root| cache_path(root, name, version))
    }

    /// Path of the cached archive, if a cache entry exists.
    pub fn cached_archive(&self, name: &str, version: &Version) -> Option<PathBuf> {
        self.cache_dir(name, version)
            .filter(|dir| dir.is_dir())
            .map(|dir| dir.join(archive_filename(name, version)))
    }

    /// Build the cache entry of `name` at `version` through `fill`.
    ///
    /// Returns the path of the cached archive, or `None` when caching is
    /// disabled (in which case `fill` is not called).
    pub fn cache_with<F>(
        &self,
        name: &str,
        version: &Version,
        fill: F,
    ) -> ManagerResult<Option<PathBuf>>
    where
        F: FnOnce(&Path) -> ManagerResult<()>,
    {
        let Some(target) = self.cache_dir(name, version) else {
            return Ok(None);
        };
        materialize(&target, version, fill)?;
        Ok(Some(target.join(archive_filename(name, version))))
    }

    /// Remove the cache entry of `name` at `version`.
    ///
    /// Returns `false` if caching is disabled or there was no entry.
    pub fn remove_cached(&self, name: &str, version: &Version) -> ManagerResult<bool> {
        match self.cache_dir(name, version) {
            Some(dir) => remove_entry(&dir),
            None => Ok(false),
        }
    }

    /// Scratch file for a download that bypasses the cache.
    pub fn scratch_archive(&self, name: &str, version: &Version) -> PathBuf {
        let mut path = staging_path(&self.install_root.join(name), version).into_os_string();
        path.push(".download");
        PathBuf::from(path)
    }

    /// Delete a scratch download and prune its `<name>` directory if that
    /// leaves it empty. Failures are logged, not returned.
    pub fn discard_scratch(&self, scratch: &Path) {
        if let Err(e) = fs::remove_file(scratch) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %scratch.display(), error = %e, "Failed to remove scratch download");
            }
        }
        if let Some(parent) = scratch.parent() {
            prune_if_empty(parent);
        }
    }
}

/// Stage `target` through `fill`, then rename it into place.
fn materialize<F>(target: &Path, version: &Version, fill: F) -> ManagerResult<()>
where
    F: FnOnce(&Path) -> ManagerResult<()>,
{
    let Some(parent) = target.parent() else {
        return Err(ManagerError::CreateDirFailed {
            path: target.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "no parent directory"),
        });
    };

    fs::create_dir_all(parent).map_err(|e| ManagerError::CreateDirFailed {
        path: parent.to_path_buf(),
        source: e,
    })?;

    let staging = staging_path(parent, version);
    if staging.exists() {
        tracing::debug!(path = %staging.display(), "Removing stale staging directory");
        fs::remove_dir_all(&staging).map_err(|e| ManagerError::RemoveFailed {
            path: staging.clone(),
            source: e,
        })?;
    }
    fs::create_dir(&staging).map_err(|e| ManagerError::CreateDirFailed {
        path: staging.clone(),
        source: e,
    })?;

    let result = fill(&staging).and_then(|()| {
        fs::rename(&staging, target).map_err(|e| ManagerError::WriteFailed {
            path: target.to_path_buf(),
            source: e,
        })
    });

    if result.is_err() {
        if let Err(e) = fs::remove_dir_all(&staging) {
            tracing::warn!(path = %staging.display(), error = %e, "Failed to remove staging directory");
        }
        prune_if_empty(parent);
    }

    result
}

/// Remove `dir` and prune its parent if that leaves it empty.
fn remove_entry(dir: &Path) -> ManagerResult<bool> {
    if !dir.is_dir() {
        return Ok(false);
    }

    fs::remove_dir_all(dir).map_err(|e| ManagerError::RemoveFailed {
        path: dir.to_path_buf(),
        source: e,
    })?;

    if let Some(parent) = dir.parent() {
        prune_if_empty(parent);
    }
    Ok(true)
}

fn prune_if_empty(dir: &Path) {
    let empty = fs::read_dir(dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false);
    if empty {
        if let Err(e) = fs::remove_dir(dir) {
            tracing::debug!(path = %dir.display(), error = %e, "Could not prune directory");
        }
    }
}

/// Visible subdirectories of `dir` as `(name, path)`; empty if `dir` is missing.
fn subdirectories(dir: &Path) -> ManagerResult<Vec<(String, PathBuf)>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir).map_err(|e| ManagerError::ReadFailed {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ManagerError::ReadFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        found.push((name, path));
    }
    Ok(found)
}
