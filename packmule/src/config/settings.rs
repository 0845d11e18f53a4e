//! Package manager settings documents.
//!
//! ```json
//! {
//!   "RepositorySettings": [
//!     { "Name": "local", "Location": "file:///srv/packages/index.json", "Enabled": true },
//!     { "Name": "public", "Location": "https://packages.example.com/index.json" }
//!   ],
//!   "LocalCacheLocation": "cache",
//!   "EnableLocalCache": true,
//!   "InstallLocation": "packages"
//! }
//! ```
//!
//! Relative `LocalCacheLocation` / `InstallLocation` values are resolved
//! against the directory of the settings document by [`PackageManagerSettings::load`].
//! `LocalCacheLocation` may only be omitted when `EnableLocalCache` is
//! `false`, and the cache and install trees must not overlap.

use std::path::{Path, PathBuf};

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::manager::{ManagerError, ManagerResult};
use crate::serializer;

fn default_true() -> bool {
    true
}

/// A configured package repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RepositorySettings {
    /// Display name used in logs and errors.
    pub name: String,

    /// Location of the repository's manifest-list document.
    ///
    /// The scheme selects the transport (`file`, `http`, `https`).
    #[serde(with = "location")]
    pub location: Url,

    /// Disabled repositories are never opened.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl RepositorySettings {
    /// Create an enabled repository.
    pub fn new(name: impl Into<String>, location: Url) -> Self {
        Self {
            name: name.into(),
            location,
            enabled: true,
        }
    }

    /// Create an enabled repository backed by a local manifest-list file.
    ///
    /// Returns `None` if `path` is not absolute.
    pub fn from_file(name: impl Into<String>, path: &Path) -> Option<Self> {
        Url::from_file_path(path)
            .ok()
            .map(|location| Self::new(name, location))
    }

    /// Set the enabled flag (builder pattern).
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Settings for one package manager invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageManagerSettings {
    /// Repositories in precedence order.
    #[serde(default)]
    pub repository_settings: Vec<RepositorySettings>,

    /// Root of the download cache. Required while caching is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_cache_location: Option<PathBuf>,

    /// Whether the download cache is used at all.
    #[serde(default = "default_true")]
    pub enable_local_cache: bool,

    /// Root of the install tree.
    pub install_location: PathBuf,
}

impl PackageManagerSettings {
    /// Create settings with no repositories and caching enabled.
    pub fn new(install_location: impl Into<PathBuf>, local_cache_location: impl Into<PathBuf>) -> Self {
        Self {
            repository_settings: Vec::new(),
            local_cache_location: Some(local_cache_location.into()),
            enable_local_cache: true,
            install_location: install_location.into(),
        }
    }

    /// Add a repository (builder pattern).
    pub fn with_repository(mut self, repository: RepositorySettings) -> Self {
        self.repository_settings.push(repository);
        self
    }

    /// Enable or disable the download cache (builder pattern).
    pub fn with_local_cache(mut self, enabled: bool) -> Self {
        self.enable_local_cache = enabled;
        self
    }

    /// Load a settings document, resolving relative paths against its directory.
    ///
    /// # Errors
    ///
    /// Besides read and parse errors, fails with
    /// [`ManagerError::MissingSetting`] when caching is enabled without a
    /// `LocalCacheLocation`, and with [`ManagerError::InvalidSettings`] when
    /// the cache and install trees overlap.
    pub fn load(path: &Path) -> ManagerResult<Self> {
        let mut settings: Self = serializer::read_file(path)?;
        if let Some(base) = path.parent() {
            settings.resolve_relative_to(base);
        }
        settings.validate(&path.display().to_string())?;
        Ok(settings)
    }

    /// Make relative install and cache locations absolute against `base`.
    pub fn resolve_relative_to(&mut self, base: &Path) {
        if self.install_location.is_relative() {
            self.install_location = base.join(&self.install_location);
        }
        if let Some(cache) = self.local_cache_location.as_mut() {
            if cache.is_relative() {
                *cache = base.join(&*cache);
            }
        }
    }

    /// Check that the cache location is usable. `origin` names the document
    /// in errors.
    pub fn validate(&self, origin: &str) -> ManagerResult<()> {
        if !self.enable_local_cache {
            return Ok(());
        }

        let cache = match &self.local_cache_location {
            Some(cache) if !cache.as_os_str().is_empty() => cache,
            _ => {
                return Err(ManagerError::MissingSetting {
                    origin: origin.to_string(),
                    field: "LocalCacheLocation".to_string(),
                })
            }
        };

        if cache.starts_with(&self.install_location) || self.install_location.starts_with(cache) {
            return Err(ManagerError::InvalidSettings {
                origin: origin.to_string(),
                reason: format!(
                    "cache location {} overlaps install location {}",
                    cache.display(),
                    self.install_location.display()
                ),
            });
        }

        Ok(())
    }

    /// Enabled repositories in declaration order.
    pub fn enabled_repositories(&self) -> impl Iterator<Item = &RepositorySettings> {
        self.repository_settings.iter().filter(|r| r.enabled)
    }

    /// Cache root, or `None` when caching is disabled or has no location.
    pub fn cache_root(&self) -> Option<&Path> {
        if self.enable_local_cache {
            self.local_cache_location.as_deref()
        } else {
            None
        }
    }
}

/// Serde adapter for repository locations.
///
/// Accepts absolute URLs and, for convenience, absolute filesystem paths,
/// which become `file://` URLs.
mod location {
    use std::path::Path;

    use reqwest::Url;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(url: &Url, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(url.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Url, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match Url::parse(&raw) {
            Ok(url) => Ok(url),
            Err(parse_error) => Url::from_file_path(Path::new(&raw)).map_err(|_| {
                de::Error::custom(format!("invalid repository location '{}': {}", raw, parse_error))
            }),
        }
    }
}
