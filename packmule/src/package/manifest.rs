//! Repository-published package manifests.

use serde::{Deserialize, Serialize};

use super::naming::archive_filename;
use super::reference::PackageVersion;
use super::version::Version;

/// Description of one published package version.
///
/// Manifests are only produced by deserializing a repository's manifest list:
///
/// ```json
/// [
///   {
///     "Name": "foo",
///     "DisplayName": "Foo",
///     "Version": "1.2.0",
///     "Description": "Foo helpers",
///     "Keywords": ["util"],
///     "Category": "Tools",
///     "Dependencies": [{ "Name": "bar", "Version": "0.3.0" }],
///     "Archive": "packages/foo-1.2.0.tar.gz",
///     "Checksum": "9f86d0..."
///   }
/// ]
/// ```
///
/// `Dependencies` are informational: only a project's direct dependencies
/// are ever installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageManifest {
    /// Package name.
    pub name: String,

    /// Human-readable name.
    #[serde(default)]
    pub display_name: String,

    /// Published version.
    pub version: Version,

    /// Free-form description.
    #[serde(default)]
    pub description: String,

    /// Search keywords, in publisher order.
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Publisher-defined category.
    #[serde(default)]
    pub category: String,

    /// Declared direct dependencies, in publisher order.
    #[serde(default)]
    pub dependencies: Vec<PackageVersion>,

    /// Payload archive location, absolute or relative to the repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive: Option<String>,

    /// Lowercase hex SHA-256 of the payload archive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl PackageManifest {
    /// The reference this manifest publishes.
    pub fn package_version(&self) -> PackageVersion {
        PackageVersion::new(self.name.clone(), self.version.clone())
    }

    /// True if this manifest publishes exactly `name` at `version`.
    pub fn matches(&self, name: &str, version: &Version) -> bool {
        self.name == name && &self.version == version
    }

    /// Archive reference to resolve against the repository location.
    pub fn archive_reference(&self) -> String {
        self.archive
            .clone()
            .unwrap_or_else(|| archive_filename(&self.name, &self.version))
    }

    /// Display name, falling back to the package name.
    pub fn title(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }
}
