//! Named version references.
//!
//! A [`PackageVersion`] pairs a package name with a parsed [`Version`]. It is
//! the unit of dependency declaration in a project document and the record
//! type for packages found in the install tree.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::version::Version;
use crate::manager::ManagerResult;

/// A reference to one version of a named package.
///
/// Equality and hashing use both the name and the version. Ordering is
/// deliberately not implemented as a trait: comparing two references only
/// compares versions, so callers use [`PackageVersion::cmp_version`] or
/// [`PackageVersion::is_older_than`] and check names themselves.
///
/// # Example
///
/// ```
/// use packmule::package::PackageVersion;
///
/// let installed = PackageVersion::parse("foo", "1.0.0").unwrap();
/// let available = PackageVersion::parse("foo", "1.2.0").unwrap();
///
/// assert!(installed.is_older_than(&available));
/// assert_eq!(installed.to_string(), "foo@1.0.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageVersion {
    /// Package name.
    pub name: String,

    /// Package version.
    pub version: Version,
}

impl PackageVersion {
    /// Create a reference from an already parsed version.
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    /// Create a reference, parsing the version string.
    pub fn parse(name: impl Into<String>, version: &str) -> ManagerResult<Self> {
        Ok(Self::new(name, Version::parse(version)?))
    }

    /// Compare versions only; the name is ignored.
    pub fn cmp_version(&self, other: &Self) -> Ordering {
        self.version.cmp(&other.version)
    }

    /// True if this reference's version is strictly lower than `other`'s.
    pub fn is_older_than(&self, other: &Self) -> bool {
        self.cmp_version(other) == Ordering::Less
    }

    /// True if this reference names the given package and version.
    pub fn matches(&self, name: &str, version: &Version) -> bool {
        self.name == name && &self.version == version
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn pv(name: &str, version: &str) -> PackageVersion {
        PackageVersion::parse(name, version).unwrap()
    }

    #[test]
    fn test_equality_uses_name_and_version() {
        assert_eq!(pv("foo", "1.0.0"), pv("foo", "1.0.0"));
        assert_ne!(pv("foo", "1.0.0"), pv("bar", "1.0.0"));
        assert_ne!(pv("foo", "1.0.0"), pv("foo", "1.0.1"));
    }

    #[test]
    fn test_cmp_version_ignores_name() {
        assert_eq!(pv("foo", "1.0.0").cmp_version(&pv("bar", "1.0.0")), Ordering::Equal);
        assert!(pv("foo", "1.0.0").is_older_than(&pv("bar", "2.0.0")));
        assert!(!pv("foo", "2.0.0").is_older_than(&pv("foo", "2.0.0")));
    }

    #[test]
    fn test_hash_distinguishes_names() {
        let set: HashSet<_> = [pv("foo", "1.0.0"), pv("bar", "1.0.0"), pv("foo", "1.0.0")]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_matches() {
        let reference = pv("foo", "1.0.0");
        assert!(reference.matches("foo", &Version::new(1, 0, 0)));
        assert!(!reference.matches("foo", &Version::new(1, 0, 1)));
        assert!(!reference.matches("bar", &Version::new(1, 0, 0)));
    }

    #[test]
    fn test_serde_document_shape() {
        let json = serde_json::to_string(&pv("foo", "1.0.0-rc.1")).unwrap();
        assert_eq!(json, r#"{"Name":"foo","Version":"1.0.0-rc.1"}"#);

        let parsed: PackageVersion =
            serde_json::from_str(r#"{"Name":"bar","Version":"2.1.0"}"#).unwrap();
        assert_eq!(parsed, pv("bar", "2.1.0"));
    }

    #[test]
    fn test_parse_invalid_version() {
        assert!(PackageVersion::parse("foo", "latest").is_err());
    }
}
