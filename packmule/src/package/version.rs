//! Semantic version parsing and ordering.
//!
//! Versions follow the `major.minor.patch[-extension]` grammar:
//!
//! - Each numeric component is `0` or a decimal without leading zeros.
//! - The optional extension is a dot-separated list of identifiers made of
//!   ASCII alphanumerics and `-`, e.g. `1.4.0-preview.2`.
//!
//! Build metadata (`+build`) and a leading `v` are not accepted.
//!
//! # Ordering
//!
//! Versions order by `(major, minor, patch)`. When the triples are equal, a
//! plain release ranks above any extension (`1.0.0-rc.1 < 1.0.0`), and two
//! extensions compare identifier by identifier using Semantic Versioning
//! 2.0.0 precedence (`alpha < alpha.1 < beta < beta.2 < beta.11 < rc.1`).

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use semver::Prerelease;
use serde::{Deserialize, Serialize};

use crate::manager::{ManagerError, ManagerResult};

/// Get the version grammar pattern.
///
/// We capture:
/// - Group 1: major
/// - Group 2: minor
/// - Group 3: patch
/// - Group 4: extension without the leading `-` (optional)
fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)(?:-([0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?$",
        )
        .expect("version pattern is valid")
    })
}

/// A parsed semantic version.
///
/// # Example
///
/// ```
/// use packmule::package::Version;
///
/// let stable = Version::parse("1.2.3").unwrap();
/// let preview = Version::parse("1.2.3-preview.1").unwrap();
///
/// assert!(preview < stable);
/// assert_eq!(preview.extension(), Some("preview.1"));
/// assert_eq!(preview.to_string(), "1.2.3-preview.1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    major: u64,
    minor: u64,
    patch: u64,
    extension: Prerelease,
}

impl Version {
    /// Create a release version with no extension.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            extension: Prerelease::EMPTY,
        }
    }

    /// Parse a version string.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::InvalidVersionFormat`] if the string is empty,
    /// does not match the grammar, or a component overflows.
    pub fn parse(value: &str) -> ManagerResult<Self> {
        let invalid = || ManagerError::InvalidVersionFormat {
            value: value.to_string(),
        };

        let captures = version_pattern().captures(value).ok_or_else(invalid)?;

        let component = |index: usize| -> ManagerResult<u64> {
            captures[index].parse::<u64>().map_err(|_| invalid())
        };
        let major = component(1)?;
        let minor = component(2)?;
        let patch = component(3)?;

        // Prerelease::new also rejects numeric identifiers with leading zeros.
        let extension = match captures.get(4) {
            Some(ext) => Prerelease::new(ext.as_str()).map_err(|_| invalid())?,
            None => Prerelease::EMPTY,
        };

        Ok(Self {
            major,
            minor,
            patch,
            extension,
        })
    }

    /// Major component.
    pub fn major(&self) -> u64 {
        self.major
    }

    /// Minor component.
    pub fn minor(&self) -> u64 {
        self.minor
    }

    /// Patch component.
    pub fn patch(&self) -> u64 {
        self.patch
    }

    /// Extension without the leading `-`, if any.
    pub fn extension(&self) -> Option<&str> {
        if self.extension.is_empty() {
            None
        } else {
            Some(self.extension.as_str())
        }
    }

    /// Whether this version carries an extension.
    pub fn is_prerelease(&self) -> bool {
        !self.extension.is_empty()
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            // Prerelease orders an empty extension above any non-empty one.
            .then_with(|| self.extension.cmp(&other.extension))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(ext) = self.extension() {
            write!(f, "-{}", ext)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = ManagerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = ManagerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}
