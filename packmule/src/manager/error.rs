//! Error types for the Package Manager.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for manager operations.
pub type ManagerResult<T> = Result<T, ManagerError>;

/// Errors that can occur during package management operations.
#[derive(Debug, Error)]
pub enum ManagerError {
    /// A version string does not match `major.minor.patch[-extension]`.
    #[error("invalid version format: '{value}'")]
    InvalidVersionFormat { value: String },

    /// A package name cannot be used as a directory name.
    #[error("invalid package name: '{name}'")]
    InvalidPackageName { name: String },

    /// Package is not published by any enabled repository.
    #[error("{name} v{version} was not found in any enabled repository")]
    PackageNotFound { name: String, version: String },

    /// A repository or payload location could not be opened.
    #[error("repository at {location} is unreachable: {reason}")]
    RepositoryUnreachable { location: String, reason: String },

    /// The location's URL scheme has no registered transport.
    #[error("unsupported repository scheme '{scheme}' for {location}")]
    UnsupportedRepositoryScheme { location: String, scheme: String },

    /// A document could not be parsed into the expected shape.
    #[error("failed to deserialize {origin}: {reason}")]
    Deserialization { origin: String, reason: String },

    /// A settings document omits a value it requires.
    #[error("{origin} does not set {field}")]
    MissingSetting { origin: String, field: String },

    /// A settings document names locations that cannot be used together.
    #[error("invalid settings in {origin}: {reason}")]
    InvalidSettings { origin: String, reason: String },

    /// A value could not be encoded as a document.
    #[error("failed to serialize document: {reason}")]
    Serialization { reason: String },

    /// Failed to read a file or directory.
    #[error("failed to read {}: {source}", path.display())]
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to write a file or directory.
    #[error("failed to write {}: {source}", path.display())]
    WriteFailed { path: PathBuf, source: io::Error },

    /// Failed to create a directory.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDirFailed { path: PathBuf, source: io::Error },

    /// Failed to remove a file or directory.
    #[error("failed to remove {}: {source}", path.display())]
    RemoveFailed { path: PathBuf, source: io::Error },

    /// Checksum verification of a payload failed.
    #[error("checksum mismatch for {name}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    /// Archive extraction failed.
    #[error("failed to extract {}: {reason}", path.display())]
    ExtractionFailed { path: PathBuf, reason: String },

    /// The operation was cancelled through the manager's token.
    #[error("operation cancelled")]
    Cancelled,
}

impl ManagerError {
    /// Build a `PackageNotFound` error.
    pub fn not_found(name: impl Into<String>, version: impl ToString) -> Self {
        Self::PackageNotFound {
            name: name.into(),
            version: version.to_string(),
        }
    }

    /// Whether this error came from the network or filesystem transport layer.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::RepositoryUnreachable { .. } | Self::UnsupportedRepositoryScheme { .. }
        )
    }
}
