//! Runtime knobs for a [`PackageManager`](super::PackageManager).
//!
//! Repositories, install and cache locations come from the settings
//! document; this only carries what the document does not.

use std::time::Duration;

use crate::config::DEFAULT_TIMEOUT_SECS;

/// Configuration for the Package Manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    /// HTTP request timeout.
    pub timeout: Duration,

    /// Whether to verify manifest checksums of downloaded and cached payloads.
    pub verify_checksums: bool,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            verify_checksums: true,
        }
    }
}

impl ManagerConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable or disable checksum verification.
    pub fn with_verify_checksums(mut self, verify: bool) -> Self {
        self.verify_checksums = verify;
        self
    }
}
