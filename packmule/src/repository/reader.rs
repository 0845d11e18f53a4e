//! Scheme dispatch over registered transports.

use std::time::Duration;

use reqwest::Url;

use super::http::HttpTransport;
use super::transport::{FileTransport, RepositoryStream, Transport};
use crate::config::RepositorySettings;
use crate::manager::{ManagerError, ManagerResult};

/// Opens repository documents and payloads by URL scheme.
///
/// Transports are consulted in registration order; the first one claiming
/// a scheme wins. A location whose scheme nobody claims fails with
/// [`ManagerError::UnsupportedRepositoryScheme`] without touching the
/// network or filesystem.
pub struct RepositoryReader {
    transports: Vec<Box<dyn Transport>>,
}

impl std::fmt::Debug for RepositoryReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let schemes: Vec<&str> = self
            .transports
            .iter()
            .flat_map(|t| t.schemes().iter().copied())
            .collect();
        f.debug_struct("RepositoryReader")
            .field("schemes", &schemes)
            .finish()
    }
}

impl Default for RepositoryReader {
    fn default() -> Self {
        Self::with_defaults(Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS))
    }
}

impl RepositoryReader {
    /// Create a reader with no transports.
    pub fn empty() -> Self {
        Self {
            transports: Vec::new(),
        }
    }

    /// Create a reader for `file`, `http` and `https` locations.
    pub fn with_defaults(timeout: Duration) -> Self {
        let mut reader = Self::empty();
        reader.register(FileTransport::new());
        reader.register(HttpTransport::with_timeout(timeout));
        reader
    }

    /// Register an additional transport.
    pub fn register(&mut self, transport: impl Transport + 'static) {
        self.transports.push(Box::new(transport));
    }

    /// Whether some transport handles `scheme`.
    pub fn supports(&self, scheme: &str) -> bool {
        self.transport_for(scheme).is_some()
    }

    /// Open the manifest-list document of a repository.
    pub fn open(&self, repository: &RepositorySettings) -> ManagerResult<RepositoryStream> {
        tracing::debug!(
            repository = %repository.name,
            location = %repository.location,
            "Opening repository"
        );
        self.fetch(&repository.location)
    }

    /// Open an arbitrary location (repository document or payload archive).
    pub fn fetch(&self, location: &Url) -> ManagerResult<RepositoryStream> {
        let scheme = location.scheme();
        let transport =
            self.transport_for(scheme)
                .ok_or_else(|| ManagerError::UnsupportedRepositoryScheme {
                    location: location.to_string(),
                    scheme: scheme.to_string(),
                })?;

        transport.open(location)
    }

    /// Resolve a manifest's archive reference against its repository location.
    ///
    /// Absolute URLs are returned unchanged.
    pub fn resolve(base: &Url, reference: &str) -> ManagerResult<Url> {
        base.join(reference)
            .map_err(|e| ManagerError::RepositoryUnreachable {
                location: format!("{} + {}", base, reference),
                reason: format!("invalid archive reference: {}", e),
            })
    }

    fn transport_for(&self, scheme: &str) -> Option<&dyn Transport> {
        self.transports
            .iter()
            .find(|t| t.schemes().iter().any(|s| s.eq_ignore_ascii_case(scheme)))
            .map(|t| t.as_ref())
    }
}
