//! HTTP(S) transport.
//!
//! Issues a blocking GET and hands back the response as the stream. The
//! response owns the connection and its body, so it is the only thing that
//! needs releasing.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;

use super::transport::{RepositoryStream, Transport};
use crate::config::DEFAULT_TIMEOUT_SECS;
use crate::manager::{ManagerError, ManagerResult};

/// HTTP(S) transport backed by a blocking `reqwest` client.
///
/// No retries are attempted; a failed request fails the open. If the client
/// cannot be built, every open fails with the build error.
#[derive(Debug)]
pub struct HttpTransport {
    client: Result<Client, String>,
    pub(crate) timeout: Duration,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

impl HttpTransport {
    /// Create a transport with the default timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("packmule/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                tracing::warn!(error = %e, "Failed to build HTTP client");
                e.to_string()
            });

        Self { client, timeout }
    }
}

impl Transport for HttpTransport {
    fn schemes(&self) -> &[&'static str] {
        &["http", "https"]
    }

    fn open(&self, location: &Url) -> ManagerResult<RepositoryStream> {
        tracing::debug!(url = %location, "GET");

        let client = self
            .client
            .as_ref()
            .map_err(|reason| ManagerError::RepositoryUnreachable {
                location: location.to_string(),
                reason: format!("HTTP client unavailable: {}", reason),
            })?;

        let response = client.get(location.clone()).send().map_err(|e| {
            let reason = if e.is_timeout() {
                format!("request timed out after {}s", self.timeout.as_secs())
            } else {
                e.to_string()
            };
            ManagerError::RepositoryUnreachable {
                location: location.to_string(),
                reason,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ManagerError::RepositoryUnreachable {
                location: location.to_string(),
                reason: format!("GET request failed with status {}", status),
            });
        }

        Ok(Box::new(response))
    }
}
