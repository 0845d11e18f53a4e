//! Transport trait and the local filesystem transport.

use std::fs::File;
use std::io::Read;

use reqwest::Url;

use crate::manager::{ManagerError, ManagerResult};

/// An open byte stream from a repository or payload location.
///
/// The stream owns the resource backing it (a file handle, an HTTP
/// response). Dropping the stream releases that resource exactly once.
pub type RepositoryStream = Box<dyn Read + Send>;

/// A way of opening locations for a set of URL schemes.
///
/// Implement this to add a transport (e.g. a content-addressed store) and
/// register it with [`RepositoryReader::register`](super::RepositoryReader::register).
pub trait Transport: Send + Sync {
    /// URL schemes this transport handles, lowercase.
    fn schemes(&self) -> &[&'static str];

    /// Open `location` for reading.
    ///
    /// Failures to reach or open the location are reported as
    /// [`ManagerError::RepositoryUnreachable`].
    fn open(&self, location: &Url) -> ManagerResult<RepositoryStream>;
}

/// Transport for `file://` locations.
#[derive(Debug, Default)]
pub struct FileTransport;

impl FileTransport {
    /// Create a new file transport.
    pub fn new() -> Self {
        Self
    }
}

impl Transport for FileTransport {
    fn schemes(&self) -> &[&'static str] {
        &["file"]
    }

    fn open(&self, location: &Url) -> ManagerResult<RepositoryStream> {
        let path = location
            .to_file_path()
            .map_err(|_| ManagerError::RepositoryUnreachable {
                location: location.to_string(),
                reason: "not a local file path".to_string(),
            })?;

        let file = File::open(&path).map_err(|e| ManagerError::RepositoryUnreachable {
            location: location.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Box::new(file))
    }
}
