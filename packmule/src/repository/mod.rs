//! Repository access.
//!
//! A repository is a single JSON document listing [`PackageManifest`]s,
//! reachable through a URL. Package payloads live next to it (or at an
//! absolute URL named by the manifest).
//!
//! [`RepositoryReader`] maps URL schemes to [`Transport`]s:
//!
//! | Scheme | Transport |
//! |--------|-----------|
//! | `file` | [`FileTransport`] |
//! | `http`, `https` | [`HttpTransport`] |
//!
//! [`PackageManifest`]: crate::package::PackageManifest

mod http;
mod reader;
mod transport;

pub use http::HttpTransport;
pub use reader::RepositoryReader;
pub use transport::{FileTransport, RepositoryStream, Transport};
