//! Package data types and layout conventions.
//!
//! This module provides the core data structures shared by repositories,
//! projects and the install tree.
//!
//! # Overview
//!
//! - **Version**: `major.minor.patch[-extension]` with total ordering
//! - **PackageVersion**: a name paired with a version; used for dependency
//!   declarations and installed-package records
//! - **PackageManifest**: repository-published metadata for one package version
//!
//! # Type Hierarchy
//!
//! ```text
//! PackageManifest                    PackageVersion
//! ├── name ─────────────────────────►├── name
//! ├── version: Version ─────────────►└── version: Version
//! ├── display_name, description, keywords, category
//! ├── dependencies: Vec<PackageVersion>
//! └── archive, checksum (payload)
//! ```
//!
//! # Layout
//!
//! ```text
//! <install_root>/<name>/<version>/     installed marker and payload
//! <cache_root>/<name>/<version>/       cached <name>-<version>.tar.gz
//! ```

mod manifest;
mod naming;
mod reference;
mod version;

pub use manifest::PackageManifest;
pub use reference::PackageVersion;
pub use version::Version;

pub use naming::{
    archive_filename, cache_path, install_path, staging_path, validate_package_name,
    STAGING_PREFIX,
};
