//! JSON document reading and writing.
//!
//! Settings, project and manifest-list documents are all JSON. This module
//! maps parse failures to [`ManagerError::Deserialization`] and filesystem
//! failures to the I/O variants, so callers only see [`ManagerResult`].
//!
//! For in-place edits use [`ScopedDocument`] or [`modify`], which guarantee
//! the document is written back when the edit scope ends.

mod scoped;

pub use scoped::{modify, ScopedDocument};

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::manager::{ManagerError, ManagerResult};

/// Deserialize a value from a reader.
///
/// `origin` names the source in error messages (a path or URL).
pub fn read<T, R>(reader: R, origin: &str) -> ManagerResult<T>
where
    T: DeserializeOwned,
    R: Read,
{
    serde_json::from_reader(BufReader::new(reader)).map_err(|e| ManagerError::Deserialization {
        origin: origin.to_string(),
        reason: e.to_string(),
    })
}

/// Deserialize a value from a string.
pub fn read_str<T: DeserializeOwned>(content: &str, origin: &str) -> ManagerResult<T> {
    serde_json::from_str(content).map_err(|e| ManagerError::Deserialization {
        origin: origin.to_string(),
        reason: e.to_string(),
    })
}

/// Read and deserialize a document file.
pub fn read_file<T: DeserializeOwned>(path: &Path) -> ManagerResult<T> {
    let file = File::open(path).map_err(|e| ManagerError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    read(file, &path.display().to_string())
}

/// Serialize a value to a string.
pub fn to_string<T: Serialize>(value: &T) -> ManagerResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| ManagerError::Serialization {
        reason: e.to_string(),
    })
}

/// Serialize a value and write it to `path`.
///
/// Parent directories are created as needed. The document is written to a
/// sibling temporary file and renamed over the target, so a failed write
/// leaves the previous contents intact.
pub fn write_file<T: Serialize>(path: &Path, value: &T) -> ManagerResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ManagerError::CreateDirFailed {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let content = to_string(value)?;
    let temp_path = path.with_extension("tmp");
    let write_failed = |source| ManagerError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(&temp_path).map_err(write_failed)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(content.as_bytes()).map_err(write_failed)?;
    writer.write_all(b"\n").map_err(write_failed)?;
    writer.flush().map_err(write_failed)?;
    drop(writer);

    fs::rename(&temp_path, path).map_err(write_failed)
}
