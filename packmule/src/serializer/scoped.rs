//! Scoped read-modify-write access to a document.

use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{read_file, write_file};
use crate::manager::ManagerResult;

/// A document loaded for modification and written back when the scope ends.
///
/// The value is written exactly once: either by [`ScopedDocument::commit`],
/// which reports write errors to the caller, or by `Drop` on any other exit
/// path (early return, `?`, unwinding), which logs them.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use packmule::config::Project;
/// use packmule::package::PackageVersion;
/// use packmule::serializer::ScopedDocument;
///
/// # fn main() -> packmule::manager::ManagerResult<()> {
/// let mut project = ScopedDocument::<Project>::open(Path::new("project.json"))?;
/// project.dependencies.push(PackageVersion::parse("foo", "1.0.0")?);
/// project.commit()?;
/// # Ok(())
/// # }
/// ```
pub struct ScopedDocument<T: Serialize> {
    path: PathBuf,
    inner: T,
    written: bool,
}

impl<T: Serialize + DeserializeOwned> ScopedDocument<T> {
    /// Read the document at `path` for modification.
    pub fn open(path: &Path) -> ManagerResult<Self> {
        let inner = read_file(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            inner,
            written: false,
        })
    }
}

impl<T: Serialize> ScopedDocument<T> {
    /// Path the document is written back to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the document now and end the scope.
    pub fn commit(mut self) -> ManagerResult<()> {
        self.written = true;
        write_file(&self.path, &self.inner)
    }
}

impl<T: Serialize> Deref for ScopedDocument<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: Serialize> DerefMut for ScopedDocument<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl<T: Serialize> Drop for ScopedDocument<T> {
    fn drop(&mut self) {
        if self.written {
            return;
        }
        self.written = true;

        if let Err(e) = write_file(&self.path, &self.inner) {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to write back document");
        }
    }
}

/// Read the document at `path`, apply `edit`, and write it back.
///
/// The write happens even when `edit` returns an error; the edit's error
/// takes precedence over a write error.
pub fn modify<T, R, F>(path: &Path, edit: F) -> ManagerResult<R>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce(&mut T) -> ManagerResult<R>,
{
    let mut document = ScopedDocument::<T>::open(path)?;
    let result = edit(&mut *document);
    let written = document.commit();
    let value = result?;
    written?;
    Ok(value)
}
