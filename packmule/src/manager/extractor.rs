//! Payload archive extraction.
//!
//! Payloads are gzip-compressed tarballs. Entries are unpacked with the
//! `tar` crate, which refuses entries that would escape the destination
//! (absolute paths, `..` components).

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use flate2::read::GzDecoder;

use super::error::{ManagerError, ManagerResult};

/// Extracts `.tar.gz` payloads.
#[derive(Debug, Default)]
pub struct TarGzExtractor;

impl TarGzExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self
    }

    /// Unpack `archive` into `dest_dir`, returning the number of files extracted.
    pub fn extract(&self, archive: &Path, dest_dir: &Path) -> ManagerResult<usize> {
        fs::create_dir_all(dest_dir).map_err(|e| ManagerError::CreateDirFailed {
            path: dest_dir.to_path_buf(),
            source: e,
        })?;

        let file = File::open(archive).map_err(|e| ManagerError::ReadFailed {
            path: archive.to_path_buf(),
            source: e,
        })?;

        let mut tarball = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
        tarball
            .unpack(dest_dir)
            .map_err(|e| ManagerError::ExtractionFailed {
                path: archive.to_path_buf(),
                reason: e.to_string(),
            })?;

        count_files_recursive(dest_dir)
    }
}

/// Count files recursively in a directory.
fn count_files_recursive(dir: &Path) -> ManagerResult<usize> {
    let mut count = 0;

    if !dir.exists() {
        return Ok(0);
    }

    let entries = fs::read_dir(dir).map_err(|e| ManagerError::ReadFailed {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() {
            count += 1;
        } else if path.is_dir() {
            count += count_files_recursive(&path)?;
        }
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tar::{Builder, Header};
    use tempfile::TempDir;

    fn build_archive(path: &Path, files: &[(&str, &str)]) {
        let encoder = GzEncoder::new(File::create(path).unwrap(), Compression::default());
        let mut builder = Builder::new(encoder);
        for (name, contents) in files {
            let mut header = Header::new_gnu();
            header.set_path(name).unwrap();
            header.set_size(contents.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append(&header, contents.as_bytes()).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn test_extract_archive() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("foo-1.0.0.tar.gz");
        build_archive(
            &archive,
            &[("README.md", "# foo"), ("lib/foo.txt", "payload")],
        );

        let dest = temp.path().join("out");
        let count = TarGzExtractor::new().extract(&archive, &dest).unwrap();

        assert_eq!(count, 2);
        assert_eq!(fs::read_to_string(dest.join("README.md")).unwrap(), "# foo");
        assert_eq!(
            fs::read_to_string(dest.join("lib/foo.txt")).unwrap(),
            "payload"
        );
    }

    #[test]
    fn test_extract_corrupt_archive() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("broken.tar.gz");
        fs::write(&archive, b"this is not gzip").unwrap();

        let result = TarGzExtractor::new().extract(&archive, &temp.path().join("out"));
        assert!(matches!(result, Err(ManagerError::ExtractionFailed { .. })));
    }

    #[test]
    fn test_extract_missing_archive() {
        let temp = TempDir::new().unwrap();
        let result = TarGzExtractor::new().extract(
            &temp.path().join("missing.tar.gz"),
            &temp.path().join("out"),
        );
        assert!(matches!(result, Err(ManagerError::ReadFailed { .. })));
    }

    #[test]
    fn test_count_files_recursive() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("file1.txt"), "a").unwrap();
        let subdir = temp.path().join("subdir");
        fs::create_dir(&subdir).unwrap();
        fs::write(subdir.join("file2.txt"), "b").unwrap();

        assert_eq!(count_files_recursive(temp.path()).unwrap(), 2);
        assert_eq!(
            count_files_recursive(Path::new("/nonexistent/path")).unwrap(),
            0
        );
    }
}
