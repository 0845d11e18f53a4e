//! SHA-256 checksums for payload archives.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use super::error::{ManagerError, ManagerResult};

/// Buffer size for reading files during checksum calculation (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Calculate the lowercase hex SHA-256 of a file.
pub fn calculate_file_checksum(path: &Path) -> ManagerResult<String> {
    let mut file = File::open(path).map_err(|e| ManagerError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = file
            .read(&mut buffer)
            .map_err(|e| ManagerError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            })?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Verify that the payload of `package` at `path` hashes to `expected`.
///
/// `expected` is compared case-insensitively.
pub fn verify_checksum(path: &Path, expected: &str, package: &str) -> ManagerResult<()> {
    let actual = calculate_file_checksum(path)?;
    if !actual.eq_ignore_ascii_case(expected.trim()) {
        return Err(ManagerError::ChecksumMismatch {
            name: package.to_string(),
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const HELLO_WORLD: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    fn write_file(dir: &TempDir, name: &str, data: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(data).unwrap();
        path
    }

    #[test]
    fn test_calculate_file_checksum() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp, "payload.tar.gz", b"hello world");

        assert_eq!(calculate_file_checksum(&path).unwrap(), HELLO_WORLD);
    }

    #[test]
    fn test_calculate_empty_file() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp, "empty", b"");

        assert_eq!(
            calculate_file_checksum(&path).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_calculate_nonexistent_file() {
        let result = calculate_file_checksum(Path::new("/nonexistent/payload.tar.gz"));
        assert!(matches!(result, Err(ManagerError::ReadFailed { .. })));
    }

    #[test]
    fn test_verify_accepts_uppercase() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp, "payload", b"hello world");

        verify_checksum(&path, &HELLO_WORLD.to_uppercase(), "foo@1.0.0").unwrap();
    }

    #[test]
    fn test_verify_mismatch_names_package() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp, "payload", b"hello world");

        match verify_checksum(&path, "deadbeef", "foo@1.0.0") {
            Err(ManagerError::ChecksumMismatch {
                name,
                expected,
                actual,
            }) => {
                assert_eq!(name, "foo@1.0.0");
                assert_eq!(expected, "deadbeef");
                assert_eq!(actual, HELLO_WORLD);
            }
            other => panic!("expected ChecksumMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_file_larger_than_buffer() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp, "large.bin", &vec![0xABu8; BUFFER_SIZE + 1234]);

        let first = calculate_file_checksum(&path).unwrap();
        let second = calculate_file_checksum(&path).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
    }
}
