//! Payload installation.
//!
//! This module runs the install workflow for one resolved manifest:
//! 1. Use the cached archive if there is one (and it still verifies)
//! 2. Otherwise download it, into the cache when enabled
//! 3. Verify the manifest checksum
//! 4. Extract into a staging directory and rename it into the install tree
//!
//! The cancellation token is checked before every stage and between
//! download chunks.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use reqwest::Url;
use tokio_util::sync::CancellationToken;

use super::checksum::verify_checksum;
use super::config::ManagerConfig;
use super::error::{ManagerError, ManagerResult};
use super::extractor::TarGzExtractor;
use super::report::InstallSummary;
use super::store::LocalStore;
use crate::config::RepositorySettings;
use crate::package::{archive_filename, PackageManifest};
use crate::repository::RepositoryReader;

/// Buffer size for reading/writing during downloads (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Installation stages, for logging and cancellation points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStage {
    /// Looking for a cached archive.
    CheckingCache,
    /// Fetching the archive from its repository.
    Downloading,
    /// Verifying the archive checksum.
    Verifying,
    /// Extracting into the install tree.
    Extracting,
    /// Installation complete.
    Complete,
}

impl InstallStage {
    /// Get a human-readable name for the stage.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CheckingCache => "Checking cache",
            Self::Downloading => "Downloading",
            Self::Verifying => "Verifying",
            Self::Extracting => "Extracting",
            Self::Complete => "Complete",
        }
    }
}

/// A manifest together with the repository that published it.
#[derive(Debug, Clone)]
pub struct ResolvedManifest<'a> {
    pub repository: &'a RepositorySettings,
    pub manifest: PackageManifest,
}

impl ResolvedManifest<'_> {
    /// Absolute location of the payload archive.
    pub fn archive_url(&self) -> ManagerResult<Url> {
        RepositoryReader::resolve(&self.repository.location, &self.manifest.archive_reference())
    }
}

/// Where the archive to extract lives.
enum Payload {
    /// In the cache; kept after extraction.
    Cached(PathBuf),
    /// A scratch download; removed after extraction.
    Scratch(PathBuf),
}

impl Payload {
    fn path(&self) -> &Path {
        match self {
            Self::Cached(path) | Self::Scratch(path) => path,
        }
    }
}

/// Installs resolved manifests into a [`LocalStore`].
pub struct PackageInstaller<'a> {
    reader: &'a RepositoryReader,
    store: &'a LocalStore,
    config: &'a ManagerConfig,
    cancel: &'a CancellationToken,
    extractor: TarGzExtractor,
}

impl<'a> PackageInstaller<'a> {
    pub fn new(
        reader: &'a RepositoryReader,
        store: &'a LocalStore,
        config: &'a ManagerConfig,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            reader,
            store,
            config,
            cancel,
            extractor: TarGzExtractor::new(),
        }
    }

    /// Install the payload of `resolved`.
    ///
    /// The caller has already checked that the package is not installed.
    pub fn install(&self, resolved: &ResolvedManifest<'_>) -> ManagerResult<InstallSummary> {
        let manifest = &resolved.manifest;
        let label = manifest.package_version().to_string();

        self.enter(InstallStage::CheckingCache, &label)?;
        let (payload, bytes_downloaded, from_cache) = match self.cached_payload(manifest)? {
            Some(path) => (Payload::Cached(path), 0, true),
            None => {
                let (payload, bytes) = self.download_payload(resolved)?;
                (payload, bytes, false)
            }
        };

        self.enter(InstallStage::Extracting, &label)?;
        let mut files_extracted = 0;
        let result = self
            .store
            .install_with(&manifest.name, &manifest.version, |staging| {
                files_extracted = self.extractor.extract(payload.path(), staging)?;
                self.check_cancelled()
            });

        if let Payload::Scratch(path) = &payload {
            self.store.discard_scratch(path);
        }

        let install_path = result?;
        self.enter(InstallStage::Complete, &label)?;

        Ok(InstallSummary {
            install_path,
            repository: resolved.repository.name.clone(),
            from_cache,
            bytes_downloaded,
            files_extracted,
        })
    }

    /// A cached archive that passes verification, if any.
    ///
    /// A cached archive that fails verification is evicted so the caller
    /// downloads a fresh copy.
    fn cached_payload(&self, manifest: &PackageManifest) -> ManagerResult<Option<PathBuf>> {
        let Some(archive) = self.store.cached_archive(&manifest.name, &manifest.version) else {
            return Ok(None);
        };

        match self.verify(&archive, manifest) {
            Ok(()) => {
                tracing::debug!(archive = %archive.display(), "Using cached payload");
                Ok(Some(archive))
            }
            Err(e) => {
                tracing::warn!(
                    package = %manifest.package_version(),
                    error = %e,
                    "Evicting unusable cache entry"
                );
                self.store.remove_cached(&manifest.name, &manifest.version)?;
                Ok(None)
            }
        }
    }

    /// Download the archive, into the cache when enabled.
    fn download_payload(&self, resolved: &ResolvedManifest<'_>) -> ManagerResult<(Payload, u64)> {
        let manifest = &resolved.manifest;
        let label = manifest.package_version().to_string();
        let url = resolved.archive_url()?;

        self.enter(InstallStage::Downloading, &label)?;

        let mut bytes = 0;
        let cached = self
            .store
            .cache_with(&manifest.name, &manifest.version, |dir| {
                let dest = dir.join(archive_filename(&manifest.name, &manifest.version));
                bytes = self.download(&url, &dest)?;
                self.enter(InstallStage::Verifying, &label)?;
                self.verify(&dest, manifest)
            })?;

        if let Some(archive) = cached {
            return Ok((Payload::Cached(archive), bytes));
        }

        let scratch = self.store.scratch_archive(&manifest.name, &manifest.version);
        let result = self.download(&url, &scratch).and_then(|downloaded| {
            self.enter(InstallStage::Verifying, &label)?;
            self.verify(&scratch, manifest)?;
            Ok(downloaded)
        });

        match result {
            Ok(downloaded) => Ok((Payload::Scratch(scratch), downloaded)),
            Err(e) => {
                self.store.discard_scratch(&scratch);
                Err(e)
            }
        }
    }

    /// Copy `url` to `dest`, checking for cancellation between chunks.
    fn download(&self, url: &Url, dest: &Path) -> ManagerResult<u64> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| ManagerError::CreateDirFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut stream = self.reader.fetch(url)?;
        let file = File::create(dest).map_err(|e| ManagerError::WriteFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;
        let mut writer = BufWriter::new(file);
        let mut buffer = vec![0u8; BUFFER_SIZE];
        let mut downloaded = 0u64;

        loop {
            self.check_cancelled()?;

            let bytes_read =
                stream
                    .read(&mut buffer)
                    .map_err(|e| ManagerError::RepositoryUnreachable {
                        location: url.to_string(),
                        reason: format!("Read error: {}", e),
                    })?;

            if bytes_read == 0 {
                break;
            }

            writer
                .write_all(&buffer[..bytes_read])
                .map_err(|e| ManagerError::WriteFailed {
                    path: dest.to_path_buf(),
                    source: e,
                })?;

            downloaded += bytes_read as u64;
        }

        writer.flush().map_err(|e| ManagerError::WriteFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;

        tracing::debug!(url = %url, bytes = downloaded, "Downloaded payload");
        Ok(downloaded)
    }

    fn verify(&self, archive: &Path, manifest: &PackageManifest) -> ManagerResult<()> {
        match (&manifest.checksum, self.config.verify_checksums) {
            (Some(expected), true) => {
                verify_checksum(archive, expected, &manifest.package_version().to_string())
            }
            _ => Ok(()),
        }
    }

    fn enter(&self, stage: InstallStage, package: &str) -> ManagerResult<()> {
        self.check_cancelled()?;
        tracing::debug!(package, stage = stage.name(), "Install stage");
        Ok(())
    }

    fn check_cancelled(&self) -> ManagerResult<()> {
        if self.cancel.is_cancelled() {
            Err(ManagerError::Cancelled)
        } else {
            Ok(())
        }
    }
}
