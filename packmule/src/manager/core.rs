//! The package manager.
//!
//! [`PackageManager`] ties a project's dependency list and a settings
//! document to the repository reader and the local store. It borrows both
//! documents for its lifetime and never mutates them.

use std::collections::HashMap;
use std::slice;

use tokio_util::sync::CancellationToken;

use super::config::ManagerConfig;
use super::error::{ManagerError, ManagerResult};
use super::installer::{PackageInstaller, ResolvedManifest};
use super::report::{
    EnsureOutcome, EnsureReport, InstallOutcome, RepositoryScan, UninstallOutcome, UpdateOutcome,
    UpdateReport,
};
use super::store::LocalStore;
use crate::config::{PackageManagerSettings, Project, RepositorySettings};
use crate::package::{validate_package_name, PackageManifest, PackageVersion, Version};
use crate::repository::RepositoryReader;
use crate::serializer;

/// Installs, removes and updates the packages of one project.
///
/// All operations block the calling thread. The install and cache roots are
/// modified without locking, so callers must not run two managers against
/// the same install root at the same time.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use packmule::config::{PackageManagerSettings, Project};
/// use packmule::manager::PackageManager;
///
/// let project = Project::load(Path::new("project.json"))?;
/// let settings = PackageManagerSettings::load(Path::new("settings.json"))?;
/// let manager = PackageManager::new(&project, &settings);
///
/// let report = manager.ensure_packages();
/// for (package, error) in report.failures() {
///     eprintln!("{}: {}", package, error);
/// }
/// # Ok::<(), packmule::manager::ManagerError>(())
/// ```
#[derive(Debug)]
pub struct PackageManager<'a> {
    project: &'a Project,
    settings: &'a PackageManagerSettings,
    config: ManagerConfig,
    reader: RepositoryReader,
    store: LocalStore,
    cancel: CancellationToken,
}

impl<'a> PackageManager<'a> {
    /// Create a manager with the default configuration.
    pub fn new(project: &'a Project, settings: &'a PackageManagerSettings) -> Self {
        Self::with_config(project, settings, ManagerConfig::default())
    }

    /// Create a manager with a custom configuration.
    pub fn with_config(
        project: &'a Project,
        settings: &'a PackageManagerSettings,
        config: ManagerConfig,
    ) -> Self {
        Self {
            project,
            settings,
            reader: RepositoryReader::with_defaults(config.timeout),
            store: LocalStore::from_settings(settings),
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the repository reader, e.g. to register extra transports.
    pub fn with_reader(mut self, reader: RepositoryReader) -> Self {
        self.reader = reader;
        self
    }

    /// Use an externally owned cancellation token.
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn project(&self) -> &Project {
        self.project
    }

    pub fn settings(&self) -> &PackageManagerSettings {
        self.settings
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    /// A handle that cancels this manager's running and future operations.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Cancel running and future operations.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    // =========================================================================
    // Repositories
    // =========================================================================

    /// Manifests of every enabled repository, in settings order.
    ///
    /// Repositories are opened lazily as iteration reaches them. The first
    /// failure is yielded once and ends the iteration.
    pub fn manifests(&self) -> Manifests<'_> {
        Manifests {
            inner: self.resolved_manifests(),
        }
    }

    /// Read every enabled repository, collecting failures instead of stopping.
    pub fn scan_repositories(&self) -> RepositoryScan {
        let mut scan = RepositoryScan::default();
        for repository in self.settings.enabled_repositories() {
            let result = self
                .check_cancelled()
                .and_then(|()| read_repository(&self.reader, repository));
            if let Err(e) = &result {
                tracing::warn!(repository = %repository.name, error = %e, "Skipping repository");
            }
            scan.repositories.push((repository.clone(), result));
        }
        scan
    }

    /// The first manifest publishing `name` at `version`, in repository order.
    ///
    /// Repositories after the matching one are not opened.
    pub fn get_manifest(
        &self,
        name: &str,
        version: &Version,
    ) -> ManagerResult<Option<PackageManifest>> {
        Ok(self.resolve(name, version)?.map(|resolved| resolved.manifest))
    }

    fn resolve(&self, name: &str, version: &Version) -> ManagerResult<Option<ResolvedManifest<'_>>> {
        for resolved in self.resolved_manifests() {
            let resolved = resolved?;
            if resolved.manifest.matches(name, version) {
                tracing::debug!(
                    package = %resolved.manifest.package_version(),
                    repository = %resolved.repository.name,
                    "Resolved manifest"
                );
                return Ok(Some(resolved));
            }
        }
        Ok(None)
    }

    fn resolved_manifests(&self) -> ResolvedManifests<'_> {
        ResolvedManifests {
            reader: &self.reader,
            cancel: &self.cancel,
            repositories: self.settings.repository_settings.iter(),
            current: None,
            finished: false,
        }
    }

    // =========================================================================
    // Install tree
    // =========================================================================

    /// Whether `name` at `version` is installed.
    pub fn is_installed(&self, name: &str, version: &Version) -> bool {
        validate_package_name(name).is_ok() && self.store.is_installed(name, version)
    }

    /// Whether a cache entry exists for `name` at `version`.
    pub fn is_cached(&self, name: &str, version: &Version) -> bool {
        validate_package_name(name).is_ok() && self.store.is_cached(name, version)
    }

    /// Installed packages, sorted by name then version.
    pub fn installed_packages(&self) -> ManagerResult<Vec<PackageVersion>> {
        self.store.installed_packages()
    }

    /// Install `name` at `version` unless it is already installed.
    pub fn install(&self, name: &str, version: &Version) -> ManagerResult<InstallOutcome> {
        validate_package_name(name)?;

        if self.store.is_installed(name, version) {
            tracing::debug!(package = name, version = %version, "Already installed");
            return Ok(InstallOutcome::AlreadyInstalled);
        }

        self.check_cancelled()?;
        let resolved = self
            .resolve(name, version)?
            .ok_or_else(|| ManagerError::not_found(name, version))?;

        let summary =
            PackageInstaller::new(&self.reader, &self.store, &self.config, &self.cancel)
                .install(&resolved)?;

        tracing::info!(
            package = name,
            version = %version,
            repository = %summary.repository,
            from_cache = summary.from_cache,
            path = %summary.install_path.display(),
            "Installed package"
        );
        Ok(InstallOutcome::Installed(summary))
    }

    /// Remove `name` at `version` if it is installed.
    pub fn uninstall(&self, name: &str, version: &Version) -> ManagerResult<UninstallOutcome> {
        validate_package_name(name)?;
        self.check_cancelled()?;

        if self.store.remove_installed(name, version)? {
            tracing::info!(package = name, version = %version, "Uninstalled package");
            Ok(UninstallOutcome::Removed)
        } else {
            tracing::debug!(package = name, version = %version, "Not installed");
            Ok(UninstallOutcome::NotInstalled)
        }
    }

    /// Make sure `name` at `version` is installed.
    ///
    /// Calling this again once it succeeded performs no filesystem changes.
    pub fn ensure_package(&self, name: &str, version: &Version) -> ManagerResult<InstallOutcome> {
        self.install(name, version)
    }

    /// Ensure every dependency of the project, continuing past failures.
    pub fn ensure_packages(&self) -> EnsureReport {
        let mut report = EnsureReport::default();

        for dependency in &self.project.dependencies {
            let outcome = match self.ensure_package(&dependency.name, &dependency.version) {
                Ok(InstallOutcome::AlreadyInstalled) => EnsureOutcome::AlreadyInstalled,
                Ok(InstallOutcome::Installed(summary)) => EnsureOutcome::Installed(summary),
                Err(e) => {
                    tracing::warn!(package = %dependency, error = %e, "Failed to ensure package");
                    EnsureOutcome::Failed(e)
                }
            };
            report.push(dependency.clone(), outcome);
        }

        report
    }

    // =========================================================================
    // Updates
    // =========================================================================

    /// Newer versions of installed packages, one per package name.
    ///
    /// Compares each repository manifest with the highest installed version
    /// of its package. The highest available version wins; between equal
    /// versions the earlier repository wins. Entries appear in the order
    /// their package was first seen.
    pub fn updates_available(&self) -> ManagerResult<Vec<PackageVersion>> {
        // Sorted by name then version, so the last insert per name is the highest.
        let mut highest: HashMap<String, Version> = HashMap::new();
        for installed in self.installed_packages()? {
            highest.insert(installed.name, installed.version);
        }

        let mut updates: Vec<PackageVersion> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for manifest in self.manifests() {
            let manifest = manifest?;
            let Some(current) = highest.get(&manifest.name) else {
                continue;
            };
            if manifest.version <= *current {
                continue;
            }

            match positions.get(&manifest.name) {
                Some(&i) => {
                    if manifest.version > updates[i].version {
                        updates[i] = manifest.package_version();
                    }
                }
                None => {
                    positions.insert(manifest.name.clone(), updates.len());
                    updates.push(manifest.package_version());
                }
            }
        }

        Ok(updates)
    }

    /// Install every available update and remove the versions it replaces.
    ///
    /// An older version the project declares stays installed and is reported
    /// as retained, so the next restore still finds it.
    ///
    /// Fails only if the update list itself cannot be computed; per-package
    /// failures are recorded in the report.
    pub fn update_packages(&self) -> ManagerResult<UpdateReport> {
        let mut report = UpdateReport::default();

        for update in self.updates_available()? {
            let outcome = match self.apply_update(&update) {
                Ok((removed, retained)) => UpdateOutcome::Updated { removed, retained },
                Err(e) => {
                    tracing::warn!(package = %update, error = %e, "Failed to update package");
                    UpdateOutcome::Failed(e)
                }
            };
            report.entries.push((update, outcome));
        }

        Ok(report)
    }

    fn apply_update(
        &self,
        update: &PackageVersion,
    ) -> ManagerResult<(Vec<PackageVersion>, Vec<PackageVersion>)> {
        self.install(&update.name, &update.version)?;

        let mut removed = Vec::new();
        let mut retained = Vec::new();
        for version in self.store.installed_versions(&update.name)? {
            if version >= update.version {
                continue;
            }
            let old = PackageVersion::new(update.name.clone(), version);
            if self.is_declared(&old) {
                tracing::debug!(package = %old, "Keeping version declared by project");
                retained.push(old);
            } else {
                self.uninstall(&old.name, &old.version)?;
                removed.push(old);
            }
        }
        Ok((removed, retained))
    }

    fn is_declared(&self, package: &PackageVersion) -> bool {
        self.project
            .dependencies
            .iter()
            .any(|dep| dep.matches(&package.name, &package.version))
    }

    // =========================================================================
    // Cache
    // =========================================================================

    /// Remove the cache entry for `name` at `version`.
    ///
    /// Returns whether an entry was removed.
    pub fn clear_cache(&self, name: &str, version: &Version) -> ManagerResult<bool> {
        validate_package_name(name)?;
        let removed = self.store.remove_cached(name, version)?;
        if removed {
            tracing::info!(package = name, version = %version, "Cleared cache entry");
        }
        Ok(removed)
    }

    fn check_cancelled(&self) -> ManagerResult<()> {
        if self.cancel.is_cancelled() {
            Err(ManagerError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Read and deserialize one repository's manifest list.
///
/// The stream is consumed and dropped before returning.
fn read_repository(
    reader: &RepositoryReader,
    repository: &RepositorySettings,
) -> ManagerResult<Vec<PackageManifest>> {
    let stream = reader.open(repository)?;
    let manifests: Vec<PackageManifest> = serializer::read(stream, repository.location.as_str())?;
    tracing::debug!(
        repository = %repository.name,
        count = manifests.len(),
        "Read repository"
    );
    Ok(manifests)
}

/// Lazy iterator over repository manifests.
///
/// Returned by [`PackageManager::manifests`].
pub struct Manifests<'m> {
    inner: ResolvedManifests<'m>,
}

impl Iterator for Manifests<'_> {
    type Item = ManagerResult<PackageManifest>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|item| item.map(|resolved| resolved.manifest))
    }
}

/// Manifests paired with the repository that published them.
struct ResolvedManifests<'m> {
    reader: &'m RepositoryReader,
    cancel: &'m CancellationToken,
    repositories: slice::Iter<'m, RepositorySettings>,
    current: Option<(&'m RepositorySettings, std::vec::IntoIter<PackageManifest>)>,
    finished: bool,
}

impl<'m> ResolvedManifests<'m> {
    fn fail(&mut self, error: ManagerError) -> Option<ManagerResult<ResolvedManifest<'m>>> {
        self.finished = true;
        self.current = None;
        Some(Err(error))
    }
}

impl<'m> Iterator for ResolvedManifests<'m> {
    type Item = ManagerResult<ResolvedManifest<'m>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }

            if let Some((repository, manifests)) = &mut self.current {
                if let Some(manifest) = manifests.next() {
                    return Some(Ok(ResolvedManifest {
                        repository: *repository,
                        manifest,
                    }));
                }
                self.current = None;
            }

            let Some(repository) = self.repositories.by_ref().find(|r| r.enabled) else {
                self.finished = true;
                return None;
            };

            if self.cancel.is_cancelled() {
                return self.fail(ManagerError::Cancelled);
            }

            match read_repository(self.reader, repository) {
                Ok(manifests) => self.current = Some((repository, manifests.into_iter())),
                Err(e) => return self.fail(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    use reqwest::Url;
    use tempfile::TempDir;

    use super::*;
    use crate::repository::{RepositoryStream, Transport};

    /// In-memory repositories keyed by URL, recording every open.
    #[derive(Clone, Default)]
    struct MemoryTransport {
        documents: Arc<HashMap<String, String>>,
        opened: Arc<Mutex<Vec<String>>>,
    }

    impl Transport for MemoryTransport {
        fn schemes(&self) -> &[&'static str] {
            &["mem"]
        }

        fn open(&self, location: &Url) -> ManagerResult<RepositoryStream> {
            self.opened.lock().unwrap().push(location.to_string());
            match self.documents.get(location.as_str()) {
                Some(body) => Ok(Box::new(Cursor::new(body.clone().into_bytes()))),
                None => Err(ManagerError::RepositoryUnreachable {
                    location: location.to_string(),
                    reason: "no such document".to_string(),
                }),
            }
        }
    }

    struct Fixture {
        temp: TempDir,
        transport: MemoryTransport,
        settings: PackageManagerSettings,
    }

    fn manifest_list(entries: &[(&str, &str)]) -> String {
        let items: Vec<String> = entries
            .iter()
            .map(|(name, version)| format!(r#"{{"Name": "{}", "Version": "{}"}}"#, name, version))
            .collect();
        format!("[{}]", items.join(","))
    }

    fn fixture(repositories: &[(&str, &str)]) -> Fixture {
        let temp = TempDir::new().unwrap();
        let mut documents = HashMap::new();
        let mut settings =
            PackageManagerSettings::new(temp.path().join("packages"), temp.path().join("cache"));

        for (name, body) in repositories {
            let url = format!("mem://{}/index.json", name);
            documents.insert(url.clone(), body.to_string());
            settings = settings.with_repository(RepositorySettings::new(
                *name,
                Url::parse(&url).unwrap(),
            ));
        }

        Fixture {
            temp,
            transport: MemoryTransport {
                documents: Arc::new(documents),
                opened: Arc::default(),
            },
            settings,
        }
    }

    impl Fixture {
        fn manager<'a>(&'a self, project: &'a Project) -> PackageManager<'a> {
            let mut reader = RepositoryReader::empty();
            reader.register(self.transport.clone());
            PackageManager::new(project, &self.settings).with_reader(reader)
        }

        fn opened(&self) -> Vec<String> {
            self.transport.opened.lock().unwrap().clone()
        }

        fn install_dir(&self, name: &str, version: &str) {
            std::fs::create_dir_all(self.temp.path().join("packages").join(name).join(version))
                .unwrap();
        }
    }

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn pv(name: &str, version: &str) -> PackageVersion {
        PackageVersion::parse(name, version).unwrap()
    }

    #[test]
    fn test_manifests_in_repository_order() {
        let first = manifest_list(&[("foo", "1.0.0"), ("bar", "1.0.0")]);
        let second = manifest_list(&[("baz", "2.0.0")]);
        let f = fixture(&[("one", first.as_str()), ("two", second.as_str())]);
        let project = Project::default();

        let names: Vec<String> = f
            .manager(&project)
            .manifests()
            .map(|m| m.unwrap().name)
            .collect();

        assert_eq!(names, vec!["foo", "bar", "baz"]);
    }

    #[test]
    fn test_manifests_are_lazy() {
        let first = manifest_list(&[("foo", "1.0.0")]);
        let second = manifest_list(&[("bar", "1.0.0")]);
        let f = fixture(&[("one", first.as_str()), ("two", second.as_str())]);
        let project = Project::default();
        let manager = f.manager(&project);

        let mut manifests = manager.manifests();
        assert!(f.opened().is_empty());

        manifests.next().unwrap().unwrap();
        assert_eq!(f.opened(), vec!["mem://one/index.json"]);
    }

    #[test]
    fn test_manifests_stop_after_first_error() {
        let good = manifest_list(&[("foo", "1.0.0")]);
        let f = fixture(&[("broken", "[{\"Name\": "), ("good", good.as_str())]);
        let project = Project::default();

        let results: Vec<_> = f.manager(&project).manifests().collect();

        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(ManagerError::Deserialization { .. })));
        assert_eq!(f.opened(), vec!["mem://broken/index.json"]);
    }

    #[test]
    fn test_disabled_repositories_are_skipped() {
        let body = manifest_list(&[("foo", "1.0.0")]);
        let mut f = fixture(&[("off", body.as_str()), ("on", body.as_str())]);
        f.settings.repository_settings[0].enabled = false;
        let project = Project::default();

        let count = f.manager(&project).manifests().count();

        assert_eq!(count, 1);
        assert_eq!(f.opened(), vec!["mem://on/index.json"]);
    }

    #[test]
    fn test_get_manifest_stops_at_first_match() {
        let first = r#"[{"Name": "foo", "Version": "1.0.0", "DisplayName": "First"}]"#;
        let second = r#"[{"Name": "foo", "Version": "1.0.0", "DisplayName": "Second"}]"#;
        let f = fixture(&[("one", first), ("two", second), ("three", "not json")]);
        let project = Project::default();

        let manifest = f
            .manager(&project)
            .get_manifest("foo", &v("1.0.0"))
            .unwrap()
            .unwrap();

        assert_eq!(manifest.display_name, "First");
        assert_eq!(f.opened(), vec!["mem://one/index.json"]);
    }

    #[test]
    fn test_get_manifest_absent() {
        let body = manifest_list(&[("foo", "1.0.0")]);
        let f = fixture(&[("one", body.as_str())]);
        let project = Project::default();

        let manifest = f.manager(&project).get_manifest("foo", &v("2.0.0")).unwrap();
        assert!(manifest.is_none());
    }

    #[test]
    fn test_scan_repositories_continues_past_failures() {
        let good = manifest_list(&[("foo", "1.0.0")]);
        let mut f = fixture(&[("broken", "{}"), ("good", good.as_str())]);
        f.settings = f.settings.with_repository(RepositorySettings::new(
            "missing",
            Url::parse("mem://missing/index.json").unwrap(),
        ));
        let project = Project::default();

        let scan = f.manager(&project).scan_repositories();

        assert_eq!(scan.repositories.len(), 3);
        assert_eq!(scan.manifests().count(), 1);
        let failed: Vec<_> = scan.failures().map(|(r, _)| r.name.as_str()).collect();
        assert_eq!(failed, vec!["broken", "missing"]);
    }

    #[test]
    fn test_install_unknown_package_is_not_found() {
        let body = manifest_list(&[("foo", "1.0.0")]);
        let f = fixture(&[("one", body.as_str())]);
        let project = Project::default();

        let result = f.manager(&project).install("bar", &v("1.0.0"));

        match result {
            Err(ManagerError::PackageNotFound { name, version }) => {
                assert_eq!(name, "bar");
                assert_eq!(version, "1.0.0");
            }
            other => panic!("expected PackageNotFound, got {:?}", other),
        }
        assert!(!f.temp.path().join("packages").exists());
    }

    #[test]
    fn test_install_rejects_bad_names() {
        let f = fixture(&[]);
        let project = Project::default();
        let manager = f.manager(&project);

        assert!(matches!(
            manager.install("../escape", &v("1.0.0")),
            Err(ManagerError::InvalidPackageName { .. })
        ));
        assert!(!manager.is_installed("../escape", &v("1.0.0")));
        assert!(f.opened().is_empty());
    }

    #[test]
    fn test_installed_package_is_not_reinstalled() {
        let f = fixture(&[("one", "[]")]);
        f.install_dir("foo", "1.0.0");
        let project = Project::default();
        let manager = f.manager(&project);

        let outcome = manager.ensure_package("foo", &v("1.0.0")).unwrap();

        assert_eq!(outcome, InstallOutcome::AlreadyInstalled);
        assert!(f.opened().is_empty(), "no repository is consulted");
    }

    #[test]
    fn test_uninstall() {
        let f = fixture(&[]);
        f.install_dir("foo", "1.0.0");
        let project = Project::default();
        let manager = f.manager(&project);

        assert!(manager.is_installed("foo", &v("1.0.0")));
        assert_eq!(
            manager.uninstall("foo", &v("1.0.0")).unwrap(),
            UninstallOutcome::Removed
        );
        assert!(!manager.is_installed("foo", &v("1.0.0")));
        assert_eq!(
            manager.uninstall("foo", &v("1.0.0")).unwrap(),
            UninstallOutcome::NotInstalled
        );
    }

    #[test]
    fn test_ensure_packages_reports_each_dependency() {
        let f = fixture(&[("one", "[]")]);
        f.install_dir("foo", "1.0.0");
        let project = Project::new(vec![pv("foo", "1.0.0"), pv("bar", "1.0.0")]);

        let report = f.manager(&project).ensure_packages();

        assert_eq!(report.entries.len(), 2);
        assert!(matches!(report.entries[0].1, EnsureOutcome::AlreadyInstalled));
        assert!(matches!(
            report.entries[1].1,
            EnsureOutcome::Failed(ManagerError::PackageNotFound { .. })
        ));
        assert!(!report.is_success());
    }

    #[test]
    fn test_updates_available() {
        let first = manifest_list(&[("foo", "1.1.0"), ("bar", "1.0.0"), ("new", "1.0.0")]);
        let second = manifest_list(&[("foo", "1.2.0"), ("baz", "0.9.0"), ("bar", "1.0.1")]);
        let f = fixture(&[("one", first.as_str()), ("two", second.as_str())]);
        f.install_dir("foo", "1.0.0");
        f.install_dir("bar", "1.0.0");
        f.install_dir("baz", "1.0.0");
        let project = Project::default();

        let updates = f.manager(&project).updates_available().unwrap();

        assert_eq!(updates, vec![pv("foo", "1.2.0"), pv("bar", "1.0.1")]);
    }

    #[test]
    fn test_updates_compare_against_highest_installed() {
        let body = manifest_list(&[("foo", "1.5.0")]);
        let f = fixture(&[("one", body.as_str())]);
        f.install_dir("foo", "1.0.0");
        f.install_dir("foo", "2.0.0");
        let project = Project::default();

        assert!(f.manager(&project).updates_available().unwrap().is_empty());
    }

    #[test]
    fn test_updates_ignore_prerelease_of_installed_release() {
        let body = manifest_list(&[("foo", "1.0.0-beta.1")]);
        let f = fixture(&[("one", body.as_str())]);
        f.install_dir("foo", "1.0.0");
        let project = Project::default();

        assert!(f.manager(&project).updates_available().unwrap().is_empty());
    }

    #[test]
    fn test_clear_cache_when_absent() {
        let f = fixture(&[]);
        let project = Project::default();
        assert!(!f.manager(&project).clear_cache("foo", &v("1.0.0")).unwrap());
    }

    #[test]
    fn test_cancelled_manager_reads_nothing() {
        let body = manifest_list(&[("foo", "1.0.0")]);
        let f = fixture(&[("one", body.as_str())]);
        let project = Project::default();
        let manager = f.manager(&project);

        manager.cancel();

        let results: Vec<_> = manager.manifests().collect();
        assert!(matches!(results.as_slice(), [Err(ManagerError::Cancelled)]));
        assert!(matches!(
            manager.install("foo", &v("1.0.0")),
            Err(ManagerError::Cancelled)
        ));
        assert!(f.opened().is_empty());
    }
}
