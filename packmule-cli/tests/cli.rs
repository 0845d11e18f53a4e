//! End-to-end tests for the `packmule` binary.
//!
//! Each test gets its own HOME so `~/.packmule/config.ini` and the log
//! directory stay inside a temporary directory.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::json;
use tempfile::TempDir;

struct Sandbox {
    temp: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let sandbox = Self {
            temp: TempDir::new().unwrap(),
        };
        fs::create_dir_all(sandbox.home()).unwrap();
        sandbox
    }

    fn root(&self) -> &Path {
        self.temp.path()
    }

    fn home(&self) -> PathBuf {
        self.root().join("home")
    }

    fn project_path(&self) -> PathBuf {
        self.root().join("project.json")
    }

    fn settings_path(&self) -> PathBuf {
        self.root().join("settings.json")
    }

    fn install_root(&self) -> PathBuf {
        self.root().join("packages")
    }

    /// Publish `packages` in a file repository and write matching settings.
    fn with_repository(&self, packages: &[(&str, &str)]) -> &Self {
        let repo = self.root().join("repo");
        fs::create_dir_all(&repo).unwrap();

        let mut manifests = Vec::new();
        for (name, version) in packages {
            build_archive(
                &repo.join(format!("{}-{}.tar.gz", name, version)),
                &format!("{} {}", name, version),
            );
            manifests.push(json!({ "Name": name, "DisplayName": name, "Version": version }));
        }
        let index = repo.join("index.json");
        fs::write(&index, serde_json::to_string(&manifests).unwrap()).unwrap();

        let location = format!("file://{}", index.display());
        let settings = json!({
            "RepositorySettings": [{ "Name": "local", "Location": location }],
            "InstallLocation": "packages",
            "LocalCacheLocation": "cache",
            "EnableLocalCache": true,
        });
        fs::write(self.settings_path(), settings.to_string()).unwrap();
        self
    }

    fn with_project(&self, dependencies: &[(&str, &str)]) -> &Self {
        let dependencies: Vec<_> = dependencies
            .iter()
            .map(|(name, version)| json!({ "Name": name, "Version": version }))
            .collect();
        fs::write(
            self.project_path(),
            json!({ "Dependencies": dependencies }).to_string(),
        )
        .unwrap();
        self
    }

    fn packmule(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_packmule"))
            .env("HOME", self.home())
            .env_remove("RUST_LOG")
            .args(args)
            .output()
            .unwrap()
    }

    fn packmule_with_documents(&self, args: &[&str]) -> Output {
        let project = self.project_path();
        let settings = self.settings_path();
        let mut full = vec![
            "--project",
            project.to_str().unwrap(),
            "--settings",
            settings.to_str().unwrap(),
        ];
        full.extend_from_slice(args);
        self.packmule(&full)
    }
}

fn build_archive(path: &Path, marker: &str) {
    let encoder = GzEncoder::new(File::create(path).unwrap(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    let mut header = tar::Header::new_gnu();
    header.set_path("marker.txt").unwrap();
    header.set_size(marker.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append(&header, marker.as_bytes()).unwrap();
    builder.into_inner().unwrap().finish().unwrap();
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_missing_settings_is_reported() {
    let sandbox = Sandbox::new();
    sandbox.with_project(&[]);
    let project = sandbox.project_path();

    let output = sandbox.packmule(&["--project", project.to_str().unwrap(), "restore"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Missing settings document (--settings)"));
}

#[test]
fn test_missing_version_is_reported() {
    let sandbox = Sandbox::new();
    sandbox.with_repository(&[("foo", "1.0.0")]).with_project(&[]);

    let output = sandbox.packmule_with_documents(&["install", "--name", "foo"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Missing package version (--version)"));
}

#[test]
fn test_install_with_save_then_uninstall() {
    let sandbox = Sandbox::new();
    sandbox.with_repository(&[("foo", "1.0.0")]).with_project(&[]);

    let output =
        sandbox.packmule_with_documents(&["install", "--name", "foo", "--version", "1.0.0", "--save"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Installed foo@1.0.0 from local"));

    let marker = sandbox.install_root().join("foo").join("1.0.0").join("marker.txt");
    assert_eq!(fs::read_to_string(&marker).unwrap(), "foo 1.0.0");

    let project = fs::read_to_string(sandbox.project_path()).unwrap();
    assert!(project.contains("\"foo\""));

    let output = sandbox.packmule_with_documents(&[
        "uninstall",
        "--name",
        "foo",
        "--version",
        "1.0.0",
        "--save",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(!marker.exists());

    let project = fs::read_to_string(sandbox.project_path()).unwrap();
    assert!(!project.contains("\"foo\""));
}

#[test]
fn test_restore_exits_nonzero_when_a_dependency_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .with_repository(&[("foo", "1.0.0")])
        .with_project(&[("foo", "1.0.0"), ("missing", "2.0.0")]);

    let output = sandbox.packmule_with_documents(&["restore"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("missing@2.0.0 - FAILED"));
    assert!(stderr(&output).contains("1 of 2 packages failed"));
    assert!(sandbox.install_root().join("foo").join("1.0.0").is_dir());
}

#[test]
fn test_outdated_and_update() {
    let sandbox = Sandbox::new();
    sandbox
        .with_repository(&[("foo", "1.0.0"), ("foo", "1.1.0")])
        .with_project(&[]);

    let output =
        sandbox.packmule_with_documents(&["install", "--name", "foo", "--version", "1.0.0"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = sandbox.packmule_with_documents(&["outdated"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("foo v1.0.0 -> v1.1.0"));

    let output = sandbox.packmule_with_documents(&["update"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(sandbox.install_root().join("foo").join("1.1.0").is_dir());
    assert!(!sandbox.install_root().join("foo").join("1.0.0").exists());
}

#[test]
fn test_settings_default_from_config_file() {
    let sandbox = Sandbox::new();
    sandbox.with_repository(&[("foo", "1.0.0")]).with_project(&[]);

    let config_dir = sandbox.home().join(".packmule");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.ini"),
        format!(
            "[paths]\nsettings = {}\nproject = {}\n",
            sandbox.settings_path().display(),
            sandbox.project_path().display()
        ),
    )
    .unwrap();

    let output = sandbox.packmule(&["list", "--available"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Available Packages (1)"));
}
