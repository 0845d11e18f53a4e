//! Argument types and CLI definitions for package commands.
//!
//! Package name and version are optional at the clap level so that a missing
//! value is reported as a configuration error, before any document is read
//! or repository contacted.

use std::path::PathBuf;

use clap::Subcommand;

use packmule::config::ConfigFile;
use packmule::package::{validate_package_name, Version};

use crate::error::CliError;

/// Package commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install a package
    Install {
        #[command(flatten)]
        package: PackageSelector,

        /// Also declare the package in the project document
        #[arg(long)]
        save: bool,
    },

    /// Uninstall a package
    Uninstall {
        #[command(flatten)]
        package: PackageSelector,

        /// Also remove the declaration from the project document
        #[arg(long)]
        save: bool,
    },

    /// List installed packages
    List {
        /// List packages published by the configured repositories instead
        #[arg(long)]
        available: bool,
    },

    /// Install every dependency declared by the project
    Restore,

    /// Show installed packages with newer versions available
    Outdated,

    /// Install available updates and remove the versions they replace
    Update,

    /// Show a package's manifest
    Info {
        #[command(flatten)]
        package: PackageSelector,
    },
}

/// `--name` / `--version` pair.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct PackageSelector {
    /// Package name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Package version (major.minor.patch[-extension])
    #[arg(long)]
    pub version: Option<String>,
}

impl PackageSelector {
    /// Require both values and parse them.
    pub fn resolve(self) -> Result<(String, Version), CliError> {
        let name = self.name.ok_or(CliError::MissingConfiguration {
            what: "package name",
            flag: "--name",
        })?;
        let version = self.version.ok_or(CliError::MissingConfiguration {
            what: "package version",
            flag: "--version",
        })?;

        validate_package_name(&name)?;
        Ok((name, Version::parse(&version)?))
    }
}

/// Global document options.
#[derive(Debug, Clone, Default)]
pub struct DocumentOptions {
    pub project: Option<PathBuf>,
    pub settings: Option<PathBuf>,
}

/// Document paths after applying `config.ini` defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPaths {
    pub project: PathBuf,
    pub settings: PathBuf,
}

impl DocumentOptions {
    /// Fill in defaults from `config`, failing if a path is still missing.
    pub fn resolve(self, config: &ConfigFile) -> Result<DocumentPaths, CliError> {
        let project = self
            .project
            .or_else(|| config.paths.project.clone())
            .ok_or(CliError::MissingConfiguration {
                what: "project document",
                flag: "--project",
            })?;
        let settings = self
            .settings
            .or_else(|| config.paths.settings.clone())
            .ok_or(CliError::MissingConfiguration {
                what: "settings document",
                flag: "--settings",
            })?;

        Ok(DocumentPaths { project, settings })
    }
}

// ============================================================================
// Handler argument types
// ============================================================================

/// Arguments for install and uninstall.
#[derive(Debug, Clone)]
pub struct PackageArgs {
    pub name: String,
    pub version: Version,
    pub save: bool,
}

/// Arguments for list.
#[derive(Debug, Clone, Copy)]
pub struct ListArgs {
    pub available: bool,
}

/// Arguments for info.
#[derive(Debug, Clone)]
pub struct InfoArgs {
    pub name: String,
    pub version: Version,
}

/// A validated command ready for its handler.
#[derive(Debug, Clone)]
pub enum Action {
    Install(PackageArgs),
    Uninstall(PackageArgs),
    List(ListArgs),
    Restore,
    Outdated,
    Update,
    Info(InfoArgs),
}

impl TryFrom<Commands> for Action {
    type Error = CliError;

    fn try_from(command: Commands) -> Result<Self, Self::Error> {
        Ok(match command {
            Commands::Install { package, save } => {
                let (name, version) = package.resolve()?;
                Action::Install(PackageArgs {
                    name,
                    version,
                    save,
                })
            }
            Commands::Uninstall { package, save } => {
                let (name, version) = package.resolve()?;
                Action::Uninstall(PackageArgs {
                    name,
                    version,
                    save,
                })
            }
            Commands::List { available } => Action::List(ListArgs { available }),
            Commands::Restore => Action::Restore,
            Commands::Outdated => Action::Outdated,
            Commands::Update => Action::Update,
            Commands::Info { package } => {
                let (name, version) = package.resolve()?;
                Action::Info(InfoArgs { name, version })
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use packmule::manager::ManagerError;

    use super::*;

    fn selector(name: Option<&str>, version: Option<&str>) -> PackageSelector {
        PackageSelector {
            name: name.map(str::to_string),
            version: version.map(str::to_string),
        }
    }

    #[test]
    fn test_selector_requires_name() {
        let result = selector(None, Some("1.0.0")).resolve();
        assert!(matches!(
            result,
            Err(CliError::MissingConfiguration { flag: "--name", .. })
        ));
    }

    #[test]
    fn test_selector_requires_version() {
        let result = selector(Some("foo"), None).resolve();
        assert!(matches!(
            result,
            Err(CliError::MissingConfiguration {
                flag: "--version",
                ..
            })
        ));
    }

    #[test]
    fn test_selector_rejects_bad_version() {
        let result = selector(Some("foo"), Some("1.0")).resolve();
        assert!(matches!(
            result,
            Err(CliError::Manager(ManagerError::InvalidVersionFormat { .. }))
        ));
    }

    #[test]
    fn test_selector_parses() {
        let (name, version) = selector(Some("foo"), Some("1.2.3-rc.1")).resolve().unwrap();
        assert_eq!(name, "foo");
        assert_eq!(version.to_string(), "1.2.3-rc.1");
    }

    #[test]
    fn test_documents_from_flags() {
        let options = DocumentOptions {
            project: Some(PathBuf::from("project.json")),
            settings: Some(PathBuf::from("settings.json")),
        };

        let paths = options.resolve(&ConfigFile::default()).unwrap();
        assert_eq!(paths.project, PathBuf::from("project.json"));
        assert_eq!(paths.settings, PathBuf::from("settings.json"));
    }

    #[test]
    fn test_documents_fall_back_to_config() {
        let mut config = ConfigFile::default();
        config.paths.settings = Some(PathBuf::from("/etc/packmule/settings.json"));
        let options = DocumentOptions {
            project: Some(PathBuf::from("project.json")),
            settings: None,
        };

        let paths = options.resolve(&config).unwrap();
        assert_eq!(paths.settings, PathBuf::from("/etc/packmule/settings.json"));
    }

    #[test]
    fn test_missing_settings_is_reported() {
        let options = DocumentOptions {
            project: Some(PathBuf::from("project.json")),
            settings: None,
        };

        let result = options.resolve(&ConfigFile::default());
        assert!(matches!(
            result,
            Err(CliError::MissingConfiguration {
                flag: "--settings",
                ..
            })
        ));
    }

    #[test]
    fn test_missing_project_is_reported() {
        let result = DocumentOptions::default().resolve(&ConfigFile::default());
        assert!(matches!(
            result,
            Err(CliError::MissingConfiguration {
                flag: "--project",
                ..
            })
        ));
    }

    #[test]
    fn test_install_without_version_fails_early() {
        let command = Commands::Install {
            package: selector(Some("foo"), None),
            save: false,
        };
        assert!(Action::try_from(command).is_err());
    }

    #[test]
    fn test_list_action() {
        let action = Action::try_from(Commands::List { available: true }).unwrap();
        assert!(matches!(action, Action::List(ListArgs { available: true })));
    }
}
