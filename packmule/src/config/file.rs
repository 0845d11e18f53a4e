//! Configuration file handling for ~/.packmule/config.ini.
//!
//! Holds CLI defaults only; package manager behavior is configured by the
//! JSON settings document. Example:
//!
//! ```ini
//! [paths]
//! settings = /home/me/.packmule/settings.json
//! project = ./project.json
//!
//! [network]
//! timeout = 30
//!
//! [logging]
//! directory = /home/me/.packmule/logs
//! ```

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

/// Default document locations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathsSettings {
    /// Settings document used when `--settings` is omitted.
    pub settings: Option<PathBuf>,
    /// Project document used when `--project` is omitted.
    pub project: Option<PathBuf>,
}

/// Network settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSettings {
    /// HTTP request timeout in seconds.
    pub timeout: u64,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Directory for `packmule.log`.
    pub directory: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: config_directory().join("logs"),
        }
    }
}

/// Parsed `config.ini`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub paths: PathsSettings,
    pub network: NetworkSettings,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Load configuration from the default path (~/.packmule/config.ini).
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        parse_ini(&ini)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let mut ini = Ini::new();
        {
            let mut paths = ini.with_section(Some("paths"));
            if let Some(settings) = &self.paths.settings {
                paths.set("settings", settings.display().to_string());
            }
            if let Some(project) = &self.paths.project {
                paths.set("project", project.display().to_string());
            }
        }
        ini.with_section(Some("network"))
            .set("timeout", self.network.timeout.to_string());
        ini.with_section(Some("logging"))
            .set("directory", self.logging.directory.display().to_string());

        ini.write_to_file(path)
            .map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }
}

fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    if let Some(section) = ini.section(Some("paths")) {
        config.paths.settings = section.get("settings").map(expand_path);
        config.paths.project = section.get("project").map(expand_path);
    }

    if let Some(section) = ini.section(Some("network")) {
        if let Some(value) = section.get("timeout") {
            config.network.timeout = value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "network".to_string(),
                    key: "timeout".to_string(),
                    value: value.to_string(),
                    reason: "must be a positive number of seconds".to_string(),
                })?;
        }
    }

    if let Some(section) = ini.section(Some("logging")) {
        if let Some(value) = section.get("directory") {
            config.logging.directory = expand_path(value);
        }
    }

    Ok(config)
}

/// Expand a leading `~` to the home directory.
fn expand_path(value: &str) -> PathBuf {
    let value = value.trim();
    match value.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(rest),
        None => PathBuf::from(value),
    }
}

/// Get the path to the config directory (~/.packmule).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".packmule")
}

/// Get the path to the config file (~/.packmule/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
