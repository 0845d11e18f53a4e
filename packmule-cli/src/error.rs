//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use packmule::manager::ManagerError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Invalid `config.ini`
    Config(String),
    /// A required document path or argument was not given
    MissingConfiguration {
        what: &'static str,
        flag: &'static str,
    },
    /// A settings or project document could not be loaded or saved
    Document { path: PathBuf, error: ManagerError },
    /// A package manager operation failed
    Manager(ManagerError),
    /// Some packages of an aggregate operation failed
    Incomplete { failed: usize, total: usize },
    /// Failed to install the Ctrl-C handler
    SignalHandler(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::MissingConfiguration { flag, .. } => {
                eprintln!();
                eprintln!(
                    "Pass {} or set a default in {}",
                    flag,
                    packmule::config::config_file_path().display()
                );
            }
            CliError::Manager(ManagerError::UnsupportedRepositoryScheme { .. }) => {
                eprintln!();
                eprintln!("Supported repository schemes: file, http, https");
            }
            CliError::Manager(ManagerError::Cancelled) => process::exit(130),
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::MissingConfiguration { what, flag } => {
                write!(f, "Missing {} ({})", what, flag)
            }
            CliError::Document { path, error } => {
                write!(f, "Failed to load '{}': {}", path.display(), error)
            }
            CliError::Manager(e) => write!(f, "{}", e),
            CliError::Incomplete { failed, total } => {
                write!(f, "{} of {} packages failed", failed, total)
            }
            CliError::SignalHandler(msg) => write!(f, "Failed to set signal handler: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Document { error, .. } => Some(error),
            CliError::Manager(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ManagerError> for CliError {
    fn from(e: ManagerError) -> Self {
        CliError::Manager(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_configuration_message() {
        let error = CliError::MissingConfiguration {
            what: "settings document",
            flag: "--settings",
        };
        assert_eq!(error.to_string(), "Missing settings document (--settings)");
    }

    #[test]
    fn test_manager_error_is_source() {
        use std::error::Error;

        let error = CliError::from(ManagerError::not_found("foo", "1.0.0"));
        assert!(error.source().is_some());
        assert!(error.to_string().contains("foo"));
    }

    #[test]
    fn test_incomplete_message() {
        let error = CliError::Incomplete {
            failed: 1,
            total: 3,
        };
        assert_eq!(error.to_string(), "1 of 3 packages failed");
    }
}
