//! Error types for dotnet-standards.
//!
//! This module defines all errors that can occur during operation.

use std::path::PathBuf;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in dotnet-standards.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // =========================================================================
    // Configuration errors
    // =========================================================================
    /// Configuration file not found.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// Path where config was expected.
        path: PathBuf,
    },

    /// Failed to parse configuration file.
    #[error("Failed to parse configuration: {message}: {source}")]
    ConfigParse {
        /// Description of the parse error.
        message: String,
        /// Parser error.
        #[source]
        source: toml::de::Error,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {field} - {message}")]
    ConfigInvalid {
        /// Field name that is invalid.
        field: String,
        /// Description of why it's invalid.
        message: String,
    },

    // =========================================================================
    // Git errors
    // =========================================================================
    /// Not in a Git repository.
    #[error("Not in a Git repository")]
    NotGitRepo,

    // =========================================================================
    // Hook errors
    // =========================================================================
    /// A hook file is already present, whoever wrote it.
    #[error("Git pre-push hook already exists: {path}")]
    HookAlreadyExists {
        /// Path to existing hook.
        path: PathBuf,
    },

    /// The hook file does not carry our ownership marker.
    #[error("Git pre-push hook at {path} was not installed by standards; remove it manually")]
    HookNotOwned {
        /// Path to the foreign hook.
        path: PathBuf,
    },

    // =========================================================================
    // Formatter errors
    // =========================================================================
    /// Command not found.
    #[error("Command not found: {command}")]
    CommandNotFound {
        /// The command that wasn't found.
        command: String,
    },

    /// A wrapped tool returned a non-zero status.
    #[error("{command} failed: {message}")]
    SubprocessFailure {
        /// The tool that was run.
        command: String,
        /// Error message or summary.
        message: String,
        /// Exit code if available.
        exit_code: Option<i32>,
    },

    /// The formatter is older than the configured minimum.
    #[error("{tool} version {found} is too old, major version {required} or newer is required")]
    VersionTooLow {
        /// Tool that was queried.
        tool: String,
        /// Version string reported by the tool.
        found: String,
        /// Minimum accepted major version.
        required: u64,
    },

    /// The formatter's version output could not be understood.
    #[error("Could not determine {tool} version from output: {output}")]
    VersionUnknown {
        /// Tool that was queried.
        tool: String,
        /// Raw output of the version query.
        output: String,
    },

    /// Project glob matched nothing.
    #[error("No project files matching '{pattern}' found under {path}")]
    NoProjectFilesFound {
        /// Search root.
        path: PathBuf,
        /// Glob that was matched.
        pattern: String,
    },

    // =========================================================================
    // Burst settings errors
    // =========================================================================
    /// A Burst AOT settings file could not be understood.
    #[error("Invalid Burst AOT settings in {path}: {message}")]
    BurstSettings {
        /// Settings file.
        path: PathBuf,
        /// What is wrong with it.
        message: String,
    },

    // =========================================================================
    // I/O errors
    // =========================================================================
    /// File I/O error.
    #[error("I/O error: {message}: {source}")]
    Io {
        /// Description of what failed.
        message: String,
        /// Source error.
        #[source]
        source: std::io::Error,
    },

    // =========================================================================
    // Internal errors
    // =========================================================================
    /// Internal error (should never happen).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl Error {
    /// Creates a new configuration parse error.
    pub fn config_parse(message: impl Into<String>, source: toml::de::Error) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source,
        }
    }

    /// Creates a new I/O error with context.
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Creates a new subprocess failure.
    pub fn subprocess(
        command: impl Into<String>,
        message: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::SubprocessFailure {
            command: command.into(),
            message: message.into(),
            exit_code,
        }
    }

    /// Creates a new Burst settings error.
    pub fn burst(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::BurstSettings {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns an exit code appropriate for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SubprocessFailure { exit_code, .. } => match exit_code {
                Some(code) if *code != 0 => *code,
                _ => 1,
            },
            Self::ConfigNotFound { .. } | Self::ConfigParse { .. } | Self::ConfigInvalid { .. } => {
                78
            }, // EX_CONFIG
            Self::NotGitRepo => 65, // EX_DATAERR
            Self::NoProjectFilesFound { .. } => 66, // EX_NOINPUT
            Self::VersionTooLow { .. } | Self::VersionUnknown { .. } => 69, // EX_UNAVAILABLE
            Self::CommandNotFound { .. } => 127,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Display tests
    // =========================================================================

    #[test]
    fn test_display_config_not_found() {
        let err = Error::ConfigNotFound {
            path: PathBuf::from("/my/standards.toml"),
        };
        assert_eq!(
            err.to_string(),
            "Configuration file not found: /my/standards.toml"
        );
    }

    #[test]
    fn test_display_config_invalid() {
        let err = Error::ConfigInvalid {
            field: "formatter.verbosity".to_string(),
            message: "Unknown verbosity: loud".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid configuration: formatter.verbosity - Unknown verbosity: loud"
        );
    }

    #[test]
    fn test_display_hook_already_exists() {
        let err = Error::HookAlreadyExists {
            path: PathBuf::from(".git/hooks/pre-push"),
        };
        assert_eq!(
            err.to_string(),
            "Git pre-push hook already exists: .git/hooks/pre-push"
        );
    }

    #[test]
    fn test_display_hook_not_owned() {
        let err = Error::HookNotOwned {
            path: PathBuf::from(".git/hooks/pre-push"),
        };
        assert!(err.to_string().contains("was not installed by standards"));
    }

    #[test]
    fn test_display_subprocess_failure() {
        let err = Error::subprocess("dotnet-format", "1 of 3 project(s) failed", Some(2));
        assert_eq!(
            err.to_string(),
            "dotnet-format failed: 1 of 3 project(s) failed"
        );
    }

    #[test]
    fn test_display_version_too_low() {
        let err = Error::VersionTooLow {
            tool: "dotnet-format".to_string(),
            found: "4.1.131201".to_string(),
            required: 5,
        };
        assert_eq!(
            err.to_string(),
            "dotnet-format version 4.1.131201 is too old, major version 5 or newer is required"
        );
    }

    #[test]
    fn test_display_no_project_files() {
        let err = Error::NoProjectFilesFound {
            path: PathBuf::from("/repo"),
            pattern: "*.sln".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No project files matching '*.sln' found under /repo"
        );
    }

    #[test]
    fn test_display_burst_settings() {
        let err = Error::burst("BurstAotSettings_StandaloneOSX.json", "expected an object");
        assert_eq!(
            err.to_string(),
            "Invalid Burst AOT settings in BurstAotSettings_StandaloneOSX.json: expected an object"
        );
    }

    #[test]
    fn test_display_io() {
        let err = Error::io("read hook", std::io::Error::other("denied"));
        assert_eq!(err.to_string(), "I/O error: read hook: denied");
    }

    // =========================================================================
    // Exit code tests
    // =========================================================================

    #[test]
    fn test_exit_code_subprocess_with_code() {
        assert_eq!(Error::subprocess("t", "m", Some(3)).exit_code(), 3);
    }

    #[test]
    fn test_exit_code_subprocess_without_code() {
        assert_eq!(Error::subprocess("t", "m", None).exit_code(), 1);
    }

    #[test]
    fn test_exit_code_subprocess_zero_is_still_failure() {
        assert_eq!(Error::subprocess("t", "m", Some(0)).exit_code(), 1);
    }

    #[test]
    fn test_exit_code_config() {
        let toml_err = toml::from_str::<toml::Value>("bad").expect_err("should fail");
        assert_eq!(Error::config_parse("x", toml_err).exit_code(), 78);
    }

    #[test]
    fn test_exit_code_not_git_repo() {
        assert_eq!(Error::NotGitRepo.exit_code(), 65);
    }

    #[test]
    fn test_exit_code_version() {
        let err = Error::VersionUnknown {
            tool: "t".into(),
            output: String::new(),
        };
        assert_eq!(err.exit_code(), 69);
    }

    #[test]
    fn test_exit_code_hook_errors() {
        let path = PathBuf::from("x");
        assert_eq!(Error::HookAlreadyExists { path: path.clone() }.exit_code(), 1);
        assert_eq!(Error::HookNotOwned { path }.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_command_not_found() {
        assert_eq!(
            Error::CommandNotFound {
                command: "dotnet-format".into()
            }
            .exit_code(),
            127
        );
    }

    // =========================================================================
    // Error source chain tests
    // =========================================================================

    #[test]
    fn test_io_error_has_source() {
        use std::error::Error as StdError;
        let err = Error::io("x", std::io::Error::other("inner"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_config_parse_has_source() {
        use std::error::Error as StdError;
        let toml_err = toml::from_str::<toml::Value>("bad").expect_err("should fail");
        let err = Error::config_parse("Failed to parse TOML", toml_err);
        assert!(err.source().is_some());
    }
}
