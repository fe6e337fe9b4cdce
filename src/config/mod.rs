//! Configuration handling for dotnet-standards.
//!
//! Settings come from an optional `standards.toml` found in the current
//! directory or one of its parents, with command-line flags layered on top.
//! The resulting [`Config`] is passed explicitly into every operation.

use crate::core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "standards.toml";

/// Verbosity levels understood by `dotnet-format`.
pub const VERBOSITY_LEVELS: &[&str] = &[
    "q",
    "quiet",
    "m",
    "minimal",
    "n",
    "normal",
    "d",
    "detailed",
    "diag",
    "diagnostic",
];

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Formatter invocation.
    pub formatter: FormatterConfig,
    /// Where to look for project files.
    pub projects: ProjectsConfig,
    /// Pre-push hook settings.
    pub hook: HookConfig,
    /// Burst AOT settings files.
    pub burst: BurstConfig,
    /// Directory the configuration was loaded from.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl Config {
    /// Loads configuration or returns defaults if not found.
    pub fn load_or_default() -> Result<Self> {
        match Self::find_config_file() {
            Ok(path) => Self::load_from(&path),
            Err(Error::ConfigNotFound { .. }) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| Error::io("read config", e))?;

        let mut config: Self = toml::from_str(&content)
            .map_err(|e| Error::config_parse("Failed to parse TOML", e))?;

        config.base_dir = path.parent().map(Path::to_path_buf);
        config.validate()?;

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Finds the configuration file by searching up the directory tree.
    pub fn find_config_file() -> Result<PathBuf> {
        let cwd = std::env::current_dir().map_err(|e| Error::io("get current dir", e))?;

        let mut current = cwd.as_path();
        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Ok(config_path);
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        Err(Error::ConfigNotFound {
            path: cwd.join(CONFIG_FILE_NAME),
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if humantime::parse_duration(&self.formatter.timeout).is_err() {
            return Err(Error::ConfigInvalid {
                field: "formatter.timeout".to_string(),
                message: format!("Invalid duration: {}", self.formatter.timeout),
            });
        }

        if !VERBOSITY_LEVELS.contains(&self.formatter.verbosity.as_str()) {
            return Err(Error::ConfigInvalid {
                field: "formatter.verbosity".to_string(),
                message: format!("Unknown verbosity: {}", self.formatter.verbosity),
            });
        }

        if self.formatter.tool.trim().is_empty() {
            return Err(Error::ConfigInvalid {
                field: "formatter.tool".to_string(),
                message: "Tool must not be empty".to_string(),
            });
        }

        if let Err(e) = glob::Pattern::new(&self.projects.glob) {
            return Err(Error::ConfigInvalid {
                field: "projects.glob".to_string(),
                message: format!("Invalid pattern '{}': {e}", self.projects.glob),
            });
        }

        if let Some(ref command) = self.hook.command {
            if command.trim().is_empty() {
                return Err(Error::ConfigInvalid {
                    field: "hook.command".to_string(),
                    message: "Command must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Layers command-line overrides over the loaded values.
    pub fn apply(&mut self, overrides: &FormatterOverrides) -> Result<()> {
        if let Some(ref tool) = overrides.tool_path {
            self.formatter.tool.clone_from(tool);
        }
        if let Some(ref path) = overrides.project_path {
            self.projects.path.clone_from(path);
        }
        if let Some(ref pattern) = overrides.project_glob {
            self.projects.glob.clone_from(pattern);
        }
        if let Some(ref verbosity) = overrides.verbosity {
            self.formatter.verbosity.clone_from(verbosity);
        }
        if overrides.skip_version_check {
            self.formatter.min_major_version = 0;
        }

        self.validate()
    }

    /// Returns the project search root.
    ///
    /// Relative paths in a config file are relative to that file; relative
    /// paths without a config file are relative to the current directory.
    #[must_use]
    pub fn project_root(&self) -> PathBuf {
        if self.projects.path.is_absolute() {
            return self.projects.path.clone();
        }
        match self.base_dir {
            Some(ref base) => base.join(&self.projects.path),
            None => self.projects.path.clone(),
        }
    }

    /// Returns the per-project formatter timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        humantime::parse_duration(&self.formatter.timeout).unwrap_or_else(|_| {
            tracing::warn!(
                timeout_str = %self.formatter.timeout,
                default_secs = 600,
                "Invalid timeout format, using default"
            );
            Duration::from_secs(600)
        })
    }

    /// Generates default configuration as a string.
    #[must_use]
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Values that can be overridden from the command line.
#[derive(Debug, Clone, Default)]
pub struct FormatterOverrides {
    /// Formatter program or path.
    pub tool_path: Option<String>,
    /// Project search root.
    pub project_path: Option<PathBuf>,
    /// Project file glob.
    pub project_glob: Option<String>,
    /// Formatter verbosity.
    pub verbosity: Option<String>,
    /// Skip the minimum version gate.
    pub skip_version_check: bool,
}

/// Formatter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    /// Program name or path.
    pub tool: String,
    /// Value passed to `--verbosity`.
    pub verbosity: String,
    /// Arguments selecting check mode.
    pub check_args: Vec<String>,
    /// Arguments selecting fix mode.
    pub fix_args: Vec<String>,
    /// Arguments that make the tool print its version.
    pub version_args: Vec<String>,
    /// Lowest accepted major version; 0 disables the check.
    pub min_major_version: u64,
    /// Timeout for a single project.
    pub timeout: String,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            tool: "dotnet-format".to_string(),
            verbosity: "minimal".to_string(),
            check_args: vec![
                "--fix-whitespace".to_string(),
                "--fix-style".to_string(),
                "error".to_string(),
                "--check".to_string(),
            ],
            fix_args: vec![
                "--fix-whitespace".to_string(),
                "--fix-style".to_string(),
                "error".to_string(),
            ],
            version_args: vec!["--version".to_string()],
            min_major_version: 5,
            timeout: "10m".to_string(),
        }
    }
}

/// Project discovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectsConfig {
    /// Search root.
    pub path: PathBuf,
    /// File name glob matched at any depth below `path`.
    pub glob: String,
}

impl Default for ProjectsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            glob: "*.sln".to_string(),
        }
    }
}

/// Hook configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HookConfig {
    /// Command the hook runs; also the ownership marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl HookConfig {
    /// Returns the command written into the hook.
    ///
    /// Without a configured command this is the absolute path of the running
    /// executable followed by `check`. The full path keeps the marker specific
    /// enough that hooks which merely mention `standards check` stay foreign.
    pub fn resolved_command(&self) -> Result<String> {
        if let Some(ref command) = self.command {
            return Ok(command.clone());
        }

        let exe = std::env::current_exe().map_err(|e| Error::io("locate executable", e))?;
        Ok(format!("{} check", shell_quote(&exe.to_string_lossy())))
    }
}

/// Quotes `word` for a POSIX shell.
fn shell_quote(word: &str) -> String {
    format!("'{}'", word.replace('\'', r"'\''"))
}

/// Burst AOT settings configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BurstConfig {
    /// Settings directory inside a Unity project.
    pub settings_dir: PathBuf,
    /// Platforms that get a settings file.
    pub platforms: Vec<String>,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            settings_dir: PathBuf::from("ProjectSettings"),
            platforms: vec![
                "StandaloneWindows".to_string(),
                "StandaloneOSX".to_string(),
                "StandaloneLinux64".to_string(),
            ],
        }
    }
}
