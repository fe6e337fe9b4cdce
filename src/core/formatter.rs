//! The `dotnet-format` collaborator.
//!
//! Builds the argument lists for check and fix runs and gates execution on
//! the tool's reported major version.

use crate::config::FormatterConfig;
use crate::core::error::{Error, Result};
use crate::core::executor::{ExecuteOptions, Executor};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

/// What the formatter is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatAction {
    /// Report formatting problems without touching files.
    Check,
    /// Rewrite files in place.
    Fix,
}

impl FormatAction {
    /// Returns a human-readable name for the action.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Check => "check",
            Self::Fix => "fix",
        }
    }
}

impl std::fmt::Display for FormatAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A version reported by the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ToolVersion {
    /// Major component.
    pub major: u64,
    /// Minor component.
    pub minor: u64,
    /// Patch component, 0 when absent.
    pub patch: u64,
}

impl std::fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").expect("version pattern is valid"))
}

/// Extracts the first `MAJOR.MINOR[.PATCH]` from version output.
#[must_use]
pub fn parse_version(output: &str) -> Option<ToolVersion> {
    let caps = version_regex().captures(output)?;
    let part = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u64>().ok());

    Some(ToolVersion {
        major: part(1)?,
        minor: part(2)?,
        patch: part(3).unwrap_or(0),
    })
}

/// Formatter invocation settings.
#[derive(Debug, Clone)]
pub struct Formatter {
    config: FormatterConfig,
}

impl Formatter {
    /// Creates a formatter from its configuration.
    #[must_use]
    pub const fn new(config: FormatterConfig) -> Self {
        Self { config }
    }

    /// Returns the program that is run.
    #[must_use]
    pub fn tool(&self) -> &str {
        &self.config.tool
    }

    /// Builds the argument list for one project.
    #[must_use]
    pub fn args(&self, action: FormatAction, project: &Path) -> Vec<String> {
        let mode_args = match action {
            FormatAction::Check => &self.config.check_args,
            FormatAction::Fix => &self.config.fix_args,
        };

        let mut args = Vec::with_capacity(mode_args.len() + 3);
        args.push(project.to_string_lossy().into_owned());
        args.extend(mode_args.iter().cloned());
        args.push("--verbosity".to_string());
        args.push(self.config.verbosity.clone());
        args
    }

    /// Fails unless the tool can be found.
    pub fn ensure_available(&self) -> Result<()> {
        if Executor::command_exists(&self.config.tool) {
            Ok(())
        } else {
            Err(Error::CommandNotFound {
                command: self.config.tool.clone(),
            })
        }
    }

    /// Queries the tool version and enforces the configured minimum.
    ///
    /// Returns `None` without running anything when the gate is disabled.
    pub async fn ensure_version(&self) -> Result<Option<ToolVersion>> {
        let required = self.config.min_major_version;
        if required == 0 {
            return Ok(None);
        }

        let output = Executor::new()
            .execute(
                &self.config.tool,
                &self.config.version_args,
                ExecuteOptions::default().timeout(Duration::from_secs(60)),
            )
            .await?;

        if !output.success() {
            return Err(Error::subprocess(
                self.config.tool.clone(),
                format!("version query failed: {}", output.combined_output().trim()),
                Some(output.exit_code),
            ));
        }

        let version = parse_version(&output.stdout).ok_or_else(|| Error::VersionUnknown {
            tool: self.config.tool.clone(),
            output: output.stdout.trim().to_string(),
        })?;

        tracing::debug!(tool = %self.config.tool, %version, required, "Formatter version");

        if version.major < required {
            return Err(Error::VersionTooLow {
                tool: self.config.tool.clone(),
                found: version.to_string(),
                required,
            });
        }

        Ok(Some(version))
    }
}
