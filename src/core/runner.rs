//! Runs the formatter across every project file in the repository.
//!
//! Projects are processed one after another. A failing project does not
//! stop the run; the aggregate [`FormatReport`] decides the outcome.

use crate::config::Config;
use crate::core::error::{Error, Result};
use crate::core::executor::{CommandOutput, ExecuteOptions, Executor};
use crate::core::formatter::{FormatAction, Formatter};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Result of formatting a single project.
#[derive(Debug, Clone)]
pub struct ProjectResult {
    /// Project or solution file.
    pub project: PathBuf,
    /// Whether the formatter succeeded.
    pub passed: bool,
    /// Output from the formatter.
    pub output: CommandOutput,
}

/// Result of formatting all projects.
#[derive(Debug)]
pub struct FormatReport {
    /// Action that was run.
    pub action: FormatAction,
    /// Individual project results, in discovery order.
    pub projects: Vec<ProjectResult>,
    /// Total duration.
    pub duration: Duration,
}

impl FormatReport {
    /// Returns true if every project passed.
    #[must_use]
    pub fn success(&self) -> bool {
        self.projects.iter().all(|p| p.passed)
    }

    /// Returns the number of passed projects.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.projects.iter().filter(|p| p.passed).count()
    }

    /// Returns the number of failed projects.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.projects.iter().filter(|p| !p.passed).count()
    }

    /// Returns failed project results.
    pub fn failed_projects(&self) -> impl Iterator<Item = &ProjectResult> {
        self.projects.iter().filter(|p| !p.passed)
    }

    /// Exit code of the first failing project, if any.
    #[must_use]
    pub fn first_failure_code(&self) -> Option<i32> {
        self.failed_projects().next().map(|p| p.output.exit_code)
    }
}

/// Finds project files matching `pattern` at any depth below `root`, sorted.
pub fn discover_projects(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full = format!(
        "{}/**/{}",
        glob::Pattern::escape(&root.to_string_lossy()),
        pattern
    );

    let entries = glob::glob(&full).map_err(|e| Error::ConfigInvalid {
        field: "projects.glob".to_string(),
        message: e.to_string(),
    })?;

    let mut projects = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => projects.push(path),
            Ok(_) => {},
            Err(e) => {
                tracing::warn!(path = %e.path().display(), "Skipping unreadable path");
            },
        }
    }

    if projects.is_empty() {
        return Err(Error::NoProjectFilesFound {
            path: root.to_path_buf(),
            pattern: pattern.to_string(),
        });
    }

    projects.sort();
    projects.dedup();
    Ok(projects)
}

/// Runner for formatting projects.
#[derive(Debug)]
pub struct Runner {
    config: Config,
    formatter: Formatter,
}

impl Runner {
    /// Creates a new runner with the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let formatter = Formatter::new(config.formatter.clone());
        Self { config, formatter }
    }

    /// Finds the configured project files.
    pub fn projects(&self) -> Result<Vec<PathBuf>> {
        discover_projects(&self.config.project_root(), &self.config.projects.glob)
    }

    /// Runs `action` on every project.
    ///
    /// The tool and its version are checked once before any project is
    /// touched; project discovery happens before that so a repository
    /// without projects fails fast.
    pub async fn run(&self, action: FormatAction) -> Result<FormatReport> {
        let start = std::time::Instant::now();

        let projects = self.projects()?;
        self.formatter.ensure_available()?;
        self.formatter.ensure_version().await?;

        let mut results = Vec::with_capacity(projects.len());
        for project in projects {
            results.push(self.run_project(action, project).await);
        }

        Ok(FormatReport {
            action,
            projects: results,
            duration: start.elapsed(),
        })
    }

    /// Runs the formatter on a single project.
    ///
    /// A formatter that cannot be started counts as a failed project.
    async fn run_project(&self, action: FormatAction, project: PathBuf) -> ProjectResult {
        let args = self.formatter.args(action, &project);
        let options = ExecuteOptions::default().timeout(self.config.timeout());

        let shown = project.display().to_string();
        let start = std::time::Instant::now();

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .ok()
                .unwrap_or_else(ProgressStyle::default_spinner),
        );
        pb.set_message(format!("Running {action} on {shown}..."));
        pb.enable_steady_tick(Duration::from_millis(100));

        let result = Executor::new()
            .execute(self.formatter.tool(), &args, options)
            .await;

        pb.finish_and_clear();

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(project = %shown, error = %e, "Formatter could not run");
                CommandOutput {
                    exit_code: e.exit_code(),
                    stdout: String::new(),
                    stderr: e.to_string(),
                    timed_out: false,
                    duration: start.elapsed(),
                }
            },
        };

        if output.success() {
            println!("{} {shown}", style("✓").green());
        } else if output.timed_out {
            println!("{} {shown} (timed out)", style("✗").red());
        } else {
            println!("{} {shown}", style("✗").red());
        }

        tracing::debug!(
            project = %shown,
            exit_code = output.exit_code,
            duration = ?output.duration,
            "Formatter finished"
        );

        ProjectResult {
            project,
            passed: output.success(),
            output,
        }
    }
}
