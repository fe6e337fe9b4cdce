//! Command-line interface for dotnet-standards.
//!
//! This module provides the `standards` CLI with subcommands for:
//! - `check` / `fix`: Run the formatter over every project file
//! - `hook` / `unhook`: Install or remove the git pre-push hook
//! - `status`: Show the state of the pre-push hook
//! - `burst`: Toggle Burst AOT compilation for a Unity project
//! - `init`: Write a default configuration file

mod commands;

use crate::config::FormatterOverrides;
use crate::core::error::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Code-style checks and pre-push hook management for .NET/Unity repositories.
#[derive(Debug, Parser)]
#[command(
    name = "standards",
    author,
    version,
    about = "Code-style checks and pre-push hook management for .NET/Unity repositories",
    long_about = r#"
standards wraps dotnet-format so every project file in the repository is
checked (or fixed) in one go, and manages a git pre-push hook that runs the
check before every push.

Quick start:
  standards check    # Verify formatting of every *.sln
  standards fix      # Apply whitespace and style fixes
  standards hook     # Run the check before every push
  standards unhook   # Remove the hook again

Settings are read from standards.toml in the current directory or a parent.
"#,
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use color output.
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Configuration file to use instead of searching for standards.toml.
    #[arg(long, global = true, env = "STANDARDS_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Always use color.
    Always,
    /// Auto-detect color support.
    #[default]
    Auto,
    /// Never use color.
    Never,
}

/// Formatter flags shared by `check` and `fix`.
#[derive(Debug, Clone, Default, Args)]
pub struct FormatterArgs {
    /// Formatter program or path.
    #[arg(long)]
    pub tool_path: Option<String>,

    /// Directory searched for project files.
    #[arg(long)]
    pub project_path: Option<PathBuf>,

    /// Glob matched against project file names.
    #[arg(long)]
    pub project_glob: Option<String>,

    /// Formatter verbosity.
    #[arg(long, value_parser = ["q", "quiet", "m", "minimal", "n", "normal", "d", "detailed", "diag", "diagnostic"])]
    pub verbosity: Option<String>,

    /// Do not query the formatter version before running.
    #[arg(long)]
    pub skip_version_check: bool,
}

impl From<FormatterArgs> for FormatterOverrides {
    fn from(args: FormatterArgs) -> Self {
        Self {
            tool_path: args.tool_path,
            project_path: args.project_path,
            project_glob: args.project_glob,
            verbosity: args.verbosity,
            skip_version_check: args.skip_version_check,
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check formatting of every project without changing files.
    Check(FormatterArgs),

    /// Fix formatting of every project in place.
    #[command(visible_alias = "format")]
    Fix(FormatterArgs),

    /// Install the git pre-push hook.
    #[command(visible_alias = "install")]
    Hook,

    /// Remove the git pre-push hook if it was installed by standards.
    #[command(visible_aliases = ["remove", "uninstall"])]
    Unhook,

    /// Show whether the pre-push hook is installed.
    Status,

    /// Enable or disable Burst AOT compilation for a Unity project.
    Burst {
        /// Turn Burst compilation on.
        #[arg(long, conflicts_with = "disable", required_unless_present = "disable")]
        enable: bool,

        /// Turn Burst compilation off.
        #[arg(long)]
        disable: bool,

        /// Unity project directory.
        #[arg(long, default_value = ".")]
        project_path: PathBuf,

        /// Platform to write settings for; repeat for several.
        #[arg(long = "platform")]
        platforms: Vec<String>,
    },

    /// Write a default standards.toml.
    Init {
        /// Overwrite existing configuration.
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Runs the CLI.
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);
    setup_color(cli.color);

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Check(args) => {
            commands::format(crate::FormatAction::Check, config_path, args.into())
        },
        Commands::Fix(args) => commands::format(crate::FormatAction::Fix, config_path, args.into()),
        Commands::Hook => commands::hook(config_path),
        Commands::Unhook => commands::unhook(config_path),
        Commands::Status => commands::status(config_path),
        Commands::Burst {
            enable,
            disable: _,
            project_path,
            platforms,
        } => commands::burst(config_path, enable, &project_path, platforms),
        Commands::Init { force } => commands::init(force),
        Commands::Completions { shell } => {
            commands::completions(shell);
            Ok(ExitCode::SUCCESS)
        },
    }
}

/// Sets up logging based on verbosity flags.
fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Sets up color output.
fn setup_color(choice: ColorChoice) {
    match choice {
        ColorChoice::Always => {
            console::set_colors_enabled(true);
            console::set_colors_enabled_stderr(true);
        },
        ColorChoice::Never => {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        },
        ColorChoice::Auto => {
            // Let console crate auto-detect
        },
    }
}
