//! CLI command implementations.

use crate::config::{Config, FormatterOverrides, CONFIG_FILE_NAME};
use crate::core::error::{Error, Result};
use crate::core::formatter::FormatAction;
use crate::core::git::GitRepo;
use crate::core::hook::{HookFile, HookStatus, HOOK_NAME};
use crate::core::runner::Runner;
use console::style;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Number of output lines shown per failing project.
const FAILURE_OUTPUT_LINES: usize = 20;

/// Loads the explicit config file, or searches for one.
fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load_from(path),
        None => Config::load_or_default(),
    }
}

/// Resolves the pre-push hook of the current repository.
fn pre_push_hook() -> Result<HookFile> {
    let repo = GitRepo::discover()?;
    Ok(HookFile::new(repo.hook_path(HOOK_NAME)))
}

/// Run the formatter in check or fix mode.
pub fn format(
    action: FormatAction,
    config_path: Option<&Path>,
    overrides: FormatterOverrides,
) -> Result<ExitCode> {
    let mut config = load_config(config_path)?;
    config.apply(&overrides)?;

    let tool = config.formatter.tool.clone();
    println!(
        "{} Running {} {} on '{}' under {}",
        style("•").cyan(),
        tool,
        style(action).bold(),
        config.projects.glob,
        config.project_root().display()
    );

    let runner = Runner::new(config);
    let report = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Internal {
            message: format!("Failed to create runtime: {e}"),
        })?
        .block_on(runner.run(action))?;

    println!();
    if report.success() {
        println!(
            "{} {} passed for {} project(s) in {:?}",
            style("✓").green().bold(),
            report.action,
            report.passed_count(),
            report.duration
        );
        return Ok(ExitCode::SUCCESS);
    }

    for project in report.failed_projects() {
        println!();
        println!("  {} {}", style("Failed:").red(), project.project.display());
        for line in project
            .output
            .combined_output()
            .lines()
            .take(FAILURE_OUTPUT_LINES)
        {
            println!("    {line}");
        }
    }
    println!();

    Err(Error::subprocess(
        tool,
        format!(
            "{} failed for {} of {} project(s)",
            report.action,
            report.failed_count(),
            report.projects.len()
        ),
        report.first_failure_code(),
    ))
}

/// Install the pre-push hook.
pub fn hook(config_path: Option<&Path>) -> Result<ExitCode> {
    let config = load_config(config_path)?;
    let hook = pre_push_hook()?;

    hook.install(&config.hook.resolved_command()?)?;

    println!(
        "{} Installed pre-push hook at {}",
        style("✓").green(),
        hook.path().display()
    );
    Ok(ExitCode::SUCCESS)
}

/// Remove the pre-push hook.
pub fn unhook(config_path: Option<&Path>) -> Result<ExitCode> {
    let config = load_config(config_path)?;
    let hook = pre_push_hook()?;

    if hook.remove(&config.hook.resolved_command()?)? {
        println!(
            "{} Removed pre-push hook from {}",
            style("✓").green(),
            hook.path().display()
        );
    } else {
        println!(
            "{} No pre-push hook installed at {}",
            style("•").cyan(),
            hook.path().display()
        );
    }
    Ok(ExitCode::SUCCESS)
}

/// Show the pre-push hook state.
pub fn status(config_path: Option<&Path>) -> Result<ExitCode> {
    let config = load_config(config_path)?;
    let hook = pre_push_hook()?;
    let command = config.hook.resolved_command()?;
    let state = hook.status(&command)?;

    let marker = match state {
        HookStatus::Owned => style("✓").green(),
        HookStatus::Absent => style("•").cyan(),
        HookStatus::ForeignOccupied => style("!").yellow(),
    };
    println!(
        "{marker} Pre-push hook {}: {}",
        style(state).bold(),
        hook.path().display()
    );
    if state == HookStatus::ForeignOccupied {
        println!("  It does not run `{command}`.");
    }

    Ok(ExitCode::SUCCESS)
}

/// Enable or disable Burst AOT compilation.
pub fn burst(
    config_path: Option<&Path>,
    enable: bool,
    project_path: &Path,
    platforms: Vec<String>,
) -> Result<ExitCode> {
    let mut config = load_config(config_path)?;
    if !platforms.is_empty() {
        config.burst.platforms = platforms;
    }

    let written = crate::burst::set_burst_compilation(project_path, &config.burst, enable)?;
    let state = if enable { "enabled" } else { "disabled" };

    for path in &written {
        println!(
            "{} Burst AOT compilation {state}: {}",
            style("✓").green(),
            path.display()
        );
    }

    Ok(ExitCode::SUCCESS)
}

/// Initialize configuration.
pub fn init(force: bool) -> Result<ExitCode> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        println!(
            "{} Configuration already exists: {}",
            style("!").yellow(),
            config_path.display()
        );
        println!("  Use --force to overwrite.");
        return Ok(ExitCode::FAILURE);
    }

    std::fs::write(&config_path, Config::default_toml())
        .map_err(|e| Error::io("write config", e))?;

    println!("{} Created {}", style("✓").green(), config_path.display());
    Ok(ExitCode::SUCCESS)
}

/// Generate shell completions.
pub fn completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    clap_complete::generate(
        shell,
        &mut super::Cli::command(),
        "standards",
        &mut std::io::stdout(),
    );
}
