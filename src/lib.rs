//! # dotnet-standards
//!
//! Code-style checks and pre-push hook management for .NET and Unity repositories.
//!
//! `standards` runs `dotnet-format` over every solution in a repository,
//! installs a git pre-push hook that runs the same check before each push,
//! and flips Burst AOT compilation in a Unity project's settings for CI.
//!
//! ## Features
//!
//! - **Whole-repository checks**: every project file matching a glob is
//!   checked, and one failing project does not stop the others
//! - **Safe hook management**: the pre-push hook is only ever created where
//!   nothing exists and only ever deleted when it is recognisably ours
//! - **Version gate**: refuses to run with a formatter older than the
//!   configured major version
//! - **Burst AOT toggle**: per-platform `BurstAotSettings_*.json` updates
//!
//! ## Example
//!
//! ```rust,no_run
//! use dotnet_standards::{HookFile, HookStatus};
//!
//! fn main() -> dotnet_standards::Result<()> {
//!     let hook = HookFile::new(".git/hooks/pre-push");
//!
//!     if hook.status("standards check")? == HookStatus::Absent {
//!         hook.install("standards check")?;
//!     }
//!
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/dotnet-standards/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod burst;
pub mod cli;
pub mod config;
pub mod core;

// Re-export main types for convenience
pub use config::Config;
pub use crate::core::error::{Error, Result};
pub use crate::core::formatter::{FormatAction, Formatter};
pub use crate::core::hook::{HookFile, HookStatus};
pub use crate::core::runner::{FormatReport, ProjectResult, Runner};
