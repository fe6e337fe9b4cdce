//! Core functionality for dotnet-standards.
//!
//! This module contains the main components:
//! - [`hook`]: Pre-push hook lifecycle
//! - [`formatter`]: The `dotnet-format` collaborator
//! - [`runner`]: Formatting across all project files
//! - [`executor`]: Subprocess execution
//! - [`error`]: Error types and result handling
//! - [`git`]: Git repository operations

pub mod error;
pub mod executor;
pub mod formatter;
pub mod git;
pub mod hook;
pub mod runner;
