//! Tooling & Integration Layer
//!
//! The `cotree` command-line surface and its text formatting.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands, ProjectCommands};
