//! CLI module for Tabsplit.
//!
//! This module provides the command-line interface: offline simulation of
//! split commands against host snapshots, command identifier parsing and
//! configuration inspection.

mod commands;
mod output;

use clap::Parser;
pub use commands::Cli;

use crate::error::TabsplitError;

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), TabsplitError> {
    let cli = Cli::parse();
    cli.execute()
}
