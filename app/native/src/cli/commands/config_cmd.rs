//! Config CLI commands.
//!
//! Commands for inspecting the Tabsplit configuration.

use clap::Subcommand;
use colored::Colorize;

use crate::cli::output::print_highlighted_json;
use crate::config::{config_paths, get_config, get_config_path};
use crate::error::TabsplitError;

/// Config commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum ConfigCommands {
    /// Show the effective configuration.
    ///
    /// Prints the configuration after defaults are applied, and the file it
    /// was loaded from.
    Show,

    /// Show the path to the configuration file.
    ///
    /// Displays the paths where Tabsplit looks for configuration files,
    /// and indicates which one is currently in use (if any).
    Path,
}

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cmd: &ConfigCommands) -> Result<(), TabsplitError> {
    match cmd {
        ConfigCommands::Show => show_config(),
        ConfigCommands::Path => {
            show_config_path();
            Ok(())
        }
    }
}

/// Print the effective configuration.
fn show_config() -> Result<(), TabsplitError> {
    let config = get_config();
    match get_config_path() {
        Some(path) => println!("{} {}\n", "Loaded from:".bold(), path.display()),
        None => println!("{} built-in defaults\n", "Loaded from:".bold()),
    }

    print_highlighted_json(&serde_json::to_value(config)?);
    Ok(())
}

/// Show the configuration file path.
fn show_config_path() {
    // Loads the configuration so a --config override is reported as active.
    get_config();
    let active = get_config_path();

    println!("Configuration file search paths (in priority order):\n");

    let mut found_config = false;
    for (i, path) in config_paths().iter().enumerate() {
        let exists = path.exists();
        let marker = if exists && !found_config && active.is_none_or(|p| p == path) {
            found_config = true;
            " (active)".green().to_string()
        } else if exists {
            " (exists)".to_string()
        } else {
            String::new()
        };

        println!("  {}. {}{}", i + 1, path.display(), marker);
    }

    if let Some(path) = active
        && !found_config
    {
        println!("\n{} {}", "Active (--config):".bold(), path.display());
        found_config = true;
    }

    if !found_config {
        println!("\nNo configuration file found; built-in defaults are used.");
        println!("Run 'tabsplit schema' for the list of options.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_paths_returns_non_empty() {
        let paths = config_paths();
        // Should have at least one path (unless no HOME directory)
        assert!(!paths.is_empty() || std::env::var("HOME").is_err());
    }
}
