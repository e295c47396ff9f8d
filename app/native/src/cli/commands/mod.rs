//! CLI command definitions using Clap.
//!
//! This module defines all CLI commands and their arguments, organized into
//! domain-specific submodules:
//!
//! - `config_cmd` - Configuration inspection commands
//! - `simulate` - Offline reflow runs against a host snapshot

use std::io;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};
use colored::Colorize;

use crate::cli::output::print_highlighted_json;
use crate::error::TabsplitError;
use crate::{config, schema};

pub mod config_cmd;
pub mod simulate;

// Re-export commonly used types for convenience
pub use config_cmd::ConfigCommands;
pub use simulate::SimulateArgs;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tabsplit CLI - tile browser windows and redistribute their tabs.
#[derive(Parser, Debug)]
#[command(name = "tabsplit")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Run one split command against a host snapshot.
    ///
    /// Loads the snapshot into an in-memory host, replays the given tab
    /// activation history, runs the reflow and prints what it did.
    Simulate(SimulateArgs),

    /// Parse a command identifier.
    ///
    /// Prints the split request a key binding identifier such as
    /// `group-by-3` or `new-group-by-2` maps to, using the configured prefixes.
    Parse {
        /// The command identifier.
        identifier: String,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Configuration file commands.
    ///
    /// Show the effective configuration and where it was loaded from.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Output Tabsplit configuration JSON Schema.
    ///
    /// Outputs a JSON Schema to stdout that describes the structure of the
    /// configuration file. Can be redirected to a file for use with editors
    /// that support JSON Schema validation.
    Schema,

    /// Generate shell completions.
    ///
    /// Outputs shell completion script to stdout for the specified shell.
    ///
    /// Usage:
    ///   eval "$(tabsplit completions --shell zsh)"
    ///   tabsplit completions --shell fish > ~/.config/fish/completions/tabsplit.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Returns the custom config path if specified via --config flag.
    #[must_use]
    pub fn config_path(&self) -> Option<std::path::PathBuf> {
        self.config.as_deref().map(|path| config::expand_path(std::path::Path::new(path)))
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), TabsplitError> {
        // Set custom config path if provided
        if let Some(path) = self.config_path() {
            if !path.exists() {
                return Err(TabsplitError::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            config::set_custom_config_path(path);
        }

        match &self.command {
            Commands::Simulate(args) => simulate::execute(args),
            Commands::Parse { identifier, json } => parse_command(identifier, *json),
            Commands::Config(cmd) => config_cmd::execute(cmd),

            Commands::Schema => {
                println!("{}", schema::print_schema());
                Ok(())
            }

            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "tabsplit", &mut io::stdout());
    }
}

/// Parses a command identifier and prints the resulting request.
fn parse_command(identifier: &str, json: bool) -> Result<(), TabsplitError> {
    let request = config::get_config().parse_command(identifier)?;

    if json {
        print_highlighted_json(&serde_json::to_value(request)?);
    } else {
        println!("{} {}", "Splits:".bold(), request.target);
        println!(
            "{} {}",
            "New windows:".bold(),
            if request.use_empty_windows { "empty" } else { "donor tabs" }
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_schema() {
        let cli = Cli::try_parse_from(["tabsplit", "schema"]).unwrap();
        assert!(matches!(cli.command, Commands::Schema));
    }

    #[test]
    fn test_cli_parses_completions_zsh() {
        let cli = Cli::try_parse_from(["tabsplit", "completions", "--shell", "zsh"]).unwrap();
        match cli.command {
            Commands::Completions { shell } => assert_eq!(shell, Shell::Zsh),
            _ => panic!("Expected Completions command"),
        }
    }

    #[test]
    fn test_cli_parses_parse() {
        let cli = Cli::try_parse_from(["tabsplit", "parse", "new-group-by-2", "--json"]).unwrap();
        match cli.command {
            Commands::Parse { identifier, json } => {
                assert_eq!(identifier, "new-group-by-2");
                assert!(json);
            }
            _ => panic!("Expected Parse command"),
        }
    }

    #[test]
    fn test_cli_parses_simulate() {
        let cli = Cli::try_parse_from([
            "tabsplit",
            "simulate",
            "--snapshot",
            "host.json",
            "--command",
            "group-by-3",
            "--history",
            "1,2,3",
        ])
        .unwrap();
        match cli.command {
            Commands::Simulate(args) => {
                assert_eq!(args.snapshot, std::path::PathBuf::from("host.json"));
                assert_eq!(args.command, "group-by-3");
                assert_eq!(args.history, vec![1, 2, 3]);
                assert!(!args.json);
                assert!(args.output.is_none());
            }
            _ => panic!("Expected Simulate command"),
        }
    }

    #[test]
    fn test_cli_simulate_requires_snapshot() {
        assert!(Cli::try_parse_from(["tabsplit", "simulate", "--command", "group-by-2"]).is_err());
    }

    #[test]
    fn test_cli_parses_global_config() {
        let cli = Cli::try_parse_from(["tabsplit", "config", "show", "--config", "/tmp/x.jsonc"])
            .unwrap();
        assert_eq!(cli.config.as_deref(), Some("/tmp/x.jsonc"));
        assert!(matches!(cli.command, Commands::Config(ConfigCommands::Show)));
    }

    #[test]
    fn test_cli_parses_config_path() {
        let cli = Cli::try_parse_from(["tabsplit", "config", "path"]).unwrap();
        assert!(matches!(cli.command, Commands::Config(ConfigCommands::Path)));
    }

    #[test]
    fn test_cli_verify() { Cli::command().debug_assert(); }
}
