//! Configuration types for Tabsplit.
//!
//! This module provides the configuration types and loading functionality.
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::modules::tiling::commands::{
    CommandError, DEFAULT_COMMAND_PREFIX, DEFAULT_EMPTY_WINDOWS_PREFIX, SplitRequest,
};

/// URL of the browser's default blank tab.
pub const DEFAULT_NEW_TAB_URL: &str = "chrome://newtab/";

/// Default inactivity threshold before a tab is paused (one hour).
pub const DEFAULT_INACTIVITY_SECS: u64 = 3600;

/// Tab pausing configuration.
///
/// A tab that stops being the most recently activated one is discarded after
/// `inactivitySecs` unless it has been selected again in the meantime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct PauseConfig {
    /// Whether inactive tabs are paused at all.
    pub enabled: bool,

    /// Seconds of inactivity before a tab is paused. `0` disables pausing.
    pub inactivity_secs: u64,
}

impl Default for PauseConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            inactivity_secs: DEFAULT_INACTIVITY_SECS,
        }
    }
}

impl PauseConfig {
    /// Returns the pause delay, or `None` when pausing is off.
    #[must_use]
    pub const fn delay(&self) -> Option<Duration> {
        if self.enabled && self.inactivity_secs > 0 {
            Some(Duration::from_secs(self.inactivity_secs))
        } else {
            None
        }
    }

    /// Returns `true` if tabs are paused after inactivity.
    #[must_use]
    pub const fn is_enabled(&self) -> bool { self.delay().is_some() }
}

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct TabsplitConfig {
    /// Inactive tab pausing.
    pub pause: PauseConfig,

    /// URL of the browser's blank tab. Tabs at this URL are dropped instead
    /// of migrated when a window is folded away.
    pub new_tab_url: String,

    /// Prefix of split command identifiers (`group-by-3`).
    pub command_prefix: String,

    /// Prefix marking a split that leaves new windows empty (`new-group-by-3`).
    pub empty_windows_prefix: String,
}

impl Default for TabsplitConfig {
    fn default() -> Self {
        Self {
            pause: PauseConfig::default(),
            new_tab_url: DEFAULT_NEW_TAB_URL.to_string(),
            command_prefix: DEFAULT_COMMAND_PREFIX.to_string(),
            empty_windows_prefix: DEFAULT_EMPTY_WINDOWS_PREFIX.to_string(),
        }
    }
}

impl TabsplitConfig {
    /// Parses a command identifier with the configured prefixes.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] if the identifier is not a split command.
    pub fn parse_command(&self, identifier: &str) -> Result<SplitRequest, CommandError> {
        SplitRequest::parse_with(identifier, &self.command_prefix, &self.empty_windows_prefix)
    }
}

/// Errors that can occur when loading the configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    NotFound,
    /// The configuration file exists but could not be read.
    IoError(std::io::Error),
    /// The configuration file contains invalid JSON.
    ParseError(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(
                f,
                "No configuration file found. Expected at ~/.config/tabsplit/config.jsonc \
                or ~/.tabsplit.jsonc"
            ),
            Self::IoError(err) => write!(f, "Failed to read configuration file: {err}"),
            Self::ParseError(err) => write!(f, "Failed to parse configuration file: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError(err) => Some(err),
            Self::ParseError(err) => Some(err),
            Self::NotFound => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err) }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self { Self::ParseError(err) }
}

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Configuration file names in the home directory.
const HOME_CONFIG_FILE_NAMES: &[&str] = &[".tabsplit.jsonc", ".tabsplit.json"];

/// Returns the possible configuration file paths in priority order.
///
/// The function checks the following locations (both `.jsonc` and `.json` variants):
/// 1. `$XDG_CONFIG_HOME/tabsplit/`, if the variable is set
/// 2. `~/.config/tabsplit/`
/// 3. The platform configuration directory (`dirs::config_dir`)
/// 4. `~/.tabsplit.jsonc` or `~/.tabsplit.json`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut dirs_to_search = Vec::new();

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        dirs_to_search.push(PathBuf::from(xdg_config).join("tabsplit"));
    }
    if let Some(home) = dirs::home_dir() {
        dirs_to_search.push(home.join(".config").join("tabsplit"));
    }
    if let Some(config_dir) = dirs::config_dir() {
        dirs_to_search.push(config_dir.join("tabsplit"));
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    for dir in dirs_to_search {
        for filename in CONFIG_FILE_NAMES {
            let path = dir.join(filename);
            // XDG_CONFIG_HOME and the platform dir are often ~/.config
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    if let Some(home) = dirs::home_dir() {
        for filename in HOME_CONFIG_FILE_NAMES {
            paths.push(home.join(filename));
        }
    }

    paths
}

/// Loads the configuration from the first available config file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of the expected locations.
/// Returns `ConfigError::IoError` if a configuration file exists but could not be read.
/// Returns `ConfigError::ParseError` if the configuration file contains invalid JSON.
pub fn load_config() -> Result<(TabsplitConfig, PathBuf), ConfigError> {
    for path in config_paths() {
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    Err(ConfigError::NotFound)
}

/// Loads the configuration from an explicit path.
///
/// A leading `~` is expanded to the home directory.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist, or the same
/// read and parse errors as [`load_config`].
pub fn load_config_from_path(path: &PathBuf) -> Result<(TabsplitConfig, PathBuf), ConfigError> {
    let path = expand_path(path);
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }

    let file = fs::File::open(&path)?;
    // Strip comments from JSONC before parsing
    let reader = json_comments::StripComments::new(file);
    let config: TabsplitConfig = serde_json::from_reader(reader)?;
    Ok((config, path))
}

/// Expands a leading `~` in a path.
#[must_use]
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return PathBuf::new();
    }
    PathBuf::from(shellexpand::tilde(trimmed).as_ref())
}
