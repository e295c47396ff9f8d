//! Split commands and their identifiers.
//!
//! Key bindings reach the core as command identifiers such as `group-by-3`
//! (tile into three windows, populating new ones with donor tabs) or
//! `new-group-by-2` (tile into two windows, leaving new ones empty). The
//! split count is validated here so the reflow engine is never entered with
//! a zero or unparsable target.

use std::fmt;
use std::num::NonZeroUsize;

use serde::Serialize;
use thiserror::Error;

/// Default prefix of split command identifiers.
pub const DEFAULT_COMMAND_PREFIX: &str = "group-by-";

/// Default prefix marking a command that leaves new windows empty.
pub const DEFAULT_EMPTY_WINDOWS_PREFIX: &str = "new-";

/// Reasons a command identifier is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The identifier does not use the split command grammar.
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    /// The split count is not a number.
    #[error("Invalid split count '{0}'")]
    InvalidSplitCount(String),

    /// The split count is zero.
    #[error("Split count must be at least 1")]
    ZeroSplitCount,
}

/// A validated request to reflow windows into `target` splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitRequest {
    /// Number of windows to tile across the display.
    pub target: NonZeroUsize,

    /// Leave newly created windows with their blank tab instead of donating.
    pub use_empty_windows: bool,
}

impl SplitRequest {
    /// Creates a request from an already validated split count.
    #[must_use]
    pub const fn new(target: NonZeroUsize, use_empty_windows: bool) -> Self {
        Self { target, use_empty_windows }
    }

    /// Creates a request from a raw split count.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::ZeroSplitCount`] if `target` is zero.
    pub fn from_count(target: usize, use_empty_windows: bool) -> Result<Self, CommandError> {
        NonZeroUsize::new(target)
            .map(|target| Self::new(target, use_empty_windows))
            .ok_or(CommandError::ZeroSplitCount)
    }

    /// Parses a command identifier using the default prefixes.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] if the identifier is not a split command or
    /// its split count is not a positive integer.
    pub fn parse(identifier: &str) -> Result<Self, CommandError> {
        Self::parse_with(identifier, DEFAULT_COMMAND_PREFIX, DEFAULT_EMPTY_WINDOWS_PREFIX)
    }

    /// Parses a command identifier using custom prefixes.
    ///
    /// # Errors
    ///
    /// See [`SplitRequest::parse`].
    pub fn parse_with(
        identifier: &str,
        command_prefix: &str,
        empty_windows_prefix: &str,
    ) -> Result<Self, CommandError> {
        let trimmed = identifier.trim();
        let (use_empty_windows, rest) = match trimmed.strip_prefix(empty_windows_prefix) {
            Some(rest) if !empty_windows_prefix.is_empty() => (true, rest),
            _ => (false, trimmed),
        };

        let count = rest
            .strip_prefix(command_prefix)
            .ok_or_else(|| CommandError::UnknownCommand(identifier.to_string()))?;

        let target: usize = count
            .parse()
            .map_err(|_| CommandError::InvalidSplitCount(count.to_string()))?;

        Self::from_count(target, use_empty_windows)
    }

    /// Returns the split count as a plain integer.
    #[must_use]
    pub const fn target_count(&self) -> usize { self.target.get() }
}

/// Prefix-independent rendering, e.g. `split(3)` or `split(2, empty)`.
impl fmt::Display for SplitRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.use_empty_windows {
            write!(f, "split({}, empty)", self.target)
        } else {
            write!(f, "split({})", self.target)
        }
    }
}
