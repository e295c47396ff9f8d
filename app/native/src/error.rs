//! Error types for Tabsplit.
//!
//! This module provides the unified error type returned by the actor handle
//! and the CLI. Lower layers keep their own typed errors (`HostError`,
//! `ReflowError`, `CommandError`, `ConfigError`) and convert into this one.

use thiserror::Error;

use crate::config::ConfigError;
use crate::modules::tiling::actor::ActorError;
use crate::modules::tiling::commands::CommandError;
use crate::modules::tiling::error::HostError;
use crate::modules::tiling::reflow::ReflowError;

/// Errors that can occur during application execution.
#[derive(Debug, Error)]
pub enum TabsplitError {
    /// A command identifier was rejected.
    #[error("Invalid command: {0}")]
    InvalidCommand(#[from] CommandError),

    /// A host call failed outside a reflow run.
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    /// A reflow run was aborted.
    #[error("{0}")]
    Reflow(#[from] ReflowError),

    /// Communication with the state actor failed.
    #[error("Actor error: {0}")]
    Actor(#[from] ActorError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A host snapshot could not be read or written.
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for TabsplitError {
    fn from(err: std::io::Error) -> Self { Self::Io(err.to_string()) }
}

impl From<serde_json::Error> for TabsplitError {
    fn from(err: serde_json::Error) -> Self { Self::Snapshot(err.to_string()) }
}

impl From<ConfigError> for TabsplitError {
    fn from(err: ConfigError) -> Self { Self::Config(err.to_string()) }
}
