//! Logging setup.
//!
//! Diagnostics go to stderr through `tracing-subscriber`. The filter is read
//! from `TABSPLIT_LOG`, then `RUST_LOG`, and defaults to `warn` so normal CLI
//! output stays clean. Example: `TABSPLIT_LOG=tabsplit_lib=debug`.

use std::sync::OnceLock;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable with the application-specific filter.
pub const LOG_ENV: &str = "TABSPLIT_LOG";

/// Filter used when no environment variable holds a valid one.
pub const DEFAULT_FILTER: &str = "warn";

static LOGGING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Builds the filter from the first valid candidate directive string.
#[must_use]
pub fn build_filter(tabsplit_log: Option<&str>, rust_log: Option<&str>) -> EnvFilter {
    [tabsplit_log, rust_log]
        .into_iter()
        .flatten()
        .filter(|directives| !directives.trim().is_empty())
        .find_map(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber. Later calls are no-ops.
pub fn init() {
    if LOGGING_INITIALIZED.set(()).is_err() {
        return;
    }

    let tabsplit_log = std::env::var(LOG_ENV).ok();
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = build_filter(tabsplit_log.as_deref(), rust_log.as_deref());

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .try_init();

    if let Err(err) = result {
        eprintln!("tabsplit: failed to initialize logging: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(build_filter(None, None).to_string(), DEFAULT_FILTER);
    }

    #[test]
    fn test_app_variable_wins() {
        assert_eq!(build_filter(Some("debug"), Some("trace")).to_string(), "debug");
    }

    #[test]
    fn test_falls_back_to_rust_log() {
        assert_eq!(build_filter(None, Some("info")).to_string(), "info");
        assert_eq!(build_filter(Some("  "), Some("info")).to_string(), "info");
    }

    #[test]
    fn test_invalid_directive_is_skipped() {
        assert_eq!(build_filter(Some("tabsplit=notalevel"), None).to_string(), DEFAULT_FILTER);
    }
}
