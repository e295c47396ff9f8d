//! Error types for host window/tab operations.
//!
//! Every call the core makes into the host windowing system can fail, most
//! commonly because a window or tab vanished between the snapshot the core
//! worked from and the mutation it requested. The reflow engine never retries:
//! the failure aborts the current run and the next command starts again from a
//! fresh window listing.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::modules::tiling::error::{HostError, HostResult};
//!
//! fn find_tab(windows: &[Window], id: TabId) -> HostResult<&Tab> {
//!     windows
//!         .iter()
//!         .flat_map(|win| win.tabs.iter())
//!         .find(|tab| tab.id == id)
//!         .ok_or(HostError::TabNotFound(id))
//! }
//! ```

use thiserror::Error;

use super::state::{TabId, WindowId};

/// Result type alias for host operations.
pub type HostResult<T> = Result<T, HostError>;

/// Errors reported by the host windowing system.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// A window with the given ID does not exist (anymore).
    #[error("Window {0} not found")]
    WindowNotFound(WindowId),

    /// A tab with the given ID does not exist (anymore).
    #[error("Tab {0} not found")]
    TabNotFound(TabId),

    /// The host refused the operation.
    #[error("Host rejected {operation}: {reason}")]
    Rejected {
        /// Name of the refused operation.
        operation: &'static str,
        /// Host-provided explanation.
        reason: String,
    },
}

impl HostError {
    /// Creates a rejection error for the given operation.
    #[must_use]
    pub fn rejected(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Rejected { operation, reason: reason.into() }
    }

    /// Returns `true` if this error indicates a window or tab was not found.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::WindowNotFound(_) | Self::TabNotFound(_))
    }
}

// ============================================================================
// Tests
// ============================================================================
