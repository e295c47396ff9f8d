//! Message types for the state actor.
//!
//! All communication with the state actor happens through messages:
//! - `StateMessage` - host events and split commands sent to the actor
//! - `StateQuery` - requests for state data (with response channel)
//! - `QueryResult` - responses from queries

use tokio::sync::oneshot;

use crate::error::TabsplitError;
use crate::modules::tiling::commands::SplitRequest;
use crate::modules::tiling::reflow::ReflowReport;
use crate::modules::tiling::state::{Display, TabId};

// ============================================================================
// State Messages
// ============================================================================

/// Messages sent to the state actor.
#[derive(Debug)]
pub enum StateMessage {
    // ════════════════════════════════════════════════════════════════════════
    // Host Events
    // ════════════════════════════════════════════════════════════════════════
    /// A tab became the selected tab of its window.
    TabActivated { tab_id: TabId },

    /// A tab was closed.
    TabRemoved { tab_id: TabId },

    /// Window focus moved; the focused window's active tab is re-read.
    WindowFocusChanged,

    /// Display configuration changed; the reference display is re-read.
    DisplayChanged,

    // ════════════════════════════════════════════════════════════════════════
    // Commands
    // ════════════════════════════════════════════════════════════════════════
    /// Reflow the windows into the requested number of splits.
    Split {
        request: SplitRequest,
        respond_to: oneshot::Sender<Result<ReflowReport, TabsplitError>>,
    },

    // ════════════════════════════════════════════════════════════════════════
    // Queries
    // ════════════════════════════════════════════════════════════════════════
    /// Query state.
    Query {
        query: StateQuery,
        respond_to: oneshot::Sender<QueryResult>,
    },

    /// Stop the actor.
    Shutdown,
}

impl StateMessage {
    /// Returns the message name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TabActivated { .. } => "TabActivated",
            Self::TabRemoved { .. } => "TabRemoved",
            Self::WindowFocusChanged => "WindowFocusChanged",
            Self::DisplayChanged => "DisplayChanged",
            Self::Split { .. } => "Split",
            Self::Query { .. } => "Query",
            Self::Shutdown => "Shutdown",
        }
    }
}

// ============================================================================
// Queries
// ============================================================================

/// Queries answered by the state actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateQuery {
    /// Activation history, newest first.
    History,
    /// The cached reference display.
    Display,
}

/// Results of state queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    History(Vec<TabId>),
    Display(Option<Display>),
}

impl QueryResult {
    /// Try to get the history from the result.
    #[must_use]
    pub fn into_history(self) -> Option<Vec<TabId>> {
        match self {
            Self::History(history) => Some(history),
            Self::Display(_) => None,
        }
    }

    /// Try to get the display from the result.
    #[must_use]
    pub fn into_display(self) -> Option<Option<Display>> {
        match self {
            Self::Display(display) => Some(display),
            Self::History(_) => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_names() {
        assert_eq!(StateMessage::TabActivated { tab_id: 1 }.name(), "TabActivated");
        assert_eq!(StateMessage::DisplayChanged.name(), "DisplayChanged");
        assert_eq!(StateMessage::Shutdown.name(), "Shutdown");
    }

    #[test]
    fn test_query_result_conversions() {
        assert_eq!(QueryResult::History(vec![3, 1]).into_history(), Some(vec![3, 1]));
        assert_eq!(QueryResult::History(vec![]).into_display(), None);
        assert_eq!(QueryResult::Display(None).into_display(), Some(None));
        assert_eq!(QueryResult::Display(None).into_history(), None);
    }
}
