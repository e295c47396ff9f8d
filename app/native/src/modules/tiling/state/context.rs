//! The `TilingContext` owned by the state actor.
//!
//! Holds the long-lived inputs a reflow needs: the activation history (with
//! its pause timers), the cached reference display and the URL that marks a
//! blank tab. Host events keep the first two current.

use super::types::{Display, TabId, focused_active_tab};
use crate::modules::tiling::error::HostResult;
use crate::modules::tiling::host::Host;
use crate::modules::tiling::recency::RecencyTracker;

/// Root state container for the tiling core.
#[derive(Debug)]
pub struct TilingContext {
    /// Tab activation history.
    pub tracker: RecencyTracker,

    /// First display reported by the host, if any.
    display: Option<Display>,

    /// URL of the host's default blank tab.
    new_tab_url: String,
}

impl TilingContext {
    /// Creates a context with no display cached yet.
    #[must_use]
    pub fn new(tracker: RecencyTracker, new_tab_url: impl Into<String>) -> Self {
        Self {
            tracker,
            display: None,
            new_tab_url: new_tab_url.into(),
        }
    }

    /// Returns the cached reference display.
    #[must_use]
    pub const fn display(&self) -> Option<&Display> { self.display.as_ref() }

    /// Returns the URL that identifies blank tabs.
    #[must_use]
    pub fn new_tab_url(&self) -> &str { &self.new_tab_url }

    /// Returns the history newest-first as an owned list.
    #[must_use]
    pub fn history(&self) -> Vec<TabId> { self.tracker.history_newest_first().collect() }

    // ========================================================================
    // Host round trips
    // ========================================================================

    /// Caches the first display and records the focused window's active tab.
    ///
    /// # Errors
    ///
    /// Returns the host error if displays or windows cannot be listed.
    pub async fn bootstrap<H: Host>(&mut self, host: &H) -> HostResult<()> {
        self.refresh_display(host).await?;
        self.refresh_focus(host).await?;
        tracing::debug!(
            display = self.display.as_ref().map(|d| d.id.as_str()),
            tracked = self.tracker.len(),
            "tiling: context bootstrapped"
        );
        Ok(())
    }

    /// Replaces the cached display with the host's first display.
    ///
    /// # Errors
    ///
    /// Returns the host error if displays cannot be listed.
    pub async fn refresh_display<H: Host>(&mut self, host: &H) -> HostResult<()> {
        let displays = host.list_displays().await?;
        self.display = displays.into_iter().next();
        if self.display.is_none() {
            tracing::warn!("tiling: host reported no displays");
        }
        Ok(())
    }

    /// Records the active tab of the focused window, if there is one.
    ///
    /// # Errors
    ///
    /// Returns the host error if windows cannot be listed.
    pub async fn refresh_focus<H: Host>(&mut self, host: &H) -> HostResult<()> {
        let windows = host.list_windows().await?;
        if let Some(tab) = focused_active_tab(&windows) {
            self.tracker.record_activation(tab.id);
        }
        Ok(())
    }
}
