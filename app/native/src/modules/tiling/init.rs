//! Entry point for starting the tiling core against a host.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         start()                                         │
//! │  1. Pick a pause scheduler from the configuration                       │
//! │  2. Build the TilingContext around a fresh RecencyTracker               │
//! │  3. Bootstrap the context against the host, then spawn the StateActor  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! let handle = tiling::start(Arc::new(host), config::get_config()).await;
//! handle.tab_activated(tab_id).await?;
//! let report = handle.split(config.parse_command("group-by-3")?).await?;
//! ```

use std::sync::Arc;

use super::actor::{StateActor, StateActorHandle};
use super::host::Host;
use super::recency::{HostPauseScheduler, RecencyTracker};
use super::state::TilingContext;
use crate::config::TabsplitConfig;

/// Builds the recency tracker the configuration asks for.
#[must_use]
pub fn build_tracker<H: Host>(host: &Arc<H>, config: &TabsplitConfig) -> RecencyTracker {
    match config.pause.delay() {
        Some(delay) => {
            tracing::debug!(delay_secs = delay.as_secs(), "tiling: tab pausing enabled");
            RecencyTracker::new(HostPauseScheduler::new(Arc::clone(host), delay))
        }
        None => {
            tracing::debug!("tiling: tab pausing disabled");
            RecencyTracker::without_pausing()
        }
    }
}

/// Starts the tiling core and returns the handle used to feed it events and
/// commands.
///
/// Resolves once the focused window's active tab and the display have been
/// read from the host. Must be called from within a tokio runtime.
pub async fn start<H: Host>(host: Arc<H>, config: &TabsplitConfig) -> StateActorHandle {
    let tracker = build_tracker(&host, config);
    let context = TilingContext::new(tracker, config.new_tab_url.clone());
    StateActor::spawn(host, context).await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::PauseConfig;
    use crate::modules::tiling::host::{HostOp, HostSnapshot, MemoryHost};
    use crate::modules::tiling::state::{Bounds, Tab, Window};

    fn host() -> Arc<MemoryHost> {
        let mut win = Window::new(1, Bounds::sized(800, 600));
        win.focused = true;
        win.tabs = vec![Tab { active: true, ..Tab::new(1, "https://a") }, Tab::new(2, "https://b")];
        Arc::new(MemoryHost::from_snapshot(HostSnapshot::default().window(win)))
    }

    #[tokio::test]
    async fn test_disabled_pausing_arms_nothing() {
        let host = host();
        let config = TabsplitConfig {
            pause: PauseConfig { enabled: false, ..PauseConfig::default() },
            ..TabsplitConfig::default()
        };
        let mut tracker = build_tracker(&host, &config);

        tracker.record_activation(1);
        tracker.record_activation(2);

        assert!(!tracker.has_pending_pause(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_started_core_pauses_inactive_tab() {
        let host = host();
        let config = TabsplitConfig {
            pause: PauseConfig { enabled: true, inactivity_secs: 10 },
            ..TabsplitConfig::default()
        };
        let handle = start(Arc::clone(&host), &config).await;

        host.select_tab(2).unwrap();
        handle.tab_activated(2).await.unwrap();
        assert_eq!(handle.history().await.unwrap(), vec![2, 1]);

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(host.ops(), vec![HostOp::DiscardTab { tab_id: 1 }]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fired_pause_is_no_longer_pending() {
        let host = host();
        let config = TabsplitConfig {
            pause: PauseConfig { enabled: true, inactivity_secs: 10 },
            ..TabsplitConfig::default()
        };
        let mut tracker = build_tracker(&host, &config);
        tracker.record_activation(1);
        host.select_tab(2).unwrap();
        tracker.record_activation(2);
        assert!(tracker.has_pending_pause(1));

        tokio::time::sleep(Duration::from_secs(11)).await;

        assert_eq!(host.ops(), vec![HostOp::DiscardTab { tab_id: 1 }]);
        assert!(!tracker.has_pending_pause(1));
        assert_eq!(tracker.history_newest_first().collect::<Vec<_>>(), vec![2, 1]);
    }
}
