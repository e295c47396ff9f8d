//! State actor module.
//!
//! The state actor owns the tiling context and processes messages
//! sequentially. A split command is awaited to completion before the next
//! message is taken, so two reflow runs never interleave their host calls and
//! events that arrive mid-run are applied afterwards.
//!
//! # Panic Recovery
//!
//! If a message handler panics:
//! 1. The panic is caught and logged
//! 2. The actor continues processing subsequent messages
//! 3. A pending command's caller sees [`ActorError::ReceiveFailed`]

mod handle;
mod messages;

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
pub use handle::{ActorError, StateActorHandle};
pub use messages::{QueryResult, StateMessage, StateQuery};
use tokio::sync::mpsc;

use crate::modules::tiling::host::Host;
use crate::modules::tiling::reflow::ReflowEngine;
use crate::modules::tiling::state::TilingContext;

/// Channel buffer size for the state actor.
const CHANNEL_BUFFER_SIZE: usize = 256;

/// The state actor that owns the tiling context.
///
/// Messages are processed sequentially, ensuring consistent state updates.
/// The actor runs in its own tokio task and communicates via channels.
pub struct StateActor<H: Host> {
    /// The context owned by this actor.
    context: TilingContext,

    /// Host the actor drives.
    host: Arc<H>,

    /// Receiver for incoming messages.
    receiver: mpsc::Receiver<StateMessage>,
}

impl<H: Host> StateActor<H> {
    /// Spawn a new state actor and return a handle for communication.
    ///
    /// The context is bootstrapped against the host before the loop is
    /// spawned, so the returned handle observes the host state as it was when
    /// this call ran. Must be called from within a tokio runtime.
    pub async fn spawn(host: Arc<H>, mut context: TilingContext) -> StateActorHandle {
        tracing::debug!("tiling: spawning state actor");
        if let Err(err) = context.bootstrap(host.as_ref()).await {
            tracing::warn!(error = %err, "tiling: bootstrap failed, starting with empty state");
        }

        let (sender, receiver) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let actor = Self { context, host, receiver };
        tokio::spawn(actor.run());

        StateActorHandle::new(sender)
    }

    /// Run the actor's message loop.
    ///
    /// This loop includes panic recovery - if a message handler panics,
    /// the error is logged and the actor continues processing messages.
    async fn run(mut self) {
        tracing::trace!("tiling: actor message loop starting");

        while let Some(msg) = self.receiver.recv().await {
            if matches!(msg, StateMessage::Shutdown) {
                tracing::debug!("tiling: actor received shutdown message");
                return;
            }

            let msg_name = msg.name();
            let result = AssertUnwindSafe(self.handle_message(msg)).catch_unwind().await;

            if let Err(panic_info) = result {
                let panic_msg = panic_info
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic_info.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());

                tracing::error!(message = msg_name, "tiling: PANIC in actor: {panic_msg}");
                tracing::error!("tiling: actor recovered from panic, state may be inconsistent");
            }
        }

        tracing::debug!("tiling: actor channel closed, exiting");
    }

    /// Handle a single message.
    async fn handle_message(&mut self, msg: StateMessage) {
        let host = self.host.as_ref();

        match msg {
            StateMessage::TabActivated { tab_id } => {
                self.context.tracker.record_activation(tab_id);
            }
            StateMessage::TabRemoved { tab_id } => {
                if !self.context.tracker.record_removal(tab_id) {
                    tracing::trace!(tab_id, "tiling: removed tab was not tracked");
                }
            }
            StateMessage::WindowFocusChanged => {
                if let Err(err) = self.context.refresh_focus(host).await {
                    tracing::warn!(error = %err, "tiling: failed to read focused window");
                }
            }
            StateMessage::DisplayChanged => {
                if let Err(err) = self.context.refresh_display(host).await {
                    tracing::warn!(error = %err, "tiling: failed to read displays");
                }
            }
            StateMessage::Split { request, respond_to } => {
                let history = self.context.history();
                let engine = ReflowEngine::new(
                    host,
                    self.context.display(),
                    self.context.new_tab_url(),
                );
                let result = engine.run(request, history).await.map_err(Into::into);
                if let Err(err) = &result {
                    tracing::warn!(command = %request, error = %err, "tiling: split failed");
                }
                let _ = respond_to.send(result);
            }
            StateMessage::Query { query, respond_to } => {
                let _ = respond_to.send(self.handle_query(query));
            }
            StateMessage::Shutdown => {}
        }
    }

    fn handle_query(&self, query: StateQuery) -> QueryResult {
        match query {
            StateQuery::History => QueryResult::History(self.context.history()),
            StateQuery::Display => QueryResult::Display(self.context.display().cloned()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_NEW_TAB_URL;
    use crate::modules::tiling::commands::SplitRequest;
    use crate::modules::tiling::host::{HostOpKind, HostSnapshot, MemoryHost};
    use crate::modules::tiling::recency::RecencyTracker;
    use crate::modules::tiling::state::{Bounds, Display, Tab, Window};

    fn host() -> Arc<MemoryHost> {
        let mut win = Window::new(1, Bounds::sized(800, 600));
        win.focused = true;
        win.tabs = vec![
            Tab::new(1, "https://a"),
            Tab { active: true, ..Tab::new(2, "https://b") },
        ];
        Arc::new(MemoryHost::from_snapshot(
            HostSnapshot::with_display(Display::new("main", 1000, 800)).window(win),
        ))
    }

    async fn spawn(host: &Arc<MemoryHost>) -> StateActorHandle {
        let context = TilingContext::new(RecencyTracker::without_pausing(), DEFAULT_NEW_TAB_URL);
        StateActor::spawn(Arc::clone(host), context).await
    }

    #[tokio::test]
    async fn test_actor_bootstraps_before_first_message() {
        let host = host();
        let handle = spawn(&host).await;

        assert_eq!(handle.history().await.unwrap(), vec![2]);
        assert_eq!(handle.display().await.unwrap().map(|d| d.id), Some("main".to_string()));
    }

    #[tokio::test]
    async fn test_bootstrap_captures_host_state_at_spawn() {
        let host = host();
        let handle = spawn(&host).await;

        // Selection changes after spawn are only seen through events.
        host.select_tab(1).unwrap();
        host.set_displays(vec![Display::new("external", 2560, 1440)]);

        assert_eq!(handle.history().await.unwrap(), vec![2]);
        assert_eq!(handle.display().await.unwrap().map(|d| d.id), Some("main".to_string()));
    }

    #[tokio::test]
    async fn test_bootstrap_failure_starts_empty() {
        let host = host();
        host.fail_next(HostOpKind::ListWindows);
        let handle = spawn(&host).await;

        assert!(handle.history().await.unwrap().is_empty());
        handle.tab_activated(1).await.unwrap();
        assert_eq!(handle.history().await.unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_events_update_history_in_order() {
        let host = host();
        let handle = spawn(&host).await;

        handle.tab_activated(1).await.unwrap();
        handle.tab_activated(7).await.unwrap();
        handle.tab_removed(7).await.unwrap();

        assert_eq!(handle.history().await.unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_window_focus_change_records_active_tab() {
        let host = host();
        let handle = spawn(&host).await;
        handle.tab_activated(1).await.unwrap();

        host.select_tab(2).unwrap();
        handle.window_focus_changed().await.unwrap();

        assert_eq!(handle.history().await.unwrap(), vec![2, 1]);
    }

    #[tokio::test]
    async fn test_display_change_replaces_display() {
        let host = host();
        let handle = spawn(&host).await;

        host.set_displays(vec![Display::new("external", 2560, 1440)]);
        handle.display_changed().await.unwrap();

        assert_eq!(handle.display().await.unwrap().map(|d| d.id), Some("external".to_string()));
    }

    #[tokio::test]
    async fn test_split_returns_report() {
        let host = host();
        let handle = spawn(&host).await;
        handle.tab_activated(1).await.unwrap();
        handle.tab_activated(2).await.unwrap();

        let report = handle.split(SplitRequest::from_count(2, false).unwrap()).await.unwrap();

        assert_eq!(report.created_windows.len(), 1);
        assert_eq!(report.donations.len(), 1);
        assert_eq!(host.windows().len(), 2);
    }

    #[tokio::test]
    async fn test_split_failure_keeps_actor_alive() {
        let host = host();
        let handle = spawn(&host).await;
        handle.history().await.unwrap();
        host.fail_next(HostOpKind::ListWindows);

        let err = handle.split(SplitRequest::from_count(1, false).unwrap()).await.unwrap_err();
        assert!(matches!(err, crate::error::TabsplitError::Reflow(_)));

        assert!(handle.split(SplitRequest::from_count(1, false).unwrap()).await.is_ok());
    }

    #[tokio::test]
    async fn test_shutdown_closes_channel() {
        let host = host();
        let handle = spawn(&host).await;

        handle.shutdown().await.unwrap();
        tokio::task::yield_now().await;

        assert!(handle.history().await.is_err());
    }
}
