//! Deferred "pause this tab" actions.
//!
//! A pause is armed when a tab stops being the most recently activated one and
//! fires after a fixed inactivity threshold. The fire-time check is the source
//! of truth: the host is asked for the tab's live state and the tab is only
//! discarded if it is neither active nor already discarded. A timer that loses
//! the race against a reactivation is therefore harmless.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::AbortHandle;

use crate::modules::tiling::error::HostResult;
use crate::modules::tiling::host::Host;
use crate::modules::tiling::state::TabId;

// ============================================================================
// PauseTimer
// ============================================================================

/// Cancelable handle to one armed pause.
///
/// Dropping the handle does not cancel the pause; call [`PauseTimer::cancel`].
pub struct PauseTimer {
    kind: TimerKind,
}

enum TimerKind {
    Inert,
    Task(AbortHandle),
    Callback(Box<dyn FnOnce() + Send + Sync>),
}

impl PauseTimer {
    /// Creates a timer that runs `cancel` when canceled.
    #[must_use]
    pub fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self { kind: TimerKind::Callback(Box::new(cancel)) }
    }

    /// Creates a timer backed by a spawned tokio task.
    #[must_use]
    pub const fn from_task(handle: AbortHandle) -> Self { Self { kind: TimerKind::Task(handle) } }

    /// Creates a timer with nothing to cancel.
    #[must_use]
    pub const fn inert() -> Self { Self { kind: TimerKind::Inert } }

    /// Returns `true` if canceling this timer has no effect.
    #[must_use]
    pub const fn is_inert(&self) -> bool { matches!(self.kind, TimerKind::Inert) }

    /// Returns `true` while the pause has yet to fire.
    ///
    /// A task-backed timer stops being pending once its task has finished,
    /// whatever the fire-time check decided. Callback timers cannot observe
    /// firing and stay pending until canceled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        match &self.kind {
            TimerKind::Inert => false,
            TimerKind::Task(handle) => !handle.is_finished(),
            TimerKind::Callback(_) => true,
        }
    }

    /// Cancels the pending pause.
    pub fn cancel(self) {
        match self.kind {
            TimerKind::Inert => {}
            TimerKind::Task(handle) => handle.abort(),
            TimerKind::Callback(cancel) => cancel(),
        }
    }
}

impl fmt::Debug for PauseTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PauseTimer")
            .field("inert", &self.is_inert())
            .field("pending", &self.is_pending())
            .finish()
    }
}

// ============================================================================
// Schedulers
// ============================================================================

/// Arms deferred pauses keyed by tab.
pub trait PauseScheduler: Send + Sync {
    /// Arms a pause for the given tab and returns its cancel handle.
    fn schedule(&self, tab_id: TabId) -> PauseTimer;
}

/// Scheduler used when pausing is turned off in the configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledPauseScheduler;

impl PauseScheduler for DisabledPauseScheduler {
    fn schedule(&self, _tab_id: TabId) -> PauseTimer { PauseTimer::inert() }
}

/// Scheduler that sleeps on the tokio timer and then runs
/// [`pause_if_inactive`] against the host.
///
/// Must be used from within a tokio runtime.
pub struct HostPauseScheduler<H: Host> {
    host: Arc<H>,
    delay: Duration,
}

impl<H: Host> HostPauseScheduler<H> {
    /// Creates a scheduler that pauses tabs after `delay` of inactivity.
    #[must_use]
    pub const fn new(host: Arc<H>, delay: Duration) -> Self { Self { host, delay } }

    /// Returns the inactivity threshold.
    #[must_use]
    pub const fn delay(&self) -> Duration { self.delay }
}

impl<H: Host> PauseScheduler for HostPauseScheduler<H> {
    fn schedule(&self, tab_id: TabId) -> PauseTimer {
        let host = Arc::clone(&self.host);
        let delay = self.delay;

        tracing::trace!(tab_id, delay_secs = delay.as_secs(), "tiling: arming pause");
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match pause_if_inactive(host.as_ref(), tab_id).await {
                Ok(PauseOutcome::Discarded) => {
                    tracing::info!(tab_id, "tiling: paused inactive tab");
                }
                Ok(outcome) => {
                    tracing::debug!(tab_id, ?outcome, "tiling: pause skipped");
                }
                Err(err) if err.is_not_found() => {
                    tracing::debug!(tab_id, "tiling: pause skipped, tab is gone");
                }
                Err(err) => {
                    tracing::warn!(tab_id, error = %err, "tiling: failed to pause tab");
                }
            }
        });

        PauseTimer::from_task(task.abort_handle())
    }
}

// ============================================================================
// Fire-time check
// ============================================================================

/// What a fired pause ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOutcome {
    /// The tab was discarded.
    Discarded,
    /// The tab is active again; left alone.
    SkippedActive,
    /// The tab was already discarded; left alone.
    SkippedDiscarded,
}

/// Discards the tab unless its live state says it is active or already
/// discarded.
///
/// # Errors
///
/// Returns the host error if the tab cannot be read or discarded.
pub async fn pause_if_inactive<H: Host>(host: &H, tab_id: TabId) -> HostResult<PauseOutcome> {
    let tab = host.get_tab(tab_id).await?;
    if tab.active {
        return Ok(PauseOutcome::SkippedActive);
    }
    if tab.discarded {
        return Ok(PauseOutcome::SkippedDiscarded);
    }

    host.discard_tab(tab_id).await?;
    Ok(PauseOutcome::Discarded)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::modules::tiling::host::{HostOp, HostSnapshot, MemoryHost};
    use crate::modules::tiling::state::{Bounds, Tab, Window};

    fn host() -> Arc<MemoryHost> {
        let mut win = Window::new(1, Bounds::sized(800, 600));
        win.tabs = vec![
            Tab::new(1, "https://a"),
            Tab { active: true, ..Tab::new(2, "https://b") },
            Tab { discarded: true, ..Tab::new(3, "https://c") },
        ];
        Arc::new(MemoryHost::from_snapshot(HostSnapshot::default().window(win)))
    }

    #[test]
    fn test_timer_cancel_runs_callback_once() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);
        let timer = PauseTimer::new(move || flag.store(true, Ordering::SeqCst));

        assert!(!timer.is_inert());
        assert!(timer.is_pending());
        timer.cancel();
        assert!(fired.load(Ordering::SeqCst));
    }

    #[test]
    fn test_inert_timer() {
        let timer = DisabledPauseScheduler.schedule(1);
        assert!(timer.is_inert());
        assert!(!timer.is_pending());
        timer.cancel();
    }

    #[tokio::test]
    async fn test_pause_discards_inactive_tab() {
        let host = host();
        let outcome = pause_if_inactive(host.as_ref(), 1).await.unwrap();

        assert_eq!(outcome, PauseOutcome::Discarded);
        assert_eq!(host.ops(), vec![HostOp::DiscardTab { tab_id: 1 }]);
    }

    #[tokio::test]
    async fn test_pause_skips_active_tab() {
        let host = host();
        let outcome = pause_if_inactive(host.as_ref(), 2).await.unwrap();

        assert_eq!(outcome, PauseOutcome::SkippedActive);
        assert!(host.ops().is_empty());
    }

    #[tokio::test]
    async fn test_pause_skips_discarded_tab() {
        let host = host();
        let outcome = pause_if_inactive(host.as_ref(), 3).await.unwrap();

        assert_eq!(outcome, PauseOutcome::SkippedDiscarded);
        assert!(host.ops().is_empty());
    }

    #[tokio::test]
    async fn test_pause_missing_tab_is_not_found() {
        let host = host();
        let err = pause_if_inactive(host.as_ref(), 42).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test(start_paused = true)]
    async fn test_host_scheduler_fires_after_delay() {
        let host = host();
        let scheduler = HostPauseScheduler::new(Arc::clone(&host), Duration::from_secs(3600));
        let timer = scheduler.schedule(1);

        tokio::time::sleep(Duration::from_secs(3599)).await;
        assert!(host.ops().is_empty());
        assert!(timer.is_pending());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(host.ops(), vec![HostOp::DiscardTab { tab_id: 1 }]);
        assert!(!timer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_host_scheduler_cancel_prevents_discard() {
        let host = host();
        let scheduler = HostPauseScheduler::new(Arc::clone(&host), Duration::from_secs(60));
        let timer = scheduler.schedule(1);

        tokio::time::sleep(Duration::from_secs(30)).await;
        timer.cancel();
        tokio::time::sleep(Duration::from_secs(120)).await;

        assert!(host.ops().is_empty());
        assert!(!host.get_tab(1).await.unwrap().discarded);
    }
}
