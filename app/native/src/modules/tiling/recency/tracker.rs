//! Ordered tab activation history.
//!
//! Entries are kept oldest-first; the tail is the most recently activated tab.
//! Each tab appears at most once. Every entry except the tail may carry an
//! armed pause; the tail never does.

use super::pause::{DisabledPauseScheduler, PauseScheduler, PauseTimer};
use crate::modules::tiling::state::TabId;

/// One tracked tab and its armed pause, if any.
#[derive(Debug)]
struct RecencyEntry {
    tab_id: TabId,
    scheduled_pause: Option<PauseTimer>,
}

impl RecencyEntry {
    const fn new(tab_id: TabId) -> Self { Self { tab_id, scheduled_pause: None } }

    /// Cancels the armed pause, if any.
    fn cancel_pause(&mut self) {
        if let Some(timer) = self.scheduled_pause.take() {
            timer.cancel();
        }
    }
}

/// Tab activation history with per-tab deferred pauses.
pub struct RecencyTracker {
    entries: Vec<RecencyEntry>,
    scheduler: Box<dyn PauseScheduler>,
}

impl std::fmt::Debug for RecencyTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecencyTracker").field("entries", &self.entries).finish_non_exhaustive()
    }
}

impl Default for RecencyTracker {
    fn default() -> Self { Self::without_pausing() }
}

impl RecencyTracker {
    /// Creates an empty tracker that arms pauses through `scheduler`.
    #[must_use]
    pub fn new(scheduler: impl PauseScheduler + 'static) -> Self {
        Self {
            entries: Vec::new(),
            scheduler: Box::new(scheduler),
        }
    }

    /// Creates an empty tracker that never pauses tabs.
    #[must_use]
    pub fn without_pausing() -> Self { Self::new(DisabledPauseScheduler) }

    /// Records that a tab became active.
    ///
    /// Any existing entry for the tab is dropped (its pause canceled) and a
    /// fresh entry is appended at the tail. The tab that was the tail before
    /// the call gets a pause armed.
    pub fn record_activation(&mut self, tab_id: TabId) {
        let previous = self.newest();
        self.remove_entry(tab_id);
        self.entries.push(RecencyEntry::new(tab_id));

        let Some(previous) = previous.filter(|&prev| prev != tab_id) else {
            return;
        };
        let scheduler = &self.scheduler;
        if let Some(entry) = self.entries.iter_mut().find(|e| e.tab_id == previous) {
            entry.cancel_pause();
            entry.scheduled_pause = Some(scheduler.schedule(previous));
        }
    }

    /// Forgets a tab, canceling its pending pause.
    ///
    /// Returns `true` if the tab was tracked.
    pub fn record_removal(&mut self, tab_id: TabId) -> bool { self.remove_entry(tab_id) }

    /// Iterates tab IDs from most to least recently activated.
    ///
    /// The iterator borrows the tracker; call again for a fresh traversal.
    pub fn history_newest_first(&self) -> impl DoubleEndedIterator<Item = TabId> + Clone + '_ {
        self.entries.iter().rev().map(|entry| entry.tab_id)
    }

    /// Returns the most recently activated tab.
    #[must_use]
    pub fn newest(&self) -> Option<TabId> { self.entries.last().map(|entry| entry.tab_id) }

    /// Returns `true` if the tab is in the history.
    #[must_use]
    pub fn contains(&self, tab_id: TabId) -> bool { self.entries.iter().any(|e| e.tab_id == tab_id) }

    /// Returns `true` if the tab has a pause armed that has not fired yet.
    #[must_use]
    pub fn has_pending_pause(&self, tab_id: TabId) -> bool {
        self.entries
            .iter()
            .find(|e| e.tab_id == tab_id)
            .and_then(|e| e.scheduled_pause.as_ref())
            .is_some_and(PauseTimer::is_pending)
    }

    /// Number of tracked tabs.
    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    /// Returns `true` if no tab is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Forgets every tab, canceling all pending pauses.
    pub fn clear(&mut self) {
        for entry in &mut self.entries {
            entry.cancel_pause();
        }
        self.entries.clear();
    }

    fn remove_entry(&mut self, tab_id: TabId) -> bool {
        let Some(pos) = self.entries.iter().position(|e| e.tab_id == tab_id) else {
            return false;
        };
        let mut entry = self.entries.remove(pos);
        entry.cancel_pause();
        true
    }
}

impl Drop for RecencyTracker {
    fn drop(&mut self) { self.clear(); }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    /// Records every arm and cancel so tests can check the timer invariants.
    #[derive(Clone, Default)]
    struct RecordingScheduler {
        events: Arc<Mutex<Vec<(&'static str, TabId)>>>,
    }

    impl RecordingScheduler {
        fn events(&self) -> Vec<(&'static str, TabId)> { self.events.lock().clone() }

        fn live(&self, tab_id: TabId) -> usize {
            let events = self.events();
            let armed = events.iter().filter(|&&(k, t)| k == "arm" && t == tab_id).count();
            let canceled = events.iter().filter(|&&(k, t)| k == "cancel" && t == tab_id).count();
            armed - canceled
        }
    }

    impl PauseScheduler for RecordingScheduler {
        fn schedule(&self, tab_id: TabId) -> PauseTimer {
            self.events.lock().push(("arm", tab_id));
            let events = Arc::clone(&self.events);
            PauseTimer::new(move || events.lock().push(("cancel", tab_id)))
        }
    }

    fn history(tracker: &RecencyTracker) -> Vec<TabId> { tracker.history_newest_first().collect() }

    #[test]
    fn test_activation_order_newest_first() {
        let mut tracker = RecencyTracker::without_pausing();
        tracker.record_activation(1);
        tracker.record_activation(2);
        tracker.record_activation(3);

        assert_eq!(history(&tracker), vec![3, 2, 1]);
        assert_eq!(tracker.newest(), Some(3));
    }

    #[test]
    fn test_reactivation_moves_to_front_without_duplicates() {
        let mut tracker = RecencyTracker::without_pausing();
        tracker.record_activation(10);
        tracker.record_activation(20);
        tracker.record_activation(10);

        assert_eq!(history(&tracker), vec![10, 20]);
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_removal_is_idempotent() {
        let mut tracker = RecencyTracker::without_pausing();
        tracker.record_activation(1);
        tracker.record_activation(2);

        assert!(tracker.record_removal(1));
        assert!(!tracker.record_removal(1));
        assert!(!tracker.record_removal(99));
        assert_eq!(history(&tracker), vec![2]);
    }

    #[test]
    fn test_history_is_restartable() {
        let mut tracker = RecencyTracker::without_pausing();
        tracker.record_activation(1);
        tracker.record_activation(2);

        let first: Vec<_> = tracker.history_newest_first().collect();
        let second: Vec<_> = tracker.history_newest_first().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_previous_newest_gets_pause() {
        let scheduler = RecordingScheduler::default();
        let mut tracker = RecencyTracker::new(scheduler.clone());

        tracker.record_activation(1);
        assert!(scheduler.events().is_empty());

        tracker.record_activation(2);
        assert_eq!(scheduler.events(), vec![("arm", 1)]);
        assert!(tracker.has_pending_pause(1));
        assert!(!tracker.has_pending_pause(2));
    }

    #[test]
    fn test_reactivation_cancels_pause() {
        let scheduler = RecordingScheduler::default();
        let mut tracker = RecencyTracker::new(scheduler.clone());

        tracker.record_activation(1);
        tracker.record_activation(2);
        tracker.record_activation(1);

        assert_eq!(scheduler.events(), vec![("arm", 1), ("cancel", 1), ("arm", 2)]);
        assert_eq!(scheduler.live(1), 0);
        assert_eq!(scheduler.live(2), 1);
        assert!(!tracker.has_pending_pause(1));
    }

    #[test]
    fn test_reactivating_newest_arms_nothing() {
        let scheduler = RecordingScheduler::default();
        let mut tracker = RecencyTracker::new(scheduler.clone());

        tracker.record_activation(1);
        tracker.record_activation(2);
        tracker.record_activation(2);

        assert_eq!(scheduler.events(), vec![("arm", 1)]);
        assert_eq!(history(&tracker), vec![2, 1]);
    }

    #[test]
    fn test_removal_cancels_pause() {
        let scheduler = RecordingScheduler::default();
        let mut tracker = RecencyTracker::new(scheduler.clone());

        tracker.record_activation(1);
        tracker.record_activation(2);
        tracker.record_removal(1);

        assert_eq!(scheduler.live(1), 0);
        assert!(!tracker.contains(1));
    }

    #[test]
    fn test_removing_newest_then_activating_arms_remaining_tail_once() {
        let scheduler = RecordingScheduler::default();
        let mut tracker = RecencyTracker::new(scheduler.clone());

        tracker.record_activation(1);
        tracker.record_activation(2);
        tracker.record_removal(2);
        tracker.record_activation(3);

        // Tab 1 had a pause from when 2 took over; it is re-armed, never doubled.
        assert_eq!(scheduler.live(1), 1);
        assert_eq!(history(&tracker), vec![3, 1]);
    }

    #[test]
    fn test_at_most_one_live_timer_per_tab() {
        let scheduler = RecordingScheduler::default();
        let mut tracker = RecencyTracker::new(scheduler.clone());

        for tab_id in [1, 2, 3, 1, 2, 3, 2, 1, 1, 3] {
            tracker.record_activation(tab_id);
        }

        for tab_id in [1, 2, 3] {
            assert!(scheduler.live(tab_id) <= 1, "tab {tab_id} has more than one live timer");
        }
        assert_eq!(scheduler.live(3), 0);
    }

    #[test]
    fn test_drop_cancels_all_pauses() {
        let scheduler = RecordingScheduler::default();
        {
            let mut tracker = RecencyTracker::new(scheduler.clone());
            tracker.record_activation(1);
            tracker.record_activation(2);
            tracker.record_activation(3);
        }

        assert_eq!(scheduler.live(1), 0);
        assert_eq!(scheduler.live(2), 0);
    }
}
