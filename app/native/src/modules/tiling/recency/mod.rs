//! Tab recency tracking and deferred tab pausing.
//!
//! The [`RecencyTracker`] keeps the order in which tabs were last activated.
//! The reflow engine reads it newest-first to pick donor tabs, and the tracker
//! arms a [`PauseTimer`] on every tab that stops being the most recent one.
//! When a timer fires, [`pause_if_inactive`] asks the host for the tab's live
//! state and discards it only if it is still inactive.

mod pause;
mod tracker;

pub use pause::{
    DisabledPauseScheduler, HostPauseScheduler, PauseOutcome, PauseScheduler, PauseTimer,
    pause_if_inactive,
};
pub use tracker::RecencyTracker;
