//! Host windowing system boundary.
//!
//! The [`Host`] trait is the whole surface the core depends on: window and tab
//! enumeration, the create/update/move/remove primitives, and tab discarding.
//! Every operation is asynchronous; the core awaits each one before issuing
//! the next, except where a step is explicitly independent (the final
//! per-window placement pass).
//!
//! [`MemoryHost`] is an in-process implementation used by the tests and by the
//! `simulate` CLI command.

mod memory;

use std::future::Future;

pub use memory::{HostOp, HostOpKind, HostSnapshot, MemoryHost};

use super::error::HostResult;
use super::state::{
    Bounds, Display, Tab, TabId, TabUpdate, Window, WindowId, WindowUpdate,
};

/// Operations the core needs from the host windowing system.
///
/// Implementations must be shareable across tasks: pause timers call
/// [`Host::get_tab`] and [`Host::discard_tab`] from their own tokio task.
pub trait Host: Send + Sync + 'static {
    /// Lists normal, non-minimized windows with their tabs populated.
    fn list_windows(&self) -> impl Future<Output = HostResult<Vec<Window>>> + Send;

    /// Lists displays; the core only uses the first entry.
    fn list_displays(&self) -> impl Future<Output = HostResult<Vec<Display>>> + Send;

    /// Creates a window at the given bounds, holding one default blank tab.
    fn create_window(
        &self,
        bounds: Bounds,
        focused: bool,
    ) -> impl Future<Output = HostResult<Window>> + Send;

    /// Applies a partial geometry/focus update to a window.
    fn update_window(
        &self,
        window_id: WindowId,
        update: WindowUpdate,
    ) -> impl Future<Output = HostResult<()>> + Send;

    /// Closes a window and every tab it still holds.
    fn remove_window(&self, window_id: WindowId) -> impl Future<Output = HostResult<()>> + Send;

    /// Moves tabs, in order, to the end of the destination window's tab strip.
    fn move_tabs(
        &self,
        tab_ids: &[TabId],
        destination: WindowId,
    ) -> impl Future<Output = HostResult<()>> + Send;

    /// Applies a partial update to a tab.
    fn update_tab(
        &self,
        tab_id: TabId,
        update: TabUpdate,
    ) -> impl Future<Output = HostResult<()>> + Send;

    /// Closes a tab.
    fn remove_tab(&self, tab_id: TabId) -> impl Future<Output = HostResult<()>> + Send;

    /// Reads the live state of a single tab.
    fn get_tab(&self, tab_id: TabId) -> impl Future<Output = HostResult<Tab>> + Send;

    /// Suspends a tab's in-memory state without closing it.
    fn discard_tab(&self, tab_id: TabId) -> impl Future<Output = HostResult<()>> + Send;
}
