//! In-memory host windowing system.
//!
//! `MemoryHost` keeps windows, tabs and displays in a mutex-guarded state and
//! implements [`Host`] over it with the same observable behavior the browser
//! host has:
//!
//! - A created window holds one active blank tab.
//! - When the active tab leaves a window (moved or closed), the window's last
//!   remaining tab becomes active.
//! - A window left without tabs is closed.
//! - Focusing a window unfocuses every other window.
//! - The active tab cannot be discarded.
//!
//! Every mutation is appended to an operation log so callers can assert on
//! the exact sequence a reflow run produced. Reads are not logged.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::Host;
use crate::config::DEFAULT_NEW_TAB_URL;
use crate::modules::tiling::error::{HostError, HostResult};
use crate::modules::tiling::state::{
    Bounds, Display, Tab, TabId, TabUpdate, Window, WindowId, WindowUpdate,
};

// ============================================================================
// Snapshot
// ============================================================================

/// Serializable picture of the host: displays, windows and minimized windows.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostSnapshot {
    /// Displays in enumeration order.
    pub displays: Vec<Display>,

    /// Windows in creation order, tabs populated.
    pub windows: Vec<Window>,

    /// IDs of windows that are minimized (hidden from `list_windows`).
    pub minimized: Vec<WindowId>,
}

impl HostSnapshot {
    /// Creates a snapshot with a single display and no windows.
    #[must_use]
    pub fn with_display(display: Display) -> Self {
        Self {
            displays: vec![display],
            ..Self::default()
        }
    }

    /// Adds a window to the snapshot.
    #[must_use]
    pub fn window(mut self, window: Window) -> Self {
        self.windows.push(window);
        self
    }
}

// ============================================================================
// Operation Log
// ============================================================================

/// A mutation applied to the in-memory host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum HostOp {
    CreateWindow {
        window_id: WindowId,
        bounds: Bounds,
        focused: bool,
    },
    UpdateWindow {
        window_id: WindowId,
        update: WindowUpdate,
    },
    RemoveWindow {
        window_id: WindowId,
    },
    MoveTabs {
        tab_ids: Vec<TabId>,
        destination: WindowId,
    },
    UpdateTab {
        tab_id: TabId,
        update: TabUpdate,
    },
    RemoveTab {
        tab_id: TabId,
    },
    DiscardTab {
        tab_id: TabId,
    },
}

impl HostOp {
    /// Returns the kind of this operation.
    #[must_use]
    pub const fn kind(&self) -> HostOpKind {
        match self {
            Self::CreateWindow { .. } => HostOpKind::CreateWindow,
            Self::UpdateWindow { .. } => HostOpKind::UpdateWindow,
            Self::RemoveWindow { .. } => HostOpKind::RemoveWindow,
            Self::MoveTabs { .. } => HostOpKind::MoveTabs,
            Self::UpdateTab { .. } => HostOpKind::UpdateTab,
            Self::RemoveTab { .. } => HostOpKind::RemoveTab,
            Self::DiscardTab { .. } => HostOpKind::DiscardTab,
        }
    }
}

/// Kinds of host operations, reads included.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostOpKind {
    ListWindows,
    ListDisplays,
    CreateWindow,
    UpdateWindow,
    RemoveWindow,
    MoveTabs,
    UpdateTab,
    RemoveTab,
    GetTab,
    DiscardTab,
}

impl HostOpKind {
    /// Returns the operation name as a static snake-case string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ListWindows => "list_windows",
            Self::ListDisplays => "list_displays",
            Self::CreateWindow => "create_window",
            Self::UpdateWindow => "update_window",
            Self::RemoveWindow => "remove_window",
            Self::MoveTabs => "move_tabs",
            Self::UpdateTab => "update_tab",
            Self::RemoveTab => "remove_tab",
            Self::GetTab => "get_tab",
            Self::DiscardTab => "discard_tab",
        }
    }
}

// ============================================================================
// State
// ============================================================================

#[derive(Debug)]
struct HostWindow {
    window: Window,
    minimized: bool,
}

#[derive(Debug)]
struct HostState {
    displays: Vec<Display>,
    windows: Vec<HostWindow>,
    next_window_id: WindowId,
    next_tab_id: TabId,
    new_tab_url: String,
    log: Vec<HostOp>,
    failures: Vec<HostOpKind>,
}

impl HostState {
    /// Consumes an injected failure for the given operation, if one is armed.
    fn check_failure(&mut self, kind: HostOpKind) -> HostResult<()> {
        if let Some(pos) = self.failures.iter().position(|&k| k == kind) {
            self.failures.remove(pos);
            return Err(HostError::rejected(kind.as_str(), "injected failure"));
        }
        Ok(())
    }

    fn window_index(&self, window_id: WindowId) -> HostResult<usize> {
        self.windows
            .iter()
            .position(|w| w.window.id == window_id)
            .ok_or(HostError::WindowNotFound(window_id))
    }

    fn locate_tab(&self, tab_id: TabId) -> HostResult<(usize, usize)> {
        self.windows
            .iter()
            .enumerate()
            .find_map(|(wi, w)| {
                w.window.tabs.iter().position(|t| t.id == tab_id).map(|ti| (wi, ti))
            })
            .ok_or(HostError::TabNotFound(tab_id))
    }

    /// Detaches a tab from its window, handing the selection to the last
    /// remaining tab if the detached tab was active.
    fn take_tab(&mut self, tab_id: TabId) -> HostResult<Tab> {
        let (wi, ti) = self.locate_tab(tab_id)?;
        let tabs = &mut self.windows[wi].window.tabs;
        let tab = tabs.remove(ti);
        if tab.active
            && let Some(last) = tabs.last_mut()
        {
            last.active = true;
        }
        Ok(tab)
    }

    fn prune_empty_windows(&mut self) {
        self.windows.retain(|w| !w.window.tabs.is_empty());
    }

    fn set_focus(&mut self, window_id: WindowId) {
        for entry in &mut self.windows {
            entry.window.focused = entry.window.id == window_id;
        }
    }
}

// ============================================================================
// MemoryHost
// ============================================================================

/// In-process [`Host`] implementation.
#[derive(Debug)]
pub struct MemoryHost {
    state: Mutex<HostState>,
}

impl Default for MemoryHost {
    fn default() -> Self { Self::from_snapshot(HostSnapshot::default()) }
}

impl MemoryHost {
    /// Creates a host with no displays and no windows.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Creates a host holding the given snapshot.
    ///
    /// Tab `window_id` fields are normalized to the window that holds them and
    /// at most one window keeps its focus flag.
    #[must_use]
    pub fn from_snapshot(snapshot: HostSnapshot) -> Self {
        let HostSnapshot { displays, windows, minimized } = snapshot;

        let mut focus_taken = false;
        let windows: Vec<HostWindow> = windows
            .into_iter()
            .map(|mut window| {
                for tab in &mut window.tabs {
                    tab.window_id = window.id;
                }
                if window.focused {
                    window.focused = !focus_taken;
                    focus_taken = true;
                }
                HostWindow {
                    minimized: minimized.contains(&window.id),
                    window,
                }
            })
            .collect();

        let next_window_id = windows.iter().map(|w| w.window.id).max().unwrap_or(0) + 1;
        let next_tab_id = windows
            .iter()
            .flat_map(|w| w.window.tabs.iter().map(|t| t.id))
            .max()
            .unwrap_or(0)
            + 1;

        Self {
            state: Mutex::new(HostState {
                displays,
                windows,
                next_window_id,
                next_tab_id,
                new_tab_url: DEFAULT_NEW_TAB_URL.to_string(),
                log: Vec::new(),
                failures: Vec::new(),
            }),
        }
    }

    /// Sets the URL given to the blank tab of newly created windows.
    #[must_use]
    pub fn with_new_tab_url(self, url: impl Into<String>) -> Self {
        self.state.lock().new_tab_url = url.into();
        self
    }

    /// Returns the current state as a snapshot.
    #[must_use]
    pub fn snapshot(&self) -> HostSnapshot {
        let state = self.state.lock();
        HostSnapshot {
            displays: state.displays.clone(),
            windows: state.windows.iter().map(|w| w.window.clone()).collect(),
            minimized: state
                .windows
                .iter()
                .filter(|w| w.minimized)
                .map(|w| w.window.id)
                .collect(),
        }
    }

    /// Returns the visible windows without going through the async surface.
    #[must_use]
    pub fn windows(&self) -> Vec<Window> {
        self.state
            .lock()
            .windows
            .iter()
            .filter(|w| !w.minimized)
            .map(|w| w.window.clone())
            .collect()
    }

    /// Returns the mutations applied so far, in order.
    #[must_use]
    pub fn ops(&self) -> Vec<HostOp> { self.state.lock().log.clone() }

    /// Clears the operation log.
    pub fn clear_ops(&self) { self.state.lock().log.clear(); }

    /// Makes the next call of the given kind fail with a rejection.
    pub fn fail_next(&self, kind: HostOpKind) { self.state.lock().failures.push(kind); }

    /// Replaces the enumerated displays.
    pub fn set_displays(&self, displays: Vec<Display>) { self.state.lock().displays = displays; }

    /// Marks a window as minimized or restored.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::WindowNotFound`] if the window does not exist.
    pub fn set_minimized(&self, window_id: WindowId, minimized: bool) -> HostResult<()> {
        let mut state = self.state.lock();
        let idx = state.window_index(window_id)?;
        state.windows[idx].minimized = minimized;
        Ok(())
    }

    /// Selects a tab and focuses its window, as a user click would.
    ///
    /// Not logged: this simulates user input, not a core request.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::TabNotFound`] if the tab does not exist.
    pub fn select_tab(&self, tab_id: TabId) -> HostResult<()> {
        let mut state = self.state.lock();
        let (wi, _) = state.locate_tab(tab_id)?;
        let window_id = state.windows[wi].window.id;
        for tab in &mut state.windows[wi].window.tabs {
            tab.active = tab.id == tab_id;
        }
        state.set_focus(window_id);
        Ok(())
    }
}

impl Host for MemoryHost {
    async fn list_windows(&self) -> HostResult<Vec<Window>> {
        self.state.lock().check_failure(HostOpKind::ListWindows)?;
        Ok(self.windows())
    }

    async fn list_displays(&self) -> HostResult<Vec<Display>> {
        let mut state = self.state.lock();
        state.check_failure(HostOpKind::ListDisplays)?;
        Ok(state.displays.clone())
    }

    async fn create_window(&self, bounds: Bounds, focused: bool) -> HostResult<Window> {
        let mut state = self.state.lock();
        state.check_failure(HostOpKind::CreateWindow)?;

        let window_id = state.next_window_id;
        let tab_id = state.next_tab_id;
        state.next_window_id += 1;
        state.next_tab_id += 1;

        let mut window = Window::new(window_id, bounds);
        window.tabs.push(Tab {
            window_id,
            active: true,
            ..Tab::new(tab_id, state.new_tab_url.clone())
        });
        state.windows.push(HostWindow { window, minimized: false });
        if focused {
            state.set_focus(window_id);
        }
        state.log.push(HostOp::CreateWindow { window_id, bounds, focused });

        let idx = state.window_index(window_id)?;
        Ok(state.windows[idx].window.clone())
    }

    async fn update_window(&self, window_id: WindowId, update: WindowUpdate) -> HostResult<()> {
        let mut state = self.state.lock();
        state.check_failure(HostOpKind::UpdateWindow)?;

        let idx = state.window_index(window_id)?;
        if let Some(bounds) = update.bounds {
            state.windows[idx].window.bounds = bounds;
        }
        match update.focused {
            Some(true) => {
                state.windows[idx].minimized = false;
                state.set_focus(window_id);
            }
            Some(false) => state.windows[idx].window.focused = false,
            None => {}
        }
        state.log.push(HostOp::UpdateWindow { window_id, update });
        Ok(())
    }

    async fn remove_window(&self, window_id: WindowId) -> HostResult<()> {
        let mut state = self.state.lock();
        state.check_failure(HostOpKind::RemoveWindow)?;

        let idx = state.window_index(window_id)?;
        state.windows.remove(idx);
        state.log.push(HostOp::RemoveWindow { window_id });
        Ok(())
    }

    async fn move_tabs(&self, tab_ids: &[TabId], destination: WindowId) -> HostResult<()> {
        let mut state = self.state.lock();
        state.check_failure(HostOpKind::MoveTabs)?;

        // Validate everything up front so a failed move leaves no partial state.
        state.window_index(destination)?;
        for &tab_id in tab_ids {
            state.locate_tab(tab_id)?;
        }

        let mut moved = Vec::with_capacity(tab_ids.len());
        for &tab_id in tab_ids {
            let mut tab = state.take_tab(tab_id)?;
            tab.window_id = destination;
            tab.active = false;
            moved.push(tab);
        }

        let idx = state.window_index(destination)?;
        let tabs = &mut state.windows[idx].window.tabs;
        let last_moved = moved.last().map(|t| t.id);
        tabs.extend(moved);
        if !tabs.iter().any(|t| t.active)
            && let Some(tab) = tabs.iter_mut().find(|t| Some(t.id) == last_moved)
        {
            tab.active = true;
        }

        state.prune_empty_windows();
        state.log.push(HostOp::MoveTabs { tab_ids: tab_ids.to_vec(), destination });
        Ok(())
    }

    async fn update_tab(&self, tab_id: TabId, update: TabUpdate) -> HostResult<()> {
        let mut state = self.state.lock();
        state.check_failure(HostOpKind::UpdateTab)?;

        let (wi, ti) = state.locate_tab(tab_id)?;
        match update.active {
            Some(true) => {
                for tab in &mut state.windows[wi].window.tabs {
                    tab.active = tab.id == tab_id;
                }
                state.windows[wi].window.tabs[ti].discarded = false;
            }
            Some(false) => state.windows[wi].window.tabs[ti].active = false,
            None => {}
        }
        state.log.push(HostOp::UpdateTab { tab_id, update });
        Ok(())
    }

    async fn remove_tab(&self, tab_id: TabId) -> HostResult<()> {
        let mut state = self.state.lock();
        state.check_failure(HostOpKind::RemoveTab)?;

        state.take_tab(tab_id)?;
        state.prune_empty_windows();
        state.log.push(HostOp::RemoveTab { tab_id });
        Ok(())
    }

    async fn get_tab(&self, tab_id: TabId) -> HostResult<Tab> {
        let mut state = self.state.lock();
        state.check_failure(HostOpKind::GetTab)?;

        let (wi, ti) = state.locate_tab(tab_id)?;
        Ok(state.windows[wi].window.tabs[ti].clone())
    }

    async fn discard_tab(&self, tab_id: TabId) -> HostResult<()> {
        let mut state = self.state.lock();
        state.check_failure(HostOpKind::DiscardTab)?;

        let (wi, ti) = state.locate_tab(tab_id)?;
        let tab = &mut state.windows[wi].window.tabs[ti];
        if tab.active {
            return Err(HostError::rejected("discard_tab", "cannot discard the active tab"));
        }
        tab.discarded = true;
        state.log.push(HostOp::DiscardTab { tab_id });
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
