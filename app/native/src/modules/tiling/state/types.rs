//! Core state types for the window/tab reflow engine.
//!
//! These types mirror what the host windowing system reports:
//! - `Display` represents the reference display used for tiling
//! - `Window` represents a normal, non-minimized top-level window
//! - `Tab` represents a browser tab living inside exactly one window
//!
//! Relations:
//! - `Tab.window_id` → `Window.id`
//! - `Window.tabs` → ordered list of `Tab` (host tab strip order)
//!
//! The host owns every window and tab. The core only reads these snapshots
//! and asks the host for mutations.

use serde::{Deserialize, Serialize};

/// Host-assigned tab identifier.
pub type TabId = u32;

/// Host-assigned window identifier.
pub type WindowId = u32;

// ============================================================================
// Geometry Types
// ============================================================================

/// A rectangle with fractional position and size.
///
/// Layout math is done in `f64`; the result is rounded to [`Bounds`] only when
/// it is handed to the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Rounds every coordinate to the nearest integer pixel.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn rounded(&self) -> Bounds {
        Bounds {
            left: self.x.round() as i32,
            top: self.y.round() as i32,
            width: self.width.round() as i32,
            height: self.height.round() as i32,
        }
    }
}

/// Integer window geometry, as accepted and reported by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    /// Create new bounds.
    #[must_use]
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self { left, top, width, height }
    }

    /// Create bounds of the given size anchored at the origin.
    #[must_use]
    pub const fn sized(width: i32, height: i32) -> Self { Self::new(0, 0, width, height) }
}

// ============================================================================
// Display Type
// ============================================================================

/// A physical display as enumerated by the host.
///
/// Only the first enumerated display is ever used for tiling.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Display {
    /// Host display identifier.
    #[serde(default)]
    pub id: String,

    /// Full display bounds.
    #[serde(flatten)]
    pub bounds: Bounds,
}

impl Display {
    /// Create a display with the given size.
    #[must_use]
    pub fn new(id: impl Into<String>, width: i32, height: i32) -> Self {
        Self {
            id: id.into(),
            bounds: Bounds::sized(width, height),
        }
    }
}

// ============================================================================
// Tab Type
// ============================================================================

/// A browser tab.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    /// Host tab identifier.
    pub id: TabId,

    /// Window currently holding this tab.
    #[serde(default)]
    pub window_id: WindowId,

    /// Is this the selected tab of its window?
    #[serde(default)]
    pub active: bool,

    /// Has the host suspended this tab's in-memory state?
    #[serde(default)]
    pub discarded: bool,

    /// Current URL.
    #[serde(default)]
    pub url: String,
}

impl Tab {
    /// Create an inactive, loaded tab.
    #[must_use]
    pub fn new(id: TabId, url: impl Into<String>) -> Self {
        Self {
            id,
            window_id: 0,
            active: false,
            discarded: false,
            url: url.into(),
        }
    }

    /// Returns `true` if this tab shows the given blank "new tab" page.
    #[must_use]
    pub fn is_blank(&self, new_tab_url: &str) -> bool { self.url == new_tab_url }
}

// ============================================================================
// Window Type
// ============================================================================

/// A normal top-level window with its tabs populated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    /// Host window identifier.
    pub id: WindowId,

    /// Current geometry.
    #[serde(flatten)]
    pub bounds: Bounds,

    /// Does this window have keyboard focus?
    #[serde(default)]
    pub focused: bool,

    /// Tabs in tab strip order.
    #[serde(default)]
    pub tabs: Vec<Tab>,
}

impl Window {
    /// Create an unfocused window without tabs.
    #[must_use]
    pub const fn new(id: WindowId, bounds: Bounds) -> Self {
        Self {
            id,
            bounds,
            focused: false,
            tabs: Vec::new(),
        }
    }

    /// Get the selected tab of this window, if any.
    #[must_use]
    pub fn active_tab(&self) -> Option<&Tab> { self.tabs.iter().find(|tab| tab.active) }

    /// Check if a tab is in this window.
    #[must_use]
    pub fn contains_tab(&self, tab_id: TabId) -> bool {
        self.tabs.iter().any(|tab| tab.id == tab_id)
    }

    /// Get the number of tabs in this window.
    #[must_use]
    pub fn tab_count(&self) -> usize { self.tabs.len() }
}

/// Returns the selected tab of the focused window.
#[must_use]
pub fn focused_active_tab(windows: &[Window]) -> Option<&Tab> {
    windows.iter().find(|win| win.focused).and_then(Window::active_tab)
}

// ============================================================================
// Mutation Requests
// ============================================================================

/// Partial window update; `None` fields are left untouched by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowUpdate {
    pub bounds: Option<Bounds>,
    pub focused: Option<bool>,
}

impl WindowUpdate {
    /// An update that only changes focus.
    #[must_use]
    pub const fn focus(focused: bool) -> Self {
        Self {
            bounds: None,
            focused: Some(focused),
        }
    }

    /// An update that moves the window and sets its focus flag.
    #[must_use]
    pub const fn place(bounds: Bounds, focused: bool) -> Self {
        Self {
            bounds: Some(bounds),
            focused: Some(focused),
        }
    }
}

/// Partial tab update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabUpdate {
    pub active: Option<bool>,
}

impl TabUpdate {
    /// An update that selects the tab in its window.
    #[must_use]
    pub const fn activate() -> Self { Self { active: Some(true) } }
}

// ============================================================================
// Tests
// ============================================================================
