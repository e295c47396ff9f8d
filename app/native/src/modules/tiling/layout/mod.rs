//! Layout calculation for tiled windows.
//!
//! Windows are laid out as equal-width columns spanning the full height of the
//! reference display. Slot 0 is the leftmost column; the reflow engine assigns
//! slots in ascending window order.

mod split;

pub use split::{layout_columns, slot_rect};

use super::state::{Rect, WindowId};

/// Result of a layout calculation: `(window_id, frame)` pairs in slot order.
pub type LayoutResult = Vec<(WindowId, Rect)>;
