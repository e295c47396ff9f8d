//! Column split layout - windows side by side across the display.
//!
//! For a display of width `W` split into `N` columns, slot `i` gets:
//! `width = W / N`, `left = width * i`, `top = 0`, `height = display height`.
//! Fractional values are kept until the frame is rounded for the host.

use std::num::NonZeroUsize;

use super::LayoutResult;
use crate::modules::tiling::state::{Display, Rect, WindowId};

/// Computes the frame of one column slot.
///
/// `slot` is not clamped: a slot at or beyond `splits` lands off the right
/// edge of the display, which is what the host is asked for.
#[allow(clippy::cast_precision_loss)] // Slot counts won't exceed f64 precision
#[must_use]
pub fn slot_rect(display: &Display, splits: NonZeroUsize, slot: usize) -> Rect {
    let width = f64::from(display.bounds.width) / splits.get() as f64;
    Rect::new(width * slot as f64, 0.0, width, f64::from(display.bounds.height))
}

/// Lays out the given windows as consecutive column slots starting at 0.
#[must_use]
pub fn layout_columns(
    window_ids: &[WindowId],
    display: &Display,
    splits: NonZeroUsize,
) -> LayoutResult {
    window_ids
        .iter()
        .enumerate()
        .map(|(slot, &id)| (id, slot_rect(display, splits, slot)))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
