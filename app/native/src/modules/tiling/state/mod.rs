//! State module for the tiling core.
//!
//! This module contains:
//! - Core types (`Window`, `Tab`, `Display`, `Rect`, etc.)
//! - The `TilingContext` owned by the state actor

mod context;
mod types;

pub use context::TilingContext;
pub use types::{
    Bounds, Display, Rect, Tab, TabId, TabUpdate, Window, WindowId, WindowUpdate,
    focused_active_tab,
};
