//! Application feature modules for Tabsplit.
//!
//! - [`tiling`] - Window splitting, tab redistribution and tab pausing

pub mod tiling;
