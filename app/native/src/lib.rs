//! Tabsplit - tiles browser windows across the display and redistributes their tabs.
//!
//! The library holds the tiling core (recency tracking, tab pausing, layout,
//! donor selection and the reflow state machine) behind a host trait, plus the
//! configuration and CLI layers built on it.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod modules;
pub mod schema;

pub use error::TabsplitError;
pub use modules::tiling;
