//! Tab tiling core.
//!
//! Splits a browser's windows into `N` side-by-side columns on the primary
//! display and redistributes tabs so each new column starts with a recently
//! used tab. Tabs left inactive for a configurable period are paused.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Host Event Sources                       │
//! │  (tab activated/removed, window focus, display changes)     │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │ StateActorHandle
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     State Actor                             │
//! │  - Owns the TilingContext (recency history, display)        │
//! │  - Processes events and split commands sequentially         │
//! └──────────────┬──────────────────────────────┬───────────────┘
//!                │ split command                │ tab deactivated
//!                ▼                              ▼
//! ┌──────────────────────────────┐  ┌───────────────────────────┐
//! │        Reflow Engine         │  │     Pause Scheduler       │
//! │  grow / shrink / retile      │  │  tokio timer per tab,     │
//! │  donor selection, layout     │  │  discard if still idle    │
//! └──────────────┬───────────────┘  └─────────────┬─────────────┘
//!                │            Host trait          │
//!                └───────────────┬────────────────┘
//!                                ▼
//!                  browser windowing system
//! ```

pub mod actor;
pub mod commands;
pub mod donors;
pub mod error;
pub mod host;
pub mod init;
pub mod layout;
pub mod recency;
pub mod reflow;
pub mod state;

// Re-export commonly used types
pub use actor::{ActorError, StateActor, StateActorHandle, StateMessage, StateQuery};
pub use commands::{CommandError, SplitRequest};
pub use donors::{DonorCandidate, select_donors};
pub use error::{HostError, HostResult};
pub use host::{Host, HostOp, HostOpKind, HostSnapshot, MemoryHost};
pub use init::{build_tracker, start};
pub use layout::{LayoutResult, layout_columns, slot_rect};
pub use recency::{PauseOutcome, PauseScheduler, PauseTimer, RecencyTracker, pause_if_inactive};
pub use reflow::{Donation, Placement, ReflowEngine, ReflowError, ReflowPhase, ReflowReport};
pub use state::{
    Bounds, Display, Rect, Tab, TabId, TabUpdate, TilingContext, Window, WindowId,
    WindowUpdate,
};
