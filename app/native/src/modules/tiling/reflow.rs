//! The window/tab reflow engine.
//!
//! A reflow takes the live window list and a target split count and drives the
//! host until exactly `target` windows are tiled side by side:
//!
//! ```text
//!             list_windows
//!                  │
//!     count < target │ count > target      count == target
//!        ┌─────────┴─────────┐──────────────────┐
//!        ▼                   ▼                  │
//!    GROWING             SHRINKING              │
//!  create window,      move non-blank tabs      │
//!  donate a tab,       to the previous window,  │
//!  refocus             remove, refocus,         │
//!        │             re-list windows          │
//!        └─────────┬─────────┘                  │
//!                  ▼                            │
//!              RETILING ◄───────────────────────┘
//!   re-list windows, place each one in its column
//!                  │
//!                  ▼
//!                DONE
//! ```
//!
//! Every host call is awaited before the next one is issued; later steps
//! depend on earlier ones having landed (a donor's successor must still be in
//! its original window when it is selected). The only concurrent calls are the
//! independent per-window placements of RETILING.
//!
//! A failed host call aborts the run. Nothing is retried and no stale snapshot
//! is reused: the next command starts again from a fresh window listing.

use std::fmt;

use futures::future::try_join_all;
use serde::Serialize;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use super::commands::SplitRequest;
use super::donors::{DonorCandidate, select_donors};
use super::error::HostError;
use super::host::Host;
use super::layout::{layout_columns, slot_rect};
use super::state::{
    Bounds, Display, TabId, TabUpdate, Window, WindowId, WindowUpdate,
};

// ============================================================================
// Phases
// ============================================================================

/// States of one reflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReflowPhase {
    /// Creating windows until the target count is reached.
    Growing,
    /// Folding windows into their predecessor until the target count is reached.
    Shrinking,
    /// Placing every window in its column.
    Retiling,
    /// Terminal.
    Done,
}

impl ReflowPhase {
    /// Picks the first phase from the current and target window counts.
    #[must_use]
    pub const fn entry(count: usize, target: usize) -> Self {
        if count < target {
            Self::Growing
        } else if count > target {
            Self::Shrinking
        } else {
            Self::Retiling
        }
    }

    /// Returns the phase that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Growing | Self::Shrinking => Self::Retiling,
            Self::Retiling | Self::Done => Self::Done,
        }
    }

    /// Returns the phase name as a static kebab-case string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Growing => "growing",
            Self::Shrinking => "shrinking",
            Self::Retiling => "retiling",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for ReflowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

// ============================================================================
// Report
// ============================================================================

/// A tab moved into a newly created window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub tab_id: TabId,
    pub from_window: WindowId,
    pub to_window: WindowId,
    /// Tab selected in `from_window` after the donor left.
    pub successor: Option<TabId>,
}

/// Final position of one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub window_id: WindowId,
    pub slot: usize,
    pub bounds: Bounds,
    pub focused: bool,
}

/// Phase list type alias. A run visits at most three phases plus `Done`.
pub type PhaseList = SmallVec<[ReflowPhase; 4]>;

/// What a reflow run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflowReport {
    /// Identifier of the run, also attached to its tracing span.
    pub run_id: Uuid,
    pub request: SplitRequest,
    pub phases: PhaseList,
    pub created_windows: Vec<WindowId>,
    pub removed_windows: Vec<WindowId>,
    pub donations: Vec<Donation>,
    pub placements: Vec<Placement>,
}

impl ReflowReport {
    fn new(request: SplitRequest) -> Self {
        Self {
            run_id: Uuid::now_v7(),
            request,
            phases: PhaseList::new(),
            created_windows: Vec::new(),
            removed_windows: Vec::new(),
            donations: Vec::new(),
            placements: Vec::new(),
        }
    }

    /// Returns `true` if the run created or removed any window.
    #[must_use]
    pub fn changed_window_count(&self) -> bool {
        !self.created_windows.is_empty() || !self.removed_windows.is_empty()
    }
}

// ============================================================================
// Errors
// ============================================================================

/// A host failure that aborted a reflow run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Reflow aborted {}: {source}", PhaseLabel(.phase))]
pub struct ReflowError {
    /// Phase that was running, `None` for the initial window listing.
    pub phase: Option<ReflowPhase>,
    /// The host failure.
    #[source]
    pub source: HostError,
}

impl ReflowError {
    fn at(phase: Option<ReflowPhase>) -> impl FnOnce(HostError) -> Self {
        move |source| Self { phase, source }
    }
}

/// Where a run was when it aborted, as it reads in [`ReflowError`] messages.
struct PhaseLabel<'a>(&'a Option<ReflowPhase>);

impl fmt::Display for PhaseLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(phase) => write!(f, "while {phase}"),
            None => f.write_str("reading windows"),
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Drives one reflow run against a host.
pub struct ReflowEngine<'a, H: Host> {
    host: &'a H,
    display: Option<&'a Display>,
    new_tab_url: &'a str,
}

impl<'a, H: Host> ReflowEngine<'a, H> {
    /// Creates an engine.
    ///
    /// `display` is the cached reference display; without one, window creation
    /// and placement are skipped. `new_tab_url` identifies blank tabs, which
    /// are dropped instead of migrated when a window is folded away.
    #[must_use]
    pub const fn new(host: &'a H, display: Option<&'a Display>, new_tab_url: &'a str) -> Self {
        Self { host, display, new_tab_url }
    }

    /// Runs the reflow to completion.
    ///
    /// `history` yields tab IDs newest-first and is only consulted when donors
    /// are needed.
    ///
    /// # Errors
    ///
    /// Returns a [`ReflowError`] naming the phase in which a host call failed.
    /// Mutations issued before the failure are not rolled back.
    pub async fn run(
        &self,
        request: SplitRequest,
        history: Vec<TabId>,
    ) -> Result<ReflowReport, ReflowError> {
        let mut report = ReflowReport::new(request);
        let span = tracing::info_span!(
            "reflow",
            run_id = %report.run_id,
            target = request.target_count(),
            use_empty_windows = request.use_empty_windows,
        );

        async move {
            let windows = self.host.list_windows().await.map_err(ReflowError::at(None))?;
            let mut phase = ReflowPhase::entry(windows.len(), request.target_count());
            tracing::debug!(count = windows.len(), %phase, "tiling: reflow starting");

            let mut windows = Some(windows);
            loop {
                report.phases.push(phase);
                let step = match phase {
                    ReflowPhase::Growing => {
                        let snapshot = windows.take().unwrap_or_default();
                        self.grow(&snapshot, request, history.as_slice(), &mut report).await
                    }
                    ReflowPhase::Shrinking => {
                        let snapshot = windows.take().unwrap_or_default();
                        self.shrink(snapshot, request, &mut report).await
                    }
                    ReflowPhase::Retiling => self.retile(request, &mut report).await,
                    ReflowPhase::Done => break,
                };
                step.map_err(ReflowError::at(Some(phase)))?;
                phase = phase.next();
            }

            tracing::info!(
                created = report.created_windows.len(),
                removed = report.removed_windows.len(),
                donated = report.donations.len(),
                "tiling: reflow complete"
            );
            Ok(report)
        }
        .instrument(span)
        .await
    }

    /// Creates windows until the target is reached, donating one tab to each
    /// while donors last.
    async fn grow(
        &self,
        windows: &[Window],
        request: SplitRequest,
        history: &[TabId],
        report: &mut ReflowReport,
    ) -> Result<(), HostError> {
        let Some(display) = self.display else {
            tracing::warn!("tiling: no display available, skipping window creation");
            return Ok(());
        };

        let target = request.target_count();
        let mut donors = if request.use_empty_windows {
            Vec::new()
        } else {
            select_donors(windows, target, history.iter().copied())
        };
        tracing::debug!(donors = donors.len(), "tiling: donor tabs selected");

        for slot in windows.len()..target {
            let bounds = slot_rect(display, request.target, slot).rounded();
            let created = self.host.create_window(bounds, true).await?;
            tracing::debug!(window_id = created.id, slot, "tiling: created window");
            report.created_windows.push(created.id);

            if let Some(donor) = donors.pop() {
                self.donate(&created, &donor).await?;
                report.donations.push(Donation {
                    tab_id: donor.tab.id,
                    from_window: donor.source_window,
                    to_window: created.id,
                    successor: donor.previous_tab_in_window.as_ref().map(|tab| tab.id),
                });
            }
        }

        Ok(())
    }

    /// Moves a donor tab into a freshly created window and drops that window's
    /// blank tab.
    async fn donate(&self, created: &Window, donor: &DonorCandidate) -> Result<(), HostError> {
        self.host.move_tabs(&[donor.tab.id], created.id).await?;

        if let Some(successor) = &donor.previous_tab_in_window {
            self.host.update_tab(successor.id, TabUpdate::activate()).await?;
        }
        if let Some(blank) = created.tabs.first() {
            self.host.remove_tab(blank.id).await?;
        }
        self.host.update_window(created.id, WindowUpdate::focus(true)).await?;

        tracing::debug!(
            tab_id = donor.tab.id,
            from = donor.source_window,
            to = created.id,
            "tiling: donated tab"
        );
        Ok(())
    }

    /// Folds the last window into its predecessor until the target is reached.
    async fn shrink(
        &self,
        mut windows: Vec<Window>,
        request: SplitRequest,
        report: &mut ReflowReport,
    ) -> Result<(), HostError> {
        let target = request.target_count();

        while windows.len() > target {
            let Some(shrunk) = windows.pop() else {
                break;
            };
            let Some(receiver) = windows.last() else {
                break;
            };

            let tab_ids: Vec<TabId> = shrunk
                .tabs
                .iter()
                .filter(|tab| !tab.is_blank(self.new_tab_url))
                .map(|tab| tab.id)
                .collect();
            let moved_all = !tab_ids.is_empty() && tab_ids.len() == shrunk.tab_count();

            if !tab_ids.is_empty() {
                self.host.move_tabs(&tab_ids, receiver.id).await?;
            }

            match self.host.remove_window(shrunk.id).await {
                // The host closes a window on its own once its last tab leaves.
                Err(HostError::WindowNotFound(_)) if moved_all => {
                    tracing::trace!(window_id = shrunk.id, "tiling: window already closed");
                }
                result => result?,
            }
            self.host.update_window(receiver.id, WindowUpdate::focus(true)).await?;

            tracing::debug!(
                window_id = shrunk.id,
                into = receiver.id,
                moved = tab_ids.len(),
                "tiling: removed window"
            );
            report.removed_windows.push(shrunk.id);

            windows = self.host.list_windows().await?;
        }

        Ok(())
    }

    /// Places every window in its column, preserving focus flags.
    async fn retile(
        &self,
        request: SplitRequest,
        report: &mut ReflowReport,
    ) -> Result<(), HostError> {
        let windows = self.host.list_windows().await?;

        let Some(display) = self.display else {
            tracing::warn!("tiling: no display available, skipping window placement");
            return Ok(());
        };

        let ids: Vec<WindowId> = windows.iter().map(|win| win.id).collect();
        let placements: Vec<Placement> = layout_columns(&ids, display, request.target)
            .into_iter()
            .zip(&windows)
            .enumerate()
            .map(|(slot, ((window_id, frame), win))| Placement {
                window_id,
                slot,
                bounds: frame.rounded(),
                focused: win.focused,
            })
            .collect();

        try_join_all(placements.iter().map(|placement| {
            self.host.update_window(
                placement.window_id,
                WindowUpdate::place(placement.bounds, placement.focused),
            )
        }))
        .await?;

        report.placements = placements;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_NEW_TAB_URL;
    use crate::modules::tiling::host::{HostOp, HostOpKind, HostSnapshot, MemoryHost};
    use crate::modules::tiling::state::Tab;

    fn window(id: WindowId, tabs: &[(TabId, &str, bool)]) -> Window {
        let mut win = Window::new(id, Bounds::new(100, 100, 500, 500));
        win.tabs = tabs
            .iter()
            .map(|&(tab_id, url, active)| Tab { active, ..Tab::new(tab_id, url) })
            .collect();
        win
    }

    fn display() -> Display { Display::new("main", 1200, 800) }

    fn request(target: usize, use_empty_windows: bool) -> SplitRequest {
        SplitRequest::from_count(target, use_empty_windows).unwrap()
    }

    async fn run(
        host: &MemoryHost,
        display: Option<&Display>,
        req: SplitRequest,
        history: Vec<TabId>,
    ) -> Result<ReflowReport, ReflowError> {
        ReflowEngine::new(host, display, DEFAULT_NEW_TAB_URL).run(req, history).await
    }

    #[test]
    fn test_entry_phase() {
        assert_eq!(ReflowPhase::entry(1, 3), ReflowPhase::Growing);
        assert_eq!(ReflowPhase::entry(3, 1), ReflowPhase::Shrinking);
        assert_eq!(ReflowPhase::entry(2, 2), ReflowPhase::Retiling);
    }

    #[test]
    fn test_phase_transitions_end_in_done() {
        assert_eq!(ReflowPhase::Growing.next(), ReflowPhase::Retiling);
        assert_eq!(ReflowPhase::Shrinking.next(), ReflowPhase::Retiling);
        assert_eq!(ReflowPhase::Retiling.next(), ReflowPhase::Done);
        assert_eq!(ReflowPhase::Done.next(), ReflowPhase::Done);
    }

    #[tokio::test]
    async fn test_equal_count_only_retiles() {
        let host = MemoryHost::from_snapshot(
            HostSnapshot::with_display(display())
                .window(window(1, &[(1, "https://a", true)]))
                .window(window(2, &[(2, "https://b", true)])),
        );

        let report = run(&host, Some(&display()), request(2, false), vec![]).await.unwrap();

        assert_eq!(report.phases.as_slice(), &[ReflowPhase::Retiling, ReflowPhase::Done]);
        assert!(!report.changed_window_count());
        assert!(host.ops().iter().all(|op| op.kind() == HostOpKind::UpdateWindow));
        assert_eq!(host.ops().len(), 2);
    }

    #[tokio::test]
    async fn test_grow_with_empty_windows_keeps_blank_tab() {
        let host = MemoryHost::from_snapshot(HostSnapshot::with_display(display()).window(
            window(1, &[(1, "https://a", false), (2, "https://b", true)]),
        ));

        let report = run(&host, Some(&display()), request(3, true), vec![2, 1]).await.unwrap();

        assert_eq!(report.created_windows.len(), 2);
        assert!(report.donations.is_empty());
        let windows = host.windows();
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0].tab_count(), 2);
        assert!(windows[1].tabs[0].is_blank(DEFAULT_NEW_TAB_URL));
        assert!(windows[2].tabs[0].is_blank(DEFAULT_NEW_TAB_URL));
    }

    #[tokio::test]
    async fn test_grow_without_donors_keeps_blank_tab() {
        let host = MemoryHost::from_snapshot(
            HostSnapshot::with_display(display()).window(window(1, &[(1, "https://a", true)])),
        );

        let report = run(&host, Some(&display()), request(2, false), vec![1]).await.unwrap();

        assert_eq!(report.created_windows.len(), 1);
        assert!(report.donations.is_empty());
        assert!(host.windows()[1].tabs[0].is_blank(DEFAULT_NEW_TAB_URL));
    }

    #[tokio::test]
    async fn test_donors_are_consumed_from_the_end() {
        let host = MemoryHost::from_snapshot(HostSnapshot::with_display(display()).window(
            window(1, &[(1, "https://a", false), (2, "https://b", false), (3, "https://c", true)]),
        ));

        let report = run(&host, Some(&display()), request(3, false), vec![3, 2, 1]).await.unwrap();

        let placed: Vec<(TabId, WindowId)> =
            report.donations.iter().map(|d| (d.tab_id, d.to_window)).collect();
        assert_eq!(placed, vec![(2, 2), (3, 3)]);

        let windows = host.windows();
        assert_eq!(windows[0].tabs.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1]);
        assert!(windows[0].tabs[0].active);
        assert_eq!(windows[1].tabs.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2]);
        assert_eq!(windows[2].tabs.iter().map(|t| t.id).collect::<Vec<_>>(), vec![3]);
    }

    #[tokio::test]
    async fn test_shrink_drops_blank_tabs() {
        let host = MemoryHost::from_snapshot(
            HostSnapshot::with_display(display())
                .window(window(1, &[(1, "https://a", true)]))
                .window(window(2, &[(2, DEFAULT_NEW_TAB_URL, false), (3, "https://c", true)])),
        );

        let report = run(&host, Some(&display()), request(1, false), vec![]).await.unwrap();

        assert_eq!(report.removed_windows, vec![2]);
        let windows = host.windows();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].tabs.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 3]);
        assert!(host.ops().contains(&HostOp::RemoveWindow { window_id: 2 }));
    }

    #[tokio::test]
    async fn test_shrink_tolerates_window_closed_by_host() {
        let host = MemoryHost::from_snapshot(
            HostSnapshot::with_display(display())
                .window(window(1, &[(1, "https://a", true)]))
                .window(window(2, &[(2, "https://b", true)])),
        );

        let report = run(&host, Some(&display()), request(1, false), vec![]).await.unwrap();

        assert_eq!(report.removed_windows, vec![2]);
        assert_eq!(host.windows().len(), 1);
        assert!(!host.ops().contains(&HostOp::RemoveWindow { window_id: 2 }));
    }

    #[tokio::test]
    async fn test_no_display_skips_creation_and_placement() {
        let host = MemoryHost::from_snapshot(
            HostSnapshot::default().window(window(1, &[(1, "https://a", true), (2, "https://b", false)])),
        );

        let report = run(&host, None, request(2, false), vec![1, 2]).await.unwrap();

        assert!(report.created_windows.is_empty());
        assert!(report.placements.is_empty());
        assert!(host.ops().is_empty());
    }

    #[tokio::test]
    async fn test_no_display_still_shrinks() {
        let host = MemoryHost::from_snapshot(
            HostSnapshot::default()
                .window(window(1, &[(1, "https://a", true)]))
                .window(window(2, &[(2, DEFAULT_NEW_TAB_URL, true)])),
        );

        let report = run(&host, None, request(1, false), vec![]).await.unwrap();

        assert_eq!(report.removed_windows, vec![2]);
        assert_eq!(host.windows().len(), 1);
    }

    #[tokio::test]
    async fn test_host_failure_aborts_with_phase() {
        let host = MemoryHost::from_snapshot(HostSnapshot::with_display(display()).window(
            window(1, &[(1, "https://a", false), (2, "https://b", true)]),
        ));
        host.fail_next(HostOpKind::MoveTabs);

        let err = run(&host, Some(&display()), request(2, false), vec![2, 1]).await.unwrap_err();

        assert_eq!(err.phase, Some(ReflowPhase::Growing));
        assert!(err.to_string().contains("growing"));
        // The window was created before the failure; nothing after it ran.
        let kinds: Vec<HostOpKind> = host.ops().iter().map(HostOp::kind).collect();
        assert_eq!(kinds, vec![HostOpKind::CreateWindow]);
    }

    #[tokio::test]
    async fn test_initial_listing_failure() {
        let host = MemoryHost::from_snapshot(HostSnapshot::with_display(display()));
        host.fail_next(HostOpKind::ListWindows);

        let err = run(&host, Some(&display()), request(1, false), vec![]).await.unwrap_err();

        assert_eq!(err.phase, None);
        assert!(host.ops().is_empty());
    }

    #[test]
    fn test_reflow_error_message_and_source() {
        let host_err = HostError::rejected("move_tabs", "injected failure");
        let err = ReflowError { phase: Some(ReflowPhase::Shrinking), source: host_err.clone() };
        assert_eq!(err.to_string(), format!("Reflow aborted while shrinking: {host_err}"));
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source, Some(host_err.to_string()));

        let listing = ReflowError { phase: None, source: HostError::WindowNotFound(4) };
        assert_eq!(listing.to_string(), "Reflow aborted reading windows: Window 4 not found");
    }

    #[tokio::test]
    async fn test_retile_preserves_focus_flags() {
        let mut focused = window(2, &[(2, "https://b", true)]);
        focused.focused = true;
        let host = MemoryHost::from_snapshot(
            HostSnapshot::with_display(display())
                .window(window(1, &[(1, "https://a", true)]))
                .window(focused),
        );

        let report = run(&host, Some(&display()), request(2, false), vec![]).await.unwrap();

        assert_eq!(report.placements[0].bounds, Bounds::new(0, 0, 600, 800));
        assert!(!report.placements[0].focused);
        assert_eq!(report.placements[1].bounds, Bounds::new(600, 0, 600, 800));
        assert!(report.placements[1].focused);
        assert!(host.windows()[1].focused);
    }
}
