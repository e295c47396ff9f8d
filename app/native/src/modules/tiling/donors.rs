//! Donor tab selection for newly created windows.
//!
//! When the split count grows, each new window is populated with a tab taken
//! from an existing window. Donors are picked by walking the activation
//! history newest-first: the most recently used tab of any window that can
//! spare one is donated, and the next most recently used tab still left in
//! that window is designated to take over its selection.
//!
//! Selection works on the snapshot taken before any window is created; moving
//! tabs changes tab counts, so it is never recomputed mid-run.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::state::{Tab, TabId, Window, WindowId};

/// A tab proposed for migration into a new window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorCandidate {
    /// The tab to move.
    pub tab: Tab,

    /// Window the tab currently lives in.
    pub source_window: WindowId,

    /// Tab to select in the source window once the donor has left.
    ///
    /// `None` when no older tab of the same window is in the history; the
    /// host then keeps whatever selection it picks on its own.
    pub previous_tab_in_window: Option<Tab>,
}

/// Chooses up to `target - windows.len()` donor tabs.
///
/// `history` must yield tab IDs from most to least recently activated. Tabs in
/// the history that no longer belong to any window are ignored. A window is
/// never left with fewer than one tab, and a tab chosen as a donor is never
/// designated as another donor's successor.
///
/// Candidates are returned in selection order (most recent first).
#[must_use]
pub fn select_donors(
    windows: &[Window],
    target: usize,
    history: impl IntoIterator<Item = TabId>,
) -> Vec<DonorCandidate> {
    let mut missing = target.saturating_sub(windows.len());
    if missing == 0 {
        return Vec::new();
    }

    let tabs: HashMap<TabId, (WindowId, &Tab)> = windows
        .iter()
        .flat_map(|win| win.tabs.iter().map(move |tab| (tab.id, (win.id, tab))))
        .collect();
    let mut remaining: HashMap<WindowId, usize> =
        windows.iter().map(|win| (win.id, win.tab_count())).collect();

    let history: Vec<TabId> = history.into_iter().collect();

    // First pass: pick donors.
    let mut chosen: Vec<usize> = Vec::new();
    let mut donor_ids: HashSet<TabId> = HashSet::new();
    for (idx, tab_id) in history.iter().enumerate() {
        let Some(&(window_id, _)) = tabs.get(tab_id) else {
            continue;
        };
        if donor_ids.contains(tab_id) {
            continue;
        }
        let Some(count) = remaining.get_mut(&window_id) else {
            continue;
        };
        if *count <= 1 {
            continue;
        }

        *count -= 1;
        missing -= 1;
        chosen.push(idx);
        donor_ids.insert(*tab_id);

        if missing == 0 {
            break;
        }
    }

    // Second pass: designate successors among the tabs that stay behind.
    chosen
        .into_iter()
        .filter_map(|idx| {
            let (window_id, tab) = tabs.get(&history[idx])?;
            let previous_tab_in_window = history[idx + 1..]
                .iter()
                .filter(|id| !donor_ids.contains(*id))
                .find_map(|id| tabs.get(id).filter(|(wid, _)| wid == window_id))
                .map(|(_, prev)| Tab::clone(prev));

            Some(DonorCandidate {
                tab: Tab::clone(tab),
                source_window: *window_id,
                previous_tab_in_window,
            })
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
