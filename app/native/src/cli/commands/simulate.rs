//! Simulate CLI command.
//!
//! Runs one split command against a host snapshot loaded into the in-memory
//! host, going through the same actor, reflow engine and recency tracker a
//! live browser integration uses.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::cli::output::{format_bool, print_highlighted_json, truncate};
use crate::config::{TabsplitConfig, expand_path, get_config};
use crate::error::TabsplitError;
use crate::modules::tiling::{
    self, HostSnapshot, MemoryHost, ReflowReport, SplitRequest, TabId, Window,
};

/// Maximum URL width in the windows table.
const URL_COLUMN_WIDTH: usize = 48;

/// Arguments of the `simulate` command.
#[derive(Args, Debug)]
#[command(after_long_help = r#"Examples:
  tabsplit simulate --snapshot host.json --command group-by-3
  tabsplit simulate --snapshot host.json --command new-group-by-2 --json
  tabsplit simulate --snapshot host.json --command group-by-2 --history 4,1,7 --output after.json"#)]
pub struct SimulateArgs {
    /// Host snapshot (JSON or JSONC) with `displays`, `windows` and `minimized`.
    #[arg(long, short, value_name = "FILE")]
    pub snapshot: PathBuf,

    /// Command identifier, e.g. `group-by-3` or `new-group-by-2`.
    #[arg(long, value_name = "ID")]
    pub command: String,

    /// Tab activations to replay before the command, oldest first.
    #[arg(long, value_name = "IDS", value_delimiter = ',')]
    pub history: Vec<TabId>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,

    /// Write the host state after the run to this file.
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// JSON output of a simulation.
#[derive(Serialize)]
struct SimulationOutput<'a> {
    report: &'a ReflowReport,
    windows: &'a [Window],
}

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be read, the command identifier is
/// rejected, or the reflow run is aborted.
pub fn execute(args: &SimulateArgs) -> Result<(), TabsplitError> {
    let config = get_config();
    let request = config.parse_command(&args.command)?;
    let snapshot = read_snapshot(&args.snapshot)?;

    let host = Arc::new(
        MemoryHost::from_snapshot(snapshot).with_new_tab_url(config.new_tab_url.clone()),
    );

    let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build()?;
    let report =
        runtime.block_on(run_simulation(Arc::clone(&host), config, request, &args.history))?;

    let windows = host.windows();
    if args.json {
        let output = SimulationOutput { report: &report, windows: &windows };
        print_highlighted_json(&serde_json::to_value(&output)?);
    } else {
        print_report(&report, &windows);
    }

    if let Some(path) = &args.output {
        let path = expand_path(path);
        fs::write(&path, serde_json::to_string_pretty(&host.snapshot())?)?;
        if !args.json {
            println!("\nHost state written to {}", path.display());
        }
    }

    Ok(())
}

/// Reads a host snapshot, allowing comments.
///
/// # Errors
///
/// Returns [`TabsplitError::Io`] if the file cannot be opened or
/// [`TabsplitError::Snapshot`] if it is not a valid snapshot.
pub fn read_snapshot(path: &Path) -> Result<HostSnapshot, TabsplitError> {
    let path = expand_path(path);
    let file = fs::File::open(&path)
        .map_err(|err| TabsplitError::Io(format!("{}: {err}", path.display())))?;
    let reader = json_comments::StripComments::new(file);
    Ok(serde_json::from_reader(reader)?)
}

/// Starts the core against the host, replays the history and runs the split.
async fn run_simulation(
    host: Arc<MemoryHost>,
    config: &TabsplitConfig,
    request: SplitRequest,
    history: &[TabId],
) -> Result<ReflowReport, TabsplitError> {
    let handle = tiling::start(host, config).await;

    for &tab_id in history {
        handle.tab_activated(tab_id).await?;
    }
    let result = handle.split(request).await;

    if let Err(err) = handle.shutdown().await {
        tracing::debug!(error = %err, "actor already stopped");
    }
    result
}

/// Prints a human readable summary of a run.
fn print_report(report: &ReflowReport, windows: &[Window]) {
    #[derive(Tabled)]
    struct DonationRow {
        #[tabled(rename = "Tab")]
        tab: TabId,
        #[tabled(rename = "From")]
        from: u32,
        #[tabled(rename = "To")]
        to: u32,
        #[tabled(rename = "Selected after")]
        successor: String,
    }

    #[derive(Tabled)]
    struct WindowRow {
        #[tabled(rename = "Slot")]
        slot: usize,
        #[tabled(rename = "ID")]
        id: u32,
        #[tabled(rename = "Frame")]
        frame: String,
        #[tabled(rename = "Tabs")]
        tabs: usize,
        #[tabled(rename = "Active tab")]
        active: String,
        #[tabled(rename = "Focused")]
        focused: String,
    }

    let phases: Vec<&str> = report.phases.iter().map(|phase| phase.as_str()).collect();
    println!("{} {}", "Command:".bold(), report.request);
    println!("{} {}", "Run:".bold(), report.run_id);
    println!("{} {}", "Phases:".bold(), phases.join(" → "));
    if !report.created_windows.is_empty() {
        println!("{} {:?}", "Created windows:".bold(), report.created_windows);
    }
    if !report.removed_windows.is_empty() {
        println!("{} {:?}", "Removed windows:".bold(), report.removed_windows);
    }

    if !report.donations.is_empty() {
        let rows: Vec<DonationRow> = report
            .donations
            .iter()
            .map(|donation| DonationRow {
                tab: donation.tab_id,
                from: donation.from_window,
                to: donation.to_window,
                successor: donation
                    .successor
                    .map_or_else(|| "-".dimmed().to_string(), |id| id.to_string()),
            })
            .collect();

        println!("\n{}", "Donated tabs".bold());
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(0..3)).with(Alignment::right()))
            .to_string();
        println!("{table}");
    }

    let rows: Vec<WindowRow> = windows
        .iter()
        .enumerate()
        .map(|(slot, win)| WindowRow {
            slot,
            id: win.id,
            frame: format!(
                "{},{} {}x{}",
                win.bounds.left, win.bounds.top, win.bounds.width, win.bounds.height
            ),
            tabs: win.tab_count(),
            active: win
                .active_tab()
                .map_or_else(String::new, |tab| truncate(&tab.url, URL_COLUMN_WIDTH)),
            focused: format_bool(win.focused),
        })
        .collect();

    println!("\n{}", "Windows".bold());
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(0..2)).with(Alignment::right()))
        .with(Modify::new(Columns::new(3..4)).with(Alignment::right()))
        .with(Modify::new(Columns::new(5..6)).with(Alignment::center()))
        .to_string();
    println!("{table}");
}
