//! Sync status rendering.

use colored::Colorize;
use ws_core::{SyncResult, SyncStatus, SyncSummary};

/// One status line per repository:
///
/// ```text
/// ✓ WidgetAPI        main ↑1 ↓2 [lock changed] (+2 branches rebased)
/// ```
pub fn sync_line(result: &SyncResult) -> String {
    let icon = match result.status {
        SyncStatus::Synced => "✓".green(),
        SyncStatus::Skipped => "-".yellow(),
        SyncStatus::Failed => "✗".red(),
    };

    let mut line = format!("{icon} {:<20} {}", result.name.bold(), result.branch.cyan());
    if result.ahead > 0 {
        line.push_str(&format!(" {}", format!("↑{}", result.ahead).yellow()));
    }
    if result.behind > 0 {
        line.push_str(&format!(" {}", format!("↓{}", result.behind).yellow()));
    }
    if result.dirty {
        line.push_str(&format!(" {}", "[dirty]".red()));
    }
    if result.lockfile_changed {
        line.push_str(&format!(" {}", "[lock changed]".magenta()));
    }
    if !result.message.is_empty() {
        line.push_str(&format!(" ({})", result.message));
    }

    if !result.dirty_status.is_empty() {
        for status_line in result.dirty_status.lines() {
            line.push_str(&format!("\n    {status_line}"));
        }
    }
    line
}

/// The aggregate line printed after a full sync.
pub fn summary_line(summary: &SyncSummary) -> String {
    let failed = if summary.failed > 0 {
        format!("{} failed", summary.failed).red().to_string()
    } else {
        format!("{} failed", summary.failed)
    };
    format!(
        "{} synced, {} skipped, {}",
        summary.synced, summary.skipped, failed
    )
}
