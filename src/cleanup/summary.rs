//! Final report.

use std::fmt::Write;
use std::time::Duration;

use super::batch::CleanupTotals;

/// Render the summary block printed at the end of a run.
pub fn render_summary(totals: &CleanupTotals, elapsed: Duration) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "\n🏁 CLEAN-UP SUMMARY 🏁");
    let _ = writeln!(out, "----------------------");
    let _ = writeln!(
        out,
        "✅ Deleted {} direct message conversations",
        totals.dm_count
    );
    let _ = writeln!(out, "✅ Left {} groups/supergroups", totals.group_count);
    let _ = writeln!(out, "✅ Left {} channels", totals.channel_count);
    if totals.failed() > 0 {
        let _ = writeln!(
            out,
            "⚠️ Failed: {} DMs, {} groups/channels",
            totals.dm_failed, totals.group_failed
        );
    }
    let _ = writeln!(out, "⏱️ Total time: {:.2} seconds", elapsed.as_secs_f64());
    let _ = write!(out, "----------------------");

    out
}
