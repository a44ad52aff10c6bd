//! Replaying captured entry batches from newline-delimited JSON
//!
//! Each non-empty line holds one [`EntryBatch`]. Lines copied from a page's
//! console may keep the [`ENTRY_PREFIX`] marker the in-page bridge prints:
//!
//! ```text
//! # captured from /checkout
//! __VITALS_ENTRY__:{"entryType":"paint","entries":[{"name":"first-contentful-paint","startTime":612}]}
//! {"entryType":"layout-shift","entries":[{"value":0.05,"hadRecentInput":false}]}
//! ```

use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use super::{EntryBatch, ManualTimeline};

/// Marker the in-page bridge prefixes to each console line
pub const ENTRY_PREFIX: &str = "__VITALS_ENTRY__:";

/// Outcome of a replay run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Batches parsed and emitted to the timeline
    pub delivered: usize,
    /// Malformed lines
    pub skipped: usize,
}

/// Parse one replay line
///
/// Returns `None` for blank lines and `#` comments.
pub fn parse_line(line: &str) -> Option<anyhow::Result<EntryBatch>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let payload = line.strip_prefix(ENTRY_PREFIX).unwrap_or(line).trim_start();
    Some(serde_json::from_str(payload).context("Failed to parse entry batch"))
}

/// Emit every batch read from `reader` into `timeline`
///
/// Malformed lines are logged and counted, never fatal. Only a read error on
/// the underlying input ends the replay early.
pub async fn replay_lines<R>(reader: R, timeline: &ManualTimeline) -> anyhow::Result<ReplayStats>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut stats = ReplayStats::default();
    let mut line_no = 0usize;

    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read replay input")?
    {
        line_no += 1;
        match parse_line(&line) {
            None => {}
            Some(Ok(batch)) => {
                let observers = timeline.emit(batch);
                debug!(line = line_no, observers, "replayed batch");
                stats.delivered += 1;
            }
            Some(Err(e)) => {
                warn!(line = line_no, error = %format!("{:#}", e), "skipping malformed entry line");
                stats.skipped += 1;
            }
        }
    }

    Ok(stats)
}
