//! Folding performance entries into the vitals snapshot
//!
//! [`VitalsCollector`] is the single writer of a page's [`VitalsSnapshot`].
//! It runs inside the collector task (see [`task`]) and receives every batch
//! through one update channel, so each metric slot has exactly one writer no
//! matter how many threads the host delivers from.
//!
//! # Update rules
//!
//! | Category | Metric | Rule |
//! |---|---|---|
//! | `largest-contentful-paint` | LCP | last entry of the batch wins |
//! | `first-input` | FID | `processingStart - startTime`, last entry wins |
//! | `layout-shift` | CLS | sum of shifts without recent input, 3 decimals |
//! | `paint` | FCP | `first-contentful-paint` start time |
//! | `navigation` | TTFB | `responseStart - requestStart` |

mod sink;
pub(crate) mod task;

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::metrics::{MetricKind, MetricSample, VitalsSnapshot};
use crate::timeline::{
    EntryBatch, FirstInputEntry, LargestContentfulPaintEntry, LayoutShiftEntry, NavigationEntry,
    PaintEntry,
};

pub use sink::{EntrySink, Subscription};

const FIRST_CONTENTFUL_PAINT: &str = "first-contentful-paint";
const UNKNOWN_ELEMENT: &str = "unknown";

/// Owns the snapshot and the running CLS total for one page load
#[derive(Debug, Default)]
pub struct VitalsCollector {
    snapshot: VitalsSnapshot,
    cls_total: f64,
}

impl VitalsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &VitalsSnapshot {
        &self.snapshot
    }

    /// Apply a batch stamped with the current time
    ///
    /// Returns `true` if any metric slot changed.
    pub fn apply(&mut self, batch: &EntryBatch) -> bool {
        self.apply_at(batch, Utc::now())
    }

    /// Apply a batch, stamping recorded samples with `now`
    pub fn apply_at(&mut self, batch: &EntryBatch, now: DateTime<Utc>) -> bool {
        let changed = match batch {
            EntryBatch::LargestContentfulPaint(entries) => self.record_lcp(entries, now),
            EntryBatch::FirstInput(entries) => self.record_fid(entries, now),
            EntryBatch::LayoutShift(entries) => self.record_cls(entries, now),
            EntryBatch::Paint(entries) => self.record_fcp(entries, now),
            EntryBatch::Navigation(entries) => self.record_ttfb(entries, now),
        };
        trace!(
            category = %batch.category(),
            entries = batch.len(),
            changed,
            "applied entry batch"
        );
        changed
    }

    // The platform re-reports LCP as larger candidates appear; only the
    // latest valid candidate of a batch is current.
    fn record_lcp(&mut self, entries: &[LargestContentfulPaintEntry], now: DateTime<Utc>) -> bool {
        let Some(entry) = entries.iter().rev().find(|e| e.start_time.is_finite()) else {
            if !entries.is_empty() {
                debug!(entries = entries.len(), "dropping LCP batch without a valid start time");
            }
            return false;
        };

        let element = entry
            .element
            .as_ref()
            .and_then(|e| e.tag_name.clone())
            .filter(|tag| !tag.is_empty())
            .unwrap_or_else(|| UNKNOWN_ELEMENT.to_string());
        let size = entry.size.filter(|s| s.is_finite()).unwrap_or(0.0);

        let sample =
            MetricSample::new(round_half_up(entry.start_time), now).with_element(element, size);
        self.set(MetricKind::Lcp, sample);
        true
    }

    fn record_fid(&mut self, entries: &[FirstInputEntry], now: DateTime<Utc>) -> bool {
        let mut changed = false;
        for entry in entries {
            let delay = entry.processing_start - entry.start_time;
            if !delay.is_finite() {
                debug!(event = %entry.name, "dropping first-input entry with invalid timing");
                continue;
            }
            let sample =
                MetricSample::new(round_half_up(delay), now).with_event_name(entry.name.clone());
            self.set(MetricKind::Fid, sample);
            changed = true;
        }
        changed
    }

    fn record_cls(&mut self, entries: &[LayoutShiftEntry], now: DateTime<Utc>) -> bool {
        let mut changed = false;
        for entry in entries {
            if entry.had_recent_input {
                continue;
            }
            // Negative or non-finite shifts would break CLS monotonicity.
            if !entry.value.is_finite() || entry.value < 0.0 {
                debug!(value = entry.value, "dropping invalid layout-shift value");
                continue;
            }
            self.cls_total += entry.value;
            let value = round_half_up(self.cls_total * 1000.0) / 1000.0;
            self.set(MetricKind::Cls, MetricSample::new(value, now));
            changed = true;
        }
        changed
    }

    fn record_fcp(&mut self, entries: &[PaintEntry], now: DateTime<Utc>) -> bool {
        let mut changed = false;
        for entry in entries
            .iter()
            .filter(|e| e.name == FIRST_CONTENTFUL_PAINT && e.start_time.is_finite())
        {
            self.set(MetricKind::Fcp, MetricSample::new(round_half_up(entry.start_time), now));
            changed = true;
        }
        changed
    }

    fn record_ttfb(&mut self, entries: &[NavigationEntry], now: DateTime<Utc>) -> bool {
        let mut changed = false;
        for entry in entries.iter().filter(|e| e.entry_type == "navigation") {
            let ttfb = entry.response_start - entry.request_start;
            if !ttfb.is_finite() {
                continue;
            }
            self.set(MetricKind::Ttfb, MetricSample::new(round_half_up(ttfb), now));
            changed = true;
        }
        changed
    }

    fn set(&mut self, kind: MetricKind, sample: MetricSample) {
        debug!(metric = %kind, value = sample.value, "recorded sample");
        *self.snapshot.slot_mut(kind) = Some(sample);
    }
}

/// Round to the nearest integer, with ties going toward positive infinity
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
