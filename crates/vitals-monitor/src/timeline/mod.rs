//! Host performance timeline: entry types and the observation seam
//!
//! The monitor never talks to a browser directly. A host implements
//! [`PerformanceTimeline`] and forwards platform performance entries to the
//! [`EntrySink`](crate::collector::EntrySink) it receives for each category it
//! supports.
//!
//! Entries mirror the platform's JSON shape (camelCase field names), so a
//! batch captured in a page can be replayed verbatim:
//!
//! ```text
//! {"entryType":"layout-shift","entries":[{"value":0.05,"hadRecentInput":false}]}
//! ```
//!
//! A timing that is missing or `null` decodes as NaN, so one incomplete entry
//! is dropped by the collector without losing the rest of its batch.
//!
//! Two hosts ship with the crate:
//! - [`ManualTimeline`]: in-process fan-out, used by tests and the replay tool
//! - [`replay`]: newline-delimited JSON batches read from any async reader

pub mod manual;
pub mod replay;

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::collector::EntrySink;

pub use manual::ManualTimeline;
pub use replay::{parse_line, replay_lines, ReplayStats, ENTRY_PREFIX};

/// Platform performance-entry categories the collector subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryCategory {
    /// Largest render candidates (feeds LCP)
    LargestContentfulPaint,
    /// First user input (feeds FID)
    FirstInput,
    /// Layout instability (feeds CLS)
    LayoutShift,
    /// Paint timing (feeds FCP)
    Paint,
    /// Navigation timing (feeds TTFB)
    Navigation,
}

impl EntryCategory {
    /// All categories in subscription order
    pub const ALL: [EntryCategory; 5] = [
        EntryCategory::LargestContentfulPaint,
        EntryCategory::FirstInput,
        EntryCategory::LayoutShift,
        EntryCategory::Paint,
        EntryCategory::Navigation,
    ];

    /// Platform entry type string
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryCategory::LargestContentfulPaint => "largest-contentful-paint",
            EntryCategory::FirstInput => "first-input",
            EntryCategory::LayoutShift => "layout-shift",
            EntryCategory::Paint => "paint",
            EntryCategory::Navigation => "navigation",
        }
    }
}

impl fmt::Display for EntryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element attribution of a largest-contentful-paint entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementInfo {
    #[serde(default)]
    pub tag_name: Option<String>,
}

/// A largest render candidate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LargestContentfulPaintEntry {
    #[serde(default = "missing_timing", deserialize_with = "timing_or_missing")]
    pub start_time: f64,
    #[serde(default)]
    pub element: Option<ElementInfo>,
    #[serde(default)]
    pub size: Option<f64>,
}

/// The first discrete user input of the page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstInputEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default = "missing_timing", deserialize_with = "timing_or_missing")]
    pub start_time: f64,
    #[serde(default = "missing_timing", deserialize_with = "timing_or_missing")]
    pub processing_start: f64,
}

/// A single layout-instability event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutShiftEntry {
    #[serde(default = "missing_timing", deserialize_with = "timing_or_missing")]
    pub value: f64,
    #[serde(default)]
    pub had_recent_input: bool,
}

/// A paint-timing mark (`first-paint`, `first-contentful-paint`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default = "missing_timing", deserialize_with = "timing_or_missing")]
    pub start_time: f64,
}

/// Navigation timing for the document request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEntry {
    #[serde(default = "default_navigation_type")]
    pub entry_type: String,
    #[serde(default = "missing_timing", deserialize_with = "timing_or_missing")]
    pub request_start: f64,
    #[serde(default = "missing_timing", deserialize_with = "timing_or_missing")]
    pub response_start: f64,
}

fn default_navigation_type() -> String {
    EntryCategory::Navigation.as_str().to_string()
}

fn missing_timing() -> f64 {
    f64::NAN
}

fn timing_or_missing<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// One delivery of entries from a single category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entryType", content = "entries", rename_all = "kebab-case")]
pub enum EntryBatch {
    LargestContentfulPaint(Vec<LargestContentfulPaintEntry>),
    FirstInput(Vec<FirstInputEntry>),
    LayoutShift(Vec<LayoutShiftEntry>),
    Paint(Vec<PaintEntry>),
    Navigation(Vec<NavigationEntry>),
}

impl EntryBatch {
    pub fn category(&self) -> EntryCategory {
        match self {
            EntryBatch::LargestContentfulPaint(_) => EntryCategory::LargestContentfulPaint,
            EntryBatch::FirstInput(_) => EntryCategory::FirstInput,
            EntryBatch::LayoutShift(_) => EntryCategory::LayoutShift,
            EntryBatch::Paint(_) => EntryCategory::Paint,
            EntryBatch::Navigation(_) => EntryCategory::Navigation,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            EntryBatch::LargestContentfulPaint(v) => v.len(),
            EntryBatch::FirstInput(v) => v.len(),
            EntryBatch::LayoutShift(v) => v.len(),
            EntryBatch::Paint(v) => v.len(),
            EntryBatch::Navigation(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A source of platform performance entries
///
/// Implementations feature-detect each category. For every supported category
/// the collector calls [`observe`](PerformanceTimeline::observe) once with a
/// fresh sink; the host delivers batches to that sink until it reports itself
/// detached.
pub trait PerformanceTimeline: Send + Sync {
    /// Whether this host can deliver entries of `category`
    fn supports(&self, category: EntryCategory) -> bool;

    /// Start delivering batches of `category` to `sink`
    fn observe(&self, category: EntryCategory, sink: EntrySink);
}
