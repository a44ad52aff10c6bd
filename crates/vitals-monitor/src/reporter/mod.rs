//! Snapshot reporting and export output
//!
//! This module renders the current snapshot as a per-metric report with a
//! three-tier rating, and serializes export bundles.
//!
//! # Output Formats
//!
//! - **Console**: one human-readable line per metric with a traffic-light indicator
//! - **JSON**: machine-readable report for log shippers
//! - **JSON (pretty)**: indented JSON
//!
//! # Example
//!
//! ```
//! use vitals_monitor::metrics::VitalsSnapshot;
//! use vitals_monitor::reporter::{OutputFormat, Reporter};
//!
//! # fn example() -> anyhow::Result<()> {
//! let reporter = Reporter::new(OutputFormat::Console);
//! let text = reporter.format_report(&VitalsSnapshot::default())?;
//! assert!(text.contains("pending"));
//! # Ok(())
//! # }
//! ```

mod console;
mod json;
mod periodic;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::export::ExportBundle;
use crate::metrics::{MetricKind, Rating, VitalsSnapshot};

pub use console::ConsoleReporter;
pub use json::JsonReporter;
pub use periodic::spawn_periodic;

/// Output format for reports and exports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable lines with rating indicators
    #[default]
    Console,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

/// The rated state of one metric at report time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricLine {
    pub metric: MetricKind,
    /// `None` while the metric is pending
    pub value: Option<f64>,
    pub rating: Option<Rating>,
}

impl MetricLine {
    pub fn is_pending(&self) -> bool {
        self.value.is_none()
    }
}

/// A rendered view of the snapshot, one line per metric in report order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsReport {
    pub generated_at: DateTime<Utc>,
    pub metrics: Vec<MetricLine>,
}

impl VitalsReport {
    pub fn from_snapshot(snapshot: &VitalsSnapshot) -> Self {
        let metrics = snapshot
            .iter()
            .map(|(metric, sample)| MetricLine {
                metric,
                value: sample.map(|s| s.value),
                rating: sample.map(|s| metric.rate(s.value)),
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            metrics,
        }
    }

    pub fn line(&self, metric: MetricKind) -> Option<&MetricLine> {
        self.metrics.iter().find(|l| l.metric == metric)
    }
}

/// Reporter for snapshots and exports
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    /// Create a new reporter with the specified output format
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Report the snapshot to stdout, always ending with a newline
    pub fn report(&self, snapshot: &VitalsSnapshot) -> Result<()> {
        let mut output = self.format_report(snapshot)?;
        if !output.ends_with('\n') {
            output.push('\n');
        }
        let mut stdout = io::stdout().lock();
        stdout.write_all(output.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }

    /// Format the snapshot as a report string
    pub fn format_report(&self, snapshot: &VitalsSnapshot) -> Result<String> {
        let report = VitalsReport::from_snapshot(snapshot);
        match self.format {
            OutputFormat::Console => ConsoleReporter::format(&report),
            OutputFormat::Json => JsonReporter::format(&report, false),
            OutputFormat::JsonPretty => JsonReporter::format(&report, true),
        }
    }

    /// Format an export bundle
    ///
    /// Exports are structured records, so the console format renders them as
    /// pretty JSON.
    pub fn format_export(&self, bundle: &ExportBundle) -> Result<String> {
        match self.format {
            OutputFormat::Json => JsonReporter::format(bundle, false),
            OutputFormat::Console | OutputFormat::JsonPretty => JsonReporter::format(bundle, true),
        }
    }

    /// Write an export bundle to a file
    pub fn write_export<P: AsRef<Path>>(&self, bundle: &ExportBundle, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut output = self.format_export(bundle)?;
        output.push('\n');
        fs::write(path, output)
            .with_context(|| format!("Failed to write export to {}", path.display()))?;
        Ok(())
    }
}
