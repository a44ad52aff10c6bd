//! Console reporter for vitals snapshots
//!
//! One line per metric in report order, each with its traffic-light rating.

use anyhow::Result;
use std::fmt::Write;

use super::{MetricLine, VitalsReport};

const PENDING: &str = "⏳ pending";

/// Console format reporter
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Format a report for console output
    pub fn format(report: &VitalsReport) -> Result<String> {
        let mut output = String::new();

        writeln!(output)?;
        writeln!(output, "📊 Core Web Vitals ({})", report.generated_at.format("%H:%M:%S"))?;
        writeln!(output, "────────────────────────────────────────")?;

        for line in &report.metrics {
            Self::format_line(&mut output, line)?;
        }

        Ok(output)
    }

    fn format_line(output: &mut String, line: &MetricLine) -> Result<()> {
        let label = format!("{}:", line.metric.label());
        match (line.value, line.rating) {
            (Some(value), Some(rating)) => writeln!(
                output,
                "  {:<6}{:>9} {} {}",
                label,
                line.metric.format_value(value),
                rating.indicator(),
                rating.label()
            )?,
            _ => writeln!(output, "  {:<6}{:>9}", label, PENDING)?,
        }
        Ok(())
    }
}
