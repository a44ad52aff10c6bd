//! Core Web Vitals monitoring for a single page load
//!
//! This crate collects performance entries from a host timeline, folds them
//! into a per-page snapshot of the five Core Web Vitals (LCP, FID, CLS, FCP,
//! TTFB), scores them, and reports on a timer.
//!
//! # Features
//!
//! - **Single-writer collection**: every entry batch flows through one update
//!   channel into one collector task
//! - **Scoring**: 0–100 per-metric scores and an overall score
//! - **Periodic reports**: good / needs improvement / poor, every 5 seconds by default
//! - **Export**: timestamped bundles of the snapshot, scores and page context
//! - **Replay**: newline-delimited JSON entry captures
//!
//! # Example
//!
//! ```no_run
//! use vitals_monitor::timeline::{EntryBatch, LayoutShiftEntry, ManualTimeline};
//! use vitals_monitor::{Config, VitalsMonitor};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_file("vitals.toml")?;
//! let timeline = ManualTimeline::new();
//!
//! let mut monitor = VitalsMonitor::from_config(timeline.clone(), &config);
//! monitor.init()?;
//!
//! timeline.emit(EntryBatch::LayoutShift(vec![LayoutShiftEntry {
//!     value: 0.05,
//!     had_recent_input: false,
//! }]));
//! monitor.flush().await?;
//!
//! monitor.report()?;
//! let bundle = monitor.export_vitals();
//! println!("overall score: {}", bundle.scores.overall);
//!
//! monitor.destroy();
//! # Ok(())
//! # }
//! ```

pub mod collector;
pub mod config;
pub mod error;
pub mod export;
pub mod metrics;
pub mod monitor;
pub mod reporter;
pub mod scoring;
pub mod timeline;

// Re-export main types for convenience
pub use config::{Config, PageContext};
pub use error::MonitorError;
pub use export::ExportBundle;
pub use metrics::{MetricKind, MetricSample, Rating, VitalsSnapshot};
pub use monitor::VitalsMonitor;
pub use reporter::{OutputFormat, Reporter};
pub use scoring::ScoreSet;
