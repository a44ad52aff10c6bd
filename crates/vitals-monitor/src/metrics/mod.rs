//! Core Web Vitals data model
//!
//! This module defines the five tracked metrics and the snapshot that holds
//! the latest sample for each of them:
//! - **LCP**: Largest Contentful Paint
//! - **FID**: First Input Delay
//! - **CLS**: Cumulative Layout Shift
//! - **FCP**: First Contentful Paint
//! - **TTFB**: Time To First Byte

pub mod kind;
pub mod snapshot;

// Re-export commonly used types
pub use kind::{MetricKind, Rating, Thresholds};
pub use snapshot::{MetricSample, VitalsSnapshot};
