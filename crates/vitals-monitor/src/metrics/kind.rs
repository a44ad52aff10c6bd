//! Metric identities, rating thresholds, and tier labels

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five Core Web Vitals tracked per page load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MetricKind {
    /// Largest Contentful Paint (milliseconds)
    Lcp,
    /// First Input Delay (milliseconds)
    Fid,
    /// Cumulative Layout Shift (unitless)
    Cls,
    /// First Contentful Paint (milliseconds)
    Fcp,
    /// Time To First Byte (milliseconds)
    Ttfb,
}

impl MetricKind {
    /// All metrics in report order
    pub const ALL: [MetricKind; 5] = [
        MetricKind::Lcp,
        MetricKind::Fid,
        MetricKind::Cls,
        MetricKind::Fcp,
        MetricKind::Ttfb,
    ];

    /// Short uppercase label, e.g. `"LCP"`
    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::Lcp => "LCP",
            MetricKind::Fid => "FID",
            MetricKind::Cls => "CLS",
            MetricKind::Fcp => "FCP",
            MetricKind::Ttfb => "TTFB",
        }
    }

    /// Unit suffix used when printing values
    pub fn unit(&self) -> &'static str {
        match self {
            MetricKind::Cls => "",
            _ => "ms",
        }
    }

    /// Rating boundaries for this metric
    pub fn thresholds(&self) -> Thresholds {
        match self {
            MetricKind::Lcp => Thresholds::new(2500.0, 4000.0),
            MetricKind::Fid => Thresholds::new(100.0, 300.0),
            MetricKind::Cls => Thresholds::new(0.1, 0.25),
            MetricKind::Fcp => Thresholds::new(1800.0, 3000.0),
            MetricKind::Ttfb => Thresholds::new(800.0, 1800.0),
        }
    }

    /// Rate a raw value against this metric's thresholds
    pub fn rate(&self, value: f64) -> Rating {
        self.thresholds().rate(value)
    }

    /// Format a raw value with the metric's precision and unit
    pub fn format_value(&self, value: f64) -> String {
        match self {
            MetricKind::Cls => format!("{:.3}", value),
            _ => format!("{:.0}{}", value, self.unit()),
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Good/poor boundaries for a metric
///
/// Values at or below `good` are good; values strictly above `poor` are poor;
/// everything in between needs improvement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Upper bound (inclusive) of the good tier
    pub good: f64,
    /// Lower bound (exclusive) of the poor tier
    pub poor: f64,
}

impl Thresholds {
    pub const fn new(good: f64, poor: f64) -> Self {
        Self { good, poor }
    }

    pub fn rate(&self, value: f64) -> Rating {
        if value <= self.good {
            Rating::Good
        } else if value > self.poor {
            Rating::Poor
        } else {
            Rating::NeedsImprovement
        }
    }
}

/// Qualitative tier of a metric value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Good,
    NeedsImprovement,
    Poor,
}

impl Rating {
    pub fn label(&self) -> &'static str {
        match self {
            Rating::Good => "good",
            Rating::NeedsImprovement => "needs improvement",
            Rating::Poor => "poor",
        }
    }

    /// Traffic-light indicator printed next to the value
    pub fn indicator(&self) -> &'static str {
        match self {
            Rating::Good => "🟢",
            Rating::NeedsImprovement => "🟡",
            Rating::Poor => "🔴",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
