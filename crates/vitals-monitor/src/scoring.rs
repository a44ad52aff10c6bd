//! Suitability scores derived from raw metric values
//!
//! Each metric maps to a 0–100 score by a fixed linear formula, clamped at
//! both ends. Scores are recomputed from the snapshot on every request.
//!
//! | Metric | Score |
//! |---|---|
//! | LCP | `100 - (value - 2500) / 50` |
//! | FID | `100 - (value - 100) / 4` |
//! | CLS | `100 - value * 1000` |
//! | FCP | `100 - (value - 1800) / 24` |
//! | TTFB | `100 - (value - 800) / 16` |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::metrics::{MetricKind, VitalsSnapshot};

/// Score a raw value for `kind`, clamped into `[0, 100]`
pub fn score(kind: MetricKind, value: f64) -> f64 {
    let raw = match kind {
        MetricKind::Lcp => 100.0 - (value - 2500.0) / 50.0,
        MetricKind::Fid => 100.0 - (value - 100.0) / 4.0,
        MetricKind::Cls => 100.0 - value * 1000.0,
        MetricKind::Fcp => 100.0 - (value - 1800.0) / 24.0,
        MetricKind::Ttfb => 100.0 - (value - 800.0) / 16.0,
    };
    raw.clamp(0.0, 100.0)
}

/// Per-metric scores for the observed metrics plus their rounded mean
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreSet {
    /// Only metrics with a recorded sample appear here
    pub scores: BTreeMap<MetricKind, f64>,
    /// Rounded mean of `scores`, 0 when nothing has been observed
    pub overall: f64,
}

impl ScoreSet {
    pub fn from_snapshot(snapshot: &VitalsSnapshot) -> Self {
        let scores: BTreeMap<MetricKind, f64> = snapshot
            .iter()
            .filter_map(|(kind, sample)| sample.map(|s| (kind, score(kind, s.value))))
            .collect();

        let overall = if scores.is_empty() {
            0.0
        } else {
            (scores.values().sum::<f64>() / scores.len() as f64).round()
        };

        Self { scores, overall }
    }

    pub fn get(&self, kind: MetricKind) -> Option<f64> {
        self.scores.get(&kind).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
