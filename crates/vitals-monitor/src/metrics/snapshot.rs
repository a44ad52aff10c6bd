//! Recorded samples and the per-page vitals snapshot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::kind::MetricKind;

/// A single recorded measurement for one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// Milliseconds for LCP/FID/FCP/TTFB, unitless shift score for CLS
    pub value: f64,
    /// When the collector recorded this sample
    pub captured_at: DateTime<Utc>,
    /// Tag name of the largest rendered element (LCP only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    /// Rendered area of the largest element in pixels (LCP only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    /// Name of the input event that triggered the delay (FID only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
}

impl MetricSample {
    /// A sample without kind-specific metadata
    pub fn new(value: f64, captured_at: DateTime<Utc>) -> Self {
        Self {
            value,
            captured_at,
            element: None,
            size: None,
            event_name: None,
        }
    }

    pub fn with_element(mut self, element: impl Into<String>, size: f64) -> Self {
        self.element = Some(element.into());
        self.size = Some(size);
        self
    }

    pub fn with_event_name(mut self, name: impl Into<String>) -> Self {
        self.event_name = Some(name.into());
        self
    }
}

/// The most recent sample for each metric of one page load
///
/// A slot stays `None` until the first sample for that metric arrives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VitalsSnapshot {
    pub lcp: Option<MetricSample>,
    pub fid: Option<MetricSample>,
    pub cls: Option<MetricSample>,
    pub fcp: Option<MetricSample>,
    pub ttfb: Option<MetricSample>,
}

impl VitalsSnapshot {
    /// The sample recorded for `kind`, if any
    pub fn get(&self, kind: MetricKind) -> Option<&MetricSample> {
        match kind {
            MetricKind::Lcp => self.lcp.as_ref(),
            MetricKind::Fid => self.fid.as_ref(),
            MetricKind::Cls => self.cls.as_ref(),
            MetricKind::Fcp => self.fcp.as_ref(),
            MetricKind::Ttfb => self.ttfb.as_ref(),
        }
    }

    /// Raw value recorded for `kind`, if any
    pub fn value(&self, kind: MetricKind) -> Option<f64> {
        self.get(kind).map(|s| s.value)
    }

    pub(crate) fn slot_mut(&mut self, kind: MetricKind) -> &mut Option<MetricSample> {
        match kind {
            MetricKind::Lcp => &mut self.lcp,
            MetricKind::Fid => &mut self.fid,
            MetricKind::Cls => &mut self.cls,
            MetricKind::Fcp => &mut self.fcp,
            MetricKind::Ttfb => &mut self.ttfb,
        }
    }

    /// Slots in report order, observed or not
    pub fn iter(&self) -> impl Iterator<Item = (MetricKind, Option<&MetricSample>)> + '_ {
        MetricKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }

    /// Number of metrics with at least one sample
    pub fn observed_count(&self) -> usize {
        self.iter().filter(|(_, sample)| sample.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.observed_count() == 0
    }
}
