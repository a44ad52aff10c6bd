//! Export bundles: a point-in-time record of one page's vitals

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::PageContext;
use crate::metrics::VitalsSnapshot;
use crate::scoring::ScoreSet;

/// Immutable record of the snapshot and its scores at capture time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub timestamp: DateTime<Utc>,
    pub url: String,
    pub user_agent: String,
    pub vitals: VitalsSnapshot,
    pub scores: ScoreSet,
}

impl ExportBundle {
    /// Capture `snapshot` for `page`, scoring it now
    pub fn capture(snapshot: &VitalsSnapshot, page: &PageContext) -> Self {
        Self::capture_at(snapshot, page, Utc::now())
    }

    pub fn capture_at(snapshot: &VitalsSnapshot, page: &PageContext, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            url: page.url.clone(),
            user_agent: page.user_agent.clone(),
            vitals: snapshot.clone(),
            scores: ScoreSet::from_snapshot(snapshot),
        }
    }
}
