//! In-process timeline driven by explicit `emit` calls

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

use super::{EntryBatch, EntryCategory, PerformanceTimeline};
use crate::collector::EntrySink;

#[derive(Debug)]
struct Inner {
    supported: BTreeSet<EntryCategory>,
    sinks: Vec<EntrySink>,
}

/// A [`PerformanceTimeline`] that fans out batches pushed by the caller
///
/// Clones share the same observers, so one clone can be handed to a monitor
/// while another emits batches from a different task or thread.
#[derive(Debug, Clone)]
pub struct ManualTimeline {
    inner: Arc<Mutex<Inner>>,
}

impl Default for ManualTimeline {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualTimeline {
    /// A timeline supporting every category
    pub fn new() -> Self {
        Self::with_supported(EntryCategory::ALL)
    }

    /// A timeline that only reports support for `categories`
    pub fn with_supported(categories: impl IntoIterator<Item = EntryCategory>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                supported: categories.into_iter().collect(),
                sinks: Vec::new(),
            })),
        }
    }

    /// Deliver `batch` to every attached sink of its category
    ///
    /// Returns the number of sinks that accepted the batch. Sinks that have
    /// been detached are dropped.
    pub fn emit(&self, batch: EntryBatch) -> usize {
        let category = batch.category();
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.sinks.retain(EntrySink::is_attached);

        let mut delivered = 0;
        for sink in inner.sinks.iter().filter(|s| s.category() == category) {
            match sink.deliver(batch.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => warn!(%category, error = %e, "sink rejected batch"),
            }
        }

        if delivered == 0 {
            debug!(%category, "no observer for batch");
        }
        delivered
    }

    /// Number of attached sinks for `category`
    pub fn observer_count(&self, category: EntryCategory) -> usize {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner
            .sinks
            .iter()
            .filter(|s| s.category() == category && s.is_attached())
            .count()
    }
}

impl PerformanceTimeline for ManualTimeline {
    fn supports(&self, category: EntryCategory) -> bool {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.supported.contains(&category)
    }

    fn observe(&self, category: EntryCategory, sink: EntrySink) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.sinks.push(sink);
        debug!(%category, observers = inner.sinks.len(), "observer attached");
    }
}
