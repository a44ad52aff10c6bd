//! Per-category delivery endpoints handed to the host timeline

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

use super::task::CollectorMessage;
use crate::error::MonitorError;
use crate::timeline::{EntryBatch, EntryCategory};

/// Host-side endpoint for one observed category
///
/// Cheap to clone. Every delivered batch goes onto the collector's update
/// channel; once the owning [`Subscription`] is detached the sink rejects
/// further batches.
#[derive(Debug, Clone)]
pub struct EntrySink {
    category: EntryCategory,
    attached: Arc<AtomicBool>,
    tx: mpsc::UnboundedSender<CollectorMessage>,
}

impl EntrySink {
    pub fn category(&self) -> EntryCategory {
        self.category
    }

    /// Whether batches delivered now would still reach the collector
    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire) && !self.tx.is_closed()
    }

    /// Forward a batch to the collector
    ///
    /// # Errors
    ///
    /// - [`MonitorError::CategoryMismatch`] if the batch belongs to another category
    /// - [`MonitorError::Detached`] after the subscription was detached
    /// - [`MonitorError::CollectorGone`] if the collector task has stopped
    pub fn deliver(&self, batch: EntryBatch) -> Result<(), MonitorError> {
        let actual = batch.category();
        if actual != self.category {
            warn!(expected = %self.category, %actual, "rejecting batch for wrong category");
            return Err(MonitorError::CategoryMismatch {
                expected: self.category,
                actual,
            });
        }
        if !self.attached.load(Ordering::Acquire) {
            return Err(MonitorError::Detached(self.category));
        }
        self.tx
            .send(CollectorMessage::Entries(batch))
            .map_err(|_| MonitorError::CollectorGone)
    }
}

/// Monitor-side handle of an attached sink
#[derive(Debug)]
pub struct Subscription {
    category: EntryCategory,
    attached: Arc<AtomicBool>,
}

impl Subscription {
    pub(crate) fn attach(
        category: EntryCategory,
        tx: mpsc::UnboundedSender<CollectorMessage>,
    ) -> (Self, EntrySink) {
        let attached = Arc::new(AtomicBool::new(true));
        let sink = EntrySink {
            category,
            attached: attached.clone(),
            tx,
        };
        (Self { category, attached }, sink)
    }

    pub fn category(&self) -> EntryCategory {
        self.category
    }

    pub fn is_active(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    /// Stop accepting batches from the paired sink; idempotent
    pub fn detach(&self) {
        self.attached.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::LayoutShiftEntry;

    fn shift_batch() -> EntryBatch {
        EntryBatch::LayoutShift(vec![LayoutShiftEntry {
            value: 0.02,
            had_recent_input: false,
        }])
    }

    #[test]
    fn test_deliver_forwards_to_channel() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (_sub, sink) = Subscription::attach(EntryCategory::LayoutShift, tx);

        sink.deliver(shift_batch()).unwrap();

        match rx.try_recv() {
            Ok(CollectorMessage::Entries(batch)) => assert_eq!(batch, shift_batch()),
            other => panic!("Expected entries message, got {:?}", other),
        }
    }

    #[test]
    fn test_deliver_rejects_other_category() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (_sub, sink) = Subscription::attach(EntryCategory::Paint, tx);

        let err = sink.deliver(shift_batch()).unwrap_err();
        assert!(matches!(
            err,
            MonitorError::CategoryMismatch {
                expected: EntryCategory::Paint,
                actual: EntryCategory::LayoutShift,
            }
        ));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_detached_sink_rejects_batches() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (sub, sink) = Subscription::attach(EntryCategory::LayoutShift, tx);

        sub.detach();
        sub.detach();

        assert!(!sub.is_active());
        assert!(!sink.is_attached());
        assert!(matches!(
            sink.deliver(shift_batch()),
            Err(MonitorError::Detached(EntryCategory::LayoutShift))
        ));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_channel_reports_collector_gone() {
        let (tx, rx) = mpsc::unbounded_channel();
        let (_sub, sink) = Subscription::attach(EntryCategory::LayoutShift, tx);
        drop(rx);

        assert!(!sink.is_attached());
        assert!(matches!(
            sink.deliver(shift_batch()),
            Err(MonitorError::CollectorGone)
        ));
    }
}
