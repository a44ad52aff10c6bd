//! The collector task: sole owner of the snapshot
//!
//! ```text
//!  EntrySink (LCP) ─┐
//!  EntrySink (FID) ─┤                     ┌──────────────────┐   watch
//!  EntrySink (CLS) ─┼── mpsc (unbounded) ─▶│  VitalsCollector │ ─────────▶ readers
//!  EntrySink (FCP) ─┤                     └──────────────────┘
//!  EntrySink (TTFB)─┘
//! ```

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::sink::{EntrySink, Subscription};
use super::VitalsCollector;
use crate::error::MonitorError;
use crate::metrics::VitalsSnapshot;
use crate::timeline::{EntryBatch, EntryCategory};

/// Messages consumed by the collector task
#[derive(Debug)]
pub(crate) enum CollectorMessage {
    /// A batch delivered by one of the sinks
    Entries(EntryBatch),
    /// Acknowledge once everything queued before this message is applied
    Flush(oneshot::Sender<()>),
    /// Stop the task; messages queued after this are dropped
    Shutdown,
}

/// Handle to a running collector task
#[derive(Debug, Clone)]
pub(crate) struct CollectorHandle {
    tx: mpsc::UnboundedSender<CollectorMessage>,
}

impl CollectorHandle {
    /// Spawn the collector task, publishing every change through `publisher`
    pub(crate) fn spawn(publisher: watch::Sender<VitalsSnapshot>) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(rx, publisher));
        (Self { tx }, task)
    }

    /// Create a subscription whose sink feeds this collector
    pub(crate) fn subscribe(&self, category: EntryCategory) -> (Subscription, EntrySink) {
        Subscription::attach(category, self.tx.clone())
    }

    /// Wait until every batch queued before this call has been applied
    pub(crate) async fn flush(&self) -> Result<(), MonitorError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send(CollectorMessage::Flush(ack_tx))
            .map_err(|_| MonitorError::CollectorGone)?;
        ack_rx.await.map_err(|_| MonitorError::CollectorGone)
    }

    /// Ask the task to stop after draining what is already queued
    pub(crate) fn shutdown(&self) {
        // A closed channel means the task is already gone.
        let _ = self.tx.send(CollectorMessage::Shutdown);
    }
}

async fn run(
    mut rx: mpsc::UnboundedReceiver<CollectorMessage>,
    publisher: watch::Sender<VitalsSnapshot>,
) {
    let mut collector = VitalsCollector::new();
    debug!("collector task started");

    while let Some(message) = rx.recv().await {
        match message {
            CollectorMessage::Entries(batch) => {
                if collector.apply(&batch) {
                    publisher.send_replace(collector.snapshot().clone());
                }
            }
            CollectorMessage::Flush(ack) => {
                let _ = ack.send(());
            }
            CollectorMessage::Shutdown => break,
        }
    }

    info!(
        observed = collector.snapshot().observed_count(),
        "collector task stopped"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricKind;
    use crate::timeline::PaintEntry;

    fn fcp_batch(start_time: f64) -> EntryBatch {
        EntryBatch::Paint(vec![PaintEntry {
            name: "first-contentful-paint".to_string(),
            start_time,
        }])
    }

    #[tokio::test]
    async fn test_flush_observes_prior_batches() {
        let (publisher, snapshot) = watch::channel(VitalsSnapshot::default());
        let (handle, _task) = CollectorHandle::spawn(publisher);
        let (_sub, sink) = handle.subscribe(EntryCategory::Paint);

        sink.deliver(fcp_batch(950.0)).unwrap();
        handle.flush().await.unwrap();

        assert_eq!(snapshot.borrow().value(MetricKind::Fcp), Some(950.0));
    }

    #[tokio::test]
    async fn test_shutdown_stops_task() {
        let (publisher, snapshot) = watch::channel(VitalsSnapshot::default());
        let (handle, task) = CollectorHandle::spawn(publisher);
        let (_sub, sink) = handle.subscribe(EntryCategory::Paint);

        sink.deliver(fcp_batch(700.0)).unwrap();
        handle.shutdown();
        task.await.unwrap();

        // Queued before shutdown: applied. After: the channel is closed.
        assert_eq!(snapshot.borrow().value(MetricKind::Fcp), Some(700.0));
        assert!(matches!(
            sink.deliver(fcp_batch(1400.0)),
            Err(MonitorError::CollectorGone)
        ));
        assert!(matches!(handle.flush().await, Err(MonitorError::CollectorGone)));
        assert_eq!(snapshot.borrow().value(MetricKind::Fcp), Some(700.0));
    }
}
