//! Timer-driven snapshot reports

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::metrics::VitalsSnapshot;

/// Spawn a task that hands the latest snapshot to `on_tick` every `period`
///
/// The first tick fires one full period after the call. Ticks that fall behind
/// are skipped rather than replayed in a burst. The task ends when `cancel`
/// fires.
pub fn spawn_periodic<F>(
    period: Duration,
    snapshot: watch::Receiver<VitalsSnapshot>,
    cancel: CancellationToken,
    mut on_tick: F,
) -> JoinHandle<()>
where
    F: FnMut(&VitalsSnapshot) + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        debug!(period_ms = period.as_millis() as u64, "periodic reporter started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let current = snapshot.borrow().clone();
                    trace!(observed = current.observed_count(), "periodic report");
                    on_tick(&current);
                }
            }
        }

        debug!("periodic reporter stopped");
    })
}
