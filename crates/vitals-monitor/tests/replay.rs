//! Replaying captured entry files through a running monitor

use pretty_assertions::assert_eq;
use tokio::fs::File;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use vitals_monitor::timeline::{replay_lines, ManualTimeline, ReplayStats};
use vitals_monitor::{MetricKind, Rating, VitalsMonitor};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/checkout.ndjson");

#[tokio::test]
async fn test_replay_checkout_fixture() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let timeline = ManualTimeline::new();
    let mut monitor = VitalsMonitor::new(timeline.clone()).with_report_interval(None);
    monitor.init().unwrap();

    let file = File::open(FIXTURE).await.unwrap();
    let stats = replay_lines(BufReader::new(file), &timeline).await.unwrap();
    monitor.flush().await.unwrap();

    assert_eq!(stats, ReplayStats { delivered: 8, skipped: 1 });

    let vitals = monitor.get_vitals();
    assert_eq!(vitals.value(MetricKind::Ttfb), Some(174.0));
    assert_eq!(vitals.value(MetricKind::Fcp), Some(612.0));
    assert_eq!(vitals.value(MetricKind::Lcp), Some(2600.0));
    assert_eq!(vitals.value(MetricKind::Cls), Some(0.13));
    assert_eq!(vitals.value(MetricKind::Fid), Some(43.0));
    assert_eq!(vitals.lcp.as_ref().unwrap().element.as_deref(), Some("IMG"));

    assert_eq!(MetricKind::Lcp.rate(2600.0), Rating::NeedsImprovement);
    assert_eq!(MetricKind::Cls.rate(0.13), Rating::NeedsImprovement);

    let scores = monitor.scores();
    assert_eq!(scores.len(), 5);
    assert_eq!(scores.get(MetricKind::Lcp), Some(98.0));
    assert_eq!(scores.get(MetricKind::Cls), Some(0.0));
}
