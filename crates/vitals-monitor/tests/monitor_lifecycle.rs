//! End-to-end lifecycle tests for the vitals monitor

use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use vitals_monitor::collector::EntrySink;
use vitals_monitor::timeline::{
    ElementInfo, EntryBatch, EntryCategory, FirstInputEntry, LargestContentfulPaintEntry,
    LayoutShiftEntry, ManualTimeline, PaintEntry, PerformanceTimeline,
};
use vitals_monitor::{Config, MetricKind, MonitorError, PageContext, VitalsMonitor, VitalsSnapshot};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn quiet_monitor(timeline: &ManualTimeline) -> VitalsMonitor {
    init_tracing();
    VitalsMonitor::new(timeline.clone()).with_report_interval(None)
}

fn lcp(start_time: f64, tag: &str) -> EntryBatch {
    EntryBatch::LargestContentfulPaint(vec![LargestContentfulPaintEntry {
        start_time,
        element: Some(ElementInfo {
            tag_name: Some(tag.to_string()),
        }),
        size: Some(1000.0),
    }])
}

fn shift(value: f64, had_recent_input: bool) -> EntryBatch {
    EntryBatch::LayoutShift(vec![LayoutShiftEntry {
        value,
        had_recent_input,
    }])
}

#[tokio::test]
async fn test_unobserved_metrics_are_absent() {
    let timeline = ManualTimeline::new();
    let mut monitor = quiet_monitor(&timeline);
    monitor.init().unwrap();

    let vitals = monitor.get_vitals();
    assert!(vitals.is_empty());
    assert!(monitor.scores().is_empty());
    assert_eq!(monitor.scores().overall, 0.0);
}

#[tokio::test]
async fn test_cls_scenario() {
    let timeline = ManualTimeline::new();
    let mut monitor = quiet_monitor(&timeline);
    monitor.init().unwrap();

    timeline.emit(shift(0.05, false));
    timeline.emit(shift(0.10, true));
    timeline.emit(shift(0.08, false));
    monitor.flush().await.unwrap();

    assert_eq!(monitor.get_vitals().value(MetricKind::Cls), Some(0.13));
}

#[tokio::test]
async fn test_lcp_latest_candidate_wins() {
    let timeline = ManualTimeline::new();
    let mut monitor = quiet_monitor(&timeline);
    monitor.init().unwrap();

    timeline.emit(lcp(1200.0, "H1"));
    timeline.emit(lcp(2600.0, "IMG"));
    monitor.flush().await.unwrap();

    let sample = monitor.get_vitals().lcp.unwrap();
    assert_eq!(sample.value, 2600.0);
    assert_eq!(sample.element.as_deref(), Some("IMG"));
}

#[tokio::test]
async fn test_init_is_idempotent() {
    let timeline = ManualTimeline::new();
    let mut monitor = quiet_monitor(&timeline);

    monitor.init().unwrap();
    monitor.init().unwrap();

    for category in EntryCategory::ALL {
        assert_eq!(timeline.observer_count(category), 1, "{}", category);
    }

    timeline.emit(shift(0.05, false));
    monitor.flush().await.unwrap();
    assert_eq!(monitor.get_vitals().value(MetricKind::Cls), Some(0.05));
}

#[tokio::test]
async fn test_unsupported_categories_are_skipped() {
    let timeline = ManualTimeline::with_supported([
        EntryCategory::LargestContentfulPaint,
        EntryCategory::Paint,
    ]);
    let mut monitor = quiet_monitor(&timeline);
    monitor.init().unwrap();

    assert_eq!(timeline.observer_count(EntryCategory::LayoutShift), 0);
    assert_eq!(timeline.observer_count(EntryCategory::FirstInput), 0);
    assert_eq!(timeline.emit(shift(0.2, false)), 0);

    timeline.emit(lcp(900.0, "P"));
    monitor.flush().await.unwrap();

    let vitals = monitor.get_vitals();
    assert_eq!(vitals.value(MetricKind::Lcp), Some(900.0));
    assert!(vitals.cls.is_none());
}

#[tokio::test]
async fn test_destroy_stops_updates() {
    let timeline = ManualTimeline::new();
    let mut monitor = quiet_monitor(&timeline);
    monitor.init().unwrap();

    timeline.emit(lcp(1500.0, "IMG"));
    monitor.flush().await.unwrap();
    let before = monitor.get_vitals();

    monitor.destroy();
    assert_eq!(timeline.emit(lcp(3900.0, "DIV")), 0);
    tokio::task::yield_now().await;

    assert_eq!(monitor.get_vitals(), before);
    for category in EntryCategory::ALL {
        assert_eq!(timeline.observer_count(category), 0);
    }
}

#[tokio::test]
async fn test_init_after_destroy_is_noop() {
    let timeline = ManualTimeline::new();
    let mut monitor = quiet_monitor(&timeline);
    monitor.init().unwrap();
    monitor.destroy();

    assert_eq!(monitor.init(), Ok(()));
    assert!(monitor.is_destroyed());
    assert_eq!(timeline.observer_count(EntryCategory::Paint), 0);
}

#[tokio::test]
async fn test_get_vitals_returns_independent_copy() {
    let timeline = ManualTimeline::new();
    let mut monitor = quiet_monitor(&timeline);
    monitor.init().unwrap();

    timeline.emit(EntryBatch::FirstInput(vec![FirstInputEntry {
        name: "click".to_string(),
        start_time: 2000.0,
        processing_start: 2045.0,
    }]));
    monitor.flush().await.unwrap();

    let mut copy = monitor.get_vitals();
    copy.fid.as_mut().unwrap().value = 999.0;

    let fresh = monitor.get_vitals();
    assert_eq!(fresh.value(MetricKind::Fid), Some(45.0));
    assert_ne!(fresh, copy);
}

#[tokio::test]
async fn test_export_bundle_contents() {
    let timeline = ManualTimeline::new();
    let config = Config::from_str(
        r#"
        [monitor]
        periodic_reports = false

        [page]
        url = "https://shop.example.com/checkout"
        user_agent = "Mozilla/5.0 (test)"
        "#,
    )
    .unwrap();
    let mut monitor = VitalsMonitor::from_config(timeline.clone(), &config);
    monitor.init().unwrap();

    timeline.emit(lcp(3500.0, "IMG"));
    timeline.emit(EntryBatch::Paint(vec![PaintEntry {
        name: "first-contentful-paint".to_string(),
        start_time: 1800.0,
    }]));
    monitor.flush().await.unwrap();

    let bundle = monitor.export_vitals();
    assert_eq!(bundle.url, "https://shop.example.com/checkout");
    assert_eq!(bundle.user_agent, "Mozilla/5.0 (test)");
    assert_eq!(bundle.vitals, monitor.get_vitals());
    assert_eq!(bundle.scores.get(MetricKind::Lcp), Some(80.0));
    assert_eq!(bundle.scores.get(MetricKind::Fcp), Some(100.0));
    assert_eq!(bundle.scores.overall, 90.0);
    assert_eq!(
        monitor.page(),
        &PageContext::new("https://shop.example.com/checkout", "Mozilla/5.0 (test)")
    );
}

/// Host that keeps every sink it is handed
#[derive(Clone, Default)]
struct CapturingTimeline {
    sinks: Arc<Mutex<Vec<EntrySink>>>,
}

impl PerformanceTimeline for CapturingTimeline {
    fn supports(&self, _category: EntryCategory) -> bool {
        true
    }

    fn observe(&self, _category: EntryCategory, sink: EntrySink) {
        self.sinks.lock().unwrap().push(sink);
    }
}

#[tokio::test]
async fn test_sinks_reject_misrouted_and_late_batches() {
    init_tracing();
    let host = CapturingTimeline::default();
    let mut monitor = VitalsMonitor::new(host.clone()).with_report_interval(None);
    monitor.init().unwrap();

    let paint_sink = host
        .sinks
        .lock()
        .unwrap()
        .iter()
        .find(|s| s.category() == EntryCategory::Paint)
        .cloned()
        .unwrap();

    assert_eq!(
        paint_sink.deliver(shift(0.5, false)),
        Err(MonitorError::CategoryMismatch {
            expected: EntryCategory::Paint,
            actual: EntryCategory::LayoutShift,
        })
    );

    monitor.destroy();
    let late = EntryBatch::Paint(vec![PaintEntry {
        name: "first-contentful-paint".to_string(),
        start_time: 400.0,
    }]);
    assert_eq!(
        paint_sink.deliver(late),
        Err(MonitorError::Detached(EntryCategory::Paint))
    );
    assert!(monitor.get_vitals().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_periodic_reports_follow_interval() {
    init_tracing();
    let timeline = ManualTimeline::new();
    let reports: Arc<Mutex<Vec<VitalsSnapshot>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = reports.clone();
    let mut monitor = VitalsMonitor::new(timeline.clone())
        .with_report_interval(Some(Duration::from_millis(5000)))
        .with_report_handler(move |snapshot| sink.lock().unwrap().push(snapshot.clone()));
    monitor.init().unwrap();

    timeline.emit(shift(0.02, false));
    monitor.flush().await.unwrap();

    tokio::time::sleep(Duration::from_millis(4900)).await;
    assert!(reports.lock().unwrap().is_empty());

    tokio::time::sleep(Duration::from_millis(200)).await;
    {
        let reports = reports.lock().unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].value(MetricKind::Cls), Some(0.02));
    }

    tokio::time::sleep(Duration::from_millis(10_000)).await;
    assert_eq!(reports.lock().unwrap().len(), 3);

    monitor.destroy();
    tokio::time::sleep(Duration::from_millis(20_000)).await;
    assert_eq!(reports.lock().unwrap().len(), 3);
}

#[test]
fn test_init_requires_runtime() {
    let mut monitor = quiet_monitor(&ManualTimeline::new());
    assert_eq!(monitor.init(), Err(MonitorError::NoRuntime));
}
