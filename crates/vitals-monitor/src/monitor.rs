//! The monitor lifecycle: init, query, export, destroy
//!
//! A [`VitalsMonitor`] is an explicit object owned by the caller. `init`
//! spawns the collector task, subscribes to every category the timeline
//! supports and starts the periodic reporter; `destroy` undoes all three.
//! Reads never block on the collector: they copy the latest published
//! snapshot.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::collector::task::CollectorHandle;
use crate::collector::Subscription;
use crate::config::{Config, PageContext};
use crate::error::MonitorError;
use crate::export::ExportBundle;
use crate::metrics::VitalsSnapshot;
use crate::reporter::{spawn_periodic, Reporter};
use crate::scoring::ScoreSet;
use crate::timeline::{EntryCategory, PerformanceTimeline};

/// Default period between snapshot reports
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_millis(5000);

/// Callback receiving each periodic snapshot instead of the stdout reporter
pub type ReportHandler = Arc<dyn Fn(&VitalsSnapshot) + Send + Sync>;

enum Phase {
    Idle(watch::Sender<VitalsSnapshot>),
    Running(Running),
    Destroyed,
}

struct Running {
    collector: CollectorHandle,
    subscriptions: Vec<Subscription>,
    cancel: CancellationToken,
}

/// Core Web Vitals monitor for one page load
pub struct VitalsMonitor {
    timeline: Arc<dyn PerformanceTimeline>,
    page: PageContext,
    reporter: Reporter,
    report_interval: Option<Duration>,
    report_handler: Option<ReportHandler>,
    snapshot: watch::Receiver<VitalsSnapshot>,
    phase: Phase,
}

impl VitalsMonitor {
    /// Create an idle monitor observing `timeline`
    pub fn new<T>(timeline: T) -> Self
    where
        T: PerformanceTimeline + 'static,
    {
        Self::with_timeline(Arc::new(timeline))
    }

    /// Create an idle monitor from a shared timeline
    pub fn with_timeline(timeline: Arc<dyn PerformanceTimeline>) -> Self {
        let (publisher, snapshot) = watch::channel(VitalsSnapshot::default());
        Self {
            timeline,
            page: PageContext::default(),
            reporter: Reporter::default(),
            report_interval: Some(DEFAULT_REPORT_INTERVAL),
            report_handler: None,
            snapshot,
            phase: Phase::Idle(publisher),
        }
    }

    /// Create an idle monitor configured from `config`
    pub fn from_config<T>(timeline: T, config: &Config) -> Self
    where
        T: PerformanceTimeline + 'static,
    {
        Self::new(timeline)
            .with_page(config.page.clone())
            .with_reporter(Reporter::new(config.monitor.report_format))
            .with_report_interval(config.monitor.report_interval())
    }

    pub fn with_page(mut self, page: PageContext) -> Self {
        self.page = page;
        self
    }

    pub fn with_reporter(mut self, reporter: Reporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Set the periodic report cadence; `None` or zero disables it
    pub fn with_report_interval(mut self, interval: Option<Duration>) -> Self {
        self.report_interval = interval.filter(|d| !d.is_zero());
        self
    }

    /// Route periodic reports to `handler` instead of stdout
    pub fn with_report_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&VitalsSnapshot) + Send + Sync + 'static,
    {
        self.report_handler = Some(Arc::new(handler));
        self
    }

    pub fn page(&self) -> &PageContext {
        &self.page
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running(_))
    }

    pub fn is_destroyed(&self) -> bool {
        matches!(self.phase, Phase::Destroyed)
    }

    /// Categories with an attached subscription
    pub fn active_categories(&self) -> Vec<EntryCategory> {
        match &self.phase {
            Phase::Running(running) => running
                .subscriptions
                .iter()
                .filter(|s| s.is_active())
                .map(Subscription::category)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Start collecting and reporting
    ///
    /// Calling `init` on a running monitor does nothing, and so does calling
    /// it after [`destroy`](Self::destroy).
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::NoRuntime`] when called outside a tokio runtime.
    #[instrument(skip_all, fields(url = %self.page.url))]
    pub fn init(&mut self) -> Result<(), MonitorError> {
        match self.phase {
            Phase::Running(_) => {
                debug!("monitor already running");
                return Ok(());
            }
            Phase::Destroyed => {
                info!("ignoring init on a destroyed monitor");
                return Ok(());
            }
            Phase::Idle(_) => {}
        }

        Handle::try_current().map_err(|_| MonitorError::NoRuntime)?;

        let Phase::Idle(publisher) = std::mem::replace(&mut self.phase, Phase::Destroyed) else {
            return Ok(());
        };

        let (collector, _task) = CollectorHandle::spawn(publisher);
        let subscriptions = self.observe_supported(&collector);
        let cancel = CancellationToken::new();

        if let Some(period) = self.report_interval {
            let reporter = self.reporter;
            let handler = self.report_handler.clone();
            spawn_periodic(period, self.snapshot.clone(), cancel.clone(), move |snapshot| {
                match &handler {
                    Some(handler) => handler(snapshot),
                    None => {
                        if let Err(e) = reporter.report(snapshot) {
                            warn!(error = %e, "periodic report failed");
                        }
                    }
                }
            });
        }

        info!(
            categories = subscriptions.len(),
            periodic = self.report_interval.is_some(),
            "vitals monitor started"
        );

        self.phase = Phase::Running(Running {
            collector,
            subscriptions,
            cancel,
        });
        Ok(())
    }

    fn observe_supported(&self, collector: &CollectorHandle) -> Vec<Subscription> {
        let mut subscriptions = Vec::with_capacity(EntryCategory::ALL.len());
        for category in EntryCategory::ALL {
            if !self.timeline.supports(category) {
                debug!(%category, "category not supported, skipping");
                continue;
            }
            let (subscription, sink) = collector.subscribe(category);
            self.timeline.observe(category, sink);
            subscriptions.push(subscription);
        }
        subscriptions
    }

    /// Independent copy of the current snapshot
    pub fn get_vitals(&self) -> VitalsSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Scores of the current snapshot
    pub fn scores(&self) -> ScoreSet {
        ScoreSet::from_snapshot(&self.snapshot.borrow())
    }

    /// Print one report of the current snapshot through the configured reporter
    pub fn report(&self) -> anyhow::Result<()> {
        self.reporter.report(&self.get_vitals())
    }

    /// Capture an export bundle and log it as JSON
    pub fn export_vitals(&self) -> ExportBundle {
        let bundle = ExportBundle::capture(&self.snapshot.borrow(), &self.page);
        match serde_json::to_string(&bundle) {
            Ok(json) => info!(export = %json, "vitals exported"),
            Err(e) => warn!(error = %e, "failed to serialize export bundle"),
        }
        bundle
    }

    /// Wait until every batch delivered before this call has been applied
    ///
    /// Resolves immediately when the monitor is not running.
    pub async fn flush(&self) -> Result<(), MonitorError> {
        match &self.phase {
            Phase::Running(running) => running.collector.flush().await,
            _ => Ok(()),
        }
    }

    /// Detach every subscription and stop the background tasks
    ///
    /// Idempotent. The last snapshot stays readable afterwards.
    #[instrument(skip_all, fields(url = %self.page.url))]
    pub fn destroy(&mut self) {
        match std::mem::replace(&mut self.phase, Phase::Destroyed) {
            Phase::Running(running) => {
                for subscription in &running.subscriptions {
                    subscription.detach();
                }
                running.cancel.cancel();
                running.collector.shutdown();
                info!(
                    observed = self.snapshot.borrow().observed_count(),
                    "vitals monitor destroyed"
                );
            }
            Phase::Idle(_) => debug!("monitor destroyed before init"),
            Phase::Destroyed => {}
        }
    }
}

impl Drop for VitalsMonitor {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl fmt::Debug for VitalsMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self.phase {
            Phase::Idle(_) => "idle",
            Phase::Running(_) => "running",
            Phase::Destroyed => "destroyed",
        };
        f.debug_struct("VitalsMonitor")
            .field("page", &self.page)
            .field("reporter", &self.reporter)
            .field("report_interval", &self.report_interval)
            .field("phase", &phase)
            .finish_non_exhaustive()
    }
}
