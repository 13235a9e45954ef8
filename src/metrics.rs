//! Engine metrics observer.
//!
//! Deployments install a recorder once at startup; the pipeline reports
//! match, pricing, and terminal-outcome events through it. With no recorder
//! installed the hooks cost one relaxed read.

use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};

use pricing::PriceSource;

use crate::pipeline::ItemStatus;

/// Metrics observer for pipeline stages.
pub trait EngineMetrics: Send + Sync {
    fn record_match(&self, latency: Duration, validated: bool);
    fn record_pricing(&self, latency: Duration, source: PriceSource);
    fn record_outcome(&self, status: ItemStatus);
}

/// Install or clear the global engine metrics recorder.
pub fn set_engine_metrics(recorder: Option<Arc<dyn EngineMetrics>>) {
    let lock = metrics_lock();
    let mut guard = lock.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn EngineMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn EngineMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn EngineMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Latency span tied to the installed recorder. `None` when no recorder is
/// installed, so callers skip the bookkeeping entirely.
pub(crate) struct MetricsSpan {
    recorder: Arc<dyn EngineMetrics>,
    start: Instant,
}

impl MetricsSpan {
    pub(crate) fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    pub(crate) fn record_match(self, validated: bool) {
        self.recorder.record_match(self.start.elapsed(), validated);
    }

    pub(crate) fn record_pricing(self, source: PriceSource) {
        self.recorder.record_pricing(self.start.elapsed(), source);
    }
}
