//! Prometheus metrics collection.
//!
//! Counters and gauges are recorded through the lock-free `metrics` facade;
//! exposition goes through a process-wide Prometheus handle rendered by the
//! server's `/metrics` route.

use metrics::{counter, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Installs the Prometheus recorder for this process.
#[derive(Debug, Clone, Copy)]
pub struct MetricsCollector;

impl MetricsCollector {
    /// Installs the process-wide recorder. Subsequent calls reuse the
    /// existing handle (tests share a process).
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the recorder cannot be installed.
    pub fn install() -> Result<Self, BuildError> {
        if PROMETHEUS_HANDLE.get().is_some() {
            return Ok(Self);
        }
        let handle = PrometheusBuilder::new().install_recorder()?;
        let _ = PROMETHEUS_HANDLE.set(handle);
        Ok(Self)
    }

    /// Renders the current metrics in Prometheus exposition format, or an
    /// empty string when no recorder is installed.
    #[must_use]
    pub fn render() -> String {
        PROMETHEUS_HANDLE.get().map(PrometheusHandle::render).unwrap_or_default()
    }
}

/// Records the outcome of one refresh cycle: `"ok"` or the failing stage.
pub fn record_refresh_cycle(outcome: &'static str) {
    counter!("refresh_cycles_total", "outcome" => outcome).increment(1);
}

/// Records a snapshot cache read on the HTTP path: `"hit"`, `"miss"`, or
/// `"error"`.
pub fn record_snapshot_read(outcome: &'static str) {
    counter!("snapshot_cache_reads_total", "outcome" => outcome).increment(1);
}

/// Records the current number of live dashboard subscribers.
#[allow(clippy::cast_precision_loss)]
pub fn record_broadcast_subscribers(count: usize) {
    gauge!("broadcast_subscribers").set(count as f64);
}
