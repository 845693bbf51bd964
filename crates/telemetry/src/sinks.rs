// Path: crates/telemetry/src/sinks.rs
//! Defines abstract traits for metrics reporting, decoupling core logic from the backend.

use once_cell::sync::OnceCell;

// --- Static Sink Access ---

/// A no-op sink for use in tests or when telemetry is disabled.
#[derive(Debug, Clone, Copy)]
pub struct NopSink;

static LEDGER_SINK: OnceCell<&'static dyn LedgerMetricsSink> = OnceCell::new();
static ERROR_SINK: OnceCell<&'static dyn ErrorMetricsSink> = OnceCell::new();
static NOP_SINK: NopSink = NopSink;

/// Installs `sink` as the global metrics backend. Only the first call has an effect.
pub fn set_global_sink<T: MetricsSink + 'static>(sink: &'static T) {
    let _ = LEDGER_SINK.set(sink);
    let _ = ERROR_SINK.set(sink);
}

/// Returns a static reference to the configured ledger metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn ledger_metrics() -> &'static dyn LedgerMetricsSink {
    LEDGER_SINK.get().copied().unwrap_or(&NOP_SINK)
}

/// Returns a static reference to the configured error metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn error_metrics() -> &'static dyn ErrorMetricsSink {
    ERROR_SINK.get().copied().unwrap_or(&NOP_SINK)
}

// --- Trait Definitions ---

/// A sink for metrics about writes to the ledger and its write-ahead log.
pub trait LedgerMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the counter of committed writes, labeled by method.
    fn inc_writes_committed(&self, method: &str);
    /// Increments the counter of rejected writes, labeled by method and error code.
    fn inc_writes_rejected(&self, method: &str, code: &'static str);
    /// Observes the latency of one write, from execution to commit.
    fn observe_commit_duration(&self, duration_secs: f64);
    /// Increments the counter of evaluations appended to the log.
    fn inc_evaluations_recorded(&self, count: u64);
    /// Increments the total number of bytes of change sets written to the WAL.
    fn inc_wal_bytes_written(&self, bytes: u64);
    /// Sets the gauge for the number of commits replayed when the ledger was opened.
    fn set_replayed_commits(&self, count: u64);
}
impl LedgerMetricsSink for NopSink {
    fn inc_writes_committed(&self, _method: &str) {}
    fn inc_writes_rejected(&self, _method: &str, _code: &'static str) {}
    fn observe_commit_duration(&self, _duration_secs: f64) {}
    fn inc_evaluations_recorded(&self, _count: u64) {}
    fn inc_wal_bytes_written(&self, _bytes: u64) {}
    fn set_replayed_commits(&self, _count: u64) {}
}

/// A sink for recording structured error metrics.
pub trait ErrorMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments a counter for a specific error, categorized by its kind and variant.
    fn inc_error(&self, kind: &'static str, variant: &'static str);
}
impl ErrorMetricsSink for NopSink {
    fn inc_error(&self, _kind: &'static str, _variant: &'static str) {}
}

/// A unified sink that implements all domain-specific traits, providing a single
/// point of implementation for metrics backends like Prometheus.
pub trait MetricsSink: LedgerMetricsSink + ErrorMetricsSink {}

impl<T> MetricsSink for T where T: LedgerMetricsSink + ErrorMetricsSink {}
