// Path: crates/telemetry/src/prometheus.rs
//! A concrete implementation of the metrics sinks using the Prometheus crate.

use crate::sinks::*;
use once_cell::sync::OnceCell;
use prometheus::{
    exponential_buckets, register_histogram, register_int_counter, register_int_counter_vec,
    register_int_gauge, Encoder, Histogram, IntCounter, IntCounterVec, IntGauge, TextEncoder,
};

// --- Metric Statics ---
// The collectors are registered with the default registry the first time
// `install` runs; later calls reuse them.

static WRITES_COMMITTED_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static WRITES_REJECTED_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static COMMIT_DURATION_SECONDS: OnceCell<Histogram> = OnceCell::new();
static EVALUATIONS_RECORDED_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static WAL_BYTES_WRITTEN_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static REPLAYED_COMMITS: OnceCell<IntGauge> = OnceCell::new();
static ERRORS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();

#[derive(Debug, Clone, Copy)]
pub struct PrometheusSink;

impl LedgerMetricsSink for PrometheusSink {
    fn inc_writes_committed(&self, method: &str) {
        if let Some(m) = WRITES_COMMITTED_TOTAL.get() {
            m.with_label_values(&[method]).inc();
        }
    }
    fn inc_writes_rejected(&self, method: &str, code: &'static str) {
        if let Some(m) = WRITES_REJECTED_TOTAL.get() {
            m.with_label_values(&[method, code]).inc();
        }
    }
    fn observe_commit_duration(&self, duration_secs: f64) {
        if let Some(m) = COMMIT_DURATION_SECONDS.get() {
            m.observe(duration_secs);
        }
    }
    fn inc_evaluations_recorded(&self, count: u64) {
        if let Some(m) = EVALUATIONS_RECORDED_TOTAL.get() {
            m.inc_by(count);
        }
    }
    fn inc_wal_bytes_written(&self, bytes: u64) {
        if let Some(m) = WAL_BYTES_WRITTEN_TOTAL.get() {
            m.inc_by(bytes);
        }
    }
    fn set_replayed_commits(&self, count: u64) {
        if let Some(m) = REPLAYED_COMMITS.get() {
            m.set(i64::try_from(count).unwrap_or(i64::MAX));
        }
    }
}

impl ErrorMetricsSink for PrometheusSink {
    fn inc_error(&self, kind: &'static str, variant: &'static str) {
        if let Some(m) = ERRORS_TOTAL.get() {
            m.with_label_values(&[kind, variant]).inc();
        }
    }
}

/// Registers all Prometheus collectors and installs the sink globally.
///
/// Idempotent: collectors are registered once, later calls return the same sink.
pub fn install() -> Result<&'static PrometheusSink, prometheus::Error> {
    WRITES_COMMITTED_TOTAL.get_or_try_init(|| {
        register_int_counter_vec!(
            "gradebook_writes_committed_total",
            "Total number of committed ledger writes.",
            &["method"]
        )
    })?;
    WRITES_REJECTED_TOTAL.get_or_try_init(|| {
        register_int_counter_vec!(
            "gradebook_writes_rejected_total",
            "Total number of rejected ledger writes, by error code.",
            &["method", "code"]
        )
    })?;
    COMMIT_DURATION_SECONDS.get_or_try_init(|| {
        register_histogram!(
            "gradebook_commit_duration_seconds",
            "Latency of a ledger write from execution to commit.",
            exponential_buckets(0.00005, 2.0, 16)?
        )
    })?;
    EVALUATIONS_RECORDED_TOTAL.get_or_try_init(|| {
        register_int_counter!(
            "gradebook_evaluations_recorded_total",
            "Total number of evaluations appended to the log."
        )
    })?;
    WAL_BYTES_WRITTEN_TOTAL.get_or_try_init(|| {
        register_int_counter!(
            "gradebook_wal_bytes_written_total",
            "Total bytes of change sets appended to the write-ahead log."
        )
    })?;
    REPLAYED_COMMITS.get_or_try_init(|| {
        register_int_gauge!(
            "gradebook_replayed_commits",
            "Number of commits replayed from the write-ahead log at open."
        )
    })?;
    ERRORS_TOTAL.get_or_try_init(|| {
        register_int_counter_vec!(
            "gradebook_errors_total",
            "Total number of errors, categorized by type and variant.",
            &["kind", "variant"]
        )
    })?;

    static SINK: PrometheusSink = PrometheusSink;
    set_global_sink(&SINK);
    Ok(&SINK)
}

/// Renders every registered metric in the Prometheus text exposition format.
pub fn render() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let mut buf = Vec::new();
    encoder.encode(&prometheus::gather(), &mut buf)?;
    String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
