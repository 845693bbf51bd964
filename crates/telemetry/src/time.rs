// Path: crates/telemetry/src/time.rs
use crate::sinks::LedgerMetricsSink;
use std::time::Instant;

/// Reports the time between its creation and its drop as a commit duration.
pub struct Timer<'a> {
    sink: &'a dyn LedgerMetricsSink,
    start: Instant,
}

impl<'a> Timer<'a> {
    pub fn new(sink: &'a dyn LedgerMetricsSink) -> Self {
        Self {
            sink,
            start: Instant::now(),
        }
    }
}

impl Drop for Timer<'_> {
    fn drop(&mut self) {
        self.sink
            .observe_commit_duration(self.start.elapsed().as_secs_f64());
    }
}
