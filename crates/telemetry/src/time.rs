// Path: crates/telemetry/src/time.rs
use crate::sinks::{LatencySink, TRACING_SINK};
use std::time::{Duration, Instant};

/// Reports the elapsed time of a scope to a sink when dropped.
pub struct Timer<'a> {
    sink: &'a dyn LatencySink,
    scope: &'static str,
    start: Instant,
}

impl<'a> Timer<'a> {
    pub fn new(sink: &'a dyn LatencySink, scope: &'static str) -> Self {
        Self {
            sink,
            scope,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Timer<'static> {
    /// A timer that logs through the default tracing sink.
    pub fn logged(scope: &'static str) -> Self {
        Self::new(&TRACING_SINK, scope)
    }
}

impl Drop for Timer<'_> {
    fn drop(&mut self) {
        self.sink
            .observe_duration(self.scope, self.start.elapsed().as_secs_f64());
    }
}
