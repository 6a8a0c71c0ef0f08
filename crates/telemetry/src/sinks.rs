// Path: crates/telemetry/src/sinks.rs

/// Receives the duration of a named scope.
pub trait LatencySink: Send + Sync {
    /// Records that `scope` took `secs` seconds.
    fn observe_duration(&self, scope: &'static str, secs: f64);
}

/// Emits every observation as a `tracing` event under the `timing` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LatencySink for TracingSink {
    fn observe_duration(&self, scope: &'static str, secs: f64) {
        tracing::info!(target: "timing", scope, elapsed_ms = secs * 1000.0, "scope finished");
    }
}

/// The process-wide default sink.
pub static TRACING_SINK: TracingSink = TracingSink;
