// packages/tracer/src/observability/mod.rs
//! Logging and metrics
//!
//! The library only emits `tracing` events and `metrics` counters. Hosts
//! that have no subscriber of their own can call [`init_tracing`]; metrics
//! go nowhere until the host installs a `metrics` recorder.

use crate::utils::errors::{Result, TracerError};
use metrics::{describe_counter, Unit};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// Events accepted into the queue
pub const EVENTS_RECORDED: &str = "qlog_events_recorded_total";

/// Events refused because the writer is gone
pub const EVENTS_REFUSED: &str = "qlog_events_refused_total";

/// Events serialized to a sink
pub const EVENTS_WRITTEN: &str = "qlog_events_written_total";

/// Events drained without being written after a latched error
pub const EVENTS_DISCARDED: &str = "qlog_events_discarded_total";

/// Bytes handed to sinks
pub const BYTES_WRITTEN: &str = "qlog_bytes_written_total";

/// Finished exports, labelled by `outcome`
pub const EXPORTS: &str = "qlog_exports_total";

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable
    #[default]
    Pretty,

    /// One JSON object per line
    Json,
}

/// Install a global `tracing` subscriber filtered by `RUST_LOG` (default `info`)
pub fn init_tracing(format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|e| TracerError::Config(format!("Failed to install subscriber: {}", e)))
}

static DESCRIBED: OnceCell<()> = OnceCell::new();

/// Register metric descriptions with the installed recorder (once per process)
pub fn describe_metrics() {
    DESCRIBED.get_or_init(|| {
        describe_counter!(EVENTS_RECORDED, Unit::Count, "Events accepted into a tracer queue");
        describe_counter!(EVENTS_REFUSED, Unit::Count, "Events refused because the writer exited");
        describe_counter!(EVENTS_WRITTEN, Unit::Count, "Events serialized to a qlog sink");
        describe_counter!(
            EVENTS_DISCARDED,
            Unit::Count,
            "Events drained without being written after a sink failure"
        );
        describe_counter!(BYTES_WRITTEN, Unit::Bytes, "Bytes written to qlog sinks");
        describe_counter!(EXPORTS, Unit::Count, "Completed tracer exports");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_default() {
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
    }

    #[test]
    fn test_init_tracing_twice() {
        // Only one global subscriber can win; the second call must not panic.
        let _ = init_tracing(LogFormat::Pretty);
        let second = init_tracing(LogFormat::Json);
        assert!(matches!(second, Err(TracerError::Config(_))));
    }

    #[test]
    fn test_describe_metrics_is_idempotent() {
        describe_metrics();
        describe_metrics();
    }
}
