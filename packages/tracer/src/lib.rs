// packages/tracer/src/lib.rs
//! Streaming qlog recorder for QUIC connections
//!
//! A [`Tracer`] turns connection lifecycle events into a single qlog
//! document written incrementally to a sink, without blocking the protocol
//! engine on I/O.
//!
//! # Architecture
//!
//! The crate is structured into several modules:
//!
//! - **recording**: Tracer, event queue, background writer, sinks
//! - **qlog**: Document skeleton, events, frames, headers
//! - **protocol**: Decoded transport values handed in by the engine
//! - **observability**: Logging and metrics
//! - **utils**: Errors and configuration
//!
//! # Example
//!
//! ```no_run
//! use chrono::Utc;
//! use qlog_tracer::protocol::{ConnectionId, Perspective};
//! use qlog_tracer::{FileSink, Tracer};
//!
//! # fn main() -> qlog_tracer::Result<()> {
//! let odcid = ConnectionId::from_slice(&[0xde, 0xad, 0xbe, 0xef]).unwrap_or_else(ConnectionId::empty);
//! let tracer = Tracer::new(FileSink::create("trace.qlog")?, Perspective::Server, odcid)?;
//! tracer.updated_pto_count(Utc::now(), 1);
//! tracer.export()?;
//! # Ok(())
//! # }
//! ```

pub mod observability;
pub mod protocol;
pub mod qlog;
pub mod recording;
pub mod utils;

// Re-export commonly used types
pub use recording::{
    CompressionLevel, ExportSummary, FileSink, MemorySink, QlogDirectory, Sink, Tracer, ZstdSink,
};
pub use utils::config::{QlogSettings, TracerConfig};
pub use utils::errors::{Result, TracerError};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
