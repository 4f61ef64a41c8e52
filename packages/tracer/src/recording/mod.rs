// packages/tracer/src/recording/mod.rs
//! Event recording pipeline
//!
//! - **Recorder**: `Tracer`, the per-connection recording interface
//! - **Event Queue**: Bounded FIFO between producers and the writer
//! - **Writer**: Background thread streaming events into the sink
//! - **Exporter**: Drain, terminate and close the document
//! - **Sink**: File and in-memory destinations
//! - **Compressor**: zstd streaming compression
//! - **Directory**: One qlog file per connection
//!
//! # Architecture
//!
//! ```text
//! protocol engine → Tracer::sent_packet() → Event Queue (50) → Writer thread
//!                                              (blocks when full)      ↓
//!                                                          prefix, e1,e2,...,en
//!                                                                      ↓
//!                   Tracer::export() → close queue → drain → suffix → close sink
//! ```

pub mod compressor;
pub mod directory;
pub mod event_queue;
pub mod exporter;
pub mod recorder;
pub mod sink;
mod writer;

// Re-export commonly used types
pub use compressor::{CompressionLevel, ZstdSink};
pub use directory::QlogDirectory;
pub use event_queue::{EventQueue, EventStream, QueueStats};
pub use exporter::ExportSummary;
pub use recorder::Tracer;
pub use sink::{FileSink, MemorySink, MemorySinkHandle, Sink};
