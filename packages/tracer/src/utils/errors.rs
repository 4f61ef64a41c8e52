// packages/tracer/src/utils/errors.rs
//! Error types for the qlog tracer
//!
//! Producers never see these: the recorder methods swallow failures. Errors
//! surface only from construction and from `Tracer::export`.

use std::io;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, TracerError>;

/// Tracer errors
#[derive(Debug, Error)]
pub enum TracerError {
    /// The document skeleton could not be encoded
    #[error("Failed to encode qlog skeleton: {0}")]
    SkeletonEncode(#[source] serde_json::Error),

    /// The sink rejected the document prefix
    #[error("Failed to write qlog prefix: {0}")]
    SkeletonWrite(#[source] io::Error),

    /// An event could not be encoded (1-indexed)
    #[error("Failed to encode event {index}: {source}")]
    EventEncode {
        index: u64,
        #[source]
        source: serde_json::Error,
    },

    /// The sink rejected an event's bytes (1-indexed)
    #[error("Failed to write event {index}: {source}")]
    EventWrite {
        index: u64,
        #[source]
        source: io::Error,
    },

    /// The sink rejected the closing suffix
    #[error("Failed to write qlog suffix: {0}")]
    TrailerWrite(#[source] io::Error),

    /// Closing the sink failed
    #[error("Failed to close sink: {0}")]
    SinkClose(#[source] io::Error),

    /// The background writer thread could not be started
    #[error("Failed to spawn writer thread: {0}")]
    WriterSpawn(#[source] io::Error),

    /// The background writer thread panicked
    #[error("Writer thread panicked")]
    WriterPanicked,

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl TracerError {
    /// Whether the document left in the sink is truncated
    pub fn is_truncated(&self) -> bool {
        matches!(
            self,
            TracerError::SkeletonEncode(_)
                | TracerError::SkeletonWrite(_)
                | TracerError::EventEncode { .. }
                | TracerError::EventWrite { .. }
                | TracerError::TrailerWrite(_)
                | TracerError::WriterPanicked
        )
    }
}

impl From<config::ConfigError> for TracerError {
    fn from(err: config::ConfigError) -> Self {
        TracerError::Config(err.to_string())
    }
}
