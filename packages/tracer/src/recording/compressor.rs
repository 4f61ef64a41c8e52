// packages/tracer/src/recording/compressor.rs
//! Streaming zstd compression for qlog sinks
//!
//! Wraps any [`Sink`]; closing finishes the zstd frame and then closes the
//! inner sink.

use crate::recording::sink::Sink;
use serde::Deserialize;
use std::io::{self, Write};
use tracing::debug;
use zstd::stream::write::Encoder;

/// Compression levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// Fast compression (level 1)
    Fast,

    /// Balanced (level 3)
    Balanced,

    /// Best compression (level 19)
    Best,
}

impl CompressionLevel {
    pub fn as_i32(&self) -> i32 {
        match self {
            CompressionLevel::Fast => 1,
            CompressionLevel::Balanced => 3,
            CompressionLevel::Best => 19,
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::Balanced
    }
}

/// zstd-compressing sink
pub struct ZstdSink<S: Sink> {
    encoder: Option<Encoder<'static, S>>,
    level: CompressionLevel,
}

impl<S: Sink> ZstdSink<S> {
    pub fn new(inner: S, level: CompressionLevel) -> io::Result<Self> {
        let encoder = Encoder::new(inner, level.as_i32())?;
        Ok(Self {
            encoder: Some(encoder),
            level,
        })
    }

    pub fn level(&self) -> CompressionLevel {
        self.level
    }

    fn encoder(&mut self) -> io::Result<&mut Encoder<'static, S>> {
        self.encoder
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "compressed sink closed"))
    }
}

impl<S: Sink> Write for ZstdSink<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.encoder()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.encoder()?.flush()
    }
}

impl<S: Sink> Sink for ZstdSink<S> {
    fn close(&mut self) -> io::Result<()> {
        let encoder = match self.encoder.take() {
            Some(encoder) => encoder,
            None => return Ok(()),
        };

        let mut inner = encoder.finish()?;
        debug!("Finished zstd frame at level {}", self.level.as_i32());
        inner.close()
    }
}
