// packages/tracer/src/recording/exporter.rs
//! Finalizing a qlog document
//!
//! The exporter owns the writer thread. Once the queue has been closed it
//! waits for the writer to drain, then either reports the latched error or
//! writes the suffix and closes the sink.

use crate::observability::EXPORTS;
use crate::protocol::{ConnectionId, Perspective};
use crate::recording::event_queue::EventStream;
use crate::recording::sink::Sink;
use crate::recording::writer::{StreamingWriter, WriterOutcome};
use crate::utils::errors::{Result, TracerError};
use std::io::Write;
use std::thread::{self, JoinHandle};
use tracing::{error, info, warn};

/// Summary of a finished export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub events_written: u64,
}

/// Handle on the background writer
pub(crate) struct Exporter {
    odcid: ConnectionId,
    handle: JoinHandle<WriterOutcome>,
}

impl Exporter {
    /// Start the writer thread for `sink`
    pub fn spawn(
        sink: Box<dyn Sink>,
        perspective: Perspective,
        odcid: ConnectionId,
        events: EventStream,
    ) -> Result<Self> {
        let writer = StreamingWriter::new(sink, perspective, odcid);
        let handle = thread::Builder::new()
            .name(format!("qlog-writer-{}", odcid))
            .spawn(move || writer.run(events))
            .map_err(TracerError::WriterSpawn)?;

        Ok(Self { odcid, handle })
    }

    /// Wait for the drained writer and terminate the document
    ///
    /// The queue must already be closed, otherwise this blocks forever.
    pub fn finish(self) -> Result<ExportSummary> {
        let outcome = self.handle.join().map_err(|_| {
            error!(odcid = %self.odcid, "qlog writer panicked");
            metrics::counter!(EXPORTS, "outcome" => "panicked").increment(1);
            TracerError::WriterPanicked
        })?;

        let result = Self::terminate(outcome);
        match &result {
            Ok(summary) => {
                metrics::counter!(EXPORTS, "outcome" => "ok").increment(1);
                info!(
                    odcid = %self.odcid,
                    events = summary.events_written,
                    "qlog exported"
                );
            }
            Err(e) if e.is_truncated() => {
                metrics::counter!(EXPORTS, "outcome" => "error").increment(1);
                warn!(odcid = %self.odcid, "qlog document truncated: {}", e);
            }
            Err(e) => {
                metrics::counter!(EXPORTS, "outcome" => "error").increment(1);
                error!(odcid = %self.odcid, "qlog export failed: {}", e);
            }
        }
        result
    }

    fn terminate(outcome: WriterOutcome) -> Result<ExportSummary> {
        let WriterOutcome {
            mut sink,
            suffix,
            error,
            events_written,
            ..
        } = outcome;

        // A truncated document gets no suffix and the sink is left unclosed.
        if let Some(err) = error {
            return Err(err);
        }

        sink.write_all(&suffix).map_err(TracerError::TrailerWrite)?;
        sink.close().map_err(TracerError::SinkClose)?;

        Ok(ExportSummary { events_written })
    }
}
