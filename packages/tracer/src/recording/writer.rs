// packages/tracer/src/recording/writer.rs
//! Background streaming writer
//!
//! Exactly one writer runs per tracer, on its own thread, and is the only
//! code touching the sink until it returns. It moves through
//! Init → Streaming → Drained:
//!
//! - **Init**: probe-encode the skeleton, write the prefix, keep the suffix
//! - **Streaming**: write `,` + event for every event after the first, as a
//!   single write per event
//! - **Drained**: the queue is closed and empty; hand the sink back
//!
//! The first failure is latched. After that, events are still pulled off the
//! queue so producers never block on a dead sink, but nothing more is
//! written.

use crate::observability::{BYTES_WRITTEN, EVENTS_DISCARDED, EVENTS_WRITTEN};
use crate::protocol::{ConnectionId, Perspective};
use crate::qlog::{Event, Skeleton};
use crate::recording::event_queue::EventStream;
use crate::recording::sink::Sink;
use crate::utils::errors::TracerError;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WriterState {
    Init,
    Streaming,
    Drained,
}

/// What the writer hands back once the queue is drained
pub(crate) struct WriterOutcome {
    pub sink: Box<dyn Sink>,
    pub suffix: Vec<u8>,
    pub error: Option<TracerError>,
    pub events_written: u64,
    pub events_discarded: u64,
}

pub(crate) struct StreamingWriter {
    sink: Box<dyn Sink>,
    perspective: Perspective,
    odcid: ConnectionId,
    state: WriterState,
    suffix: Vec<u8>,
    error: Option<TracerError>,
    buf: Vec<u8>,
    dequeued: u64,
    events_written: u64,
    events_discarded: u64,
}

impl StreamingWriter {
    pub fn new(sink: Box<dyn Sink>, perspective: Perspective, odcid: ConnectionId) -> Self {
        Self {
            sink,
            perspective,
            odcid,
            state: WriterState::Init,
            suffix: Vec::new(),
            error: None,
            buf: Vec::with_capacity(1024),
            dequeued: 0,
            events_written: 0,
            events_discarded: 0,
        }
    }

    /// Run until the queue is closed and drained
    pub fn run(mut self, events: EventStream) -> WriterOutcome {
        self.write_prefix();

        for event in events {
            self.write_event(&event);
        }

        self.state = WriterState::Drained;
        debug!(
            odcid = %self.odcid,
            written = self.events_written,
            discarded = self.events_discarded,
            "qlog writer drained"
        );

        WriterOutcome {
            sink: self.sink,
            suffix: self.suffix,
            error: self.error,
            events_written: self.events_written,
            events_discarded: self.events_discarded,
        }
    }

    fn write_prefix(&mut self) {
        debug_assert_eq!(self.state, WriterState::Init);

        match Skeleton::probe(self.perspective, self.odcid) {
            Ok(skeleton) => {
                if let Err(e) = self.sink.write_all(skeleton.prefix()) {
                    self.latch(TracerError::SkeletonWrite(e));
                } else {
                    metrics::counter!(BYTES_WRITTEN).increment(skeleton.prefix().len() as u64);
                }
                self.suffix = skeleton.into_suffix();
            }
            Err(e) => self.latch(e),
        }

        self.state = WriterState::Streaming;
    }

    fn write_event(&mut self, event: &Event) {
        self.dequeued += 1;
        let index = self.dequeued;

        if self.error.is_some() {
            self.events_discarded += 1;
            metrics::counter!(EVENTS_DISCARDED).increment(1);
            return;
        }

        // Separator and event go out in one write, so a failed encode
        // leaves no dangling comma.
        self.buf.clear();
        if self.events_written > 0 {
            self.buf.push(b',');
        }
        if let Err(source) = serde_json::to_writer(&mut self.buf, event) {
            self.latch(TracerError::EventEncode { index, source });
            self.events_discarded += 1;
            return;
        }

        match self.sink.write_all(&self.buf) {
            Ok(()) => {
                self.events_written += 1;
                metrics::counter!(EVENTS_WRITTEN).increment(1);
                metrics::counter!(BYTES_WRITTEN).increment(self.buf.len() as u64);
            }
            Err(source) => {
                self.latch(TracerError::EventWrite { index, source });
                self.events_discarded += 1;
            }
        }
    }

    fn latch(&mut self, err: TracerError) {
        if self.error.is_none() {
            warn!(odcid = %self.odcid, "qlog output stopped: {}", err);
            self.error = Some(err);
        }
    }
}
