// packages/tracer/src/recording/event_queue.rs
//! Bounded FIFO event queue
//!
//! Many producers, one consumer. A full queue blocks the producer until the
//! writer makes room; nothing is dropped or reordered. The queue closes when
//! the producer side is dropped, after which the consumer drains what is
//! left and stops.

use crate::qlog::Event;
use crossbeam_channel::{Receiver, Sender};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Counters {
    push_count: AtomicU64,
    pop_count: AtomicU64,
    refused_count: AtomicU64,
}

/// Create a queue of the given capacity
pub fn bounded(capacity: usize) -> (EventQueue, EventStream) {
    let (tx, rx) = crossbeam_channel::bounded(capacity);
    let counters = Arc::new(Counters::default());

    (
        EventQueue {
            tx,
            capacity,
            counters: Arc::clone(&counters),
        },
        EventStream { rx, counters },
    )
}

/// Producer side of the queue
#[derive(Debug)]
pub struct EventQueue {
    tx: Sender<Event>,
    capacity: usize,
    counters: Arc<Counters>,
}

impl EventQueue {
    /// Enqueue an event, blocking while the queue is full
    ///
    /// Returns the event back if the consumer has gone away.
    pub fn push(&self, event: Event) -> Result<(), Event> {
        match self.tx.send(event) {
            Ok(()) => {
                self.counters.push_count.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(err) => {
                self.counters.refused_count.fetch_add(1, Ordering::Relaxed);
                Err(err.into_inner())
            }
        }
    }

    /// Close the queue for new input
    pub fn close(self) {
        drop(self);
    }

    pub fn stats(&self) -> QueueStats {
        QueueStats {
            push_count: self.counters.push_count.load(Ordering::Relaxed),
            pop_count: self.counters.pop_count.load(Ordering::Relaxed),
            refused_count: self.counters.refused_count.load(Ordering::Relaxed),
            current_size: self.tx.len(),
            capacity: self.capacity,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.tx.is_full()
    }

    pub fn len(&self) -> usize {
        self.tx.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Consumer side of the queue; iterates until the queue is closed and empty
#[derive(Debug)]
pub struct EventStream {
    rx: Receiver<Event>,
    counters: Arc<Counters>,
}

impl Iterator for EventStream {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        let event = self.rx.recv().ok()?;
        self.counters.pop_count.fetch_add(1, Ordering::Relaxed);
        Some(event)
    }
}

/// Queue statistics
#[derive(Debug, Clone)]
pub struct QueueStats {
    /// Events accepted
    pub push_count: u64,

    /// Events taken by the writer
    pub pop_count: u64,

    /// Events refused because the writer was gone
    pub refused_count: u64,

    /// Events currently buffered
    pub current_size: usize,

    pub capacity: usize,
}

impl QueueStats {
    pub fn fill_percentage(&self) -> f64 {
        (self.current_size as f64 / self.capacity as f64) * 100.0
    }
}
