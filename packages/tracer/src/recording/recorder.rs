// packages/tracer/src/recording/recorder.rs
//! Connection tracer
//!
//! `Tracer` is what the protocol engine talks to. Each recorder method
//! snapshots its arguments into an [`Event`] and enqueues it; none of them
//! can fail. A full queue blocks the caller until the writer catches up.
//!
//! The tracer is `Sync`, so several threads may record through a shared
//! reference. [`Tracer::export`] consumes it, which closes the queue.

use crate::observability::{describe_metrics, EVENTS_RECORDED, EVENTS_REFUSED};
use crate::protocol::{
    AckFrame, ByteCount, ConnectionId, EncryptionLevel, ExtendedHeader, Frame, Header, KeyPhase,
    PacketNumber, Perspective, RttStats, TransportAddr, VersionNumber,
};
use crate::qlog::{
    ConnectionStarted, Event, EventDetails, KeyType, KeyUpdateTrigger, KeyUpdated, MetricsUpdated,
    PacketBuffered, PacketHeader, PacketLossReason, PacketLost, PacketReceived, PacketSent,
    PacketType, PtoCountUpdated, QlogFrame, RetryReceived,
};
use crate::recording::event_queue::{self, EventQueue, QueueStats};
use crate::recording::exporter::{ExportSummary, Exporter};
use crate::recording::sink::Sink;
use crate::utils::config::TracerConfig;
use crate::utils::errors::{Result, TracerError};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// Records the events of one connection into a qlog document
pub struct Tracer {
    queue: EventQueue,
    exporter: Exporter,
    odcid: ConnectionId,
}

impl Tracer {
    /// Start a tracer writing to `sink`, with the default queue capacity
    pub fn new<S: Sink>(sink: S, perspective: Perspective, odcid: ConnectionId) -> Result<Self> {
        Self::with_config(sink, perspective, odcid, TracerConfig::default())
    }

    pub fn with_config<S: Sink>(
        sink: S,
        perspective: Perspective,
        odcid: ConnectionId,
        config: TracerConfig,
    ) -> Result<Self> {
        config.validate()?;
        describe_metrics();

        let (queue, stream) = event_queue::bounded(config.queue_capacity);
        let exporter = Exporter::spawn(Box::new(sink), perspective, odcid, stream)?;

        info!(%odcid, %perspective, capacity = config.queue_capacity, "qlog tracer started");

        Ok(Self {
            queue,
            exporter,
            odcid,
        })
    }

    pub fn odcid(&self) -> ConnectionId {
        self.odcid
    }

    pub fn queue_stats(&self) -> QueueStats {
        self.queue.stats()
    }

    /// Close the queue, wait for the writer to drain and terminate the document
    ///
    /// Returns the first write/encode error if one occurred while streaming;
    /// in that case the sink is neither terminated nor closed.
    pub fn export(self) -> Result<ExportSummary> {
        debug!(odcid = %self.odcid, "closing qlog event queue");
        self.queue.close();
        self.exporter.finish()
    }

    /// [`export`](Self::export) on tokio's blocking pool
    pub async fn export_async(self) -> Result<ExportSummary> {
        tokio::task::spawn_blocking(move || self.export())
            .await
            .map_err(|_| TracerError::WriterPanicked)?
    }

    fn record(&self, time: DateTime<Utc>, details: impl Into<EventDetails>) {
        match self.queue.push(Event::new(time, details)) {
            Ok(()) => metrics::counter!(EVENTS_RECORDED).increment(1),
            Err(event) => {
                metrics::counter!(EVENTS_REFUSED).increment(1);
                debug!(odcid = %self.odcid, event = event.name(), "qlog writer gone, event dropped");
            }
        }
    }

    /// Connection start; ignored unless both addresses are UDP
    pub fn started_connection(
        &self,
        time: DateTime<Utc>,
        local: &TransportAddr,
        remote: &TransportAddr,
        version: VersionNumber,
        src_conn_id: ConnectionId,
        dest_conn_id: ConnectionId,
    ) {
        let (Some(local), Some(remote)) = (local.as_udp(), remote.as_udp()) else {
            return;
        };

        self.record(
            time,
            ConnectionStarted::new(local, remote, version, src_conn_id, dest_conn_id),
        );
    }

    /// Packet sent; an ACK passed separately is logged as the first frame
    pub fn sent_packet(
        &self,
        time: DateTime<Utc>,
        hdr: &ExtendedHeader,
        packet_size: ByteCount,
        ack: Option<&AckFrame>,
        frames: &[Frame],
    ) {
        let mut fs = Vec::with_capacity(frames.len() + usize::from(ack.is_some()));
        if let Some(ack) = ack {
            fs.push(QlogFrame::from_ack(ack));
        }
        fs.extend(frames.iter().map(QlogFrame::from));

        self.record(
            time,
            PacketSent {
                packet_type: PacketType::from_header(&hdr.header),
                header: PacketHeader::from_extended(hdr, packet_size),
                frames: fs,
            },
        );
    }

    pub fn received_packet(
        &self,
        time: DateTime<Utc>,
        hdr: &ExtendedHeader,
        packet_size: ByteCount,
        frames: &[Frame],
    ) {
        self.record(
            time,
            PacketReceived {
                packet_type: PacketType::from_header(&hdr.header),
                header: PacketHeader::from_extended(hdr, packet_size),
                frames: frames.iter().map(QlogFrame::from).collect(),
            },
        );
    }

    pub fn received_retry(&self, time: DateTime<Utc>, hdr: &Header) {
        self.record(time, RetryReceived::new(PacketHeader::from_header(hdr)));
    }

    /// Packet buffered because its keys are not available yet
    pub fn buffered_packet(&self, time: DateTime<Utc>, packet_type: PacketType) {
        self.record(time, PacketBuffered { packet_type });
    }

    pub fn updated_metrics(
        &self,
        time: DateTime<Utc>,
        rtt_stats: &RttStats,
        cwnd: ByteCount,
        bytes_in_flight: ByteCount,
        packets_in_flight: usize,
    ) {
        self.record(
            time,
            MetricsUpdated {
                min_rtt: rtt_stats.min_rtt,
                smoothed_rtt: rtt_stats.smoothed_rtt,
                latest_rtt: rtt_stats.latest_rtt,
                rtt_variance: rtt_stats.mean_deviation,
                congestion_window: cwnd,
                bytes_in_flight,
                packets_in_flight,
            },
        );
    }

    pub fn lost_packet(
        &self,
        time: DateTime<Utc>,
        enc_level: EncryptionLevel,
        pn: PacketNumber,
        reason: PacketLossReason,
    ) {
        self.record(
            time,
            PacketLost {
                packet_type: PacketType::from_encryption_level(enc_level),
                packet_number: pn,
                trigger: reason,
            },
        );
    }

    pub fn updated_pto_count(&self, time: DateTime<Utc>, value: u32) {
        self.record(time, PtoCountUpdated { pto_count: value });
    }

    /// Keys installed by the TLS stack
    pub fn updated_key_from_tls(
        &self,
        time: DateTime<Utc>,
        enc_level: EncryptionLevel,
        perspective: Perspective,
    ) {
        self.record(
            time,
            KeyUpdated {
                trigger: KeyUpdateTrigger::Tls,
                key_type: KeyType::new(enc_level, perspective),
                generation: None,
            },
        );
    }

    /// 1-RTT key update. Both directions roll over together, so this records
    /// one event for the client key and one for the server key.
    pub fn updated_key(&self, time: DateTime<Utc>, generation: KeyPhase, remote: bool) {
        let trigger = if remote {
            KeyUpdateTrigger::Remote
        } else {
            KeyUpdateTrigger::Local
        };

        for key_type in [KeyType::Client1Rtt, KeyType::Server1Rtt] {
            self.record(
                time,
                KeyUpdated {
                    trigger,
                    key_type,
                    generation: Some(generation),
                },
            );
        }
    }
}
