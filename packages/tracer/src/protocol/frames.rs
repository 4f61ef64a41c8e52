// packages/tracer/src/protocol/frames.rs
//! Decoded QUIC frames

use crate::protocol::{ByteCount, ConnectionId, PacketNumber, StreamId};
use bytes::Bytes;
use serde::Serialize;
use std::time::Duration;

/// Stream directionality for MAX_STREAMS / STREAMS_BLOCKED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamType {
    Bidirectional,
    Unidirectional,
}

/// Inclusive range of acknowledged packet numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AckRange {
    pub smallest: PacketNumber,
    pub largest: PacketNumber,
}

impl AckRange {
    pub fn new(smallest: PacketNumber, largest: PacketNumber) -> Self {
        Self { smallest, largest }
    }
}

/// ACK frame, ranges ordered from the largest packet number down
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AckFrame {
    pub ranges: Vec<AckRange>,
    pub delay: Duration,
}

/// A decoded frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Ping,
    Ack(AckFrame),
    ResetStream {
        stream_id: StreamId,
        error_code: u64,
        final_size: ByteCount,
    },
    StopSending {
        stream_id: StreamId,
        error_code: u64,
    },
    Crypto {
        offset: ByteCount,
        data: Bytes,
    },
    NewToken {
        token: Bytes,
    },
    Stream {
        stream_id: StreamId,
        offset: ByteCount,
        data: Bytes,
        fin: bool,
    },
    MaxData {
        maximum: ByteCount,
    },
    MaxStreamData {
        stream_id: StreamId,
        maximum: ByteCount,
    },
    MaxStreams {
        stream_type: StreamType,
        maximum: u64,
    },
    DataBlocked {
        limit: ByteCount,
    },
    StreamDataBlocked {
        stream_id: StreamId,
        limit: ByteCount,
    },
    StreamsBlocked {
        stream_type: StreamType,
        limit: u64,
    },
    NewConnectionId {
        sequence_number: u64,
        retire_prior_to: u64,
        connection_id: ConnectionId,
        stateless_reset_token: [u8; 16],
    },
    RetireConnectionId {
        sequence_number: u64,
    },
    PathChallenge {
        data: [u8; 8],
    },
    PathResponse {
        data: [u8; 8],
    },
    ConnectionClose {
        is_application_error: bool,
        error_code: u64,
        /// Frame type that triggered a transport error, if known
        frame_type: Option<u64>,
        reason: String,
    },
    HandshakeDone,
}
