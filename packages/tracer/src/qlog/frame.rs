// packages/tracer/src/qlog/frame.rs
//! qlog frame objects
//!
//! Frames are snapshotted when recorded: payload bytes are reduced to their
//! length, tokens and path data are hex encoded.

use crate::protocol::{AckFrame, ByteCount, ConnectionId, Frame, StreamId, StreamType};
use serde::Serialize;

/// Error space of a CONNECTION_CLOSE frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSpace {
    Transport,
    Application,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "frame_type", rename_all = "snake_case")]
pub enum QlogFrame {
    Ping,
    Ack {
        /// Milliseconds; omitted when zero
        #[serde(skip_serializing_if = "Option::is_none")]
        ack_delay: Option<f64>,
        /// `[pn]` for single packets, `[smallest, largest]` otherwise, ascending
        acked_ranges: Vec<Vec<u64>>,
    },
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
        length: ByteCount,
    },
    NewToken {
        length: usize,
        token: String,
    },
    Stream {
        stream_id: StreamId,
        offset: ByteCount,
        length: ByteCount,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
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
        length: usize,
        connection_id: ConnectionId,
        stateless_reset_token: String,
    },
    RetireConnectionId {
        sequence_number: u64,
    },
    PathChallenge {
        data: String,
    },
    PathResponse {
        data: String,
    },
    ConnectionClose {
        error_space: ErrorSpace,
        error_code: u64,
        reason: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        trigger_frame_type: Option<u64>,
    },
    HandshakeDone,
}

impl QlogFrame {
    pub fn from_ack(ack: &AckFrame) -> Self {
        let delay_ms = ack.delay.as_nanos() as f64 / 1e6;
        let acked_ranges = ack
            .ranges
            .iter()
            .rev()
            .map(|r| {
                if r.smallest == r.largest {
                    vec![r.smallest]
                } else {
                    vec![r.smallest, r.largest]
                }
            })
            .collect();

        QlogFrame::Ack {
            ack_delay: (delay_ms > 0.0).then_some(delay_ms),
            acked_ranges,
        }
    }
}

impl From<&Frame> for QlogFrame {
    fn from(frame: &Frame) -> Self {
        match frame {
            Frame::Ping => QlogFrame::Ping,
            Frame::Ack(ack) => QlogFrame::from_ack(ack),
            Frame::ResetStream {
                stream_id,
                error_code,
                final_size,
            } => QlogFrame::ResetStream {
                stream_id: *stream_id,
                error_code: *error_code,
                final_size: *final_size,
            },
            Frame::StopSending {
                stream_id,
                error_code,
            } => QlogFrame::StopSending {
                stream_id: *stream_id,
                error_code: *error_code,
            },
            Frame::Crypto { offset, data } => QlogFrame::Crypto {
                offset: *offset,
                length: data.len() as ByteCount,
            },
            Frame::NewToken { token } => QlogFrame::NewToken {
                length: token.len(),
                token: hex::encode(token),
            },
            Frame::Stream {
                stream_id,
                offset,
                data,
                fin,
            } => QlogFrame::Stream {
                stream_id: *stream_id,
                offset: *offset,
                length: data.len() as ByteCount,
                fin: *fin,
            },
            Frame::MaxData { maximum } => QlogFrame::MaxData { maximum: *maximum },
            Frame::MaxStreamData { stream_id, maximum } => QlogFrame::MaxStreamData {
                stream_id: *stream_id,
                maximum: *maximum,
            },
            Frame::MaxStreams {
                stream_type,
                maximum,
            } => QlogFrame::MaxStreams {
                stream_type: *stream_type,
                maximum: *maximum,
            },
            Frame::DataBlocked { limit } => QlogFrame::DataBlocked { limit: *limit },
            Frame::StreamDataBlocked { stream_id, limit } => QlogFrame::StreamDataBlocked {
                stream_id: *stream_id,
                limit: *limit,
            },
            Frame::StreamsBlocked { stream_type, limit } => QlogFrame::StreamsBlocked {
                stream_type: *stream_type,
                limit: *limit,
            },
            Frame::NewConnectionId {
                sequence_number,
                retire_prior_to,
                connection_id,
                stateless_reset_token,
            } => QlogFrame::NewConnectionId {
                sequence_number: *sequence_number,
                retire_prior_to: *retire_prior_to,
                length: connection_id.len(),
                connection_id: *connection_id,
                stateless_reset_token: hex::encode(stateless_reset_token),
            },
            Frame::RetireConnectionId { sequence_number } => QlogFrame::RetireConnectionId {
                sequence_number: *sequence_number,
            },
            Frame::PathChallenge { data } => QlogFrame::PathChallenge { data: hex::encode(data) },
            Frame::PathResponse { data } => QlogFrame::PathResponse { data: hex::encode(data) },
            Frame::ConnectionClose {
                is_application_error,
                error_code,
                frame_type,
                reason,
            } => QlogFrame::ConnectionClose {
                error_space: if *is_application_error {
                    ErrorSpace::Application
                } else {
                    ErrorSpace::Transport
                },
                error_code: *error_code,
                reason: reason.clone(),
                trigger_frame_type: if *is_application_error { None } else { *frame_type },
            },
            Frame::HandshakeDone => QlogFrame::HandshakeDone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::AckRange;
    use bytes::Bytes;
    use serde_json::json;
    use std::time::Duration;

    fn to_json(frame: &Frame) -> serde_json::Value {
        serde_json::to_value(QlogFrame::from(frame)).unwrap()
    }

    #[test]
    fn test_ping() {
        assert_eq!(to_json(&Frame::Ping), json!({"frame_type": "ping"}));
    }

    #[test]
    fn test_ack_ranges_ascending() {
        let ack = AckFrame {
            ranges: vec![AckRange::new(10, 12), AckRange::new(5, 5), AckRange::new(1, 3)],
            delay: Duration::from_micros(1500),
        };

        assert_eq!(
            to_json(&Frame::Ack(ack)),
            json!({
                "frame_type": "ack",
                "ack_delay": 1.5,
                "acked_ranges": [[1, 3], [5], [10, 12]]
            })
        );
    }

    #[test]
    fn test_ack_without_delay() {
        let ack = AckFrame {
            ranges: vec![AckRange::new(0, 0)],
            delay: Duration::ZERO,
        };
        let value = to_json(&Frame::Ack(ack));
        assert!(value.get("ack_delay").is_none());
    }

    #[test]
    fn test_stream_frame_snapshots_length() {
        let frame = Frame::Stream {
            stream_id: 4,
            offset: 100,
            data: Bytes::from_static(b"hello"),
            fin: false,
        };

        assert_eq!(
            to_json(&frame),
            json!({"frame_type": "stream", "stream_id": 4, "offset": 100, "length": 5})
        );

        let fin = Frame::Stream {
            stream_id: 4,
            offset: 105,
            data: Bytes::new(),
            fin: true,
        };
        assert_eq!(to_json(&fin)["fin"], true);
    }

    #[test]
    fn test_new_connection_id() {
        let frame = Frame::NewConnectionId {
            sequence_number: 1,
            retire_prior_to: 0,
            connection_id: ConnectionId::from_slice(&[0xca, 0xfe]).unwrap(),
            stateless_reset_token: [0x11; 16],
        };

        let value = to_json(&frame);
        assert_eq!(value["frame_type"], "new_connection_id");
        assert_eq!(value["length"], 2);
        assert_eq!(value["connection_id"], "cafe");
        assert_eq!(value["stateless_reset_token"], "11".repeat(16));
    }

    #[test]
    fn test_connection_close() {
        let transport = Frame::ConnectionClose {
            is_application_error: false,
            error_code: 0x0a,
            frame_type: Some(0x06),
            reason: "protocol violation".to_string(),
        };
        assert_eq!(
            to_json(&transport),
            json!({
                "frame_type": "connection_close",
                "error_space": "transport",
                "error_code": 10,
                "reason": "protocol violation",
                "trigger_frame_type": 6
            })
        );

        let application = Frame::ConnectionClose {
            is_application_error: true,
            error_code: 0x100,
            frame_type: Some(0x06),
            reason: String::new(),
        };
        let value = to_json(&application);
        assert_eq!(value["error_space"], "application");
        assert!(value.get("trigger_frame_type").is_none());
    }

    #[test]
    fn test_max_streams() {
        let frame = Frame::MaxStreams {
            stream_type: StreamType::Unidirectional,
            maximum: 100,
        };
        assert_eq!(
            to_json(&frame),
            json!({"frame_type": "max_streams", "stream_type": "unidirectional", "maximum": 100})
        );
    }
}
