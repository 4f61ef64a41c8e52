// packages/tracer/src/protocol/header.rs
//! Decoded packet headers

use crate::protocol::{ByteCount, ConnectionId, PacketNumber, VersionNumber};
use bytes::Bytes;

/// Long header packet types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LongHeaderType {
    Initial,
    ZeroRtt,
    Handshake,
    Retry,
}

/// Header form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderForm {
    Short,
    Long(LongHeaderType),
}

/// Packet header as parsed before header protection is removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub form: HeaderForm,

    /// Zero for version negotiation packets and short headers
    pub version: VersionNumber,

    pub src_connection_id: ConnectionId,
    pub dest_connection_id: ConnectionId,

    /// Length field of long header packets
    pub length: ByteCount,

    /// Token carried by Initial and Retry packets
    pub token: Bytes,
}

impl Header {
    /// Short header (1-RTT) packet
    pub fn short(dest_connection_id: ConnectionId) -> Self {
        Self {
            form: HeaderForm::Short,
            version: VersionNumber(0),
            src_connection_id: ConnectionId::empty(),
            dest_connection_id,
            length: 0,
            token: Bytes::new(),
        }
    }

    /// Long header packet of the given type
    pub fn long(
        packet_type: LongHeaderType,
        version: VersionNumber,
        src_connection_id: ConnectionId,
        dest_connection_id: ConnectionId,
    ) -> Self {
        Self {
            form: HeaderForm::Long(packet_type),
            version,
            src_connection_id,
            dest_connection_id,
            length: 0,
            token: Bytes::new(),
        }
    }

    pub fn with_length(mut self, length: ByteCount) -> Self {
        self.length = length;
        self
    }

    pub fn with_token(mut self, token: impl Into<Bytes>) -> Self {
        self.token = token.into();
        self
    }

    pub fn is_long_header(&self) -> bool {
        matches!(self.form, HeaderForm::Long(_))
    }
}

/// Header with the packet number recovered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedHeader {
    pub header: Header,
    pub packet_number: PacketNumber,
}

impl ExtendedHeader {
    pub fn new(header: Header, packet_number: PacketNumber) -> Self {
        Self {
            header,
            packet_number,
        }
    }
}
