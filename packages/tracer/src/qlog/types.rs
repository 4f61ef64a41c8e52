// packages/tracer/src/qlog/types.rs
//! Enumerations that appear in qlog event data

use crate::protocol::{EncryptionLevel, Header, HeaderForm, LongHeaderType, Perspective};
use serde::Serialize;

/// Event category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Transport,
    Recovery,
    Security,
}

/// qlog packet type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PacketType {
    #[serde(rename = "initial")]
    Initial,
    #[serde(rename = "handshake")]
    Handshake,
    #[serde(rename = "0RTT")]
    ZeroRtt,
    #[serde(rename = "1RTT")]
    OneRtt,
    #[serde(rename = "retry")]
    Retry,
    #[serde(rename = "version_negotiation")]
    VersionNegotiation,
}

impl PacketType {
    /// Derive the packet type from a parsed header
    pub fn from_header(hdr: &Header) -> Self {
        match hdr.form {
            HeaderForm::Short => PacketType::OneRtt,
            HeaderForm::Long(_) if hdr.version.0 == 0 => PacketType::VersionNegotiation,
            HeaderForm::Long(LongHeaderType::Initial) => PacketType::Initial,
            HeaderForm::Long(LongHeaderType::Handshake) => PacketType::Handshake,
            HeaderForm::Long(LongHeaderType::ZeroRtt) => PacketType::ZeroRtt,
            HeaderForm::Long(LongHeaderType::Retry) => PacketType::Retry,
        }
    }

    /// Packet type carrying data at the given encryption level
    pub fn from_encryption_level(level: EncryptionLevel) -> Self {
        match level {
            EncryptionLevel::Initial => PacketType::Initial,
            EncryptionLevel::Handshake => PacketType::Handshake,
            EncryptionLevel::ZeroRtt => PacketType::ZeroRtt,
            EncryptionLevel::OneRtt => PacketType::OneRtt,
        }
    }
}

/// Why a packet was declared lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PacketLossReason {
    ReorderingThreshold,
    TimeThreshold,
}

/// Which secret was installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KeyType {
    #[serde(rename = "server_initial_secret")]
    ServerInitial,
    #[serde(rename = "client_initial_secret")]
    ClientInitial,
    #[serde(rename = "server_handshake_secret")]
    ServerHandshake,
    #[serde(rename = "client_handshake_secret")]
    ClientHandshake,
    #[serde(rename = "server_0rtt_secret")]
    Server0Rtt,
    #[serde(rename = "client_0rtt_secret")]
    Client0Rtt,
    #[serde(rename = "server_1rtt_secret")]
    Server1Rtt,
    #[serde(rename = "client_1rtt_secret")]
    Client1Rtt,
}

impl KeyType {
    pub fn new(level: EncryptionLevel, perspective: Perspective) -> Self {
        match (level, perspective) {
            (EncryptionLevel::Initial, Perspective::Client) => KeyType::ClientInitial,
            (EncryptionLevel::Initial, Perspective::Server) => KeyType::ServerInitial,
            (EncryptionLevel::Handshake, Perspective::Client) => KeyType::ClientHandshake,
            (EncryptionLevel::Handshake, Perspective::Server) => KeyType::ServerHandshake,
            (EncryptionLevel::ZeroRtt, Perspective::Client) => KeyType::Client0Rtt,
            (EncryptionLevel::ZeroRtt, Perspective::Server) => KeyType::Server0Rtt,
            (EncryptionLevel::OneRtt, Perspective::Client) => KeyType::Client1Rtt,
            (EncryptionLevel::OneRtt, Perspective::Server) => KeyType::Server1Rtt,
        }
    }
}

/// What caused a key update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyUpdateTrigger {
    /// New keys derived by the TLS stack
    Tls,
    /// Key phase bit flipped by the peer
    Remote,
    /// Key update initiated locally
    Local,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{ConnectionId, VersionNumber};

    fn cid() -> ConnectionId {
        ConnectionId::from_slice(&[1, 2, 3, 4]).unwrap()
    }

    #[test]
    fn test_packet_type_from_header() {
        let v1 = VersionNumber(1);
        let long = |t| Header::long(t, v1, cid(), cid());

        assert_eq!(PacketType::from_header(&Header::short(cid())), PacketType::OneRtt);
        assert_eq!(PacketType::from_header(&long(LongHeaderType::Initial)), PacketType::Initial);
        assert_eq!(PacketType::from_header(&long(LongHeaderType::Handshake)), PacketType::Handshake);
        assert_eq!(PacketType::from_header(&long(LongHeaderType::ZeroRtt)), PacketType::ZeroRtt);
        assert_eq!(PacketType::from_header(&long(LongHeaderType::Retry)), PacketType::Retry);

        let vn = Header::long(LongHeaderType::Initial, VersionNumber(0), cid(), cid());
        assert_eq!(PacketType::from_header(&vn), PacketType::VersionNegotiation);
    }

    #[test]
    fn test_packet_type_names() {
        assert_eq!(serde_json::to_string(&PacketType::ZeroRtt).unwrap(), "\"0RTT\"");
        assert_eq!(serde_json::to_string(&PacketType::OneRtt).unwrap(), "\"1RTT\"");
        assert_eq!(
            serde_json::to_string(&PacketType::VersionNegotiation).unwrap(),
            "\"version_negotiation\""
        );
    }

    #[test]
    fn test_key_type() {
        assert_eq!(
            KeyType::new(EncryptionLevel::Handshake, Perspective::Server),
            KeyType::ServerHandshake
        );
        assert_eq!(
            serde_json::to_string(&KeyType::new(EncryptionLevel::ZeroRtt, Perspective::Client))
                .unwrap(),
            "\"client_0rtt_secret\""
        );
    }

    #[test]
    fn test_loss_reason_names() {
        assert_eq!(
            serde_json::to_string(&PacketLossReason::ReorderingThreshold).unwrap(),
            "\"reordering_threshold\""
        );
        assert_eq!(serde_json::to_string(&KeyUpdateTrigger::Remote).unwrap(), "\"remote\"");
    }
}
