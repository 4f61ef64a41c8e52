// packages/tracer/src/qlog/header.rs
//! qlog `header` objects

use crate::protocol::{
    ByteCount, ConnectionId, ExtendedHeader, Header, PacketNumber, VersionNumber,
};
use crate::qlog::types::PacketType;
use serde::Serialize;

/// Snapshot of a packet header
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PacketHeader {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packet_number: Option<PacketNumber>,

    #[serde(skip_serializing_if = "is_zero")]
    pub payload_length: ByteCount,

    #[serde(skip_serializing_if = "is_zero")]
    pub packet_size: ByteCount,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionNumber>,

    /// Absent for short header packets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scil: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scid: Option<ConnectionId>,

    pub dcil: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dcid: Option<ConnectionId>,
}

fn is_zero(v: &ByteCount) -> bool {
    *v == 0
}

fn non_empty(cid: &ConnectionId) -> Option<ConnectionId> {
    (!cid.is_empty()).then_some(*cid)
}

impl PacketHeader {
    /// Header without a packet number (Retry, Version Negotiation)
    pub fn from_header(hdr: &Header) -> Self {
        let packet_type = PacketType::from_header(hdr);
        let long = packet_type != PacketType::OneRtt;

        Self {
            packet_number: None,
            payload_length: if long { hdr.length } else { 0 },
            packet_size: 0,
            version: (hdr.version.0 != 0).then_some(hdr.version),
            scil: long.then(|| hdr.src_connection_id.len()),
            scid: if long { non_empty(&hdr.src_connection_id) } else { None },
            dcil: hdr.dest_connection_id.len(),
            dcid: non_empty(&hdr.dest_connection_id),
        }
    }

    pub fn from_extended(hdr: &ExtendedHeader, packet_size: ByteCount) -> Self {
        let mut header = Self::from_header(&hdr.header);
        header.packet_number = Some(hdr.packet_number);
        header.packet_size = packet_size;
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::LongHeaderType;
    use serde_json::json;

    #[test]
    fn test_short_header() {
        let dcid = ConnectionId::from_slice(&[0xaa, 0xbb]).unwrap();
        let hdr = ExtendedHeader::new(Header::short(dcid), 42);

        let value = serde_json::to_value(PacketHeader::from_extended(&hdr, 1252)).unwrap();
        assert_eq!(
            value,
            json!({"packet_number": 42, "packet_size": 1252, "dcil": 2, "dcid": "aabb"})
        );
    }

    #[test]
    fn test_long_header() {
        let scid = ConnectionId::from_slice(&[1, 2, 3, 4]).unwrap();
        let hdr = Header::long(
            LongHeaderType::Initial,
            VersionNumber(0xff00_001d),
            scid,
            ConnectionId::empty(),
        )
        .with_length(1200);

        let value = serde_json::to_value(PacketHeader::from_extended(&ExtendedHeader::new(hdr, 0), 0))
            .unwrap();
        assert_eq!(
            value,
            json!({
                "packet_number": 0,
                "payload_length": 1200,
                "version": "ff00001d",
                "scil": 4,
                "scid": "01020304",
                "dcil": 0
            })
        );
    }

    #[test]
    fn test_retry_header_has_no_packet_number() {
        let cid = ConnectionId::from_slice(&[9]).unwrap();
        let hdr = Header::long(LongHeaderType::Retry, VersionNumber(1), cid, cid);

        let value = serde_json::to_value(PacketHeader::from_header(&hdr)).unwrap();
        assert!(value.get("packet_number").is_none());
        assert_eq!(value["scid"], "09");
    }
}
