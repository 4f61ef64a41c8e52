// packages/tracer/src/qlog/event.rs
//! qlog events
//!
//! Every event serializes as a four-element array matching the trace's
//! `event_fields`: `[time, category, event, data]`. Time is milliseconds
//! since the Unix epoch with microsecond precision.

use crate::protocol::{ByteCount, ConnectionId, KeyPhase, PacketNumber, VersionNumber};
use crate::qlog::frame::QlogFrame;
use crate::qlog::header::PacketHeader;
use crate::qlog::types::{Category, KeyType, KeyUpdateTrigger, PacketLossReason, PacketType};
use chrono::{DateTime, Utc};
use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// A recorded event. Holds only owned, copied values.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub time: DateTime<Utc>,
    pub details: EventDetails,
}

impl Event {
    pub fn new(time: DateTime<Utc>, details: impl Into<EventDetails>) -> Self {
        Self {
            time,
            details: details.into(),
        }
    }

    pub fn category(&self) -> Category {
        self.details.category()
    }

    pub fn name(&self) -> &'static str {
        self.details.name()
    }
}

impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(4)?;
        tuple.serialize_element(&(self.time.timestamp_micros() as f64 / 1000.0))?;
        tuple.serialize_element(&self.category())?;
        tuple.serialize_element(self.name())?;
        tuple.serialize_element(&self.details)?;
        tuple.end()
    }
}

/// Kind-specific event data
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventDetails {
    ConnectionStarted(ConnectionStarted),
    PacketSent(PacketSent),
    PacketReceived(PacketReceived),
    RetryReceived(RetryReceived),
    PacketBuffered(PacketBuffered),
    MetricsUpdated(MetricsUpdated),
    PacketLost(PacketLost),
    PtoCountUpdated(PtoCountUpdated),
    KeyUpdated(KeyUpdated),
}

impl EventDetails {
    pub fn category(&self) -> Category {
        match self {
            EventDetails::ConnectionStarted(_)
            | EventDetails::PacketSent(_)
            | EventDetails::PacketReceived(_)
            | EventDetails::RetryReceived(_)
            | EventDetails::PacketBuffered(_) => Category::Transport,
            EventDetails::MetricsUpdated(_)
            | EventDetails::PacketLost(_)
            | EventDetails::PtoCountUpdated(_) => Category::Recovery,
            EventDetails::KeyUpdated(_) => Category::Security,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EventDetails::ConnectionStarted(_) => "connection_started",
            EventDetails::PacketSent(_) => "packet_sent",
            EventDetails::PacketReceived(_) | EventDetails::RetryReceived(_) => "packet_received",
            EventDetails::PacketBuffered(_) => "packet_buffered",
            EventDetails::MetricsUpdated(_) | EventDetails::PtoCountUpdated(_) => "metrics_updated",
            EventDetails::PacketLost(_) => "packet_lost",
            EventDetails::KeyUpdated(_) => "key_updated",
        }
    }
}

macro_rules! impl_from_details {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for EventDetails {
                fn from(details: $variant) -> Self {
                    EventDetails::$variant(details)
                }
            }
        )*
    };
}

impl_from_details!(
    ConnectionStarted,
    PacketSent,
    PacketReceived,
    RetryReceived,
    PacketBuffered,
    MetricsUpdated,
    PacketLost,
    PtoCountUpdated,
    KeyUpdated,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IpVersion {
    Ipv4,
    Ipv6,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionStarted {
    pub ip_version: IpVersion,
    pub src_ip: IpAddr,
    pub src_port: u16,
    pub dst_ip: IpAddr,
    pub dst_port: u16,
    pub quic_version: VersionNumber,
    pub src_cid: ConnectionId,
    pub dst_cid: ConnectionId,
}

impl ConnectionStarted {
    pub fn new(
        local: SocketAddr,
        remote: SocketAddr,
        version: VersionNumber,
        src_cid: ConnectionId,
        dst_cid: ConnectionId,
    ) -> Self {
        let ip_version = match local.ip() {
            IpAddr::V4(_) => IpVersion::Ipv4,
            IpAddr::V6(v6) if v6.to_ipv4_mapped().is_some() => IpVersion::Ipv4,
            IpAddr::V6(_) => IpVersion::Ipv6,
        };

        Self {
            ip_version,
            src_ip: local.ip(),
            src_port: local.port(),
            dst_ip: remote.ip(),
            dst_port: remote.port(),
            quic_version: version,
            src_cid,
            dst_cid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PacketSent {
    pub packet_type: PacketType,
    pub header: PacketHeader,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<QlogFrame>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PacketReceived {
    pub packet_type: PacketType,
    pub header: PacketHeader,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<QlogFrame>,
}

/// Logged as a `packet_received` with packet type `retry`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetryReceived {
    packet_type: PacketType,
    pub header: PacketHeader,
}

impl RetryReceived {
    pub fn new(header: PacketHeader) -> Self {
        Self {
            packet_type: PacketType::Retry,
            header,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PacketBuffered {
    pub packet_type: PacketType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsUpdated {
    #[serde(serialize_with = "as_millis")]
    pub min_rtt: Duration,
    #[serde(serialize_with = "as_millis")]
    pub smoothed_rtt: Duration,
    #[serde(serialize_with = "as_millis")]
    pub latest_rtt: Duration,
    #[serde(serialize_with = "as_millis")]
    pub rtt_variance: Duration,
    pub congestion_window: ByteCount,
    pub bytes_in_flight: ByteCount,
    #[serde(skip_serializing_if = "is_zero")]
    pub packets_in_flight: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PacketLost {
    pub packet_type: PacketType,
    pub packet_number: PacketNumber,
    pub trigger: PacketLossReason,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PtoCountUpdated {
    pub pto_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyUpdated {
    pub trigger: KeyUpdateTrigger,
    pub key_type: KeyType,
    /// Not logged for keys installed by TLS
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<KeyPhase>,
}

fn as_millis<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(d.as_nanos() as f64 / 1e6)
}

fn is_zero(v: &usize) -> bool {
    *v == 0
}
