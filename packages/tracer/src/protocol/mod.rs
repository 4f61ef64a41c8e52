// packages/tracer/src/protocol/mod.rs
//! Decoded transport values handed to the tracer
//!
//! The protocol engine owns parsing and connection state. These types are
//! the plain, already-decoded values it passes into the recorder methods:
//!
//! - **header**: Long/short packet headers
//! - **frames**: QUIC frames
//! - **rtt**: Round-trip-time statistics snapshot

pub mod frames;
pub mod header;
pub mod rtt;

pub use frames::{AckFrame, AckRange, Frame, StreamType};
pub use header::{ExtendedHeader, Header, HeaderForm, LongHeaderType};
pub use rtt::RttStats;

use serde::{Serialize, Serializer};
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Byte count (packet sizes, congestion window, bytes in flight)
pub type ByteCount = u64;

/// Packet number
pub type PacketNumber = u64;

/// Stream ID
pub type StreamId = u64;

/// Maximum length of a QUIC connection ID
pub const MAX_CONNECTION_ID_LEN: usize = 20;

/// A connection ID of up to 20 bytes, stored inline
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId {
    bytes: [u8; MAX_CONNECTION_ID_LEN],
    len: u8,
}

impl ConnectionId {
    /// Returns `None` if `bytes` is longer than 20 bytes
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > MAX_CONNECTION_ID_LEN {
            return None;
        }
        let mut buf = [0u8; MAX_CONNECTION_ID_LEN];
        buf[..bytes.len()].copy_from_slice(bytes);
        Some(Self {
            bytes: buf,
            len: bytes.len() as u8,
        })
    }

    pub fn empty() -> Self {
        Self {
            bytes: [0u8; MAX_CONNECTION_ID_LEN],
            len: 0,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.as_bytes()))
    }
}

impl fmt::Debug for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConnectionId({})", self)
    }
}

impl Serialize for ConnectionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// QUIC version, rendered as lowercase hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VersionNumber(pub u32);

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

impl Serialize for VersionNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Which end of the connection the trace is recorded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Perspective {
    Client,
    Server,
}

impl Perspective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Perspective::Client => "client",
            Perspective::Server => "server",
        }
    }
}

impl fmt::Display for Perspective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Packet protection level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncryptionLevel {
    Initial,
    Handshake,
    ZeroRtt,
    OneRtt,
}

/// Key phase generation counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct KeyPhase(pub u64);

/// Endpoint address as reported by the socket layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportAddr {
    Udp(SocketAddr),
    Tcp(SocketAddr),
    Unix(PathBuf),
}

impl TransportAddr {
    /// The socket address, if this is a UDP endpoint
    pub fn as_udp(&self) -> Option<SocketAddr> {
        match self {
            TransportAddr::Udp(addr) => Some(*addr),
            _ => None,
        }
    }
}
