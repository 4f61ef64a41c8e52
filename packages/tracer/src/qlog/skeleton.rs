// packages/tracer/src/qlog/skeleton.rs
//! Document skeleton and its prefix/suffix split
//!
//! The skeleton is encoded once with an empty `events` array. Everything but
//! the final four bytes (`]}]}`: close events, trace, traces, top level) is
//! the prefix; those four bytes are the suffix. Events are written between
//! the two, comma separated.

use crate::protocol::{ConnectionId, Perspective};
use crate::qlog::event::Event;
use crate::utils::errors::{Result, TracerError};
use serde::Serialize;

pub const QLOG_VERSION: &str = "draft-02-wip";

pub const TITLE: &str = "qlog-tracer qlog";

/// Field order of every event array
pub const EVENT_FIELDS: [&str; 4] = ["time", "category", "event", "data"];

/// Length of the closing bytes of the empty-array form
pub const SUFFIX_LEN: usize = 4;

#[derive(Serialize)]
struct TopLevel<'a> {
    qlog_version: &'static str,
    title: &'static str,
    traces: [Trace<'a>; 1],
}

#[derive(Serialize)]
struct Trace<'a> {
    vantage_point: VantagePoint,
    common_fields: CommonFields,
    event_fields: &'static [&'static str],
    events: &'a [Event],
}

#[derive(Serialize)]
struct VantagePoint {
    #[serde(rename = "type")]
    kind: Perspective,
}

#[derive(Serialize)]
struct CommonFields {
    #[serde(rename = "ODCID")]
    odcid: ConnectionId,
    group_id: ConnectionId,
}

/// Encoded prefix and suffix of a trace document
#[derive(Debug, Clone)]
pub struct Skeleton {
    prefix: Vec<u8>,
    suffix: Vec<u8>,
}

impl Skeleton {
    /// Encode the empty document into memory and split it
    pub fn probe(perspective: Perspective, odcid: ConnectionId) -> Result<Self> {
        let doc = TopLevel {
            qlog_version: QLOG_VERSION,
            title: TITLE,
            traces: [Trace {
                vantage_point: VantagePoint { kind: perspective },
                common_fields: CommonFields {
                    odcid,
                    group_id: odcid,
                },
                event_fields: &EVENT_FIELDS,
                events: &[],
            }],
        };

        let mut prefix = serde_json::to_vec(&doc).map_err(TracerError::SkeletonEncode)?;
        let split = prefix.len().saturating_sub(SUFFIX_LEN);
        let suffix = prefix.split_off(split);

        Ok(Self { prefix, suffix })
    }

    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    #[cfg(test)]
    pub fn suffix(&self) -> &[u8] {
        &self.suffix
    }

    pub fn into_suffix(self) -> Vec<u8> {
        self.suffix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qlog::event::PtoCountUpdated;
    use chrono::Utc;
    use serde_json::{json, Value};

    fn odcid() -> ConnectionId {
        ConnectionId::from_slice(&[0xde, 0xad, 0xbe, 0xef]).unwrap()
    }

    #[test]
    fn test_suffix_closes_events_array() {
        let skeleton = Skeleton::probe(Perspective::Server, odcid()).unwrap();
        assert_eq!(skeleton.suffix(), b"]}]}");
        assert!(skeleton.prefix().ends_with(b"\"events\":["));
    }

    #[test]
    fn test_empty_document() {
        let skeleton = Skeleton::probe(Perspective::Client, odcid()).unwrap();
        let mut doc = skeleton.prefix().to_vec();
        doc.extend_from_slice(skeleton.suffix());

        let value: Value = serde_json::from_slice(&doc).unwrap();
        assert_eq!(
            value,
            json!({
                "qlog_version": "draft-02-wip",
                "title": "qlog-tracer qlog",
                "traces": [{
                    "vantage_point": {"type": "client"},
                    "common_fields": {"ODCID": "deadbeef", "group_id": "deadbeef"},
                    "event_fields": ["time", "category", "event", "data"],
                    "events": []
                }]
            })
        );
    }

    #[test]
    fn test_spliced_events() {
        let skeleton = Skeleton::probe(Perspective::Server, odcid()).unwrap();
        let now = Utc::now();

        let mut doc = skeleton.prefix().to_vec();
        for i in 0..3 {
            if i > 0 {
                doc.push(b',');
            }
            let event = Event::new(now, PtoCountUpdated { pto_count: i });
            doc.extend_from_slice(&serde_json::to_vec(&event).unwrap());
        }
        doc.extend_from_slice(skeleton.suffix());

        let value: Value = serde_json::from_slice(&doc).unwrap();
        let events = value["traces"][0]["events"].as_array().unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[2][3]["pto_count"], 2);
    }
}
