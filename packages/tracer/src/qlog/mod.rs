// packages/tracer/src/qlog/mod.rs
//! qlog document model
//!
//! - **event**: Recorded events and their `[time, category, event, data]` encoding
//! - **frame**: Frame snapshots
//! - **header**: Packet header snapshots
//! - **types**: Packet types, key types, triggers
//! - **skeleton**: The fixed document around the `events` array
//!
//! # Document layout
//!
//! ```text
//! {"qlog_version":"draft-02-wip","title":...,"traces":[{
//!     "vantage_point":{"type":"server"},
//!     "common_fields":{"ODCID":...,"group_id":...},
//!     "event_fields":["time","category","event","data"],
//!     "events":[ <event>,<event>,... ]}]}
//!              ^ prefix ends here      ^ suffix
//! ```

pub mod event;
pub mod frame;
pub mod header;
pub mod skeleton;
pub mod types;

pub use event::{
    ConnectionStarted, Event, EventDetails, IpVersion, KeyUpdated, MetricsUpdated, PacketBuffered,
    PacketLost, PacketReceived, PacketSent, PtoCountUpdated, RetryReceived,
};
pub use frame::{ErrorSpace, QlogFrame};
pub use header::PacketHeader;
pub use skeleton::Skeleton;
pub use types::{Category, KeyType, KeyUpdateTrigger, PacketLossReason, PacketType};
