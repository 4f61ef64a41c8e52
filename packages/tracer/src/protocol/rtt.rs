// packages/tracer/src/protocol/rtt.rs
//! Round-trip-time statistics

use std::time::Duration;

/// RTT estimator state at the time of a metrics update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RttStats {
    pub min_rtt: Duration,
    pub smoothed_rtt: Duration,
    pub latest_rtt: Duration,
    pub mean_deviation: Duration,
}
