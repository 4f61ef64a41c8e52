// packages/tracer/src/utils/mod.rs
//! Common utilities
//!
//! - **errors**: Crate-wide error type and `Result` alias
//! - **config**: Tracer and environment settings

pub mod config;
pub mod errors;

pub use config::{QlogSettings, TracerConfig};
pub use errors::{Result, TracerError};
