// packages/tracer/src/utils/config.rs
//! Tracer configuration
//!
//! `TracerConfig` is the programmatic knob set for a single tracer.
//! `QlogSettings` is loaded from the environment (`QLOG_*`) and an optional
//! `qlog-tracer` config file, and drives `QlogDirectory`.

use crate::observability::LogFormat;
use crate::recording::compressor::CompressionLevel;
use crate::utils::errors::{Result, TracerError};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Default capacity of the event queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 50;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "QLOG";

/// Per-tracer configuration
#[derive(Debug, Clone)]
pub struct TracerConfig {
    /// Events buffered between producers and the writer before producers block
    pub queue_capacity: usize,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl TracerConfig {
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(TracerError::Config(
                "queue_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings loaded from the environment / config file
#[derive(Debug, Clone, Deserialize)]
pub struct QlogSettings {
    /// Directory qlog files are written to (`QLOG_DIR`); unset disables qlog
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// zstd compression for written files (`QLOG_COMPRESSION`)
    #[serde(default)]
    pub compression: Option<CompressionLevel>,

    /// Event queue capacity (`QLOG_QUEUE_CAPACITY`)
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Log output format (`QLOG_LOG_FORMAT`)
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

impl Default for QlogSettings {
    fn default() -> Self {
        Self {
            dir: None,
            compression: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            log_format: LogFormat::default(),
        }
    }
}

impl QlogSettings {
    /// Load settings from `qlog-tracer.{toml,json,yaml}` (optional) and `QLOG_*`
    pub fn load() -> Result<Self> {
        let cfg = Config::builder()
            .add_source(File::with_name("qlog-tracer").required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        Self::from_config(cfg)
    }

    /// Deserialize and validate settings from an already built `Config`
    pub fn from_config(cfg: Config) -> Result<Self> {
        let settings: QlogSettings = cfg.try_deserialize()?;
        settings.tracer_config().validate()?;
        Ok(settings)
    }

    pub fn tracer_config(&self) -> TracerConfig {
        TracerConfig::default().with_queue_capacity(self.queue_capacity)
    }
}
