// packages/tracer/src/recording/directory.rs
//! Per-connection qlog files in a directory
//!
//! Files are named `<odcid>_<perspective>.qlog`, with a `.zst` extension
//! added when compression is enabled.

use crate::protocol::{ConnectionId, Perspective};
use crate::recording::compressor::{CompressionLevel, ZstdSink};
use crate::recording::recorder::Tracer;
use crate::recording::sink::FileSink;
use crate::utils::config::{QlogSettings, TracerConfig};
use crate::utils::errors::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Creates one tracer per connection, writing into a directory
#[derive(Debug, Clone)]
pub struct QlogDirectory {
    dir: PathBuf,
    compression: Option<CompressionLevel>,
    tracer_config: TracerConfig,
}

impl QlogDirectory {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            compression: None,
            tracer_config: TracerConfig::default(),
        }
    }

    /// `None` when no directory is configured
    pub fn from_settings(settings: &QlogSettings) -> Option<Self> {
        let dir = settings.dir.as_ref()?;
        Some(Self {
            dir: dir.clone(),
            compression: settings.compression,
            tracer_config: settings.tracer_config(),
        })
    }

    /// Load `QlogSettings` from the environment; `None` when `QLOG_DIR` is unset
    pub fn from_env() -> Result<Option<Self>> {
        let settings = QlogSettings::load()?;
        Ok(Self::from_settings(&settings))
    }

    pub fn with_compression(mut self, level: CompressionLevel) -> Self {
        self.compression = Some(level);
        self
    }

    pub fn with_tracer_config(mut self, config: TracerConfig) -> Self {
        self.tracer_config = config;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the qlog file for a connection
    pub fn path_for(&self, perspective: Perspective, odcid: ConnectionId) -> PathBuf {
        let mut name = format!("{}_{}.qlog", odcid, perspective);
        if self.compression.is_some() {
            name.push_str(".zst");
        }
        self.dir.join(name)
    }

    /// Open the connection's file and start a tracer on it
    pub fn create_tracer(&self, perspective: Perspective, odcid: ConnectionId) -> Result<Tracer> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(perspective, odcid);
        let file = FileSink::create(&path)?;
        info!("Writing qlog to {:?}", path);

        let config = self.tracer_config.clone();
        match self.compression {
            Some(level) => {
                Tracer::with_config(ZstdSink::new(file, level)?, perspective, odcid, config)
            }
            None => Tracer::with_config(file, perspective, odcid, config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::Value;
    use tempfile::tempdir;

    fn odcid() -> ConnectionId {
        ConnectionId::from_slice(&[0xab, 0xcd]).unwrap()
    }

    #[test]
    fn test_path_for() {
        let dir = QlogDirectory::new("/var/log/qlog");
        assert_eq!(
            dir.path_for(Perspective::Server, odcid()),
            PathBuf::from("/var/log/qlog/abcd_server.qlog")
        );

        let compressed = dir.with_compression(CompressionLevel::Fast);
        assert_eq!(
            compressed.path_for(Perspective::Client, odcid()),
            PathBuf::from("/var/log/qlog/abcd_client.qlog.zst")
        );
    }

    #[test]
    fn test_from_settings() {
        assert!(QlogDirectory::from_settings(&QlogSettings::default()).is_none());

        let settings = QlogSettings {
            dir: Some(PathBuf::from("/tmp/q")),
            compression: Some(CompressionLevel::Best),
            queue_capacity: 8,
            ..Default::default()
        };
        let dir = QlogDirectory::from_settings(&settings).unwrap();
        assert_eq!(dir.dir(), Path::new("/tmp/q"));
        assert_eq!(dir.tracer_config.queue_capacity, 8);
        assert_eq!(dir.compression, Some(CompressionLevel::Best));
    }

    #[test]
    fn test_create_tracer_writes_file() {
        let tmp = tempdir().unwrap();
        let dir = QlogDirectory::new(tmp.path().join("nested"));

        let tracer = dir.create_tracer(Perspective::Server, odcid()).unwrap();
        tracer.updated_pto_count(Utc::now(), 2);
        tracer.export().unwrap();

        let data = fs::read(dir.path_for(Perspective::Server, odcid())).unwrap();
        let doc: Value = serde_json::from_slice(&data).unwrap();
        assert_eq!(doc["traces"][0]["events"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_create_compressed_tracer() {
        let tmp = tempdir().unwrap();
        let dir = QlogDirectory::new(tmp.path()).with_compression(CompressionLevel::Balanced);

        let tracer = dir.create_tracer(Perspective::Client, odcid()).unwrap();
        tracer.updated_key(Utc::now(), crate::protocol::KeyPhase(1), true);
        tracer.export().unwrap();

        let compressed = fs::read(dir.path_for(Perspective::Client, odcid())).unwrap();
        let data = zstd::decode_all(compressed.as_slice()).unwrap();
        let doc: Value = serde_json::from_slice(&data).unwrap();
        assert_eq!(doc["traces"][0]["events"].as_array().unwrap().len(), 2);
    }
}
