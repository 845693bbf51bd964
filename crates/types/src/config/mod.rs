// Path: crates/types/src/config/mod.rs

//! Configuration structures for a ledger instance.
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Selects the output format of the structured logger.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    Json,
    /// Human-readable lines.
    #[default]
    Pretty,
}

/// Logging settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// The output format.
    #[serde(default)]
    pub log_format: LogFormat,
    /// The default filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            log_filter: default_log_filter(),
        }
    }
}

/// Configuration of an on-disk ledger.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// The directory holding the write-ahead log.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// The WAL file name inside `data_dir`.
    #[serde(default = "default_wal_file")]
    pub wal_file: String,
    /// Whether every commit is fsynced before it is acknowledged.
    #[serde(default = "default_sync_writes")]
    pub sync_writes: bool,
    /// Capacity of the notification broadcast channel.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
    /// Logging settings.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./gradebook-data")
}
fn default_wal_file() -> String {
    "ledger.wal".to_string()
}
fn default_sync_writes() -> bool {
    true
}
fn default_event_buffer() -> usize {
    1024
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            wal_file: default_wal_file(),
            sync_writes: default_sync_writes(),
            event_buffer: default_event_buffer(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl LedgerConfig {
    /// The full path of the write-ahead log.
    pub fn wal_path(&self) -> PathBuf {
        self.data_dir.join(&self.wal_file)
    }
}
