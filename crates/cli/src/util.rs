// Path: crates/cli/src/util.rs

use anyhow::{Context, Result};
use gradebook_types::app::{AccountId, LedgerEvent};
use gradebook_types::config::LedgerConfig;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::sync::broadcast::{self, error::TryRecvError};

/// Loads the configuration file if one is given, then applies command-line overrides.
pub fn load_config(path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<LedgerConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            toml::from_str(&raw)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => LedgerConfig::default(),
    };
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }
    Ok(config)
}

pub fn parse_account(s: &str) -> Result<AccountId, String> {
    AccountId::from_hex(s)
}

/// Prints every queued notification to stdout as one JSON object per line.
pub fn print_events(events: &mut broadcast::Receiver<LedgerEvent>) -> Result<()> {
    loop {
        match events.try_recv() {
            Ok(event) => println!("{}", serde_json::to_string(&event)?),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!(target: "cli", skipped, "notification buffer overflowed");
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return Ok(()),
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
