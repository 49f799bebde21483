//! Receiver configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use qcast_core::SYMBOL_CAPACITY;

/// Top-level configuration for the receiver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecvConfig {
    /// Reception settings.
    pub receive: ReceiveConfig,
    /// Logging.
    pub logging: LoggingConfig,
}

/// Reception settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiveConfig {
    /// Max scanned payload length accepted from the input stream.
    pub max_payload_len: usize,
    /// Buffered scans between the reader and the session.
    pub channel_capacity: usize,
}

/// Logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level.
    pub level: String,
}

impl Default for RecvConfig {
    fn default() -> Self {
        Self {
            receive: ReceiveConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ReceiveConfig {
    fn default() -> Self {
        Self {
            max_payload_len: SYMBOL_CAPACITY,
            channel_capacity: 64,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

impl RecvConfig {
    /// Load from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
