//! Protocol constants and transfer configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::QcastError;

/// Default chunk size in base64 characters per frame.
pub const CHUNK_SIZE: usize = 250;

/// Default renderer cadence in milliseconds per frame.
pub const FRAME_INTERVAL_MS: u64 = 400;

/// Payload capacity of the largest supported symbol
/// (QR version 40, byte mode, error correction level L).
pub const SYMBOL_CAPACITY: usize = 2953;

/// Worst-case size of the serialized frame envelope around the chunk:
/// braces, field names, the full content digest, the advisory chunk
/// digest, and two six-digit counters.
pub const ENVELOPE_OVERHEAD: usize = 128;

/// Largest chunk size whose serialized frame still fits one symbol.
pub const fn max_chunk_size() -> usize {
    SYMBOL_CAPACITY - ENVELOPE_OVERHEAD
}

// ── TransferConfig ───────────────────────────────────────────────

/// Tunable parameters of one transfer.
///
/// The chunk size is a configuration constant chosen against the symbol
/// capacity, never computed dynamically at encode time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Chunk size in base64 characters per frame.
    pub chunk_size: usize,

    /// Renderer cadence in milliseconds per frame.
    pub frame_interval_ms: u64,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            frame_interval_ms: FRAME_INTERVAL_MS,
        }
    }
}

impl TransferConfig {
    /// Validate against protocol limits.
    pub fn validate(&self) -> Result<(), QcastError> {
        if self.chunk_size == 0 {
            return Err(QcastError::InvalidConfig("chunk size must be non-zero"));
        }
        if self.chunk_size > max_chunk_size() {
            return Err(QcastError::InvalidConfig(
                "chunk size exceeds symbol capacity headroom",
            ));
        }
        if self.frame_interval_ms == 0 {
            return Err(QcastError::InvalidConfig(
                "frame interval must be non-zero",
            ));
        }
        Ok(())
    }

    /// The renderer cadence as a [`Duration`].
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

// ── Tests ─────────────────────────────────────────────────────────
