//! The frame — the unit exchanged over the visual channel.
//!
//! # Wire Format
//!
//! One JSON object per frame, UTF-8, rendered as a single visual symbol:
//!
//! ```text
//! {"d":"<base64 chunk>","i":0,"t":6,"H":"<hex digest>","c":"<short digest>"}
//! ```
//!
//! | field | meaning                                        | required |
//! |-------|------------------------------------------------|----------|
//! | `d`   | binary-safe-encoded chunk payload              | yes      |
//! | `i`   | chunk index, zero-based                        | yes      |
//! | `t`   | total chunk count of the transfer              | yes      |
//! | `H`   | hex digest of the full original text           | yes      |
//! | `c`   | short digest of `d` alone                      | advisory |
//!
//! Every frame of one transfer carries the same `(H, t)` pair. Parsing is
//! the single validation boundary: [`Frame::parse`] yields either a fully
//! valid frame or a typed failure, never a partially-valid object.

use serde::{Deserialize, Serialize};

use crate::digest;
use crate::error::QcastError;

/// One self-describing chunk of a chunked transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Binary-safe-encoded slice of the full payload.
    #[serde(rename = "d")]
    pub data: String,

    /// Zero-based position of this chunk within the transfer.
    #[serde(rename = "i")]
    pub index: u32,

    /// Total chunk count for the transfer this frame belongs to.
    #[serde(rename = "t")]
    pub total: u32,

    /// Digest of the original (pre-encoding) payload text.
    ///
    /// Identical across every frame of one transfer.
    #[serde(rename = "H")]
    pub content_hash: String,

    /// Short digest of `data` alone, for cheap per-frame screening.
    #[serde(rename = "c", default, skip_serializing_if = "Option::is_none")]
    pub chunk_digest: Option<String>,
}

impl Frame {
    /// Create a frame for one chunk, computing its advisory digest.
    pub fn new(
        data: impl Into<String>,
        index: u32,
        total: u32,
        content_hash: impl Into<String>,
    ) -> Self {
        let data = data.into();
        let chunk_digest = Some(digest::chunk_digest(&data));
        Self {
            data,
            index,
            total,
            content_hash: content_hash.into(),
            chunk_digest,
        }
    }

    /// Serialize to the wire payload rendered inside a visual symbol.
    pub fn to_payload(&self) -> Result<String, QcastError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and validate a raw scanned payload.
    ///
    /// Rejects malformed JSON, any missing required field, `t == 0`, and
    /// an out-of-range index. Unknown extra fields are ignored.
    pub fn parse(payload: &str) -> Result<Self, QcastError> {
        let frame: Frame = serde_json::from_str(payload)?;
        if frame.total == 0 {
            return Err(QcastError::InvalidFrame("total must be at least 1".into()));
        }
        if frame.index >= frame.total {
            return Err(QcastError::InvalidFrame(format!(
                "index {} out of range for total {}",
                frame.index, frame.total
            )));
        }
        Ok(frame)
    }

    /// Check the advisory chunk digest, when present.
    ///
    /// Frames without `c` pass unscreened; the whole-payload hash at
    /// assembly remains the authoritative gate either way.
    pub fn verify_chunk_digest(&self) -> Result<(), QcastError> {
        match &self.chunk_digest {
            Some(c) if *c != digest::chunk_digest(&self.data) => {
                Err(QcastError::ChunkDigestMismatch { index: self.index })
            }
            _ => Ok(()),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────
