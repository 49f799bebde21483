//! Domain-specific error types for the qcast transfer protocol.
//!
//! All fallible operations return `Result<T, QcastError>`.
//! No panics on invalid input — every error is typed and recoverable.

use thiserror::Error;

/// The canonical error type for the qcast protocol.
#[derive(Debug, Error)]
pub enum QcastError {
    // ── Frame Errors ─────────────────────────────────────────────
    /// A scanned payload could not be parsed into a valid frame.
    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    /// A frame's advisory chunk digest does not match its data.
    #[error("chunk digest mismatch on frame {index}")]
    ChunkDigestMismatch { index: u32 },

    /// A serialized payload exceeds the symbol capacity bound.
    #[error("frame too large: {size} bytes (max {max})")]
    FrameTooLarge { size: usize, max: usize },

    // ── Assembly Errors ──────────────────────────────────────────
    /// Assembly was attempted with zero frames collected.
    #[error("empty stream: no frames received")]
    EmptyStream,

    /// Assembly was attempted before every frame arrived.
    #[error("incomplete transfer: {received}/{total} frames")]
    Incomplete { received: u32, total: u32 },

    /// A required index is absent despite the count matching.
    #[error("missing frame at index {index}")]
    MissingFrame { index: u32 },

    /// A frame's self-reported index/total disagrees with the
    /// transfer's learned values (frames from two transfers mixed).
    #[error("index mismatch at frame {index}")]
    IndexMismatch { index: u32 },

    /// The reassembled text does not hash to the expected digest.
    #[error("hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },

    // ── Encoding Errors ──────────────────────────────────────────
    /// The accumulated payload is not valid base64.
    #[error("base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    /// UTF-8 conversion failed.
    #[error("invalid utf-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    // ── Configuration Errors ─────────────────────────────────────
    /// A transfer configuration violated protocol limits.
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),

    // ── Plumbing Errors ──────────────────────────────────────────
    /// The I/O layer reported an error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// An mpsc channel was closed unexpectedly.
    #[error("channel closed")]
    ChannelClosed,
}

// ── Convenient From implementations ──────────────────────────────

impl From<serde_json::Error> for QcastError {
    fn from(e: serde_json::Error) -> Self {
        QcastError::InvalidFrame(e.to_string())
    }
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for QcastError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        QcastError::ChannelClosed
    }
}
