//! # qcast-core
//!
//! Core protocol library for qcast, an air-gapped document transfer
//! tool: the sender cycles a document as a loop of visual code frames;
//! the receiver scans them in any order — with duplicates and the odd
//! garbled read — and reconstructs the exact original text, or fails
//! detectably.
//!
//! This crate contains:
//! - **Primitives**: Blake3 content digests and the base64 binary-safe
//!   text encoding
//! - **Frame**: the self-describing wire record and its parse boundary
//! - **Transfer codec**: `encode` / `assemble` with the mandatory
//!   end-to-end hash gate
//! - **Collector**: the per-session reception state machine
//! - **Session**: `ReceiveSession`, the channel-fed ingestion loop
//! - **Render**: `FrameCycler` driving an external `SymbolSink` on a
//!   fixed cadence
//! - **Codec**: `PayloadLineCodec` for piping payloads over byte
//!   streams via `tokio_util`
//! - **Error**: `QcastError` — typed, `thiserror`-based error hierarchy

pub mod codec;
pub mod collector;
pub mod config;
pub mod digest;
pub mod error;
pub mod frame;
pub mod render;
pub mod session;
pub mod transfer;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use codec::PayloadLineCodec;
pub use collector::{CollectorPhase, FrameCollector, Progress, SubmitOutcome};
pub use config::{CHUNK_SIZE, FRAME_INTERVAL_MS, SYMBOL_CAPACITY, TransferConfig};
pub use error::QcastError;
pub use frame::Frame;
pub use render::{FrameCycler, SymbolSink};
pub use session::{ReceiveEvent, ReceiveSession};
pub use transfer::{Decoded, Transfer, assemble, encode, encode_with};
