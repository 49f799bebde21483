//! Reception-side state machine.
//!
//! A [`FrameCollector`] ingests scanned payloads one at a time, in any
//! order, with duplicates, and triggers assembly once a complete set is
//! observed. The renderer loops its frames continuously, so duplicate
//! reads of a still-displayed symbol are the common case, not an
//! anomaly — ingestion is idempotent per index.
//!
//! ```text
//!  Idle ──► Collecting ──► Complete
//!    ▲          │
//!    │          ▼
//!    └──────  Failed   (store preserved; reset() from any state)
//! ```

use std::collections::BTreeMap;

use crate::error::QcastError;
use crate::frame::Frame;
use crate::transfer::{self, Decoded};

// ── CollectorPhase ───────────────────────────────────────────────

/// The current phase of a reception session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectorPhase {
    /// No frames seen yet. Initial state.
    #[default]
    Idle,

    /// At least one frame stored, set not yet complete.
    Collecting,

    /// Assembly succeeded and the content hash verified.
    Complete,

    /// Assembly was attempted and failed; the store is preserved.
    Failed,
}

impl std::fmt::Display for CollectorPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Collecting => write!(f, "Collecting"),
            Self::Complete => write!(f, "Complete"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

impl CollectorPhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_collecting(&self) -> bool {
        matches!(self, Self::Collecting)
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

// ── Progress ─────────────────────────────────────────────────────

/// Read-only progress snapshot for the owner's live counter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Progress {
    /// Distinct frames stored so far.
    pub received: u32,

    /// Expected total, zero until the first frame is parsed.
    pub total: u32,

    /// The transfer's content hash, once learned.
    pub hash: Option<String>,
}

// ── SubmitOutcome ────────────────────────────────────────────────

/// Result of ingesting one scanned payload.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The payload did not survive the parse boundary or the advisory
    /// digest screen. State is untouched; the session continues.
    Rejected(QcastError),

    /// This index was already stored. State and progress unchanged.
    Duplicate,

    /// A new frame was stored; the set is not yet complete.
    Accepted(Progress),

    /// The stored set became complete and assembly verified the text.
    Complete(Decoded),

    /// The stored set became complete but assembly failed. The store
    /// is preserved so the operator may keep scanning or reset.
    Failed(QcastError),
}

// ── FrameCollector ───────────────────────────────────────────────

/// Owned, per-session reception state.
///
/// One instance per active transfer; never shared, never persisted.
#[derive(Debug, Default)]
pub struct FrameCollector {
    phase: CollectorPhase,

    /// Expected frame count, learned from the first parsed frame.
    expected_total: Option<u32>,

    /// Expected content hash, learned from the first parsed frame.
    expected_hash: Option<String>,

    /// Dedup store: index → raw payload as scanned.
    received: BTreeMap<u32, String>,
}

impl FrameCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> CollectorPhase {
        self.phase
    }

    /// Current progress snapshot.
    pub fn progress(&self) -> Progress {
        Progress {
            received: self.received.len() as u32,
            total: self.expected_total.unwrap_or(0),
            hash: self.expected_hash.clone(),
        }
    }

    /// Indices still absent from the store.
    ///
    /// Lets the operator aim the scanner at the one frame that keeps
    /// failing instead of waiting out another full cycle.
    pub fn missing_indices(&self) -> Vec<u32> {
        let total = self.expected_total.unwrap_or(0);
        (0..total)
            .filter(|index| !self.received.contains_key(index))
            .collect()
    }

    /// Ingest one raw scanned payload.
    ///
    /// Bounded, non-blocking time on every call except the one that
    /// completes the set, which pays the one-time assembly cost.
    pub fn submit_frame(&mut self, payload: &str) -> SubmitOutcome {
        let frame = match Frame::parse(payload) {
            Ok(frame) => frame,
            Err(e) => return SubmitOutcome::Rejected(e),
        };
        if let Err(e) = frame.verify_chunk_digest() {
            return SubmitOutcome::Rejected(e);
        }

        // The first parsed frame fixes the session's consensus values.
        if self.expected_total.is_none() {
            self.expected_total = Some(frame.total);
            self.expected_hash = Some(frame.content_hash.clone());
        }

        if self.received.contains_key(&frame.index) {
            return SubmitOutcome::Duplicate;
        }
        self.received.insert(frame.index, payload.to_string());
        self.phase = CollectorPhase::Collecting;

        if Some(self.received.len() as u32) == self.expected_total {
            match transfer::assemble(&self.received) {
                Ok(decoded) => {
                    self.phase = CollectorPhase::Complete;
                    SubmitOutcome::Complete(decoded)
                }
                Err(e) => {
                    self.phase = CollectorPhase::Failed;
                    SubmitOutcome::Failed(e)
                }
            }
        } else {
            SubmitOutcome::Accepted(self.progress())
        }
    }

    /// Discard all accumulated state and return to `Idle`.
    ///
    /// The only way back to `Idle` from any other phase; idempotent.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ── Tests ─────────────────────────────────────────────────────────
