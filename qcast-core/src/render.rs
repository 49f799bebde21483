//! Sender-side frame cycling.
//!
//! The physical symbol renderer is an external collaborator reached
//! through the [`SymbolSink`] trait; this module only decides *which*
//! payload is on display and *when* it advances. Display cadence is a
//! fixed interval, fully decoupled from anything the receiving side
//! does — there is no back-channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::config;
use crate::error::QcastError;
use crate::transfer::Transfer;

// ── SymbolSink ───────────────────────────────────────────────────

/// Boundary to the external symbol renderer: draws one serialized
/// frame payload as a visual code.
#[async_trait]
pub trait SymbolSink {
    async fn display(&mut self, payload: &str) -> Result<(), QcastError>;
}

// ── FrameCycler ──────────────────────────────────────────────────

/// Cycles a transfer's serialized frames to a [`SymbolSink`] on a
/// fixed timer, wrapping around indefinitely until stopped.
pub struct FrameCycler {
    payloads: Vec<String>,
    interval: Duration,
    position: usize,
    running: Arc<AtomicBool>,
}

impl FrameCycler {
    /// Create a cycler at the default cadence.
    pub fn new(transfer: &Transfer) -> Result<Self, QcastError> {
        Self::with_interval(transfer, Duration::from_millis(config::FRAME_INTERVAL_MS))
    }

    /// Create a cycler with an explicit display interval.
    ///
    /// Serializes every frame once up front; the tick path never pays
    /// for serialization.
    pub fn with_interval(transfer: &Transfer, interval: Duration) -> Result<Self, QcastError> {
        Ok(Self {
            payloads: transfer.payloads()?,
            interval,
            position: 0,
            running: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Number of frames in the cycle.
    pub fn frame_count(&self) -> usize {
        self.payloads.len()
    }

    /// Index of the frame that will be displayed next.
    pub fn position(&self) -> usize {
        self.position
    }

    /// A cloneable handle that can stop the cycle from another task.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Signal the cycle to stop before its next tick.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Whether the cycle loop is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Cycle frames to `sink` until stopped or the sink fails.
    pub async fn run<S: SymbolSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), QcastError> {
        self.running.store(true, Ordering::SeqCst);
        let mut ticker = tokio::time::interval(self.interval);

        while self.running.load(Ordering::SeqCst) {
            ticker.tick().await;
            sink.display(&self.payloads[self.position]).await?;
            self.position = (self.position + 1) % self.payloads.len();
        }
        Ok(())
    }

    /// Emit exactly one pass over the frames, in index order, without
    /// pacing. Used for piped transfers where cadence is meaningless.
    pub async fn run_once<S: SymbolSink + ?Sized>(
        &mut self,
        sink: &mut S,
    ) -> Result<(), QcastError> {
        for payload in &self.payloads {
            sink.display(payload).await?;
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::encode_with;

    /// Records displayed payloads and stops the cycler at a limit.
    struct CountingSink {
        seen: Vec<String>,
        stop: Arc<AtomicBool>,
        limit: usize,
    }

    #[async_trait]
    impl SymbolSink for CountingSink {
        async fn display(&mut self, payload: &str) -> Result<(), QcastError> {
            self.seen.push(payload.to_string());
            if self.seen.len() >= self.limit {
                self.stop.store(false, Ordering::SeqCst);
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn run_once_emits_every_frame_in_order() {
        let transfer = encode_with("a few frames worth of text", 8).unwrap();
        let mut cycler = FrameCycler::new(&transfer).unwrap();
        let mut sink = CountingSink {
            seen: Vec::new(),
            stop: cycler.stop_handle(),
            limit: usize::MAX,
        };

        cycler.run_once(&mut sink).await.unwrap();
        assert_eq!(sink.seen, transfer.payloads().unwrap());
    }

    #[tokio::test]
    async fn run_wraps_around_the_frame_list() {
        let transfer = encode_with("ab", 2).unwrap();
        assert_eq!(transfer.total, 2);

        let mut cycler =
            FrameCycler::with_interval(&transfer, Duration::from_millis(1)).unwrap();
        let stop = cycler.stop_handle();
        let mut sink = CountingSink {
            seen: Vec::new(),
            stop,
            limit: 5,
        };

        cycler.run(&mut sink).await.unwrap();
        assert!(!cycler.is_running());

        let payloads = transfer.payloads().unwrap();
        assert_eq!(sink.seen.len(), 5);
        assert_eq!(sink.seen[0], payloads[0]);
        assert_eq!(sink.seen[1], payloads[1]);
        assert_eq!(sink.seen[2], payloads[0]);
        assert_eq!(sink.seen[4], payloads[0]);
    }

    #[tokio::test]
    async fn frame_count_matches_transfer_total() {
        let transfer = encode_with("counting frames", 4).unwrap();
        let cycler = FrameCycler::new(&transfer).unwrap();
        assert_eq!(cycler.frame_count(), transfer.total as usize);
        assert_eq!(cycler.position(), 0);
    }
}
