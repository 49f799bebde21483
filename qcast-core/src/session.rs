//! Reception session — the single narrow ingestion entry point.
//!
//! The renderer's timer and the scanner's decode callback are two
//! independent producers with no mutual synchronization; they meet only
//! at this session's scan channel. A [`ReceiveSession`] owns one
//! [`FrameCollector`], drains scanned payloads from an mpsc channel,
//! publishes the live progress snapshot via a `tokio::sync::watch`
//! channel so the UI can read it without blocking the loop, and emits
//! terminal and transient outcomes as [`ReceiveEvent`]s.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{mpsc, watch};

use crate::collector::{FrameCollector, Progress, SubmitOutcome};
use crate::error::QcastError;
use crate::transfer::Decoded;

/// Buffered events between the session loop and its owner.
const EVENT_BUFFER: usize = 64;

// ── ReceiveEvent ─────────────────────────────────────────────────

/// Outcome notifications surfaced to the session's owner.
#[derive(Debug)]
pub enum ReceiveEvent {
    /// A complete set assembled and verified; the transfer is done.
    /// The caller owns resetting or dropping the session afterward.
    Completed(Decoded),

    /// One scanned payload was rejected. Local and non-fatal: state is
    /// untouched and the session keeps collecting.
    Rejected(QcastError),

    /// A complete set failed assembly. Fatal to that attempt but not to
    /// the session: the store is preserved for further scanning.
    Failed(QcastError),
}

// ── ReceiveSession ───────────────────────────────────────────────

/// Event-loop wrapper around one [`FrameCollector`].
pub struct ReceiveSession {
    collector: FrameCollector,
    running: Arc<AtomicBool>,
    progress_tx: watch::Sender<Progress>,
    progress_rx: watch::Receiver<Progress>,
    event_tx: mpsc::Sender<ReceiveEvent>,
    reset_tx: mpsc::Sender<()>,
    reset_rx: mpsc::Receiver<()>,
}

impl ReceiveSession {
    /// Create a session and the receiving half of its event channel.
    pub fn new() -> (Self, mpsc::Receiver<ReceiveEvent>) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let (progress_tx, progress_rx) = watch::channel(Progress::default());
        let (reset_tx, reset_rx) = mpsc::channel(4);
        let session = Self {
            collector: FrameCollector::new(),
            running: Arc::new(AtomicBool::new(false)),
            progress_tx,
            progress_rx,
            event_tx,
            reset_tx,
            reset_rx,
        };
        (session, event_rx)
    }

    /// Obtain a `watch::Receiver` that yields the latest progress
    /// snapshot whenever it changes.
    pub fn progress_receiver(&self) -> watch::Receiver<Progress> {
        self.progress_rx.clone()
    }

    /// A handle that requests a reset from any task, usable at any
    /// point including mid-scan.
    pub fn reset_handle(&self) -> mpsc::Sender<()> {
        self.reset_tx.clone()
    }

    /// A cloneable stop handle.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Signal the session loop to stop at its next wakeup.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Whether the session loop is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Read-only view of the underlying collector.
    pub fn collector(&self) -> &FrameCollector {
        &self.collector
    }

    /// Run the ingestion loop.
    ///
    /// Drains `scans` until the channel closes or [`stop`](Self::stop)
    /// takes effect at the next wakeup. Per-submission errors are
    /// forwarded as events and the loop continues; the error returned
    /// here only signals that the owner dropped the event receiver.
    pub async fn run(&mut self, mut scans: mpsc::Receiver<String>) -> Result<(), QcastError> {
        self.running.store(true, Ordering::SeqCst);

        while self.running.load(Ordering::SeqCst) {
            tokio::select! {
                maybe = scans.recv() => match maybe {
                    Some(payload) => self.ingest(&payload).await?,
                    None => break,
                },
                _ = self.reset_rx.recv() => {
                    self.collector.reset();
                    let _ = self.progress_tx.send(self.collector.progress());
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn ingest(&mut self, payload: &str) -> Result<(), QcastError> {
        match self.collector.submit_frame(payload) {
            SubmitOutcome::Duplicate => {}
            SubmitOutcome::Accepted(progress) => {
                let _ = self.progress_tx.send(progress);
            }
            SubmitOutcome::Rejected(e) => {
                self.event_tx.send(ReceiveEvent::Rejected(e)).await?;
            }
            SubmitOutcome::Complete(decoded) => {
                let _ = self.progress_tx.send(self.collector.progress());
                self.event_tx.send(ReceiveEvent::Completed(decoded)).await?;
            }
            SubmitOutcome::Failed(e) => {
                self.event_tx.send(ReceiveEvent::Failed(e)).await?;
            }
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────
