//! qcast receiver — entry point.
//!
//! ```text
//! qcast-recv                       Collect scans from stdin, print the document
//! qcast-recv --output out.md      Write the reconstructed document to a file
//! qcast-recv --gen-config        Print the default config TOML and exit
//! ```
//!
//! Stdin carries one scanned payload per line (whatever the scanner
//! hardware decoded, verbatim). Progress and transient errors go to
//! stderr; only the reconstructed document touches stdout.

mod config;

use std::path::PathBuf;

use clap::Parser;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::codec::FramedRead;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use qcast_core::{PayloadLineCodec, ReceiveEvent, ReceiveSession};

use config::RecvConfig;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "qcast-recv",
    about = "qcast receiver — reconstructs a document from scanned frame payloads"
)]
struct Cli {
    /// Write the reconstructed document here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "qcast-recv.toml")]
    config: PathBuf,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        let text = toml::to_string_pretty(&RecvConfig::default())?;
        println!("{text}");
        return Ok(());
    }

    let config = RecvConfig::load(&cli.config);

    // Init tracing on stderr; stdout is reserved for the document.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("qcast-recv v{}", env!("CARGO_PKG_VERSION"));

    let (mut session, mut events) = ReceiveSession::new();
    let mut progress_rx = session.progress_receiver();
    let final_progress = session.progress_receiver();
    let (scan_tx, scan_rx) = mpsc::channel(config.receive.channel_capacity);

    // ── 1. Stdin → scan channel ─────────────────────────────────

    let max_payload_len = config.receive.max_payload_len;
    let reader = tokio::spawn(async move {
        let codec = PayloadLineCodec::with_max_length(max_payload_len);
        let mut lines = FramedRead::new(tokio::io::stdin(), codec);
        while let Some(next) = lines.next().await {
            match next {
                Ok(payload) => {
                    if payload.is_empty() {
                        continue;
                    }
                    if scan_tx.send(payload).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("unreadable scan line: {e}");
                    break;
                }
            }
        }
    });

    // ── 2. Session loop ─────────────────────────────────────────

    let session_handle = tokio::spawn(async move { session.run(scan_rx).await });

    // ── 3. Live counter ─────────────────────────────────────────

    tokio::spawn(async move {
        while progress_rx.changed().await.is_ok() {
            let progress = progress_rx.borrow_and_update().clone();
            if progress.total > 0 {
                info!(
                    received = progress.received,
                    total = progress.total,
                    "collecting"
                );
            }
        }
    });

    // ── 4. Event loop ───────────────────────────────────────────

    let decoded = loop {
        match events.recv().await {
            Some(ReceiveEvent::Completed(decoded)) => break Some(decoded),
            Some(ReceiveEvent::Rejected(e)) => warn!("frame rejected: {e}"),
            Some(ReceiveEvent::Failed(e)) => {
                error!("assembly failed: {e}; keep scanning or restart")
            }
            None => break None,
        }
    };

    match decoded {
        Some(decoded) => {
            info!(hash = &decoded.hash[..8], "transfer complete");
            match &cli.output {
                Some(path) => tokio::fs::write(path, &decoded.text).await?,
                None => print!("{}", decoded.text),
            }
            // Process teardown reaps the reader and session tasks.
            drop(reader);
            drop(session_handle);
            Ok(())
        }
        None => {
            let progress = final_progress.borrow().clone();
            error!(
                received = progress.received,
                total = progress.total,
                "stream ended before the transfer completed"
            );
            Err("incomplete transfer".into())
        }
    }
}
