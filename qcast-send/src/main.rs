//! qcast sender — entry point.
//!
//! ```text
//! qcast-send NOTES.md              Cycle frames forever at the configured cadence
//! qcast-send NOTES.md --once      Emit one full pass and exit (for piping)
//! qcast-send --gen-config        Print the default config TOML and exit
//! ```
//!
//! Frame payloads go to stdout, one per line; logs go to stderr so the
//! payload stream stays clean for `qcast-send --once | qcast-recv`.

mod config;

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use clap::Parser;
use futures::SinkExt;
use tokio_util::codec::FramedWrite;
use tracing::info;
use tracing_subscriber::EnvFilter;

use qcast_core::{FrameCycler, PayloadLineCodec, QcastError, SymbolSink, encode_with};

use config::SendConfig;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "qcast-send", about = "qcast sender — cycles a document as frame payloads")]
struct Cli {
    /// Document to transfer.
    #[arg(required_unless_present = "gen_config")]
    file: Option<PathBuf>,

    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "qcast-send.toml")]
    config: PathBuf,

    /// Chunk size in base64 characters (overrides config).
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Frame cadence in milliseconds (overrides config).
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Emit exactly one pass over the frames and exit.
    #[arg(long)]
    once: bool,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,
}

// ── Stdout sink ──────────────────────────────────────────────────

/// "Renders" a frame by writing its payload as one stdout line.
struct StdoutSink {
    framed: FramedWrite<tokio::io::Stdout, PayloadLineCodec>,
}

impl StdoutSink {
    fn new() -> Self {
        Self {
            framed: FramedWrite::new(tokio::io::stdout(), PayloadLineCodec::new()),
        }
    }
}

#[async_trait]
impl SymbolSink for StdoutSink {
    async fn display(&mut self, payload: &str) -> Result<(), QcastError> {
        self.framed.send(payload.to_string()).await
    }
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        let text = toml::to_string_pretty(&SendConfig::default())?;
        println!("{text}");
        return Ok(());
    }

    let mut config = SendConfig::load(&cli.config);
    if let Some(chunk_size) = cli.chunk_size {
        config.transfer.chunk_size = chunk_size;
    }
    if let Some(interval_ms) = cli.interval_ms {
        config.transfer.frame_interval_ms = interval_ms;
    }

    // Init tracing on stderr; stdout carries the payload stream.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("qcast-send v{}", env!("CARGO_PKG_VERSION"));
    config.transfer.validate()?;

    let file = cli.file.ok_or("no document given")?;
    let text = tokio::fs::read_to_string(&file).await?;

    let transfer = encode_with(&text, config.transfer.chunk_size)?;
    info!(
        total = transfer.total,
        hash = &transfer.hash[..8],
        file = %file.display(),
        "transfer ready"
    );

    let mut cycler = FrameCycler::with_interval(
        &transfer,
        Duration::from_millis(config.transfer.frame_interval_ms),
    )?;
    let mut sink = StdoutSink::new();

    if cli.once {
        cycler.run_once(&mut sink).await?;
        return Ok(());
    }

    // Cycle until ctrl-c.
    let stop = cycler.stop_handle();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        stop.store(false, Ordering::SeqCst);
    });
    cycler.run(&mut sink).await?;
    info!("stopped");
    Ok(())
}
