//! GameShelf host binary
//!
//! Spawned by the UI shell. Requests arrive on stdin and replies leave on
//! stdout, one JSON object per line; logs go to stderr so they never mix
//! with replies.
//!
//! Usage: `gameshelf-host [CONFIG]`. Without an argument the system config
//! is layered under the user's.

use anyhow::{Context, Result};
use gameshelf_config::ShelfConfig;
use gameshelf_host::{Host, ipc};
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    setup_logging();

    info!("GameShelf host v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => ShelfConfig::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ShelfConfig::load_default().context("Failed to load config")?,
    };

    let mut host = Host::startup(config).context("Failed to prepare library data")?;

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    ipc::serve(&mut host, stdin, stdout)
        .await
        .context("Request channel failed")?;

    host.shutdown();
    Ok(())
}

/// Log to stderr; stdout carries replies
fn setup_logging() {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(false),
        )
        .init();
}
