//! Connect command: run the terminal UI against a backend.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

use tether_core::{SessionConfig, SessionController};
use tether_tui::{App, WsConnection, install_panic_hook};

use crate::config::Config;

/// Arguments for the connect command.
#[derive(Debug, Args)]
pub struct ConnectArgs {
    /// Backend URL (overrides the config file)
    pub url: Option<String>,

    /// Log file path (stdout belongs to the TUI)
    #[arg(long, default_value = "tether.log")]
    pub log_file: PathBuf,
}

/// Run the connect command.
pub async fn run(args: ConnectArgs, verbose: bool) -> Result<()> {
    init_logging(&args.log_file, verbose)?;

    let config = Config::load()?;
    let url = args.url.unwrap_or(config.url);

    info!("connecting to {}", url);

    // A failed first connect still opens the UI; the app's backoff loop
    // keeps trying while the session surfaces NotConnected on submits.
    let connection = match WsConnection::connect(&url).await {
        Ok(connection) => connection,
        Err(e) => {
            warn!("initial connect failed: {:#}", e);
            WsConnection::disconnected()
        }
    };

    let session = SessionController::with_config(
        Box::new(connection),
        SessionConfig {
            prompt: config.prompt,
            max_lines: config.max_lines,
        },
    );

    install_panic_hook();

    let mut app = App::with_url(session, url);
    app.run().await.context("terminal UI failed")?;

    Ok(())
}

/// Routes tracing output to a file; the terminal itself is the UI surface.
fn init_logging(path: &PathBuf, verbose: bool) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let filter = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
