//! Serve command: run the tether backend.

use anyhow::Result;
use clap::Args;
use tracing::info;

use tether_server::{ServerConfig, TetherServer};

/// Default port for the tether server.
pub const DEFAULT_PORT: u16 = 8080;
/// Default host for the tether server.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Arguments for the serve command.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,
}

/// Run the serve command.
pub async fn run(args: ServeArgs, verbose: bool) -> Result<()> {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ServerConfig::new(args.host, args.port);
    info!("Starting tether server on {}", config.addr());

    let server = TetherServer::new(config);
    server.run().await.map_err(Into::into)
}
