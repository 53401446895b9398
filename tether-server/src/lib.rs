//! tether-server - WebSocket backend for the tether terminal.
//!
//! Accepts text frames carrying commands, runs them through the built-in
//! shell, and replies with one output frame per command. The `clear`
//! command replies with the ANSI clear sequence, which the client side
//! interprets as a history reset.

mod error;
mod shell;
mod ws;

pub use error::ServerError;
pub use shell::Shell;
pub use ws::create_router;

use tokio::net::TcpListener;

/// The tether backend server.
pub struct TetherServer {
    config: ServerConfig,
}

impl TetherServer {
    /// Creates a server for the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// The server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Runs the server, binding to the configured address.
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.config.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServerError::Bind {
                addr: addr.clone(),
                source: e,
            })?;

        tracing::info!("tether server listening on {}", addr);

        axum::serve(listener, create_router())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;

        Ok(())
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Creates a configuration with the specified host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Returns the socket address string (e.g., "127.0.0.1:8080").
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
