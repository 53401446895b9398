//! Server error types.

use thiserror::Error;

/// Errors that can occur in the tether server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the specified address.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// WebSocket error.
    #[error("websocket error: {0}")]
    WebSocket(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_error_names_the_address() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use");
        let err = ServerError::Bind {
            addr: "127.0.0.1:8080".into(),
            source: io,
        };
        assert!(err.to_string().contains("127.0.0.1:8080"));
    }
}
