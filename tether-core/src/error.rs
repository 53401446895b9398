//! Error types for tether-core.

use thiserror::Error;

/// Failures surfaced by a [`Connection`](crate::Connection).
///
/// None of these end a session: the controller converts them into visible
/// history lines and the user keeps typing.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// A send was attempted while the transport is not open.
    #[error("Not connected to backend.")]
    NotConnected,

    /// The transport layer reported an error.
    #[error("transport error: {0}")]
    Transport(String),

    /// The transport has already shut down.
    #[error("transport closed")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_connected_displays_the_user_facing_message() {
        // The controller prefixes "Error: " when echoing this into history.
        assert_eq!(
            ConnectionError::NotConnected.to_string(),
            "Not connected to backend."
        );
    }

    #[test]
    fn transport_error_carries_detail() {
        let err = ConnectionError::Transport("connection reset".into());
        assert!(err.to_string().contains("connection reset"));
    }
}
