//! The connection-manager contract.

use crate::error::ConnectionError;

/// Lifecycle state of the transport.
///
/// Owned exclusively by the connection manager; everyone else reads it
/// through [`Connection::state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No transport, or the transport has finished closing.
    Disconnected,
    /// A connect request is in flight.
    Connecting,
    /// The transport is open and accepting sends.
    Connected,
    /// Transient: the transport reported an error but has not finished
    /// closing yet. Followed by `Disconnected`.
    Errored,
}

impl ConnectionState {
    /// True when sends are valid.
    pub fn is_connected(self) -> bool {
        self == ConnectionState::Connected
    }
}

/// One observable transport event, drained by the session controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// The transport finished opening.
    Opened,
    /// One inbound text frame.
    Message(String),
    /// The transport closed.
    Closed,
    /// The transport layer reported an error.
    Error(String),
}

/// Contract between the session controller and whatever carries the bytes.
///
/// Implementations own the transport lifecycle and the [`ConnectionState`];
/// the controller only sends commands and drains events. The controller is
/// constructed with an injected instance, so tests substitute a fake.
pub trait Connection {
    /// Current lifecycle state.
    fn state(&self) -> ConnectionState;

    /// Transmits one command frame.
    ///
    /// Only valid while [`ConnectionState::Connected`]; otherwise fails with
    /// [`ConnectionError::NotConnected`].
    fn send(&mut self, command: &str) -> Result<(), ConnectionError>;

    /// Drains the next pending event without blocking.
    fn try_recv(&mut self) -> Option<ConnectionEvent>;

    /// Tears down the transport.
    ///
    /// Safe on an already-closed or never-opened transport, and safe to call
    /// more than once.
    fn close(&mut self);
}
