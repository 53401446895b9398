//! WebSocket connection manager for the TUI.
//!
//! Implements the tether-core [`Connection`] contract over
//! tokio-tungstenite: two spawned tasks pump the socket's sink and stream
//! through bounded channels, and the TUI event loop drains events without
//! blocking.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use tether_core::{Connection, ConnectionError, ConnectionEvent, ConnectionState};

/// Lifecycle state shared between the transport tasks and the event loop.
#[derive(Debug)]
struct SharedState(AtomicU8);

const DISCONNECTED: u8 = 0;
const CONNECTING: u8 = 1;
const CONNECTED: u8 = 2;
const ERRORED: u8 = 3;

impl SharedState {
    fn new(state: ConnectionState) -> Self {
        let shared = Self(AtomicU8::new(DISCONNECTED));
        shared.store(state);
        shared
    }

    fn store(&self, state: ConnectionState) {
        let raw = match state {
            ConnectionState::Disconnected => DISCONNECTED,
            ConnectionState::Connecting => CONNECTING,
            ConnectionState::Connected => CONNECTED,
            ConnectionState::Errored => ERRORED,
        };
        self.0.store(raw, Ordering::Relaxed);
    }

    fn load(&self) -> ConnectionState {
        match self.0.load(Ordering::Relaxed) {
            CONNECTING => ConnectionState::Connecting,
            CONNECTED => ConnectionState::Connected,
            ERRORED => ConnectionState::Errored,
            _ => ConnectionState::Disconnected,
        }
    }
}

/// WebSocket-backed connection manager.
///
/// One instance per session; a lost transport is replaced by connecting a
/// fresh instance, not by reviving this one.
pub struct WsConnection {
    /// Sender feeding the outgoing pump task. Dropped on close, which ends
    /// the task and closes the socket.
    tx: Option<mpsc::Sender<String>>,
    /// Events produced by the incoming pump task.
    rx: mpsc::Receiver<ConnectionEvent>,
    state: Arc<SharedState>,
}

impl std::fmt::Debug for WsConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsConnection")
            .field("state", &self.state.load())
            .finish_non_exhaustive()
    }
}

impl WsConnection {
    /// Connects to the backend at the given ws:// URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let (ws_stream, _response) = connect_async(url)
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;

        let (ws_sender, ws_receiver) = ws_stream.split();

        let (outgoing_tx, outgoing_rx) = mpsc::channel::<String>(32);
        let (event_tx, event_rx) = mpsc::channel::<ConnectionEvent>(64);

        let state = Arc::new(SharedState::new(ConnectionState::Connected));

        // The open event is the first thing the controller drains.
        let _ = event_tx.try_send(ConnectionEvent::Opened);

        tokio::spawn(Self::outgoing_task(outgoing_rx, ws_sender));
        tokio::spawn(Self::incoming_task(
            ws_receiver,
            event_tx,
            Arc::clone(&state),
        ));

        Ok(Self {
            tx: Some(outgoing_tx),
            rx: event_rx,
            state,
        })
    }

    /// Creates a manager with no transport, permanently disconnected.
    ///
    /// Lets the UI open even when the first connect fails; the session then
    /// surfaces `NotConnected` on every submit until a reconnect swaps in a
    /// live instance.
    pub fn disconnected() -> Self {
        let (event_tx, event_rx) = mpsc::channel::<ConnectionEvent>(1);
        drop(event_tx);
        Self {
            tx: None,
            rx: event_rx,
            state: Arc::new(SharedState::new(ConnectionState::Disconnected)),
        }
    }

    /// Task that forwards outgoing commands to the WebSocket.
    async fn outgoing_task<S>(mut rx: mpsc::Receiver<String>, mut ws_sender: S)
    where
        S: SinkExt<Message> + Unpin,
        S::Error: std::fmt::Debug,
    {
        while let Some(command) = rx.recv().await {
            debug!("sending: {}", command);
            if let Err(e) = ws_sender.send(Message::Text(command.into())).await {
                warn!("failed to send WebSocket message: {:?}", e);
                break;
            }
        }
        // Sender dropped or sink failed; closing sends the close frame.
        let _ = ws_sender.close().await;
    }

    /// Task that turns incoming frames into connection events.
    async fn incoming_task<S>(
        mut ws_receiver: S,
        tx: mpsc::Sender<ConnectionEvent>,
        state: Arc<SharedState>,
    ) where
        S: StreamExt<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
    {
        while let Some(result) = ws_receiver.next().await {
            match result {
                Ok(Message::Text(text)) => {
                    if tx
                        .send(ConnectionEvent::Message(text.to_string()))
                        .await
                        .is_err()
                    {
                        debug!("receiver dropped, stopping incoming task");
                        break;
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("received close frame");
                    break;
                }
                Ok(
                    Message::Ping(_) | Message::Pong(_) | Message::Binary(_) | Message::Frame(_),
                ) => {
                    // Ignore these frame types
                }
                Err(e) => {
                    warn!("WebSocket error: {}", e);
                    state.store(ConnectionState::Errored);
                    let _ = tx.send(ConnectionEvent::Error(e.to_string())).await;
                    break;
                }
            }
        }
        // Errored is transient; the transport has now finished closing.
        state.store(ConnectionState::Disconnected);
        let _ = tx.send(ConnectionEvent::Closed).await;
        info!("WebSocket connection closed");
    }
}

impl Connection for WsConnection {
    fn state(&self) -> ConnectionState {
        self.state.load()
    }

    fn send(&mut self, command: &str) -> Result<(), ConnectionError> {
        if !self.state.load().is_connected() {
            return Err(ConnectionError::NotConnected);
        }
        let tx = self.tx.as_ref().ok_or(ConnectionError::Closed)?;
        tx.try_send(command.to_string()).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                ConnectionError::Transport("outgoing queue is full".into())
            }
            mpsc::error::TrySendError::Closed(_) => ConnectionError::Closed,
        })
    }

    fn try_recv(&mut self) -> Option<ConnectionEvent> {
        self.rx.try_recv().ok()
    }

    fn close(&mut self) {
        // Dropping the sender ends the outgoing task, which closes the
        // socket. Harmless when already closed or never opened.
        self.tx.take();
        self.state.store(ConnectionState::Disconnected);
    }
}

/// Exponential backoff configuration for reconnection.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Initial delay between reconnection attempts.
    pub initial_delay: Duration,
    /// Maximum delay between attempts.
    pub max_delay: Duration,
    /// Multiplier for exponential backoff.
    pub multiplier: f64,
    /// Maximum number of attempts (None = unlimited).
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            max_attempts: None,
        }
    }
}

impl ReconnectConfig {
    /// Calculates the delay for a given attempt number (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay_ms = self.initial_delay.as_millis() as f64 * self.multiplier.powi(attempt as i32);
        Duration::from_millis(delay_ms.min(self.max_delay.as_millis() as f64) as u64)
    }
}
