//! Main application struct and event loop for the tether TUI.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use tracing::{info, warn};

use tether_core::{ConnectionState, SessionController};

use crate::client::{ReconnectConfig, WsConnection};
use crate::keys::translate_key;
use crate::screen::render_screen;
use crate::terminal::{TetherTerminal, restore_terminal, setup_terminal};

/// Main TUI application.
///
/// Owns the session controller and drives the render/input/tick loop. When
/// the transport drops and an endpoint URL is known, the app reconnects
/// with exponential backoff; the session itself stays interactive
/// throughout.
#[derive(Debug)]
pub struct App {
    pub session: SessionController,
    pub running: bool,
    /// Endpoint URL for reconnection attempts.
    server_url: Option<String>,
    /// Reconnection configuration.
    reconnect_config: ReconnectConfig,
    /// Current reconnection attempt number.
    reconnect_attempt: u32,
    /// Time of the last reconnection attempt (for backoff).
    last_reconnect_attempt: Option<Instant>,
    /// Set once the attempt budget is spent, so the failure is surfaced
    /// exactly once.
    reconnect_exhausted: bool,
}

impl App {
    /// Creates an app that never reconnects (no known endpoint).
    pub fn new(session: SessionController) -> Self {
        Self {
            session,
            running: true,
            server_url: None,
            reconnect_config: ReconnectConfig::default(),
            reconnect_attempt: 0,
            last_reconnect_attempt: None,
            reconnect_exhausted: false,
        }
    }

    /// Creates an app that reconnects to `url` when the transport drops.
    pub fn with_url(session: SessionController, url: impl Into<String>) -> Self {
        let mut app = Self::new(session);
        app.server_url = Some(url.into());
        app
    }

    /// Overrides the reconnect policy.
    pub fn with_reconnect_config(mut self, config: ReconnectConfig) -> Self {
        self.reconnect_config = config;
        self
    }

    /// Handles a key event.
    ///
    /// Ctrl-C and Ctrl-Q quit locally and are never transmitted; everything
    /// else goes through the key-event boundary into the editor.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            self.running = false;
            return;
        }

        if let Some(k) = translate_key(&key) {
            self.session.handle_key(k);
        }
    }

    /// Renders the application to the terminal frame.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        render_screen(frame, area, &self.session);
    }

    /// Processes async updates: drains transport events, then services the
    /// reconnect policy.
    pub async fn tick(&mut self) {
        self.session.pump();
        self.check_connection().await;
    }

    /// Attempts reconnection when the transport is down and backoff allows.
    async fn check_connection(&mut self) {
        if self.server_url.is_none() || self.reconnect_exhausted {
            return;
        }

        match self.session.connection_state() {
            ConnectionState::Connected | ConnectionState::Connecting => {
                self.reconnect_attempt = 0;
                self.last_reconnect_attempt = None;
            }
            ConnectionState::Disconnected | ConnectionState::Errored => {
                let should_attempt = self.last_reconnect_attempt.is_none_or(|last| {
                    let required = self
                        .reconnect_config
                        .delay_for_attempt(self.reconnect_attempt);
                    last.elapsed() >= required
                });

                if should_attempt {
                    self.attempt_reconnect().await;
                }
            }
        }
    }

    async fn attempt_reconnect(&mut self) {
        let url = match &self.server_url {
            Some(url) => url.clone(),
            None => return,
        };

        if let Some(max) = self.reconnect_config.max_attempts
            && self.reconnect_attempt >= max
        {
            self.reconnect_exhausted = true;
            self.session
                .report_error("Max reconnection attempts reached.");
            return;
        }

        info!(
            attempt = self.reconnect_attempt + 1,
            "Attempting to reconnect to {}", url
        );

        self.last_reconnect_attempt = Some(Instant::now());

        match WsConnection::connect(&url).await {
            Ok(connection) => {
                info!("Reconnected successfully");
                self.session.replace_connection(Box::new(connection));
                self.reconnect_attempt = 0;
            }
            Err(e) => {
                warn!(
                    attempt = self.reconnect_attempt + 1,
                    error = %e,
                    "Reconnection failed"
                );
                self.reconnect_attempt += 1;
            }
        }
    }

    /// Runs the main event loop.
    ///
    /// Sets up the terminal, enters the render/input loop, restores the
    /// terminal, and tears down the transport — unconditionally, in that
    /// order.
    pub async fn run(&mut self) -> io::Result<()> {
        let mut terminal = setup_terminal()?;

        let result = self.event_loop(&mut terminal).await;

        restore_terminal(&mut terminal)?;
        self.session.close();

        result
    }

    /// The core event loop. Separated from `run` for testability.
    async fn event_loop(&mut self, terminal: &mut TetherTerminal) -> io::Result<()> {
        while self.running {
            terminal.draw(|f| self.render(f))?;

            // Handle input with a timeout so ticks keep flowing
            if event::poll(Duration::from_millis(100))?
                && let Event::Key(key) = event::read()?
            {
                self.handle_key(key);
            }

            self.tick().await;
        }

        Ok(())
    }
}
