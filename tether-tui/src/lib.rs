//! Terminal UI for tether.
//!
//! Hosts the concrete WebSocket connection manager and the ratatui
//! presentation layer around the tether-core session engine.

mod app;
mod client;
mod keys;
mod screen;
mod terminal;

pub use app::App;
pub use client::{ReconnectConfig, WsConnection};
pub use keys::translate_key;
pub use screen::render_screen;
pub use terminal::{TetherTerminal, install_panic_hook, restore_terminal, setup_terminal};
