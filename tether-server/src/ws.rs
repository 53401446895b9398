//! WebSocket endpoint: one shell per connection.

use axum::Router;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use futures::{SinkExt, StreamExt};
use tracing::{debug, error, info};

use tether_core::WS_PATH;

use crate::shell::Shell;

/// Builds the router serving the single well-known WebSocket route.
pub fn create_router() -> Router {
    Router::new().route(WS_PATH, get(ws_handler))
}

/// WebSocket upgrade handler.
async fn ws_handler(ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(handle_socket)
}

/// Runs one terminal session over a socket.
async fn handle_socket(socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();
    let mut shell = Shell::new();

    info!("terminal client connected");

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let reply = shell.execute(&text);
                if let Err(e) = sender.send(Message::Text(reply)).await {
                    error!("failed to send reply: {}", e);
                    break;
                }
            }
            Ok(Message::Close(_)) => {
                debug!("client sent close frame");
                break;
            }
            Ok(Message::Ping(data)) => {
                if sender.send(Message::Pong(data)).await.is_err() {
                    break;
                }
            }
            Ok(_) => {
                // Ignore binary and pong frames
            }
            Err(e) => {
                error!("WebSocket error: {}", e);
                break;
            }
        }
    }

    info!("terminal client disconnected");
}
