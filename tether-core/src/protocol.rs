//! Wire-level constants shared by the client and the backend.

/// ANSI "clear screen, home cursor".
///
/// The single control sequence the session engine interprets. The match is
/// against the whole payload, never a substring: a payload that merely
/// contains this sequence is displayed as text.
pub const CLEAR_SEQUENCE: &str = "\x1b[2J\x1b[1;1H";

/// Label prefixed to the pending input line and to every echoed command.
pub const DEFAULT_PROMPT: &str = "user@device <";

/// Well-known backend endpoint.
pub const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:8080/ws";

/// Route the backend serves the WebSocket on.
pub const WS_PATH: &str = "/ws";
