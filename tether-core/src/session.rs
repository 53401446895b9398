//! The session controller.

use tracing::{debug, warn};

use crate::connection::{Connection, ConnectionEvent, ConnectionState};
use crate::error::ConnectionError;
use crate::history::{DEFAULT_MAX_LINES, LineHistory};
use crate::input::{InputLine, Key};
use crate::protocol::{CLEAR_SEQUENCE, DEFAULT_PROMPT};

/// Tunables for one session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Label prefixed to the input line and to echoed commands.
    pub prompt: String,
    /// History retention cap in lines.
    pub max_lines: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            max_lines: DEFAULT_MAX_LINES,
        }
    }
}

/// Glue state machine between the editor, the history, and the connection.
///
/// Inbound payloads are classified into a history clear or a history append;
/// submitted commands are echoed into history and transmitted. The
/// connection is an injected, owned instance so tests run against a fake
/// transport.
pub struct SessionController {
    connection: Box<dyn Connection>,
    history: LineHistory,
    input: InputLine,
    prompt: String,
}

impl SessionController {
    /// Creates a controller with the default prompt and retention cap.
    pub fn new(connection: Box<dyn Connection>) -> Self {
        Self::with_config(connection, SessionConfig::default())
    }

    /// Creates a controller with explicit tunables.
    pub fn with_config(connection: Box<dyn Connection>, config: SessionConfig) -> Self {
        Self {
            connection,
            history: LineHistory::new(config.max_lines),
            input: InputLine::new(),
            prompt: config.prompt,
        }
    }

    /// Drains every pending transport event. Call once per tick.
    pub fn pump(&mut self) {
        while let Some(event) = self.connection.try_recv() {
            self.handle_event(event);
        }
    }

    /// The single dispatch point for transport events.
    fn handle_event(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Message(payload) => {
                if payload == CLEAR_SEQUENCE {
                    self.history.clear();
                } else {
                    self.history.append(payload);
                }
            }
            ConnectionEvent::Opened => debug!("transport opened"),
            ConnectionEvent::Closed => debug!("transport closed"),
            ConnectionEvent::Error(info) => warn!("transport error: {info}"),
        }
    }

    /// Feeds one key to the editor and transmits a completed submission.
    pub fn handle_key(&mut self, key: Key) {
        if let Some(command) = self.input.handle_key(key) {
            self.submit(command);
        }
    }

    fn submit(&mut self, command: String) {
        let echo = format!("{} {}", self.prompt, command);
        if self.connection.state().is_connected() {
            self.history.append(echo);
            if let Err(e) = self.connection.send(&command) {
                // The transport dropped between the state check and the send.
                self.history.append(format!("Error: {e}"));
            }
        } else {
            self.history.push(echo);
            self.history
                .append(format!("Error: {}", ConnectionError::NotConnected));
        }
    }

    /// Surfaces an error as a visible history line.
    pub fn report_error(&mut self, message: impl AsRef<str>) {
        self.history.append(format!("Error: {}", message.as_ref()));
    }

    /// The displayable line record.
    pub fn history(&self) -> &LineHistory {
        &self.history
    }

    /// The not-yet-submitted command line.
    pub fn pending_input(&self) -> &str {
        self.input.pending()
    }

    /// The prompt label.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Current transport lifecycle state.
    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Swaps in a fresh connection, closing the old one first.
    ///
    /// History and pending input survive the swap; only the transport is
    /// replaced.
    pub fn replace_connection(&mut self, connection: Box<dyn Connection>) {
        self.connection.close();
        self.connection = connection;
    }

    /// Tears down the transport. Called once, unconditionally, at session
    /// end.
    pub fn close(&mut self) {
        self.connection.close();
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("history", &self.history)
            .field("input", &self.input)
            .field("prompt", &self.prompt)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Scriptable in-memory transport for controller tests.
    struct FakeConnection {
        state: Rc<Cell<ConnectionState>>,
        sent: Rc<RefCell<Vec<String>>>,
        events: VecDeque<ConnectionEvent>,
        closed: Rc<Cell<u32>>,
    }

    impl Default for FakeConnection {
        fn default() -> Self {
            Self {
                state: Rc::new(Cell::new(ConnectionState::Disconnected)),
                sent: Rc::default(),
                events: VecDeque::new(),
                closed: Rc::default(),
            }
        }
    }

    impl Connection for FakeConnection {
        fn state(&self) -> ConnectionState {
            self.state.get()
        }

        fn send(&mut self, command: &str) -> Result<(), ConnectionError> {
            if !self.state.get().is_connected() {
                return Err(ConnectionError::NotConnected);
            }
            self.sent.borrow_mut().push(command.to_string());
            Ok(())
        }

        fn try_recv(&mut self) -> Option<ConnectionEvent> {
            self.events.pop_front()
        }

        fn close(&mut self) {
            self.closed.set(self.closed.get() + 1);
            self.state.set(ConnectionState::Disconnected);
        }
    }

    struct Harness {
        session: SessionController,
        state: Rc<Cell<ConnectionState>>,
        sent: Rc<RefCell<Vec<String>>>,
        closed: Rc<Cell<u32>>,
    }

    fn harness_with_events(events: Vec<ConnectionEvent>) -> Harness {
        let state = Rc::new(Cell::new(ConnectionState::Connected));
        let sent = Rc::new(RefCell::new(Vec::new()));
        let closed = Rc::new(Cell::new(0));
        let fake = FakeConnection {
            state: Rc::clone(&state),
            sent: Rc::clone(&sent),
            events: events.into(),
            closed: Rc::clone(&closed),
        };
        Harness {
            session: SessionController::new(Box::new(fake)),
            state,
            sent,
            closed,
        }
    }

    fn harness() -> Harness {
        harness_with_events(Vec::new())
    }

    fn type_command(session: &mut SessionController, command: &str) {
        for c in command.chars() {
            session.handle_key(Key::Char(c));
        }
        session.handle_key(Key::Enter);
    }

    fn lines(session: &SessionController) -> Vec<&str> {
        session.history().snapshot().collect()
    }

    #[test]
    fn inbound_payload_appends_with_separator() {
        let mut h = harness_with_events(vec![ConnectionEvent::Message("output".into())]);
        h.session.pump();
        assert_eq!(lines(&h.session), vec!["output", ""]);
    }

    #[test]
    fn clear_sequence_empties_history() {
        let mut h = harness_with_events(vec![
            ConnectionEvent::Message("one".into()),
            ConnectionEvent::Message("two".into()),
            ConnectionEvent::Message(CLEAR_SEQUENCE.into()),
        ]);
        h.session.pump();
        assert!(h.session.history().is_empty());
    }

    #[test]
    fn payload_containing_clear_sequence_is_plain_text() {
        let payload = format!("before {CLEAR_SEQUENCE} after");
        let mut h = harness_with_events(vec![ConnectionEvent::Message(payload.clone())]);
        h.session.pump();
        assert_eq!(lines(&h.session), vec![payload.as_str(), ""]);
    }

    #[test]
    fn output_after_clear_starts_a_fresh_screen() {
        let mut h = harness_with_events(vec![
            ConnectionEvent::Message("old".into()),
            ConnectionEvent::Message(CLEAR_SEQUENCE.into()),
            ConnectionEvent::Message("new".into()),
        ]);
        h.session.pump();
        assert_eq!(lines(&h.session), vec!["new", ""]);
    }

    #[test]
    fn connected_submit_echoes_and_sends_once() {
        let mut h = harness();
        type_command(&mut h.session, "ls");
        assert_eq!(lines(&h.session), vec!["user@device < ls", ""]);
        assert_eq!(*h.sent.borrow(), vec!["ls".to_string()]);
    }

    #[test]
    fn disconnected_submit_echoes_error_and_never_sends() {
        let h = harness();
        h.state.set(ConnectionState::Disconnected);
        let mut session = h.session;
        type_command(&mut session, "ls");
        assert_eq!(
            lines(&session),
            vec!["user@device < ls", "Error: Not connected to backend.", ""]
        );
        assert!(h.sent.borrow().is_empty());
    }

    #[test]
    fn whitespace_submit_touches_nothing() {
        let mut h = harness();
        type_command(&mut h.session, "   ");
        assert!(h.session.history().is_empty());
        assert!(h.sent.borrow().is_empty());
    }

    #[test]
    fn empty_submit_touches_nothing() {
        let mut h = harness();
        h.session.handle_key(Key::Enter);
        assert!(h.session.history().is_empty());
        assert!(h.sent.borrow().is_empty());
    }

    #[test]
    fn submit_clears_the_pending_input() {
        let mut h = harness();
        type_command(&mut h.session, "pwd");
        assert_eq!(h.session.pending_input(), "");
    }

    #[test]
    fn backspace_edits_before_submit() {
        let mut h = harness();
        h.session.handle_key(Key::Char('l'));
        h.session.handle_key(Key::Char('x'));
        h.session.handle_key(Key::Backspace);
        h.session.handle_key(Key::Char('s'));
        h.session.handle_key(Key::Enter);
        assert_eq!(*h.sent.borrow(), vec!["ls".to_string()]);
    }

    #[test]
    fn errored_state_blocks_sends_like_disconnected() {
        let mut h = harness();
        h.state.set(ConnectionState::Errored);
        type_command(&mut h.session, "ls");
        assert!(h.sent.borrow().is_empty());
        assert_eq!(
            lines(&h.session).last().copied(),
            Some(""),
            "error block ends with the blank separator"
        );
    }

    #[test]
    fn transport_events_leave_history_alone() {
        let mut h = harness_with_events(vec![
            ConnectionEvent::Opened,
            ConnectionEvent::Error("reset".into()),
            ConnectionEvent::Closed,
        ]);
        h.session.pump();
        assert!(h.session.history().is_empty());
    }

    #[test]
    fn close_reaches_the_connection() {
        let mut h = harness();
        h.session.close();
        assert_eq!(h.closed.get(), 1);
    }

    #[test]
    fn close_tolerates_repeat_calls() {
        let mut h = harness();
        h.session.close();
        h.session.close();
        assert_eq!(h.closed.get(), 2);
        assert_eq!(h.session.connection_state(), ConnectionState::Disconnected);
    }

    #[test]
    fn replace_connection_closes_the_old_transport() {
        let mut h = harness();
        let replacement = FakeConnection {
            state: Rc::new(Cell::new(ConnectionState::Connected)),
            ..FakeConnection::default()
        };
        h.session.replace_connection(Box::new(replacement));
        assert_eq!(h.closed.get(), 1);
        assert!(h.session.connection_state().is_connected());
    }

    #[test]
    fn replace_connection_keeps_history() {
        let mut h = harness_with_events(vec![ConnectionEvent::Message("kept".into())]);
        h.session.pump();
        let replacement = FakeConnection::default();
        h.session.replace_connection(Box::new(replacement));
        assert_eq!(lines(&h.session), vec!["kept", ""]);
    }

    #[test]
    fn report_error_appends_a_visible_line() {
        let mut h = harness();
        h.session.report_error("reconnect failed");
        assert_eq!(lines(&h.session), vec!["Error: reconnect failed", ""]);
    }

    #[test]
    fn custom_prompt_flows_into_the_echo() {
        let state = Rc::new(Cell::new(ConnectionState::Connected));
        let fake = FakeConnection {
            state,
            ..FakeConnection::default()
        };
        let config = SessionConfig {
            prompt: "guest >".into(),
            ..SessionConfig::default()
        };
        let mut session = SessionController::with_config(Box::new(fake), config);
        type_command(&mut session, "hello");
        assert_eq!(
            session.history().snapshot().next(),
            Some("guest > hello")
        );
    }

    #[test]
    fn configured_cap_bounds_the_history() {
        let fake = FakeConnection {
            state: Rc::new(Cell::new(ConnectionState::Connected)),
            ..FakeConnection::default()
        };
        let config = SessionConfig {
            max_lines: 4,
            ..SessionConfig::default()
        };
        let mut session = SessionController::with_config(Box::new(fake), config);
        for i in 0..5u32 {
            session.handle_key(Key::Char(char::from_digit(i, 10).unwrap()));
            session.handle_key(Key::Enter);
        }
        assert_eq!(session.history().len(), 4);
    }
}
