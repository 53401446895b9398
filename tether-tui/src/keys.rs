//! Translation from crossterm key events to session keys.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use tether_core::Key;

/// Maps a crossterm key event to a session key.
///
/// `Enter` and `Backspace` are the two reserved identifiers; any plain
/// printable character passes through. Everything else — arrows, function
/// keys, control and alt chords — is dropped here and never reaches the
/// editor.
pub fn translate_key(event: &KeyEvent) -> Option<Key> {
    if event.modifiers.contains(KeyModifiers::CONTROL)
        || event.modifiers.contains(KeyModifiers::ALT)
    {
        return None;
    }
    match event.code {
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Char(c) => Some(Key::Char(c)),
        _ => None,
    }
}
