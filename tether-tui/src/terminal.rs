//! Terminal setup and teardown for the tether TUI.

use std::io::{self, Stdout};
use std::panic;

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

/// The terminal type used throughout the TUI.
pub type TetherTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Puts the terminal into raw mode on the alternate screen.
///
/// Pass the returned terminal to `restore_terminal` on exit.
pub fn setup_terminal() -> io::Result<TetherTerminal> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Returns the terminal to its normal state.
///
/// Called on exit and from the panic hook so a crash never leaves the
/// user's terminal in raw mode.
pub fn restore_terminal(terminal: &mut TetherTerminal) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    Ok(())
}

/// Installs a panic hook that restores the terminal before printing the
/// panic. Call once at startup, before entering the TUI.
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);

        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_and_restore_have_the_expected_signatures() {
        // A real TTY is required to exercise these; verify they compile
        // against the alias.
        fn _check_setup() -> io::Result<TetherTerminal> {
            setup_terminal()
        }

        fn _check_restore(t: &mut TetherTerminal) -> io::Result<()> {
            restore_terminal(t)
        }
    }
}
