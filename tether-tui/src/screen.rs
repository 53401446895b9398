//! Screen rendering: history, prompt line, block cursor.
//!
//! Pure presentation — the engine hands over a history snapshot, the
//! pending input, and the prompt; this module owns scroll-to-bottom and the
//! cursor glyph, none of which carries protocol meaning.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use tether_core::SessionController;

/// Block cursor drawn at the end of the input line.
const CURSOR: &str = "█";

/// Renders the whole session surface into `area`.
///
/// History lines come first, oldest at the top; the prompt plus pending
/// input plus cursor is always the last row, kept visible by scrolling past
/// older lines when the buffer outgrows the viewport.
pub fn render_screen(frame: &mut Frame, area: Rect, session: &SessionController) {
    let mut lines: Vec<Line> = session
        .history()
        .snapshot()
        .map(|line| Line::from(line.to_string()))
        .collect();

    lines.push(Line::from(vec![
        Span::raw(format!("{} {}", session.prompt(), session.pending_input())),
        Span::styled(CURSOR, Style::default().fg(Color::White)),
    ]));

    let height = area.height as usize;
    let scroll = lines.len().saturating_sub(height) as u16;

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(Color::White).bg(Color::Black))
        .scroll((scroll, 0));

    frame.render_widget(paragraph, area);
}
