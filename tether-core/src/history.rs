//! The line-history buffer.

use std::collections::VecDeque;

/// Default retention cap in lines.
pub const DEFAULT_MAX_LINES: usize = 10_000;

/// Ordered record of display lines with bounded retention.
///
/// Insertion order is display order, top to bottom. Lines are never mutated
/// or removed individually: the buffer only grows at the back, evicts from
/// the front when the retention cap is exceeded, and empties as a whole on
/// [`clear`](LineHistory::clear).
#[derive(Debug, Clone)]
pub struct LineHistory {
    lines: VecDeque<String>,
    max_lines: usize,
}

impl Default for LineHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINES)
    }
}

impl LineHistory {
    /// Creates an empty history retaining at most `max_lines` lines.
    pub fn new(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            max_lines,
        }
    }

    /// Returns the number of lines, separators included.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if the history holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Appends one line followed by one blank separator line.
    pub fn append(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
        self.lines.push_back(String::new());
        self.evict();
    }

    /// Appends a single line with no separator.
    ///
    /// Used for the echoed prompt line of a failed submission, where the
    /// separator comes after the error line instead.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
        self.evict();
    }

    /// Empties the whole buffer.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Read-only ordered view, oldest line first.
    pub fn snapshot(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    fn evict(&mut self) {
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }
}
