//! Input line buffer
//!
//! Holds the text typed since the last submit, interrupt or output batch.
//! Whatever is in here is what the terminal currently shows after the prompt.

use unicode_width::UnicodeWidthChar;

/// The in-progress, not yet submitted input line
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputLine {
    text: String,
}

impl InputLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one typed character
    pub fn push(&mut self, ch: char) {
        self.text.push(ch);
    }

    /// Drop the last drawn cell: the last character with a display width,
    /// together with any zero-width marks typed after it. Returns the width
    /// to erase, or `None` if the buffer was empty.
    pub fn pop_cell(&mut self) -> Option<usize> {
        let mut ch = self.text.pop()?;
        while char_width(ch) == 0 {
            match self.text.pop() {
                Some(prev) => ch = prev,
                None => return Some(0),
            }
        }
        Some(char_width(ch))
    }

    /// Take the whole line, leaving the buffer empty
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    /// Clear the buffer, returning the display width of each removed character
    /// in order, so the caller can erase exactly what was drawn.
    pub fn drain_widths(&mut self) -> Vec<usize> {
        let widths = self.text.chars().map(char_width).collect();
        self.text.clear();
        widths
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Display width of a single character as drawn on the terminal
fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}
