//! Prompt and banner rendering

use crossterm::style::{Color, Stylize};

/// Interrupt echo written before the prompt is redrawn
pub const INTERRUPT_ECHO: &str = "^C\r\n";

/// Input prompt, redrawn after every output batch and after an interrupt
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    label: String,
    color: Color,
}

impl Prompt {
    pub fn new(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            color,
        }
    }

    /// Styled prompt text, starting at column 0
    pub fn render(&self) -> String {
        let marker = format!("{}$ ", self.label);
        format!("\r{}", marker.with(self.color).bold())
    }
}

impl Default for Prompt {
    fn default() -> Self {
        Self::new("$", Color::Blue)
    }
}

/// Line shown once the connection opens
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    text: String,
    color: Color,
}

impl Banner {
    pub fn new(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }

    pub fn render(&self) -> String {
        format!("Connected to {}", self.text)
            .with(self.color)
            .bold()
            .to_string()
    }
}

impl Default for Banner {
    fn default() -> Self {
        Self::new("remote shell", Color::Green)
    }
}
