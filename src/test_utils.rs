//! Recording fakes for the display and transport seams.

use std::io;

use crate::net::transport::TransportError;
use crate::net::Transport;
use crate::ui::Surface;

/// One call made on a surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Write(String),
    Line(String),
    Erase(usize),
    Fit(u16, u16),
    Dispose,
}

/// Surface that records every directive in order and can be told to fail
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub directives: Vec<Directive>,
    pub fail_writes: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of erase directives emitted
    pub fn erase_count(&self) -> usize {
        self.directives
            .iter()
            .filter(|d| matches!(d, Directive::Erase(_)))
            .count()
    }

    /// Every line written with `write_line`
    pub fn lines(&self) -> Vec<&str> {
        self.directives
            .iter()
            .filter_map(|d| match d {
                Directive::Line(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Plain writes concatenated
    pub fn written(&self) -> String {
        self.directives
            .iter()
            .filter_map(|d| match d {
                Directive::Write(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn last(&self) -> Option<&Directive> {
        self.directives.last()
    }

    pub fn clear(&mut self) {
        self.directives.clear();
    }

    fn record(&mut self, directive: Directive) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "display gone"));
        }
        self.directives.push(directive);
        Ok(())
    }
}

impl Surface for RecordingSurface {
    fn write(&mut self, text: &str) -> io::Result<()> {
        self.record(Directive::Write(text.to_string()))
    }

    fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.record(Directive::Line(text.to_string()))
    }

    fn erase(&mut self, width: usize) -> io::Result<()> {
        self.record(Directive::Erase(width))
    }

    fn fit(&mut self, cols: u16, rows: u16) {
        self.directives.push(Directive::Fit(cols, rows));
    }

    fn dispose(&mut self) {
        self.directives.push(Directive::Dispose);
    }
}

/// Transport that records sends and can be told to fail
#[derive(Debug, Default)]
pub struct RecordingTransport {
    pub sent: Vec<String>,
    pub close_calls: usize,
    pub fail_sends: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for RecordingTransport {
    fn send(&mut self, text: &str) -> Result<(), TransportError> {
        if self.fail_sends {
            return Err(TransportError::Closed);
        }
        self.sent.push(text.to_string());
        Ok(())
    }

    fn close(&mut self) {
        self.close_calls += 1;
    }
}
