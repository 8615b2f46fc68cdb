//! Display surface
//!
//! The line editor only ever asks the display to write text, write a line,
//! erase one character cell run, refit, or shut down. `TerminalSurface`
//! does this on stdout with crossterm in raw mode.

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor::SetCursorStyle,
    execute, queue,
    style::Print,
    terminal::{self, SetTitle},
};
use tracing::{debug, info, warn};

/// Line break used in raw mode
pub const NEWLINE: &str = "\r\n";

/// Sequence that erases one cell to the left of the cursor
const ERASE_CELL: &str = "\x08 \x08";

/// Rendering capabilities consumed by the line editor
pub trait Surface {
    /// Write text as-is
    fn write(&mut self, text: &str) -> io::Result<()>;

    /// Write text followed by a line break
    fn write_line(&mut self, text: &str) -> io::Result<()>;

    /// Erase one character occupying `width` cells before the cursor
    fn erase(&mut self, width: usize) -> io::Result<()>;

    /// The hosting terminal changed size
    fn fit(&mut self, cols: u16, rows: u16);

    /// Release the display. Must be safe to call more than once.
    fn dispose(&mut self);
}

/// Surface backed by the controlling terminal
pub struct TerminalSurface {
    out: Stdout,
    size: (u16, u16),
    active: bool,
}

impl TerminalSurface {
    /// Put the terminal in raw mode and take over stdout
    pub fn open(title: &str) -> io::Result<Self> {
        terminal::enable_raw_mode()?;

        let mut out = io::stdout();
        execute!(
            out,
            SetCursorStyle::BlinkingBlock,
            SetTitle(title),
        )?;

        let size = terminal::size().unwrap_or((80, 24));
        info!("Display opened: {}x{}", size.0, size.1);

        Ok(Self {
            out,
            size,
            active: true,
        })
    }

    fn emit(&mut self, text: &str) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        queue!(self.out, Print(text))?;
        self.out.flush()
    }
}

impl Surface for TerminalSurface {
    fn write(&mut self, text: &str) -> io::Result<()> {
        self.emit(text)
    }

    fn write_line(&mut self, text: &str) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        queue!(self.out, Print(text), Print(NEWLINE))?;
        self.out.flush()
    }

    fn erase(&mut self, width: usize) -> io::Result<()> {
        self.emit(&ERASE_CELL.repeat(width))
    }

    fn fit(&mut self, cols: u16, rows: u16) {
        if self.size != (cols, rows) {
            debug!("Display resized: {}x{} -> {}x{}", self.size.0, self.size.1, cols, rows);
            self.size = (cols, rows);
        }
    }

    fn dispose(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        let _ = execute!(self.out, SetCursorStyle::DefaultUserShape);
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("Failed to restore terminal mode: {}", e);
        }
        let _ = self.out.flush();
        info!("Display released");
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        self.dispose();
    }
}
