//! Key dispatcher
//!
//! Classifies every key press into exactly one editing action. Rules are
//! checked in priority order and the last one catches everything.

use super::key::{KeyPress, Modifiers, NamedKey};

/// Key that, with Ctrl held, sends an interrupt
pub const INTERRUPT_KEY: char = 'c';

/// Editing action for a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Interrupt,
    Submit,
    Erase,
    HistoryPrev,
    HistoryNext,
    Complete,
    /// Append the key's text; empty text makes this a no-op
    Insert(String),
}

/// Map a key press to its action
pub fn classify(key: &KeyPress) -> Action {
    if key.modifiers.contains(Modifiers::CTRL) && key.key == NamedKey::Char(INTERRUPT_KEY) {
        return Action::Interrupt;
    }

    match key.key {
        NamedKey::Enter => Action::Submit,
        NamedKey::Backspace => Action::Erase,
        NamedKey::Up => Action::HistoryPrev,
        NamedKey::Down => Action::HistoryNext,
        NamedKey::Tab => Action::Complete,
        _ => Action::Insert(key.text.clone()),
    }
}
