//! Key press model
//!
//! Terminal-independent description of one key press as delivered by the
//! display surface.

use bitflags::bitflags;

bitflags! {
    /// Modifier keys
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
    }
}

/// Identifier of the physical key
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamedKey {
    Char(char),
    Enter,
    Backspace,
    Tab,
    Up,
    Down,
    /// Any key the line editor has no binding for
    Other,
}

/// A single key press
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPress {
    pub key: NamedKey,
    pub modifiers: Modifiers,
    /// Text the key inserts; empty for keys that insert nothing
    pub text: String,
}

impl KeyPress {
    pub fn new(key: NamedKey, modifiers: Modifiers, text: impl Into<String>) -> Self {
        Self {
            key,
            modifiers,
            text: text.into(),
        }
    }
}

#[cfg(test)]
impl KeyPress {
    /// Unmodified printable character
    pub fn char(ch: char) -> Self {
        Self::new(NamedKey::Char(ch), Modifiers::empty(), ch.to_string())
    }

    /// Named key with no modifiers and no text
    pub fn named(key: NamedKey) -> Self {
        Self::new(key, Modifiers::empty(), String::new())
    }

    /// Character with Ctrl held
    pub fn ctrl(ch: char) -> Self {
        Self::new(NamedKey::Char(ch), Modifiers::CTRL, String::new())
    }
}
