//! Key mapping for terminal input
//!
//! Converts crossterm key events into the editor's `KeyPress` model.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::key::{KeyPress, Modifiers, NamedKey};

impl From<KeyModifiers> for Modifiers {
    fn from(mods: KeyModifiers) -> Self {
        let mut result = Modifiers::empty();
        if mods.contains(KeyModifiers::SHIFT) {
            result |= Modifiers::SHIFT;
        }
        if mods.contains(KeyModifiers::CONTROL) {
            result |= Modifiers::CTRL;
        }
        if mods.contains(KeyModifiers::ALT) {
            result |= Modifiers::ALT;
        }
        result
    }
}

/// Key mapper for converting crossterm events to key presses
pub struct KeyMapper;

impl KeyMapper {
    /// Map a crossterm KeyEvent. Releases are dropped.
    pub fn map(event: &KeyEvent) -> Option<KeyPress> {
        if event.kind == KeyEventKind::Release {
            return None;
        }

        let mods = Modifiers::from(event.modifiers);

        let press = match event.code {
            KeyCode::Char(ch) => {
                let ch = if mods.contains(Modifiers::CTRL) {
                    Self::ctrl_symbol(ch)
                } else {
                    ch
                };
                KeyPress::new(NamedKey::Char(ch), mods, Self::char_text(ch, mods))
            }
            KeyCode::Enter => KeyPress::new(NamedKey::Enter, mods, ""),
            KeyCode::Backspace => KeyPress::new(NamedKey::Backspace, mods, ""),
            KeyCode::Tab => KeyPress::new(NamedKey::Tab, mods, ""),
            KeyCode::Up => KeyPress::new(NamedKey::Up, mods, ""),
            KeyCode::Down => KeyPress::new(NamedKey::Down, mods, ""),
            _ => KeyPress::new(NamedKey::Other, mods, ""),
        };

        Some(press)
    }

    /// Undo the Unix decoding of the control bytes 0x1C..=0x1F, which
    /// arrive as Ctrl + `4`..`7` rather than the symbol that was typed.
    fn ctrl_symbol(ch: char) -> char {
        match ch {
            '4' => '\\',
            '5' => ']',
            '6' => '^',
            '7' => '_',
            other => other,
        }
    }

    /// Text a character key inserts. Ctrl and Alt chords insert nothing.
    fn char_text(ch: char, mods: Modifiers) -> String {
        if mods.intersects(Modifiers::CTRL | Modifiers::ALT) || ch.is_control() {
            String::new()
        } else {
            ch.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn key_event(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn test_char_keys() {
        let event = key_event(KeyCode::Char('a'), KeyModifiers::NONE);
        assert_eq!(KeyMapper::map(&event), Some(KeyPress::char('a')));

        // Shift only changes the character
        let event = key_event(KeyCode::Char('A'), KeyModifiers::SHIFT);
        let press = KeyMapper::map(&event).unwrap();
        assert_eq!(press.text, "A");
        assert_eq!(press.modifiers, Modifiers::SHIFT);
    }

    #[test]
    fn test_ctrl_c() {
        let event = key_event(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(KeyMapper::map(&event), Some(KeyPress::ctrl('c')));
    }

    #[test]
    fn test_ctrl_symbol_bytes() {
        // crossterm decodes 0x1D (Ctrl+]) as Ctrl+5
        let event = key_event(KeyCode::Char('5'), KeyModifiers::CONTROL);
        let press = KeyMapper::map(&event).unwrap();
        assert_eq!(press, KeyPress::ctrl(']'));
        assert!(Config::default().detach_key().unwrap().matches(&press));

        for (byte_char, symbol) in [('4', '\\'), ('6', '^'), ('7', '_')] {
            let event = key_event(KeyCode::Char(byte_char), KeyModifiers::CONTROL);
            assert_eq!(KeyMapper::map(&event), Some(KeyPress::ctrl(symbol)));
        }

        // Digits typed without Ctrl are untouched
        let event = key_event(KeyCode::Char('5'), KeyModifiers::NONE);
        assert_eq!(KeyMapper::map(&event), Some(KeyPress::char('5')));
    }

    #[test]
    fn test_alt_chord_has_no_text() {
        let event = key_event(KeyCode::Char('x'), KeyModifiers::ALT);
        let press = KeyMapper::map(&event).unwrap();
        assert!(press.text.is_empty());
        assert_eq!(press.modifiers, Modifiers::ALT);
    }

    #[test]
    fn test_named_keys() {
        let cases = [
            (KeyCode::Enter, NamedKey::Enter),
            (KeyCode::Backspace, NamedKey::Backspace),
            (KeyCode::Tab, NamedKey::Tab),
            (KeyCode::Up, NamedKey::Up),
            (KeyCode::Down, NamedKey::Down),
            (KeyCode::Left, NamedKey::Other),
            (KeyCode::F(5), NamedKey::Other),
        ];
        for (code, expected) in cases {
            let press = KeyMapper::map(&key_event(code, KeyModifiers::NONE)).unwrap();
            assert_eq!(press.key, expected);
            assert!(press.text.is_empty());
        }
    }

    #[test]
    fn test_release_is_dropped() {
        let mut event = key_event(KeyCode::Char('a'), KeyModifiers::NONE);
        event.kind = KeyEventKind::Release;
        assert_eq!(KeyMapper::map(&event), None);
    }
}
