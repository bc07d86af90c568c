use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rig_core::state::TextInput;

/// The interrupt combination, honoured on every screen.
pub fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// A printable character typed without Ctrl or Alt.
pub fn plain_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(c)
        }
        _ => None,
    }
}

/// `q` or esc: leave the current screen.
pub fn is_back(key: &KeyEvent) -> bool {
    key.code == KeyCode::Esc || plain_char(key) == Some('q')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMove {
    Up,
    Down,
    Top,
    Bottom,
    PageUp,
    PageDown,
}

/// Arrow keys plus vim-style `j`/`k`/`g`/`G`.
pub fn resolve_list_key(key: &KeyEvent) -> Option<ListMove> {
    match (key.code, plain_char(key)) {
        (KeyCode::Up, _) | (_, Some('k')) => Some(ListMove::Up),
        (KeyCode::Down, _) | (_, Some('j')) => Some(ListMove::Down),
        (KeyCode::Home, _) | (_, Some('g')) => Some(ListMove::Top),
        (KeyCode::End, _) | (_, Some('G')) => Some(ListMove::Bottom),
        (KeyCode::PageUp, _) => Some(ListMove::PageUp),
        (KeyCode::PageDown, _) => Some(ListMove::PageDown),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEdit {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

/// Editing keys for single-line text fields.
pub fn resolve_input_key(key: &KeyEvent) -> Option<InputEdit> {
    if let Some(c) = plain_char(key) {
        return Some(InputEdit::Insert(c));
    }
    match key.code {
        KeyCode::Backspace => Some(InputEdit::Backspace),
        KeyCode::Delete => Some(InputEdit::Delete),
        KeyCode::Left => Some(InputEdit::Left),
        KeyCode::Right => Some(InputEdit::Right),
        KeyCode::Home => Some(InputEdit::Home),
        KeyCode::End => Some(InputEdit::End),
        _ => None,
    }
}

pub fn apply_input_edit(input: &mut TextInput, edit: InputEdit) {
    match edit {
        InputEdit::Insert(c) => input.insert(c),
        InputEdit::Backspace => {
            input.backspace();
        }
        InputEdit::Delete => {
            input.delete();
        }
        InputEdit::Left => input.left(),
        InputEdit::Right => input.right(),
        InputEdit::Home => input.home(),
        InputEdit::End => input.end(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_ctrl_c() {
        assert!(is_ctrl_c(&KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!is_ctrl_c(&key(KeyCode::Char('c'))));
    }

    #[test]
    fn test_list_keys() {
        assert_eq!(resolve_list_key(&key(KeyCode::Char('j'))), Some(ListMove::Down));
        assert_eq!(resolve_list_key(&key(KeyCode::Up)), Some(ListMove::Up));
        assert_eq!(resolve_list_key(&key(KeyCode::Char('x'))), None);
        let ctrl_j = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::CONTROL);
        assert_eq!(resolve_list_key(&ctrl_j), None);
    }

    #[test]
    fn test_back_keys() {
        assert!(is_back(&key(KeyCode::Esc)));
        assert!(is_back(&key(KeyCode::Char('q'))));
        assert!(!is_back(&key(KeyCode::Char('Q'))));
    }

    #[test]
    fn test_input_keys_edit_buffer() {
        let mut input = TextInput::new();
        for code in [
            KeyCode::Char('a'),
            KeyCode::Char('b'),
            KeyCode::Left,
            KeyCode::Backspace,
            KeyCode::End,
            KeyCode::Char('c'),
        ] {
            if let Some(edit) = resolve_input_key(&key(code)) {
                apply_input_edit(&mut input, edit);
            }
        }
        assert_eq!(input.text(), "bc");
    }

    #[test]
    fn test_shifted_chars_are_plain() {
        let upper = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(plain_char(&upper), Some('A'));
    }
}
