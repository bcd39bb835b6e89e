//! Single-line text input backing the search header.
//!
//! The caret is kept as a char index so multi-byte input edits cleanly.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::UnicodeWidthStr;

/// What the input did with a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEdit {
    /// Text changed
    Changed,
    /// Only the caret moved
    Moved,
    /// Enter pressed
    Submitted,
    /// Esc pressed
    Blurred,
    Unhandled,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchInput {
    value: String,
    cursor: usize,
}

impl SearchInput {
    /// Input holding `value` with the caret at its end.
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_owned(),
            cursor: value.chars().count(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the text, keeping the caret at the end.
    pub fn set_value(&mut self, value: &str) {
        *self = Self::new(value);
    }

    /// Display width of the text left of the caret.
    pub fn cursor_width(&self) -> usize {
        self.value[..self.byte_offset(self.cursor)].width()
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    /// Default action for a key when nothing else claimed it.
    pub fn apply_key(&mut self, key: &KeyEvent) -> InputEdit {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('u') if ctrl => {
                if self.value.is_empty() {
                    return InputEdit::Unhandled;
                }
                self.set_value("");
                InputEdit::Changed
            }
            KeyCode::Char('a') if ctrl => self.move_to(0),
            KeyCode::Char('e') if ctrl => self.move_to(self.char_len()),
            KeyCode::Char(c) if !ctrl => {
                let at = self.byte_offset(self.cursor);
                self.value.insert(at, c);
                self.cursor += 1;
                InputEdit::Changed
            }
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return InputEdit::Unhandled;
                }
                self.cursor -= 1;
                let at = self.byte_offset(self.cursor);
                self.value.remove(at);
                InputEdit::Changed
            }
            KeyCode::Delete => {
                if self.cursor >= self.char_len() {
                    return InputEdit::Unhandled;
                }
                let at = self.byte_offset(self.cursor);
                self.value.remove(at);
                InputEdit::Changed
            }
            KeyCode::Left => self.move_to(self.cursor.saturating_sub(1)),
            KeyCode::Right => self.move_to((self.cursor + 1).min(self.char_len())),
            // single-line inputs send the caret to either end on up/down
            KeyCode::Home | KeyCode::Up => self.move_to(0),
            KeyCode::End | KeyCode::Down => self.move_to(self.char_len()),
            KeyCode::Enter => InputEdit::Submitted,
            KeyCode::Esc => InputEdit::Blurred,
            _ => InputEdit::Unhandled,
        }
    }

    fn move_to(&mut self, cursor: usize) -> InputEdit {
        if cursor == self.cursor {
            return InputEdit::Unhandled;
        }
        self.cursor = cursor;
        InputEdit::Moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(input: &mut SearchInput, s: &str) {
        for c in s.chars() {
            assert_eq!(input.apply_key(&key(KeyCode::Char(c))), InputEdit::Changed);
        }
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut input = SearchInput::default();
        type_str(&mut input, "cats");
        assert_eq!(input.value(), "cats");
        assert_eq!(input.cursor(), 4);

        assert_eq!(input.apply_key(&key(KeyCode::Backspace)), InputEdit::Changed);
        assert_eq!(input.value(), "cat");
    }

    #[test]
    fn test_insert_in_middle_of_multibyte_text() {
        let mut input = SearchInput::new("zürich");
        input.apply_key(&key(KeyCode::Home));
        input.apply_key(&key(KeyCode::Right));
        input.apply_key(&key(KeyCode::Right));
        type_str(&mut input, "-");

        assert_eq!(input.value(), "zü-rich");
        assert_eq!(input.cursor(), 3);
        assert_eq!(input.cursor_width(), 3);
    }

    #[test]
    fn test_up_down_move_caret_to_ends() {
        let mut input = SearchInput::new("rust");
        assert_eq!(input.apply_key(&key(KeyCode::Up)), InputEdit::Moved);
        assert_eq!(input.cursor(), 0);
        assert_eq!(input.apply_key(&key(KeyCode::Up)), InputEdit::Unhandled);
        assert_eq!(input.apply_key(&key(KeyCode::Down)), InputEdit::Moved);
        assert_eq!(input.cursor(), 4);
    }

    #[test]
    fn test_boundary_edits_are_unhandled() {
        let mut input = SearchInput::default();
        assert_eq!(input.apply_key(&key(KeyCode::Backspace)), InputEdit::Unhandled);
        assert_eq!(input.apply_key(&key(KeyCode::Delete)), InputEdit::Unhandled);
        assert_eq!(
            input.apply_key(&KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)),
            InputEdit::Unhandled
        );
    }

    #[test]
    fn test_enter_and_esc() {
        let mut input = SearchInput::new("q");
        assert_eq!(input.apply_key(&key(KeyCode::Enter)), InputEdit::Submitted);
        assert_eq!(input.apply_key(&key(KeyCode::Esc)), InputEdit::Blurred);
        assert_eq!(input.value(), "q");
    }
}
