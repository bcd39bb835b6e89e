//! Result navigation bindings owned by the search controller.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Commands the bound keys map to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavCommand {
    Next,
    Previous,
    Activate,
}

/// Whether a handler consumed a key. `Ignored` lets the text input apply its
/// default action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    Handled,
    Ignored,
}

impl KeyDisposition {
    pub const fn from_changed(changed: bool) -> Self {
        if changed { Self::Handled } else { Self::Ignored }
    }

    pub const fn is_handled(self) -> bool {
        matches!(self, Self::Handled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, NavCommand>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = HashMap::with_capacity(3);
        bindings.insert(plain(KeyCode::Down), NavCommand::Next);
        bindings.insert(plain(KeyCode::Up), NavCommand::Previous);
        bindings.insert(plain(KeyCode::Enter), NavCommand::Activate);
        Self { bindings }
    }
}

impl KeyBindings {
    /// No bindings at all, as after teardown.
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    pub fn bind(&mut self, key: KeyEvent, command: NavCommand) {
        self.bindings.insert(normalize(key), command);
    }

    pub fn lookup(&self, key: &KeyEvent) -> Option<NavCommand> {
        self.bindings.get(&normalize(*key)).copied()
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

const fn plain(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Repeats and presses bind the same; kind and state are dropped.
const fn normalize(key: KeyEvent) -> KeyEvent {
    KeyEvent::new(key.code, key.modifiers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.lookup(&plain(KeyCode::Down)), Some(NavCommand::Next));
        assert_eq!(bindings.lookup(&plain(KeyCode::Up)), Some(NavCommand::Previous));
        assert_eq!(bindings.lookup(&plain(KeyCode::Enter)), Some(NavCommand::Activate));
        assert_eq!(bindings.lookup(&plain(KeyCode::Char('j'))), None);
    }

    #[test]
    fn test_repeat_matches_press() {
        let bindings = KeyBindings::default();
        let repeat = KeyEvent {
            code: KeyCode::Down,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Repeat,
            state: KeyEventState::NONE,
        };
        assert_eq!(bindings.lookup(&repeat), Some(NavCommand::Next));
    }

    #[test]
    fn test_modifiers_are_distinct() {
        let mut bindings = KeyBindings::default();
        let ctrl_n = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL);
        assert_eq!(bindings.lookup(&ctrl_n), None);

        bindings.bind(ctrl_n, NavCommand::Next);
        assert_eq!(bindings.lookup(&ctrl_n), Some(NavCommand::Next));
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut bindings = KeyBindings::default();
        bindings.clear();
        assert!(bindings.is_empty());
        assert_eq!(bindings.lookup(&plain(KeyCode::Down)), None);
    }
}
