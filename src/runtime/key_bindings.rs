use crate::runtime::command::Command;
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn key(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub fn from_event(event: KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// Fallback mapping for keys the current step view did not consume.
#[derive(Debug, Default)]
pub struct KeyBindings {
    bindings: HashMap<KeyBinding, Command>,
}

impl KeyBindings {
    pub fn new() -> Self {
        let mut manager = Self::default();
        manager.install_defaults();
        manager
    }

    pub fn bind(&mut self, key: KeyBinding, command: Command) {
        self.bindings.insert(key, command);
    }

    pub fn resolve(&self, event: KeyEvent) -> Option<Command> {
        self.bindings.get(&KeyBinding::from_event(event)).copied()
    }

    fn install_defaults(&mut self) {
        self.bind(KeyBinding::ctrl(KeyCode::Char('c')), Command::Exit);
        self.bind(KeyBinding::key(KeyCode::Enter), Command::Primary);
        self.bind(KeyBinding::ctrl(KeyCode::Char('n')), Command::Primary);
        self.bind(KeyBinding::ctrl(KeyCode::Char('b')), Command::Back);
        self.bind(KeyBinding::ctrl(KeyCode::Char('s')), Command::Skip);
        self.bind(KeyBinding::key(KeyCode::Esc), Command::Cancel);
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyBinding, KeyBindings};
    use crate::runtime::command::Command;
    use crate::terminal::{KeyCode, KeyEvent};

    #[test]
    fn defaults_cover_wizard_actions() {
        let bindings = KeyBindings::new();
        assert_eq!(bindings.resolve(KeyEvent::plain(KeyCode::Enter)), Some(Command::Primary));
        assert_eq!(bindings.resolve(KeyEvent::ctrl('b')), Some(Command::Back));
        assert_eq!(bindings.resolve(KeyEvent::ctrl('s')), Some(Command::Skip));
        assert_eq!(bindings.resolve(KeyEvent::plain(KeyCode::Esc)), Some(Command::Cancel));
        assert_eq!(bindings.resolve(KeyEvent::ctrl('c')), Some(Command::Exit));
        assert_eq!(bindings.resolve(KeyEvent::plain(KeyCode::Char('b'))), None);
    }

    #[test]
    fn bind_overrides_default() {
        let mut bindings = KeyBindings::new();
        bindings.bind(KeyBinding::key(KeyCode::Esc), Command::Exit);
        assert_eq!(bindings.resolve(KeyEvent::plain(KeyCode::Esc)), Some(Command::Exit));
    }
}
