use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::commands::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "BackTab".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<KeyEvent> for KeyCombo {
    fn from(key: KeyEvent) -> Self {
        Self::new(key.code, key.modifiers)
    }
}

/// An ordered key → command table. The first binding that matches wins,
/// so more specific entries should be added first.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: Vec<(KeyCombo, Command)>,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings every dialog falls back to when neither the focused widget
    /// nor the dialog itself maps a key.
    pub fn dialog_default() -> Self {
        use Command::*;
        let mut km = Self::new();
        km.add(Ok, KeyCombo::plain(KeyCode::Enter));
        km.add(Cancel, KeyCombo::plain(KeyCode::Esc));
        km.add(Cancel, KeyCombo::plain(KeyCode::F(10)));
        km.add(
            Cancel,
            KeyCombo::new(KeyCode::Char('g'), KeyModifiers::CONTROL),
        );
        km.add(Up, KeyCombo::plain(KeyCode::Up));
        km.add(Left, KeyCombo::plain(KeyCode::Left));
        km.add(Down, KeyCombo::plain(KeyCode::Down));
        km.add(Right, KeyCombo::plain(KeyCode::Right));
        km.add(Help, KeyCombo::plain(KeyCode::F(1)));
        km.add(
            Suspend,
            KeyCombo::new(KeyCode::Char('z'), KeyModifiers::CONTROL),
        );
        km.add(
            Refresh,
            KeyCombo::new(KeyCode::Char('l'), KeyModifiers::CONTROL),
        );
        km.add(
            ScreenList,
            KeyCombo::new(KeyCode::Char('`'), KeyModifiers::ALT),
        );
        km.add(
            ScreenNext,
            KeyCombo::new(KeyCode::Char('}'), KeyModifiers::ALT),
        );
        km.add(
            ScreenPrev,
            KeyCombo::new(KeyCode::Char('{'), KeyModifiers::ALT),
        );
        km
    }

    pub fn add(&mut self, command: Command, combo: KeyCombo) {
        self.bindings.push((combo, command));
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Command bound to `key`, or `None` when the key should be ignored.
    pub fn lookup(&self, key: &KeyEvent) -> Option<Command> {
        self.bindings
            .iter()
            .find(|(combo, _)| combo.matches(key))
            .map(|(_, command)| *command)
    }

    pub fn matches(&self, command: Command, key: &KeyEvent) -> bool {
        self.bindings
            .iter()
            .any(|(combo, bound)| *bound == command && combo.matches(key))
    }

    /// Return the display strings for all combos mapped to `command`.
    pub fn combos_for(&self, command: Command) -> Vec<String> {
        self.bindings
            .iter()
            .filter(|(_, bound)| *bound == command)
            .map(|(combo, _)| combo.display())
            .collect()
    }

    pub fn help_entries(&self) -> Vec<(Command, Vec<String>)> {
        let mut v: Vec<(Command, Vec<String>)> = Vec::new();
        for (combo, command) in &self.bindings {
            match v.iter_mut().find(|(c, _)| c == command) {
                Some((_, list)) => list.push(combo.display()),
                None => v.push((*command, vec![combo.display()])),
            }
        }
        v
    }
}
