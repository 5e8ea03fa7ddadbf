//! Raw key cleanup applied before keys reach the dialog stack.
//!
//! - Shift+Tab arrives as `Tab` + SHIFT on some terminals and as `BackTab`
//!   on others; dialogs only ever see `BackTab`.
//! - Shifted characters carry the case in the char itself, so the SHIFT
//!   modifier is dropped to keep keymap entries like `Char('A')` matching.
//! - Release (and, on Windows, repeat) events are discarded.
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Default)]
pub struct KeyboardNormalizer {
    esc_down: bool,
}

impl KeyboardNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(&mut self, mut key: KeyEvent) -> Option<KeyEvent> {
        if key.code == KeyCode::Tab && key.modifiers.contains(KeyModifiers::SHIFT) {
            key.code = KeyCode::BackTab;
        }
        if matches!(key.code, KeyCode::BackTab | KeyCode::Char(_)) {
            key.modifiers.remove(KeyModifiers::SHIFT);
        }
        if cfg!(windows) {
            match key.kind {
                KeyEventKind::Release => {
                    if key.code == KeyCode::Esc {
                        self.esc_down = false;
                    }
                    return None;
                }
                KeyEventKind::Repeat => return None,
                KeyEventKind::Press => {}
            }
            if key.code == KeyCode::Esc {
                if self.esc_down {
                    return None;
                }
                self.esc_down = true;
            } else {
                self.esc_down = false;
            }
        } else if key.kind == KeyEventKind::Release {
            return None;
        }
        Some(key)
    }
}
