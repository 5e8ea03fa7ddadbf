use std::fmt;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::commands::ResultCode;
use crate::geometry::{PosFlags, Rect};
use crate::message::{CbResult, Message};
use crate::state::{StateFlags, WidgetOptions};
use crate::theme::ColorRole;
use crate::window::{MouseEvent, MouseMsg, WidgetCallback, WidgetHandle, WindowManager};

/// Runs when the button is pressed. Returning `true` keeps the dialog
/// open; `false` closes it with the button's result code.
pub type ButtonAction = Rc<dyn Fn(&mut WindowManager, WidgetHandle) -> bool>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonKind {
    #[default]
    Normal,
    /// Also answers Enter while another widget has focus.
    Default,
}

/// Label text with an optional `&`-marked hotkey, e.g. `"&Ok"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyText {
    text: String,
    hotkey: Option<(usize, char)>,
}

impl HotkeyText {
    pub fn parse(source: &str) -> Self {
        let mut text = String::with_capacity(source.len());
        let mut hotkey = None;
        let mut chars = source.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '&' {
                match chars.next() {
                    Some('&') => text.push('&'),
                    Some(h) => {
                        if hotkey.is_none() {
                            hotkey = Some((text.chars().count(), h.to_ascii_lowercase()));
                        }
                        text.push(h);
                    }
                    None => {}
                }
            } else {
                text.push(c);
            }
        }
        Self { text, hotkey }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn hotkey(&self) -> Option<char> {
        self.hotkey.map(|(_, c)| c)
    }

    pub fn width(&self) -> i32 {
        self.text.chars().count() as i32
    }

    fn matches(&self, key: &KeyEvent) -> bool {
        let Some(hotkey) = self.hotkey() else {
            return false;
        };
        if key.modifiers.intersects(KeyModifiers::CONTROL) {
            return false;
        }
        matches!(key.code, KeyCode::Char(c) if c.to_ascii_lowercase() == hotkey)
    }
}

pub struct Button {
    label: HotkeyText,
    kind: ButtonKind,
    result: ResultCode,
    action: Option<ButtonAction>,
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

impl Button {
    pub fn new(label: &str, result: ResultCode) -> Self {
        Self {
            label: HotkeyText::parse(label),
            kind: ButtonKind::Normal,
            result,
            action: None,
        }
    }

    pub fn kind(mut self, kind: ButtonKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn on_press(mut self, action: ButtonAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn label(&self) -> &HotkeyText {
        &self.label
    }

    fn brackets(&self) -> (&'static str, &'static str) {
        match self.kind {
            ButtonKind::Normal => ("[ ", " ]"),
            ButtonKind::Default => ("[< ", " >]"),
        }
    }

    /// Cells the button occupies on one line.
    pub fn width(&self) -> i32 {
        let (open, close) = self.brackets();
        self.label.width() + (open.len() + close.len()) as i32
    }

    /// Create a one-line button at owner-relative `(y, x)`.
    pub fn create(self, wm: &mut WindowManager, y: i32, x: i32) -> WidgetHandle {
        let width = self.width();
        wm.create_widget(
            Rect::new(y, x, 1, width),
            PosFlags::KEEP_DEFAULT,
            WidgetOptions::SELECTABLE | WidgetOptions::WANT_HOTKEY | WidgetOptions::WANT_CURSOR,
            Rc::new(self),
        )
    }

    fn press(&self, wm: &mut WindowManager, w: WidgetHandle) -> CbResult {
        debug!(label = self.label.text(), "button pressed");
        if let Some(action) = self.action.clone()
            && action(wm, w)
        {
            return CbResult::Handled;
        }
        if let Some(d) = wm.dialog_of(w) {
            wm.set_ret_value(d, self.result);
            wm.stop(d);
        }
        CbResult::Handled
    }

    fn draw(&self, wm: &mut WindowManager, w: WidgetHandle) -> CbResult {
        let rect = wm.widget(w).rect();
        let focused = wm.has_state(w, StateFlags::FOCUSED);
        let (role, hot_role) = if focused {
            (ColorRole::Focus, ColorRole::HotFocus)
        } else {
            (ColorRole::Normal, ColorRole::HotNormal)
        };
        let style = wm.color(w, role);
        let hot_style = wm.color(w, hot_role);
        let (open, close) = self.brackets();
        let text = format!("{open}{}{close}", self.label.text());

        let mut canvas = wm.canvas();
        canvas.print(rect.y, rect.x, &text, style);
        if let Some((index, _)) = self.label.hotkey
            && let Some(c) = self.label.text().chars().nth(index)
        {
            let x = rect.x + open.len() as i32 + index as i32;
            canvas.print(rect.y, x, &c.to_string(), hot_style);
        }
        CbResult::Handled
    }
}

impl WidgetCallback for Button {
    fn callback(
        &self,
        wm: &mut WindowManager,
        w: WidgetHandle,
        sender: Option<WidgetHandle>,
        msg: &Message,
    ) -> CbResult {
        match msg {
            Message::Draw => self.draw(wm, w),
            Message::Key(key) if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) => {
                self.press(wm, w)
            }
            Message::Hotkey(key) => {
                let default_enter = self.kind == ButtonKind::Default && key.code == KeyCode::Enter;
                if default_enter || self.label.matches(key) {
                    self.press(wm, w)
                } else {
                    CbResult::NotHandled
                }
            }
            Message::Cursor => {
                let r = wm.widget(w).rect();
                let (open, _) = self.brackets();
                wm.set_cursor(r.y, r.x + open.len() as i32);
                CbResult::Handled
            }
            _ => wm.default_callback(w, sender, msg),
        }
    }

    fn mouse_callback(
        &self,
        wm: &mut WindowManager,
        w: WidgetHandle,
        msg: MouseMsg,
        _event: &mut MouseEvent,
    ) -> CbResult {
        match msg {
            MouseMsg::Down => {
                if wm.widget(w).owner().is_some() {
                    wm.select_widget(w);
                }
                CbResult::Handled
            }
            MouseMsg::Click => self.press(wm, w),
            MouseMsg::Up | MouseMsg::Drag => CbResult::Handled,
            _ => CbResult::NotHandled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hotkey_text_strips_marker() {
        let t = HotkeyText::parse("&Save && exit");
        assert_eq!(t.text(), "Save & exit");
        assert_eq!(t.hotkey(), Some('s'));
        assert_eq!(t.width(), 11);

        let plain = HotkeyText::parse("Close");
        assert_eq!(plain.hotkey(), None);
    }

    #[test]
    fn hotkey_matches_case_insensitively_without_ctrl() {
        let t = HotkeyText::parse("E&xit");
        assert!(t.matches(&KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)));
        assert!(t.matches(&KeyEvent::new(KeyCode::Char('X'), KeyModifiers::SHIFT)));
        assert!(!t.matches(&KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL)));
        assert!(!t.matches(&KeyEvent::new(KeyCode::Char('e'), KeyModifiers::NONE)));
    }

    #[test]
    fn default_button_is_wider() {
        let b = Button::new("&Ok", ResultCode::Enter);
        assert_eq!(b.width(), 6);
        let b = Button::new("&Ok", ResultCode::Enter).kind(ButtonKind::Default);
        assert_eq!(b.width(), 8);
    }
}
