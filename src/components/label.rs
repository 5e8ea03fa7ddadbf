use std::cell::RefCell;
use std::rc::Rc;

use crate::geometry::{PosFlags, Rect};
use crate::message::{CbResult, Message};
use crate::state::WidgetOptions;
use crate::theme::ColorRole;
use crate::window::{WidgetCallback, WidgetHandle, WindowManager};

/// Static, possibly multi-line text. Never takes focus.
#[derive(Debug, Default)]
pub struct Label {
    text: RefCell<String>,
}

impl Label {
    pub fn new<T: Into<String>>(text: T) -> Self {
        Self {
            text: RefCell::new(text.into()),
        }
    }

    /// Create a label sized to its text at owner-relative `(y, x)`.
    pub fn create<T: Into<String>>(
        wm: &mut WindowManager,
        y: i32,
        x: i32,
        text: T,
    ) -> (WidgetHandle, Rc<Label>) {
        let label = Rc::new(Label::new(text));
        let (lines, cols) = label.extent();
        let w = wm.create_widget(
            Rect::new(y, x, lines, cols),
            PosFlags::KEEP_DEFAULT,
            WidgetOptions::empty(),
            Rc::clone(&label) as Rc<dyn WidgetCallback>,
        );
        (w, label)
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    /// Replace the text and redraw.
    pub fn set_text<T: Into<String>>(&self, wm: &mut WindowManager, w: WidgetHandle, text: T) {
        *self.text.borrow_mut() = text.into();
        wm.draw(w);
    }

    fn extent(&self) -> (i32, i32) {
        let text = self.text.borrow();
        let lines = text.lines().count().max(1) as i32;
        let cols = text.lines().map(|l| l.chars().count()).max().unwrap_or(0) as i32;
        (lines, cols)
    }

    fn draw(&self, wm: &mut WindowManager, w: WidgetHandle) -> CbResult {
        let rect = wm.widget(w).rect();
        let style = wm.color(w, ColorRole::Normal);
        let text = self.text.borrow().clone();
        let mut canvas = wm.canvas();
        canvas.fill(rect, style);
        for (row, line) in text.lines().take(rect.lines.max(0) as usize).enumerate() {
            let line: String = line.chars().take(rect.cols.max(0) as usize).collect();
            canvas.print(rect.y + row as i32, rect.x, &line, style);
        }
        CbResult::Handled
    }
}

impl WidgetCallback for Label {
    fn callback(
        &self,
        wm: &mut WindowManager,
        w: WidgetHandle,
        sender: Option<WidgetHandle>,
        msg: &Message,
    ) -> CbResult {
        match msg {
            Message::Draw => self.draw(wm, w),
            _ => wm.default_callback(w, sender, msg),
        }
    }
}
