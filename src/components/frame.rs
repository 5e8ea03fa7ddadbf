use std::cell::Cell;
use std::rc::Rc;

use crate::geometry::{PosFlags, Rect};
use crate::message::{CbResult, Message};
use crate::state::{StateFlags, WidgetOptions};
use crate::window::decorator::{BoxDecorator, WindowDecorator};
use crate::window::{MouseEvent, MouseMsg, WidgetCallback, WidgetHandle, WindowManager};

/// Background of a modal dialog: fills the dialog, draws its border and
/// title, and lets the user drag the dialog by its top rows.
#[derive(Debug)]
pub struct Frame {
    decorator: Box<dyn WindowDecorator>,
    /// Pointer offset inside the frame while a drag is in progress.
    grab: Cell<Option<(i32, i32)>>,
}

impl Frame {
    pub fn new(decorator: Box<dyn WindowDecorator>) -> Self {
        Self {
            decorator,
            grab: Cell::new(None),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.grab.get().is_some()
    }

    fn draw(&self, wm: &mut WindowManager, w: WidgetHandle) -> CbResult {
        let Some(d) = wm.widget(w).owner() else {
            return CbResult::NotHandled;
        };
        let rect = wm.widget(w).rect();
        let colors = *wm.dialog_colors(d);
        let focused = wm.has_state(d, StateFlags::FOCUSED);
        let title = wm.dialog_title(d, rect.cols.max(0) as usize);
        let mut canvas = wm.canvas();
        self.decorator
            .render_frame(&mut canvas, rect, &title, &colors, focused);
        CbResult::Handled
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new(Box::new(BoxDecorator))
    }
}

impl WidgetCallback for Frame {
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

    fn mouse_callback(
        &self,
        wm: &mut WindowManager,
        w: WidgetHandle,
        msg: MouseMsg,
        event: &mut MouseEvent,
    ) -> CbResult {
        match msg {
            // Local rows are 1-based: row 1 is the top edge.
            MouseMsg::Down if event.y <= self.decorator.drag_rows() => {
                self.grab.set(Some((event.y, event.x)));
                wm.force_mouse_capture(w);
                CbResult::Handled
            }
            MouseMsg::Drag => {
                let (Some((gy, gx)), Some(d)) = (self.grab.get(), wm.widget(w).owner()) else {
                    return CbResult::NotHandled;
                };
                let (dy, dx) = (event.y - gy, event.x - gx);
                if dy != 0 || dx != 0 {
                    let r = wm.widget(d).rect();
                    wm.move_widget(d, r.y + dy, r.x + dx);
                    wm.repaint_screen();
                }
                CbResult::Handled
            }
            MouseMsg::Up | MouseMsg::Click if self.grab.get().is_some() => {
                self.grab.set(None);
                wm.release_mouse(w);
                CbResult::Handled
            }
            _ => CbResult::NotHandled,
        }
    }
}

/// Create the frame child of a `lines × cols` dialog. It stretches with
/// the dialog and never takes focus.
pub fn create_frame(wm: &mut WindowManager, lines: i32, cols: i32) -> WidgetHandle {
    wm.create_widget(
        Rect::new(0, 0, lines, cols),
        PosFlags::KEEP_ALL,
        WidgetOptions::empty(),
        Rc::new(Frame::default()),
    )
}
