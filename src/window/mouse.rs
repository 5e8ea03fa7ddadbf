//! Pointer routing: hit-testing, capture and click classification.
//!
//! Pointer coordinates are 1-based screen cells. A widget at `rect` covers
//! the points `rect.x < x <= rect.x + cols` and `rect.y < y <= rect.y +
//! lines`, which with 1-based input is exactly the widget's own cells.

use crossterm::event::{KeyModifiers, MouseButton};
use tracing::trace;

use super::{WidgetHandle, WindowManager};
use crate::message::CbResult;
use crate::state::StateFlags;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseKind {
    Down(MouseButton),
    Up(MouseButton),
    Drag(MouseButton),
    Moved,
    ScrollUp,
    ScrollDown,
}

/// What the handler asks of the router after seeing an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseResult {
    /// The event was not for this widget; keep looking.
    pub abort: bool,
    /// Feed the same event again while the button stays down.
    pub repeat: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseKind,
    pub x: i32,
    pub y: i32,
    /// 1 for a single click, 2 for double, 3 for triple.
    pub count: u8,
    pub modifiers: KeyModifiers,
    pub result: MouseResult,
}

impl MouseEvent {
    pub fn new(kind: MouseKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            x,
            y,
            count: 1,
            modifiers: KeyModifiers::NONE,
            result: MouseResult::default(),
        }
    }

    pub fn with_count(mut self, count: u8) -> Self {
        self.count = count;
        self
    }

    pub fn button(&self) -> Option<MouseButton> {
        match self.kind {
            MouseKind::Down(b) | MouseKind::Up(b) | MouseKind::Drag(b) => Some(b),
            _ => None,
        }
    }

    pub fn is_double_click(&self) -> bool {
        self.count == 2
    }
}

/// Classified pointer message delivered to a widget's mouse handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseMsg {
    Down,
    Up,
    Click,
    Drag,
    Move,
    ScrollUp,
    ScrollDown,
}

/// How a dispatched pointer event ended, remembered per group so a drag
/// or auto-repeat can continue on the next event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseStatus {
    #[default]
    Unhandled,
    Normal,
    Repeat,
}

impl WindowManager {
    /// True when the 1-based pointer position falls on `w`.
    pub fn hit_test(&self, event: &MouseEvent, w: WidgetHandle) -> bool {
        let r = self.widget(w).rect;
        event.x > r.x && event.y > r.y && event.x <= r.x + r.cols && event.y <= r.y + r.lines
    }

    /// Copy of `event` with coordinates relative to `w`'s origin.
    pub fn to_local(&self, event: &MouseEvent, w: WidgetHandle) -> MouseEvent {
        let r = self.widget(w).rect;
        MouseEvent {
            x: event.x - r.x,
            y: event.y - r.y,
            ..event.clone()
        }
    }

    /// Keep `w` receiving drag and release events wherever the pointer
    /// goes, until released by [`WindowManager::release_mouse`].
    pub fn force_mouse_capture(&mut self, w: WidgetHandle) {
        let node = self.widget_mut(w);
        node.mouse.forced_capture = true;
        node.mouse.capture = true;
    }

    pub fn release_mouse(&mut self, w: WidgetHandle) {
        let node = self.widget_mut(w);
        node.mouse.forced_capture = false;
        node.mouse.capture = false;
    }

    fn classify(&mut self, w: WidgetHandle, event: &MouseEvent) -> Option<MouseMsg> {
        let in_widget = self.widget(w).mouse.forced_capture || self.hit_test(event, w);
        let mouse = &mut self.widget_mut(w).mouse;
        match event.kind {
            MouseKind::ScrollUp => in_widget.then_some(MouseMsg::ScrollUp),
            MouseKind::ScrollDown => in_widget.then_some(MouseMsg::ScrollDown),
            MouseKind::Down(_) => {
                if in_widget {
                    mouse.capture = true;
                    Some(MouseMsg::Down)
                } else {
                    None
                }
            }
            // Released outside the widget still ends its gesture.
            MouseKind::Up(_) => {
                if mouse.capture {
                    if !mouse.forced_capture {
                        mouse.capture = false;
                    }
                    Some(MouseMsg::Up)
                } else {
                    None
                }
            }
            MouseKind::Drag(_) => mouse.capture.then_some(MouseMsg::Drag),
            MouseKind::Moved => in_widget.then_some(MouseMsg::Move),
        }
    }

    fn deliver_mouse(&mut self, w: WidgetHandle, msg: MouseMsg, event: &mut MouseEvent) {
        let cb = std::rc::Rc::clone(&self.widget(w).callback);
        trace!(widget = self.widget(w).id.0, ?msg, x = event.x, y = event.y, "mouse");
        if !cb.mouse_callback(self, w, msg, event).is_handled() {
            event.result.abort = true;
        }
    }

    /// Classify `event` for `w` and run its mouse handler.
    pub fn mouse_handle_event(&mut self, w: WidgetHandle, event: &MouseEvent) -> MouseStatus {
        let Some(msg) = self.classify(w, event) else {
            return MouseStatus::Unhandled;
        };
        let mut local = self.to_local(event, w);
        local.result = MouseResult::default();
        self.deliver_mouse(w, msg, &mut local);

        if !self.contains(w) {
            return MouseStatus::Normal;
        }
        if msg == MouseMsg::Down && local.result.abort {
            self.widget_mut(w).mouse.capture = false;
        }
        if msg == MouseMsg::Up
            && self.hit_test(event, w)
            && self.widget(w).mouse.last_msg == Some(MouseMsg::Down)
        {
            let mut click = local.clone();
            click.result = MouseResult::default();
            self.deliver_mouse(w, MouseMsg::Click, &mut click);
            if self.contains(w) {
                self.widget_mut(w).mouse.last_msg = Some(MouseMsg::Click);
            }
        } else {
            self.widget_mut(w).mouse.last_msg = Some(msg);
        }

        if local.result.abort {
            MouseStatus::Unhandled
        } else if local.result.repeat {
            MouseStatus::Repeat
        } else {
            MouseStatus::Normal
        }
    }

    /// Route `event` to `w`: its own handler first, then, for groups, the
    /// visible and enabled children from front to back.
    pub fn dispatch_mouse(&mut self, w: WidgetHandle, event: &MouseEvent) -> MouseStatus {
        let status = self.mouse_handle_event(w, event);
        if status != MouseStatus::Unhandled || !self.contains(w) {
            return status;
        }
        if self.widget(w).group.is_none() {
            return MouseStatus::Unhandled;
        }
        let children = self.group_data(w).children.clone();
        for child in children.into_iter().rev() {
            if !self.contains(child) {
                continue;
            }
            let state = self.widget(child).state;
            if !state.contains(StateFlags::VISIBLE) || state.contains(StateFlags::DISABLED) {
                continue;
            }
            let status = self.dispatch_mouse(child, event);
            if status != MouseStatus::Unhandled {
                return status;
            }
        }
        MouseStatus::Unhandled
    }
}
