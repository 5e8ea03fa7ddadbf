//! The contract every widget kind implements, and the state machine shared
//! by all of them.

use std::rc::Rc;

use ratatui::style::Style;
use tracing::trace;

use super::{MouseEvent, MouseMsg, MouseState, Widget, WidgetHandle, WidgetId, WindowManager};
use crate::geometry::{PosFlags, Rect};
use crate::keybindings::Keymap;
use crate::message::{CbResult, Message};
use crate::state::{Phase, StateFlags, WidgetOptions, WidgetState};
use crate::theme::ColorRole;

/// Behaviour of one widget kind.
///
/// Handlers take `&self` and receive the manager, so a handler may send
/// further messages, including back to its own widget. Per-widget mutable
/// state lives in `Cell`/`RefCell` fields of the implementing type.
pub trait WidgetCallback {
    fn callback(
        &self,
        wm: &mut WindowManager,
        w: WidgetHandle,
        sender: Option<WidgetHandle>,
        msg: &Message,
    ) -> CbResult {
        wm.default_callback(w, sender, msg)
    }

    /// Pointer input in widget-local coordinates. Answering `NotHandled`
    /// lets the event fall through to the owner's children; for a `Down`
    /// it also drops the capture taken for this press.
    fn mouse_callback(
        &self,
        _wm: &mut WindowManager,
        _w: WidgetHandle,
        _msg: MouseMsg,
        _event: &mut MouseEvent,
    ) -> CbResult {
        CbResult::NotHandled
    }

    /// Title shown in the screen list and in frames, at most `max_len` chars.
    fn title(&self, _wm: &WindowManager, _w: WidgetHandle, _max_len: usize) -> Option<String> {
        None
    }

    fn color(&self, wm: &WindowManager, w: WidgetHandle, role: ColorRole) -> Style {
        wm.palette_color(w, role)
    }
}

/// Callback that defers everything to the default handlers.
#[derive(Debug, Default)]
pub struct DefaultCallback;

impl WidgetCallback for DefaultCallback {}

impl WindowManager {
    fn next_widget_id(&mut self) -> WidgetId {
        let id = WidgetId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Allocate a plain widget. `rect` is relative to the owner it will be
    /// added to (or absolute, for a widget that stays top-level).
    pub fn create_widget(
        &mut self,
        rect: Rect,
        pos_flags: PosFlags,
        options: WidgetOptions,
        callback: Rc<dyn WidgetCallback>,
    ) -> WidgetHandle {
        let id = self.next_widget_id();
        trace!(id = id.0, ?rect, "create widget");
        self.widgets.insert(Widget {
            id,
            rect,
            pos_flags,
            options,
            state: WidgetState::new(),
            owner: None,
            keymap: None,
            callback,
            group: None,
            dialog: None,
            mouse: MouseState::default(),
        })
    }

    pub fn set_keymap(&mut self, w: WidgetHandle, keymap: Option<Keymap>) {
        self.widget_mut(w).keymap = keymap.map(Rc::new);
    }

    pub fn set_options(&mut self, w: WidgetHandle, options: WidgetOptions, enable: bool) {
        self.widget_mut(w).options.set(options, enable);
    }

    pub fn set_pos_flags(&mut self, w: WidgetHandle, flags: PosFlags) {
        self.widget_mut(w).pos_flags = flags;
    }

    pub(crate) fn widget_default_callback(
        &mut self,
        w: WidgetHandle,
        _sender: Option<WidgetHandle>,
        msg: &Message,
    ) -> CbResult {
        match msg {
            Message::Init
            | Message::Focus
            | Message::Unfocus
            | Message::Enable
            | Message::Disable
            | Message::Draw
            | Message::Destroy
            | Message::Idle => CbResult::Handled,
            Message::Cursor => {
                let r = self.widget(w).rect;
                self.set_cursor(r.y, r.x);
                CbResult::Handled
            }
            Message::Resize(rect) => {
                self.widget_mut(w).rect = *rect;
                CbResult::Handled
            }
            _ => CbResult::NotHandled,
        }
    }

    fn owner_is_active(&self, w: WidgetHandle) -> bool {
        self.widget(w)
            .owner
            .is_some_and(|o| self.widget(o).state.phase() == Phase::Active)
    }

    /// Change one independent state flag and run its side effects.
    ///
    /// Returns the answer of the message the change sent, or `NotHandled`
    /// for a widget without an owner.
    pub fn set_state(&mut self, w: WidgetHandle, flag: StateFlags, enable: bool) -> CbResult {
        self.widget_mut(w).state.set(flag, enable);
        let ret = self.apply_state_change(w, flag, enable);

        if self.widget(w).group.is_some()
            && flag.contains(StateFlags::FOCUSED)
            && self.widget(w).state.phase() == Phase::Active
        {
            if self.widget(w).state.contains(StateFlags::FOCUSED) {
                if let Some(cur) = self.group_data(w).current {
                    self.set_state(cur, StateFlags::FOCUSED, true);
                }
            } else {
                for child in self.group_data(w).children.clone() {
                    self.set_state(child, StateFlags::FOCUSED, false);
                }
            }
        }
        ret
    }

    fn apply_state_change(&mut self, w: WidgetHandle, flag: StateFlags, enable: bool) -> CbResult {
        let Some(owner) = self.widget(w).owner else {
            return CbResult::NotHandled;
        };
        let owner_active = self.owner_is_active(w);
        let mut ret = CbResult::Handled;

        if flag.contains(StateFlags::VISIBLE) && owner_active {
            if !enable && self.group_data(owner).current == Some(w) {
                self.select_next_widget(owner);
            }
            self.draw(owner);
        }

        if flag.contains(StateFlags::DISABLED) {
            let msg = if enable {
                Message::Disable
            } else {
                Message::Enable
            };
            ret = self.send_message(w, None, &msg);
            if ret.is_handled() && owner_active {
                self.draw(w);
            }
        }

        if flag.contains(StateFlags::FOCUSED) {
            let msg = if enable {
                Message::Focus
            } else {
                Message::Unfocus
            };
            ret = self.send_message(w, None, &msg);
            if ret.is_handled() && owner_active {
                self.draw(w);
                self.send_message(owner, Some(w), &Message::ChangedFocus);
            }
        }
        ret
    }

    /// Enter a lifecycle phase. Groups pass the phase on to every child.
    pub fn set_phase(&mut self, w: WidgetHandle, phase: Phase) {
        self.widget_mut(w).state.set_phase(phase);
        if self.widget(w).group.is_some() {
            for child in self.group_data(w).children.clone() {
                self.set_phase(child, phase);
            }
        }
    }

    pub fn phase(&self, w: WidgetHandle) -> Phase {
        self.widget(w).state.phase()
    }

    pub fn has_state(&self, w: WidgetHandle, flags: StateFlags) -> bool {
        self.widget(w).state.contains(flags)
    }

    pub fn is_focusable(&self, w: WidgetHandle) -> bool {
        let node = self.widget(w);
        node.options.contains(WidgetOptions::SELECTABLE)
            && node.state.contains(StateFlags::VISIBLE)
            && !node.state.contains(StateFlags::DISABLED)
    }

    /// Ask the widget to paint itself. Skipped unless the widget is visible
    /// and its owner is running. Only dialogs draw without an owner, and
    /// only while they are running or stacked.
    pub fn draw(&mut self, w: WidgetHandle) -> CbResult {
        let node = self.widget(w);
        if !node.state.contains(StateFlags::VISIBLE) {
            return CbResult::NotHandled;
        }
        let may_draw = match node.owner {
            Some(owner) => self.widget(owner).state.phase() == Phase::Active,
            None => {
                node.is_dialog()
                    && (node.state.phase() == Phase::Active || self.stack.contains(&w))
            }
        };
        if !may_draw {
            return CbResult::NotHandled;
        }
        self.send_message(w, None, &Message::Draw)
    }

    /// Shift `w` (and, for groups, all descendants) from owner-relative to
    /// screen coordinates, by the owner's origin or an explicit `(dy, dx)`.
    pub fn make_global(&mut self, w: WidgetHandle, delta: Option<(i32, i32)>) {
        let (dy, dx) = self.origin_delta(w, delta);
        self.shift_tree(w, dy, dx);
    }

    /// Inverse of [`WindowManager::make_global`].
    pub fn make_local(&mut self, w: WidgetHandle, delta: Option<(i32, i32)>) {
        let (dy, dx) = self.origin_delta(w, delta);
        self.shift_tree(w, -dy, -dx);
    }

    fn origin_delta(&self, w: WidgetHandle, delta: Option<(i32, i32)>) -> (i32, i32) {
        match (delta, self.widget(w).owner) {
            (Some(d), _) => d,
            (None, Some(owner)) => {
                let r = self.widget(owner).rect;
                (r.y, r.x)
            }
            (None, None) => (0, 0),
        }
    }

    fn shift_tree(&mut self, w: WidgetHandle, dy: i32, dx: i32) {
        let node = self.widget_mut(w);
        node.rect = node.rect.moved_by(dy, dx);
        let children = node.children().to_vec();
        for child in children {
            self.shift_tree(child, dy, dx);
        }
    }

    /// Give `w` a new absolute rectangle through a Resize message and
    /// redraw what it covered.
    pub fn set_rect(&mut self, w: WidgetHandle, rect: Rect) {
        self.send_message(w, None, &Message::Resize(rect));
        match self.widget(w).owner {
            Some(owner) => {
                if self.widget(owner).state.phase() == Phase::Active {
                    self.draw(owner);
                }
            }
            None => {
                if self.stack.contains(&w) {
                    self.do_refresh();
                }
            }
        }
    }

    pub fn move_widget(&mut self, w: WidgetHandle, y: i32, x: i32) {
        let r = self.widget(w).rect;
        self.set_rect(w, Rect::new(y, x, r.lines, r.cols));
    }

    /// Send Destroy, free any children the handler left behind, and drop
    /// the widget from the arena.
    pub(crate) fn free_widget(&mut self, w: WidgetHandle) {
        self.send_message(w, None, &Message::Destroy);
        if let Some(node) = self.widgets.get(w) {
            for child in node.children().to_vec() {
                if self.contains(child) {
                    self.free_widget(child);
                }
            }
        }
        self.events.unsubscribe_widget(w);
        self.widgets.remove(w);
    }

    /// Detach `w` from its owner (if any) and free it.
    pub fn destroy_widget(&mut self, w: WidgetHandle) {
        if self.widget(w).owner.is_some() {
            self.remove_widget(w);
        }
        self.free_widget(w);
    }
}
