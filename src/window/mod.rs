//! The window manager context.
//!
//! `WindowManager` owns every widget in a slotmap arena and hands out
//! `WidgetHandle`s. Groups hold handles of their children, children hold a
//! non-owning handle of their owner, and the dialog stack holds handles of
//! the dialogs currently running. Nothing outside the arena owns a widget.

pub mod decorator;
mod dialog;
mod group;
mod mouse;
mod stack;
mod widget;

use std::rc::Rc;

use ratatui::buffer::Buffer;
use ratatui::style::Style;
use slotmap::{SlotMap, new_key_type};
use tracing::debug;

use crate::commands::ResultCode;
use crate::config::WmConfig;
use crate::constants::{MIN_SCREEN_COLS, MIN_SCREEN_LINES};
use crate::drivers::Driver;
use crate::error::{Error, Result};
use crate::events::{CoreEvent, CoreHook, EventGroupId, EventRegistry};
use crate::geometry::{PosFlags, Rect};
use crate::history::{HistoryStore, MemoryHistory};
use crate::keybindings::Keymap;
use crate::message::{CbResult, Message};
use crate::state::{WidgetOptions, WidgetState};
use crate::theme::{ColorRole, DialogColors};
use crate::ui::UiFrame;

pub use dialog::DialogSpec;
pub use group::InsertPos;
pub use mouse::{MouseEvent, MouseKind, MouseMsg, MouseResult, MouseStatus};
pub use widget::{DefaultCallback, WidgetCallback};

new_key_type! {
    /// Arena handle of a widget. Stale after the widget is destroyed.
    pub struct WidgetHandle;
}

/// Numeric widget identity, unique for the lifetime of the manager.
/// `replace_widget` hands the old id to the replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(u64);

impl WidgetId {
    pub const fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HookId(u64);

pub type IdleHook = Rc<dyn Fn(&mut WindowManager)>;

/// Chooses a dialog from the switch list; `None` keeps the current one.
pub type ScreenPicker = Rc<dyn Fn(&mut WindowManager, &[WidgetHandle]) -> Option<WidgetHandle>>;

/// Per-widget pointer bookkeeping.
#[derive(Debug, Clone, Default)]
pub(crate) struct MouseState {
    pub(crate) capture: bool,
    pub(crate) forced_capture: bool,
    pub(crate) last_msg: Option<MouseMsg>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct GroupData {
    /// Z-order: index 0 is the back, the last entry is the front.
    pub(crate) children: Vec<WidgetHandle>,
    pub(crate) current: Option<WidgetHandle>,
    pub(crate) mouse_status: MouseStatus,
}

#[derive(Debug, Clone)]
pub(crate) struct DialogData {
    pub(crate) ret_value: ResultCode,
    pub(crate) colors: DialogColors,
    pub(crate) help_ctx: Option<String>,
    pub(crate) title: Option<String>,
    pub(crate) frame: Option<WidgetHandle>,
    pub(crate) event_group: EventGroupId,
    pub(crate) pending_resize: bool,
}

/// One node of the widget tree.
pub struct Widget {
    id: WidgetId,
    rect: Rect,
    pos_flags: PosFlags,
    options: WidgetOptions,
    state: WidgetState,
    owner: Option<WidgetHandle>,
    keymap: Option<Rc<Keymap>>,
    callback: Rc<dyn WidgetCallback>,
    group: Option<GroupData>,
    dialog: Option<DialogData>,
    mouse: MouseState,
}

impl Widget {
    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn pos_flags(&self) -> PosFlags {
        self.pos_flags
    }

    pub fn options(&self) -> WidgetOptions {
        self.options
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn owner(&self) -> Option<WidgetHandle> {
        self.owner
    }

    pub fn keymap(&self) -> Option<&Keymap> {
        self.keymap.as_deref()
    }

    pub fn is_group(&self) -> bool {
        self.group.is_some()
    }

    pub fn is_dialog(&self) -> bool {
        self.dialog.is_some()
    }

    /// Children back to front; empty for plain widgets.
    pub fn children(&self) -> &[WidgetHandle] {
        self.group.as_ref().map_or(&[], |g| g.children.as_slice())
    }

    pub fn current(&self) -> Option<WidgetHandle> {
        self.group.as_ref().and_then(|g| g.current)
    }

    pub fn mouse_status(&self) -> MouseStatus {
        self.group
            .as_ref()
            .map_or(MouseStatus::default(), |g| g.mouse_status)
    }

    pub fn has_mouse_capture(&self) -> bool {
        self.mouse.capture || self.mouse.forced_capture
    }
}

pub struct WindowManager {
    widgets: SlotMap<WidgetHandle, Widget>,
    next_id: u64,
    /// Running dialogs; index 0 is the top.
    stack: Vec<WidgetHandle>,
    /// Non-modal dialogs that can be switched between; index 0 is newest.
    switch_list: Vec<WidgetHandle>,
    switch_current: Option<WidgetHandle>,
    switch_pending: bool,
    screen_picker: Option<ScreenPicker>,
    screen: Buffer,
    cursor: Option<(u16, u16)>,
    full_repaint: bool,
    driver: Box<dyn Driver>,
    config: WmConfig,
    dialog_keymap: Rc<Keymap>,
    history: Box<dyn HistoryStore>,
    events: EventRegistry,
    idle_hooks: Vec<(HookId, IdleHook)>,
    next_hook: u64,
    shutdown: bool,
}

impl WindowManager {
    /// Build a manager over `driver`. The screen buffer takes the driver's
    /// current size, which must be at least the minimum supported size.
    pub fn new(driver: Box<dyn Driver>, config: WmConfig) -> Result<Self> {
        let (cols, lines) = driver.size()?;
        if cols < MIN_SCREEN_COLS || lines < MIN_SCREEN_LINES {
            return Err(Error::TerminalTooSmall {
                cols,
                lines,
                min_cols: MIN_SCREEN_COLS,
                min_lines: MIN_SCREEN_LINES,
            });
        }
        debug!(cols, lines, "window manager created");
        Ok(Self {
            widgets: SlotMap::with_key(),
            next_id: 0,
            stack: Vec::new(),
            switch_list: Vec::new(),
            switch_current: None,
            switch_pending: false,
            screen_picker: None,
            screen: Buffer::empty(ratatui::layout::Rect::new(0, 0, cols, lines)),
            cursor: None,
            full_repaint: true,
            driver,
            config,
            dialog_keymap: Rc::new(Keymap::dialog_default()),
            history: Box::new(MemoryHistory::new()),
            events: EventRegistry::new(),
            idle_hooks: Vec::new(),
            next_hook: 0,
            shutdown: false,
        })
    }

    pub fn with_history(mut self, store: Box<dyn HistoryStore>) -> Self {
        self.history = store;
        self
    }

    pub fn with_dialog_keymap(mut self, keymap: Keymap) -> Self {
        self.dialog_keymap = Rc::new(keymap);
        self
    }

    pub fn config(&self) -> &WmConfig {
        &self.config
    }

    pub fn driver_mut(&mut self) -> &mut dyn Driver {
        self.driver.as_mut()
    }

    pub fn history_mut(&mut self) -> &mut dyn HistoryStore {
        self.history.as_mut()
    }

    pub fn events_mut(&mut self) -> &mut EventRegistry {
        &mut self.events
    }

    /// Screen size as `(lines, cols)`.
    pub fn screen_size(&self) -> (i32, i32) {
        (
            i32::from(self.screen.area.height),
            i32::from(self.screen.area.width),
        )
    }

    pub fn screen(&self) -> &Buffer {
        &self.screen
    }

    /// Drawing surface over the whole screen buffer.
    pub fn canvas(&mut self) -> UiFrame<'_> {
        let area = self.screen.area;
        UiFrame::from_parts(area, &mut self.screen)
    }

    pub fn cursor(&self) -> Option<(u16, u16)> {
        self.cursor
    }

    /// Put the terminal cursor at screen cell `(y, x)`; off-screen hides it.
    pub fn set_cursor(&mut self, y: i32, x: i32) {
        let (lines, cols) = self.screen_size();
        self.cursor = if (0..lines).contains(&y) && (0..cols).contains(&x) {
            Some((x as u16, y as u16))
        } else {
            None
        };
    }

    pub fn hide_cursor(&mut self) {
        self.cursor = None;
    }

    pub fn request_shutdown(&mut self) {
        self.shutdown = true;
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown
    }

    pub fn contains(&self, w: WidgetHandle) -> bool {
        self.widgets.contains_key(w)
    }

    pub fn try_widget(&self, w: WidgetHandle) -> Option<&Widget> {
        self.widgets.get(w)
    }

    /// Panics on a stale handle: using a destroyed widget is a bug in the
    /// caller, not a recoverable condition.
    pub fn widget(&self, w: WidgetHandle) -> &Widget {
        &self.widgets[w]
    }

    fn widget_mut(&mut self, w: WidgetHandle) -> &mut Widget {
        &mut self.widgets[w]
    }

    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    pub(crate) fn group_data(&self, g: WidgetHandle) -> &GroupData {
        match self.widgets[g].group.as_ref() {
            Some(data) => data,
            None => panic!("widget {:?} is not a group", self.widgets[g].id),
        }
    }

    pub(crate) fn group_data_mut(&mut self, g: WidgetHandle) -> &mut GroupData {
        let id = self.widgets[g].id;
        match self.widgets[g].group.as_mut() {
            Some(data) => data,
            None => panic!("widget {id:?} is not a group"),
        }
    }

    pub(crate) fn dialog_data(&self, d: WidgetHandle) -> &DialogData {
        match self.widgets[d].dialog.as_ref() {
            Some(data) => data,
            None => panic!("widget {:?} is not a dialog", self.widgets[d].id),
        }
    }

    pub(crate) fn dialog_data_mut(&mut self, d: WidgetHandle) -> &mut DialogData {
        let id = self.widgets[d].id;
        match self.widgets[d].dialog.as_mut() {
            Some(data) => data,
            None => panic!("widget {id:?} is not a dialog"),
        }
    }

    /// Look a widget up by its numeric id.
    pub fn find_by_id(&self, id: WidgetId) -> Option<WidgetHandle> {
        self.widgets
            .iter()
            .find_map(|(h, w)| (w.id == id).then_some(h))
    }

    /// The dialog `w` lives in, or `w` itself when it is a dialog.
    pub fn dialog_of(&self, w: WidgetHandle) -> Option<WidgetHandle> {
        let mut cur = Some(w);
        while let Some(h) = cur {
            let node = self.widgets.get(h)?;
            if node.dialog.is_some() {
                return Some(h);
            }
            cur = node.owner;
        }
        None
    }

    /// Resolve a color role through the widget's callback, which by
    /// default reads the owning dialog's palette.
    pub fn color(&self, w: WidgetHandle, role: ColorRole) -> Style {
        let cb = Rc::clone(&self.widgets[w].callback);
        cb.color(self, w, role)
    }

    pub(crate) fn palette_color(&self, w: WidgetHandle, role: ColorRole) -> Style {
        match self.dialog_of(w) {
            Some(d) => self.dialog_data(d).colors.get(role),
            None => DialogColors::default().get(role),
        }
    }

    /// Deliver `msg` to `w` synchronously.
    pub fn send_message(
        &mut self,
        w: WidgetHandle,
        sender: Option<WidgetHandle>,
        msg: &Message,
    ) -> CbResult {
        let cb = Rc::clone(&self.widgets[w].callback);
        tracing::trace!(widget = self.widgets[w].id.0, msg = msg.name(), "send");
        cb.callback(self, w, sender, msg)
    }

    /// The fallback stage for a message the widget kind did not consume.
    pub fn default_callback(
        &mut self,
        w: WidgetHandle,
        sender: Option<WidgetHandle>,
        msg: &Message,
    ) -> CbResult {
        let node = &self.widgets[w];
        if node.dialog.is_some() {
            self.dialog_default_callback(w, sender, msg)
        } else if node.group.is_some() {
            self.group_default_callback(w, sender, msg)
        } else {
            self.widget_default_callback(w, sender, msg)
        }
    }

    pub fn add_idle_hook(&mut self, hook: IdleHook) -> HookId {
        let id = HookId(self.next_hook);
        self.next_hook += 1;
        self.idle_hooks.push((id, hook));
        id
    }

    pub fn remove_idle_hook(&mut self, id: HookId) -> bool {
        let before = self.idle_hooks.len();
        self.idle_hooks.retain(|(hid, _)| *hid != id);
        before != self.idle_hooks.len()
    }

    pub(crate) fn run_idle_hooks(&mut self) {
        let hooks: Vec<IdleHook> = self.idle_hooks.iter().map(|(_, h)| Rc::clone(h)).collect();
        for hook in hooks {
            hook(self);
        }
    }

    pub fn add_core_hook(&mut self, hook: CoreHook) {
        self.events.add_core_hook(hook);
    }

    pub(crate) fn raise(&mut self, event: &CoreEvent) {
        debug!(?event, "core event");
        for hook in self.events.core_hooks() {
            hook(self, event);
        }
    }

    pub fn set_screen_picker(&mut self, picker: Option<ScreenPicker>) {
        self.screen_picker = picker;
    }
}
