//! Dialog lifecycle, the event loop and command dispatch.

use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton};
use tracing::{debug, warn};

use super::{
    DialogData, MouseEvent, MouseKind, MouseStatus, WidgetCallback, WidgetHandle, WindowManager,
};
use crate::commands::{Command, ResultCode};
use crate::components::frame;
use crate::drivers::InputEvent;
use crate::error::Result;
use crate::events::{CoreEvent, EventGroupId};
use crate::geometry::{PosFlags, Rect, place_on_screen};
use crate::history::trim_to;
use crate::message::{CbResult, Message};
use crate::state::{Phase, StateFlags, WidgetOptions};
use crate::theme::DialogColors;
use crate::ui::truncate_to_width;

/// Parameters of a new dialog.
#[derive(Debug, Clone)]
pub struct DialogSpec {
    pub rect: Rect,
    pub pos_flags: PosFlags,
    pub modal: bool,
    pub colors: DialogColors,
    pub help_ctx: Option<String>,
    pub title: Option<String>,
    pub options: WidgetOptions,
}

impl DialogSpec {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            pos_flags: PosFlags::KEEP_DEFAULT,
            modal: false,
            colors: DialogColors::default(),
            help_ctx: None,
            title: None,
            options: WidgetOptions::SELECTABLE | WidgetOptions::TOP_SELECT,
        }
    }

    pub fn modal(mut self, modal: bool) -> Self {
        self.modal = modal;
        self
    }

    pub fn pos_flags(mut self, flags: PosFlags) -> Self {
        self.pos_flags = flags;
        self
    }

    pub fn colors(mut self, colors: DialogColors) -> Self {
        self.colors = colors;
        self
    }

    pub fn help_ctx(mut self, ctx: impl Into<String>) -> Self {
        self.help_ctx = Some(ctx.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn want_tab(mut self, enable: bool) -> Self {
        self.options.set(WidgetOptions::WANT_TAB, enable);
        self
    }
}

impl WindowManager {
    /// Allocate a dialog placed on the current screen. Modal dialogs get a
    /// frame child (border and title) at the back of their Z-order.
    pub fn create_dialog(
        &mut self,
        spec: DialogSpec,
        callback: Rc<dyn WidgetCallback>,
    ) -> WidgetHandle {
        let (lines, cols) = self.screen_size();
        let rect = place_on_screen(spec.pos_flags, spec.rect, lines, cols);
        let d = self.create_group(rect, spec.pos_flags, spec.options, callback);
        let event_group = self.events.create_group();
        self.widget_mut(d).dialog = Some(DialogData {
            ret_value: ResultCode::Exit,
            colors: spec.colors,
            help_ctx: spec.help_ctx,
            title: spec.title,
            frame: None,
            event_group,
            pending_resize: false,
        });
        if spec.modal {
            self.widget_mut(d).state.set(StateFlags::MODAL, true);
            let f = frame::create_frame(self, rect.lines, rect.cols);
            self.add_widget(d, f, super::InsertPos::Append);
            self.dialog_data_mut(d).frame = Some(f);
        }
        debug!(id = self.widget(d).id.0, ?rect, modal = spec.modal, "create dialog");
        d
    }

    pub(crate) fn dialog_default_callback(
        &mut self,
        d: WidgetHandle,
        sender: Option<WidgetHandle>,
        msg: &Message,
    ) -> CbResult {
        match msg {
            Message::Init => CbResult::Handled,
            Message::Idle => {
                self.widget_mut(d).state.set(StateFlags::IDLE, false);
                CbResult::Handled
            }
            Message::Draw => {
                if self.dialog_data(d).frame.is_none()
                    && self.widget(d).state.phase() == Phase::Active
                {
                    let rect = self.widget(d).rect;
                    let style = self.dialog_data(d).colors.normal;
                    self.canvas().fill(rect, style);
                }
                self.group_default_callback(d, sender, msg)
            }
            // Keys reach the group stage from key_event itself.
            Message::Key(_) | Message::Action(_) => CbResult::NotHandled,
            Message::End => match sender {
                Some(child) if child != d && self.contains(child) => {
                    self.send_message(child, Some(d), &Message::End)
                }
                _ => CbResult::NotHandled,
            },
            _ => self.group_default_callback(d, sender, msg),
        }
    }

    /// Make `d` the top of the stack and bring it up: first-time Init and
    /// history load, then Active and Focused on the first focusable child.
    pub fn init_dialog(&mut self, d: WidgetHandle) {
        if let Some(&top) = self.stack.first()
            && self.widget(top).state.contains(StateFlags::MODAL)
        {
            self.widget_mut(d).state.set(StateFlags::MODAL, true);
        }
        self.stack.insert(0, d);
        debug!(id = self.widget(d).id.0, depth = self.stack.len(), "push dialog");

        if self.widget(d).state.phase() == Phase::Construct {
            if !self.widget(d).state.contains(StateFlags::MODAL) {
                self.switch_add(d);
            }
            self.send_message(d, None, &Message::Init);
            self.group_default_callback(d, None, &Message::Init);
            self.read_history(d);
        }

        let children = self.group_data(d).children.clone();
        for _ in 0..children.len() {
            let Some(cur) = self.group_data(d).current else {
                break;
            };
            if self.is_focusable(cur) {
                break;
            }
            let index = children.iter().position(|&h| h == cur).unwrap_or(0);
            self.group_data_mut(d).current = Some(children[(index + 1) % children.len()]);
        }

        self.set_phase(d, Phase::Active);
        self.draw(d);
        self.set_state(d, StateFlags::FOCUSED, true);
        self.dialog_data_mut(d).ret_value = ResultCode::Exit;
    }

    /// Run `d` until it stops: init, event loop, run_done. The dialog is
    /// popped off the stack even when the driver fails.
    pub fn run(&mut self, d: WidgetHandle) -> Result<ResultCode> {
        self.init_dialog(d);
        let looped = self.event_loop(d);
        self.run_done(d);
        looped?;
        Ok(self.dialog_data(d).ret_value)
    }

    fn event_loop(&mut self, d: WidgetHandle) -> Result<()> {
        if self.shutdown && !self.widget(d).state.contains(StateFlags::MODAL) {
            self.send_message(d, None, &Message::Validate);
            return Ok(());
        }
        while self.widget(d).state.phase() == Phase::Active {
            if let Some((cols, lines)) = self.driver.take_resize() {
                self.change_screen_size(cols, lines);
            }
            if !self.driver.is_pending()? {
                self.run_idle_hooks();
                while self.widget(d).state.phase() == Phase::Active
                    && self.widget(d).state.contains(StateFlags::IDLE)
                    && !self.driver.is_pending()?
                {
                    self.send_message(d, None, &Message::Idle);
                }
                if self.widget(d).state.phase() != Phase::Active {
                    break;
                }
            }
            self.hide_cursor();
            self.update_cursor(d);
            self.present()?;

            self.driver.got_interrupt();
            let redo = self.group_data(d).mouse_status == MouseStatus::Repeat;
            let event = self.driver.next_event(redo)?;
            self.process_event(d, event);

            if self.widget(d).state.phase() == Phase::Closed {
                self.send_message(d, None, &Message::Validate);
            }
        }
        Ok(())
    }

    /// Hand one input event to `d`.
    pub fn process_event(&mut self, d: WidgetHandle, event: InputEvent) {
        match event {
            InputEvent::None => {
                if self.driver.got_interrupt() {
                    self.execute_cmd(d, Command::Cancel);
                }
            }
            InputEvent::Mouse(ev) => {
                let status = self.dialog_mouse_event(d, &ev);
                self.group_data_mut(d).mouse_status = status;
            }
            InputEvent::Key(key) => self.key_event(d, key),
        }
    }

    fn dialog_mouse_event(&mut self, d: WidgetHandle, event: &MouseEvent) -> MouseStatus {
        if self.config.mouse_close_dialog
            && !self.widget(d).pos_flags.contains(PosFlags::FULLSCREEN)
            && event.kind == MouseKind::Down(MouseButton::Left)
            && !self.hit_test(event, d)
        {
            self.execute_cmd(d, Command::Cancel);
            return MouseStatus::Normal;
        }
        self.dispatch_mouse(d, event)
    }

    /// Key precedence: the dialog itself, then the group stage (hotkeys,
    /// the current child, UnhandledKey), then the keymaps. PostKey follows
    /// every key that got that far.
    pub fn key_event(&mut self, d: WidgetHandle, key: KeyEvent) {
        if self.group_data(d).children.is_empty() {
            return;
        }
        if self.group_data(d).current.is_none() {
            let first = self.group_data(d).children[0];
            self.group_data_mut(d).current = Some(first);
        }
        if !self.widget(d).options.contains(WidgetOptions::WANT_TAB) {
            match tab_direction(&key) {
                Some(true) => {
                    self.select_next_widget(d);
                    return;
                }
                Some(false) => {
                    self.select_prev_widget(d);
                    return;
                }
                None => {}
            }
        }

        let handled = self
            .send_message(d, None, &Message::Key(key))
            .or_else(|| self.group_default_callback(d, None, &Message::Key(key)));
        if !handled.is_handled() {
            let command = self
                .widget(d)
                .keymap
                .as_ref()
                .and_then(|km| km.lookup(&key))
                .or_else(|| self.dialog_keymap.lookup(&key));
            if let Some(command) = command {
                self.execute_cmd(d, command);
            }
        }
        self.send_message(d, None, &Message::PostKey(key));
    }

    /// Offer `command` to the dialog as an Action, then interpret the
    /// reserved commands. Anything else is `NotHandled` and changes nothing.
    pub fn execute_cmd(&mut self, d: WidgetHandle, command: Command) -> CbResult {
        if self.send_message(d, None, &Message::Action(command)).is_handled() {
            return CbResult::Handled;
        }
        let modal = self.widget(d).state.contains(StateFlags::MODAL);
        match command {
            Command::Ok => {
                self.dialog_data_mut(d).ret_value = ResultCode::Enter;
                self.stop(d);
            }
            Command::Cancel => {
                self.dialog_data_mut(d).ret_value = ResultCode::Cancel;
                self.stop(d);
            }
            Command::Up | Command::Left => self.select_prev_widget(d),
            Command::Down | Command::Right => self.select_next_widget(d),
            Command::Help => {
                let help_ctx = self.dialog_data(d).help_ctx.clone();
                self.raise(&CoreEvent::Help { help_ctx });
            }
            Command::Suspend => {
                self.raise(&CoreEvent::Suspend);
                self.repaint_screen();
            }
            Command::Refresh => self.repaint_screen(),
            Command::ScreenList | Command::ScreenNext | Command::ScreenPrev if modal => {
                return CbResult::NotHandled;
            }
            Command::ScreenList => self.switch_list_pick(),
            Command::ScreenNext => self.switch_next(),
            Command::ScreenPrev => self.switch_prev(),
            Command::User(_) => return CbResult::NotHandled,
        }
        debug!(id = self.widget(d).id.0, %command, "command executed");
        CbResult::Handled
    }

    /// Close `d`: its event loop ends after the current event.
    pub fn stop(&mut self, d: WidgetHandle) {
        self.set_phase(d, Phase::Closed);
    }

    /// Pop `d` off the stack. A closed dialog is told End (with its current
    /// child as sender) and leaves the switch list unless it is modal.
    pub fn run_done(&mut self, d: WidgetHandle) {
        self.stack.retain(|&h| h != d);
        debug!(id = self.widget(d).id.0, depth = self.stack.len(), "pop dialog");
        if self.widget(d).state.phase() == Phase::Closed {
            let current = self.group_data(d).current;
            self.send_message(d, current, &Message::End);
            if !self.widget(d).state.contains(StateFlags::MODAL) {
                self.switch_remove(d);
            }
        }
    }

    /// Save histories, tear down the children, release the event group and
    /// free the dialog, then refresh what is left on screen.
    pub fn destroy_dialog(&mut self, d: WidgetHandle) {
        self.save_history(d);
        self.group_default_callback(d, None, &Message::Destroy);
        let group = self.dialog_data(d).event_group;
        self.stack.retain(|&h| h != d);
        self.switch_list.retain(|&h| h != d);
        if self.switch_current == Some(d) {
            self.switch_current = self.switch_list.first().copied();
        }
        self.free_widget(d);
        if !self.events.release_group(group) {
            warn!(?group, "event group was already released");
        }
        self.do_refresh();
    }

    pub fn event_group(&self, d: WidgetHandle) -> EventGroupId {
        self.dialog_data(d).event_group
    }

    pub fn ret_value(&self, d: WidgetHandle) -> ResultCode {
        self.dialog_data(d).ret_value
    }

    pub fn set_ret_value(&mut self, d: WidgetHandle, value: ResultCode) {
        self.dialog_data_mut(d).ret_value = value;
    }

    pub fn help_ctx(&self, d: WidgetHandle) -> Option<&str> {
        self.dialog_data(d).help_ctx.as_deref()
    }

    pub fn dialog_colors(&self, d: WidgetHandle) -> &DialogColors {
        &self.dialog_data(d).colors
    }

    pub fn set_colors(&mut self, d: WidgetHandle, colors: DialogColors) {
        self.dialog_data_mut(d).colors = colors;
    }

    pub fn dialog_frame(&self, d: WidgetHandle) -> Option<WidgetHandle> {
        self.dialog_data(d).frame
    }

    /// Mark the dialog for Idle messages while no input is pending.
    pub fn set_idle(&mut self, d: WidgetHandle, enable: bool) {
        self.widget_mut(d).state.set(StateFlags::IDLE, enable);
    }

    /// Title of `d`, at most `max_len` characters.
    pub fn dialog_title(&self, d: WidgetHandle, max_len: usize) -> String {
        let cb = Rc::clone(&self.widget(d).callback);
        let title = cb
            .title(self, d, max_len)
            .or_else(|| self.dialog_data(d).title.clone())
            .unwrap_or_default();
        truncate_to_width(&title, max_len)
    }

    pub fn set_title(&mut self, d: WidgetHandle, title: Option<String>) {
        self.dialog_data_mut(d).title = title;
    }

    /// Subscribe `w` to history load/save of its dialog under `name`.
    pub fn subscribe_history(&mut self, w: WidgetHandle, name: &str) -> bool {
        let Some(d) = self.dialog_of(w) else {
            return false;
        };
        let group = self.dialog_data(d).event_group;
        self.events.subscribe_history(group, w, name)
    }

    /// Persist one history list; called by widgets answering HistorySave.
    pub fn store_history(&mut self, name: &str, entries: &[String]) {
        if !self.config.history_enabled() {
            return;
        }
        let entries = trim_to(entries, self.config.history_size);
        if let Err(err) = self.history.save(name, entries) {
            warn!(%err, name, "history save failed");
        }
    }

    fn read_history(&mut self, d: WidgetHandle) {
        if !self.config.history_enabled() {
            return;
        }
        let group = self.dialog_data(d).event_group;
        for sub in self.events.history_subscribers(group) {
            let entries = match self.history.load(&sub.name) {
                Ok(entries) => trim_to(&entries, self.config.history_size).to_vec(),
                Err(err) => {
                    warn!(%err, name = %sub.name, "history load failed");
                    continue;
                }
            };
            if self.contains(sub.widget) {
                self.send_message(sub.widget, Some(d), &Message::HistoryLoad(entries));
            }
        }
    }

    fn save_history(&mut self, d: WidgetHandle) {
        if !self.config.history_enabled() {
            return;
        }
        let group = self.dialog_data(d).event_group;
        for sub in self.events.history_subscribers(group) {
            if self.contains(sub.widget) {
                self.send_message(sub.widget, Some(d), &Message::HistorySave);
            }
        }
    }
}

/// Focus-cycling keys: `Some(true)` for a bare Tab, `Some(false)` for
/// BackTab, Shift-Tab and Ctrl-Tab. Other Tab chords go to the widgets.
fn tab_direction(key: &KeyEvent) -> Option<bool> {
    let mods = key
        .modifiers
        .difference(KeyModifiers::SHIFT | KeyModifiers::CONTROL);
    match key.code {
        KeyCode::BackTab if mods.is_empty() => Some(false),
        KeyCode::Tab if key.modifiers.is_empty() => Some(true),
        KeyCode::Tab if mods.is_empty() => Some(false),
        _ => None,
    }
}
