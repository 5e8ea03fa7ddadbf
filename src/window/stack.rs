//! The dialog stack, screen composition and the dialog switch list.

use tracing::debug;

use super::{WidgetHandle, WindowManager};
use crate::commands::ResultCode;
use crate::error::Result;
use crate::geometry::{PosFlags, place_on_screen};
use crate::message::Message;
use crate::state::Phase;

impl WindowManager {
    /// The dialog receiving input, if any.
    pub fn top_dialog(&self) -> Option<WidgetHandle> {
        self.stack.first().copied()
    }

    /// Running dialogs, top first.
    pub fn dialogs(&self) -> &[WidgetHandle] {
        &self.stack
    }

    /// Redraw the stack. Drawing starts at the nearest fullscreen dialog
    /// (or the back-most one when none is fullscreen) and proceeds towards
    /// the top, so overlapping dialogs composite back to front.
    pub fn do_refresh(&mut self) {
        let Some(&top) = self.stack.first() else {
            return;
        };
        if self.config.fast_refresh {
            self.draw(top);
            return;
        }
        let start = self
            .stack
            .iter()
            .position(|&d| self.widget(d).pos_flags.contains(PosFlags::FULLSCREEN))
            .unwrap_or(self.stack.len() - 1);
        for d in self.stack[..=start].to_vec().into_iter().rev() {
            self.draw(d);
        }
    }

    /// Clear the screen and redraw everything; the next present rewrites
    /// every terminal cell.
    pub fn repaint_screen(&mut self) {
        self.screen.reset();
        self.full_repaint = true;
        self.do_refresh();
    }

    /// Push the composed screen to the terminal.
    pub fn present(&mut self) -> Result<()> {
        let full = std::mem::take(&mut self.full_repaint);
        self.driver.present(&self.screen, self.cursor, full)?;
        Ok(())
    }

    /// Adopt a new terminal size: re-place every running dialog from the
    /// back to the top, mark parked dialogs for a resize when they resume,
    /// then repaint.
    pub fn change_screen_size(&mut self, cols: u16, lines: u16) {
        debug!(cols, lines, "screen resized");
        self.screen
            .resize(ratatui::layout::Rect::new(0, 0, cols, lines));
        for d in self.switch_list.clone() {
            if !self.stack.contains(&d) {
                self.dialog_data_mut(d).pending_resize = true;
            }
        }
        for d in self.stack.clone().into_iter().rev() {
            self.resize_to_screen(d);
        }
        self.repaint_screen();
    }

    fn resize_to_screen(&mut self, d: WidgetHandle) {
        let (lines, cols) = self.screen_size();
        let node = self.widget(d);
        let placed = place_on_screen(node.pos_flags, node.rect, lines, cols);
        self.send_message(d, None, &Message::Resize(placed));
    }

    /// Non-modal dialogs that can be switched between, newest first.
    pub fn switch_dialogs(&self) -> &[WidgetHandle] {
        &self.switch_list
    }

    pub fn switch_current(&self) -> Option<WidgetHandle> {
        self.switch_current
    }

    /// Make `d` the current screen; every other screen is suspended.
    pub(crate) fn switch_add(&mut self, d: WidgetHandle) {
        if !self.switch_list.contains(&d) {
            self.switch_list.insert(0, d);
        }
        self.switch_current = Some(d);
        for other in self.switch_list.clone() {
            if other != d {
                self.set_phase(other, Phase::Suspended);
            }
        }
    }

    /// Drop `d` from the switch list and resume the screen under the top
    /// of the stack.
    pub(crate) fn switch_remove(&mut self, d: WidgetHandle) {
        self.switch_list.retain(|&h| h != d);
        self.switch_current = match self.stack.first() {
            Some(top) => self.switch_list.iter().copied().find(|h| h == top),
            None => self.switch_list.first().copied(),
        };
        if let Some(cur) = self.switch_current {
            self.set_phase(cur, Phase::Active);
        }
    }

    fn switch_goto(&mut self, target: WidgetHandle) {
        let Some(old) = self.switch_current else {
            return;
        };
        if old == target {
            return;
        }
        debug!(from = self.widget(old).id.0, to = self.widget(target).id.0, "switch screen");
        self.switch_current = Some(target);
        self.set_phase(old, Phase::Suspended);
        self.switch_pending = true;
    }

    fn switch_step(&mut self, forward: bool) {
        if self.shutdown {
            return;
        }
        let Some(cur) = self.switch_current else {
            return;
        };
        let Some(index) = self.switch_list.iter().position(|&h| h == cur) else {
            return;
        };
        let len = self.switch_list.len();
        let next = if forward {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        };
        let target = self.switch_list[next];
        self.switch_goto(target);
    }

    pub(crate) fn switch_next(&mut self) {
        self.switch_step(true);
    }

    pub(crate) fn switch_prev(&mut self) {
        self.switch_step(false);
    }

    /// Let the installed picker choose a screen to switch to.
    pub(crate) fn switch_list_pick(&mut self) {
        let Some(picker) = self.screen_picker.clone() else {
            return;
        };
        let list = self.switch_list.clone();
        if let Some(target) = picker(self, &list)
            && list.contains(&target)
        {
            self.switch_goto(target);
        }
    }

    pub fn is_switch_pending(&self) -> bool {
        self.switch_pending
    }

    /// Run the screens chosen by ScreenNext/Prev/List until no switch is
    /// pending. Screens that end closed are destroyed. Returns the result
    /// of the last screen run.
    pub fn process_switch_pending(&mut self) -> Result<Option<ResultCode>> {
        let mut ret = None;
        while self.switch_pending {
            self.switch_pending = false;
            let Some(d) = self.switch_current else {
                break;
            };
            self.set_phase(d, Phase::Suspended);
            if std::mem::take(&mut self.dialog_data_mut(d).pending_resize) {
                self.resize_to_screen(d);
            }
            ret = Some(self.run(d)?);
            if self.widget(d).state.phase() == Phase::Closed {
                self.destroy_dialog(d);
            }
        }
        self.repaint_screen();
        Ok(ret)
    }

    /// Take over the terminal.
    pub fn enter_terminal(&mut self) -> Result<()> {
        self.driver.enter()?;
        self.driver.set_mouse_capture(self.config.mouse_enabled)?;
        self.full_repaint = true;
        Ok(())
    }

    pub fn leave_terminal(&mut self) -> Result<()> {
        self.driver.set_mouse_capture(false)?;
        self.driver.exit()?;
        Ok(())
    }
}
