//! Containers: ownership of children, focus chain and Z-order.

use std::cmp::Ordering;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, trace};

use super::{GroupData, Widget, WidgetCallback, WidgetHandle, WindowManager};
use crate::geometry::{PosFlags, Rect, follow_owner};
use crate::message::{CbResult, Message};
use crate::state::{Phase, StateFlags, WidgetOptions};

/// Where `add_widget` puts the new child in the Z-order.
#[derive(Debug, Clone, Copy)]
pub enum InsertPos {
    /// In front of every existing child.
    Append,
    BeforeCurrent,
    AfterCurrent,
    /// Before the first child that compares greater than the new one.
    Sorted(fn(&Widget, &Widget) -> Ordering),
}

fn is_printable(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char(_))
        && !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

/// Alt+letter hotkeys are matched case-insensitively.
fn fold_hotkey(mut key: KeyEvent) -> KeyEvent {
    if key.modifiers.contains(KeyModifiers::ALT)
        && let KeyCode::Char(c) = key.code
        && c.is_ascii_alphabetic()
    {
        key.code = KeyCode::Char(c.to_ascii_lowercase());
    }
    key
}

impl WindowManager {
    pub fn create_group(
        &mut self,
        rect: Rect,
        pos_flags: PosFlags,
        options: WidgetOptions,
        callback: Rc<dyn WidgetCallback>,
    ) -> WidgetHandle {
        let g = self.create_widget(rect, pos_flags, options, callback);
        self.widget_mut(g).group = Some(GroupData::default());
        g
    }

    /// Hand `w` over to `group`. The child's rectangle is taken relative to
    /// the group and converted to screen coordinates; CENTER flags center it
    /// inside the group first. Adding to a running group initialises and
    /// selects the child; otherwise it just becomes `current`.
    pub fn add_widget(
        &mut self,
        group: WidgetHandle,
        w: WidgetHandle,
        pos: InsertPos,
    ) -> WidgetHandle {
        assert!(
            self.widget(w).owner.is_none(),
            "widget {:?} already has an owner",
            self.widget(w).id
        );
        let grect = self.widget(group).rect;
        {
            let node = self.widget_mut(w);
            let mut r = node.rect;
            if node.pos_flags.contains(PosFlags::CENTER_HORZ) {
                r.x = (grect.cols - r.cols) / 2;
            }
            if node.pos_flags.contains(PosFlags::CENTER_VERT) {
                r.y = (grect.lines - r.lines) / 2;
            }
            node.rect = r.moved_by(grect.y, grect.x);
            node.owner = Some(group);
        }

        let index = self.insert_index(group, w, pos);
        self.group_data_mut(group).children.insert(index, w);
        trace!(group = self.widget(group).id.0, child = self.widget(w).id.0, index, "add widget");

        if self.widget(group).state.phase() == Phase::Active {
            self.send_message(w, None, &Message::Init);
            self.select_widget(w);
        } else {
            self.group_data_mut(group).current = Some(w);
        }
        w
    }

    fn insert_index(&self, group: WidgetHandle, w: WidgetHandle, pos: InsertPos) -> usize {
        let data = self.group_data(group);
        let len = data.children.len();
        let current_index = data
            .current
            .and_then(|c| data.children.iter().position(|&h| h == c));
        match pos {
            InsertPos::Append => len,
            InsertPos::BeforeCurrent => current_index.unwrap_or(len),
            InsertPos::AfterCurrent => current_index.map_or(len, |i| i + 1),
            InsertPos::Sorted(cmp) => {
                let new = self.widget(w);
                data.children
                    .iter()
                    .position(|&c| cmp(new, self.widget(c)) == Ordering::Less)
                    .unwrap_or(len)
            }
        }
    }

    /// Detach `w` from its owner without freeing it. If `w` was current,
    /// the next child (wrapping) becomes current.
    pub fn remove_widget(&mut self, w: WidgetHandle) {
        let Some(group) = self.widget(w).owner else {
            panic!("widget {:?} has no owner", self.widget(w).id);
        };
        let data = self.group_data_mut(group);
        if let Some(index) = data.children.iter().position(|&h| h == w) {
            if data.current == Some(w) {
                let next = data.children[(index + 1) % data.children.len()];
                data.current = (next != w).then_some(next);
            }
            data.children.remove(index);
        }
        if data.children.is_empty() {
            data.current = None;
        }
        let node = self.widget_mut(w);
        node.owner = None;
        node.state.set(StateFlags::FOCUSED, false);

        if self.widget(group).state.phase() == Phase::Active {
            self.draw(group);
            if let Some(cur) = self.group_data(group).current {
                self.select_widget(cur);
            }
        }
    }

    /// Give `w` the focus inside its owner. No-op for widgets that are not
    /// selectable; TOP_SELECT widgets are raised first.
    pub fn select_widget(&mut self, w: WidgetHandle) {
        let node = self.widget(w);
        if !node.options.contains(WidgetOptions::SELECTABLE) {
            return;
        }
        if node.owner.is_none() {
            return;
        }
        if node.options.contains(WidgetOptions::TOP_SELECT) {
            self.reorder_widget(w, true);
        }
        self.focus_widget(w);
    }

    fn focus_widget(&mut self, w: WidgetHandle) {
        let Some(group) = self.widget(w).owner else {
            return;
        };
        let current = self.group_data(group).current;
        if current != Some(w) {
            if let Some(cur) = current {
                self.do_focus(cur, false);
            }
            let lost = current.is_none_or(|c| !self.widget(c).state.contains(StateFlags::FOCUSED));
            if lost {
                debug!(
                    group = self.widget(group).id.0,
                    widget = self.widget(w).id.0,
                    "focus moved"
                );
                self.do_focus(w, true);
                self.group_data_mut(group).current = Some(w);
            }
        } else if !self.widget(w).state.contains(StateFlags::FOCUSED) {
            self.do_focus(w, true);
        }
    }

    /// Only a visible, focused owner passes focus down to a child.
    fn do_focus(&mut self, w: WidgetHandle, enable: bool) {
        let Some(owner) = self.widget(w).owner else {
            return;
        };
        if self
            .widget(owner)
            .state
            .contains(StateFlags::VISIBLE | StateFlags::FOCUSED)
        {
            self.set_state(w, StateFlags::FOCUSED, enable);
        }
    }

    pub fn select_next_widget(&mut self, group: WidgetHandle) {
        self.select_next_or_prev(group, true);
    }

    pub fn select_prev_widget(&mut self, group: WidgetHandle) {
        self.select_next_or_prev(group, false);
    }

    fn select_next_or_prev(&mut self, group: WidgetHandle, next: bool) {
        let data = self.group_data(group);
        let Some(current) = data.current else {
            return;
        };
        let Some(start) = data.children.iter().position(|&h| h == current) else {
            return;
        };
        let len = data.children.len();
        let mut index = start;
        loop {
            index = if next {
                (index + 1) % len
            } else {
                (index + len - 1) % len
            };
            if index == start || self.is_focusable(self.group_data(group).children[index]) {
                break;
            }
        }
        let target = self.group_data(group).children[index];
        self.select_widget(target);
    }

    /// Move `w` to the front (or back) of its owner's Z-order. Focus is
    /// left alone.
    pub fn reorder_widget(&mut self, w: WidgetHandle, to_front: bool) {
        let Some(group) = self.widget(w).owner else {
            return;
        };
        let data = self.group_data_mut(group);
        let Some(index) = data.children.iter().position(|&h| h == w) else {
            return;
        };
        data.children.remove(index);
        if to_front {
            data.children.push(w);
        } else {
            data.children.insert(0, w);
        }
    }

    /// Put `new` in `old`'s slot. `new` takes over `old`'s id, owner and
    /// rectangle; `old` is destroyed.
    ///
    /// Focus follows to `new` when `old` had it and `new` is selectable.
    /// When `old` was current and focus cannot follow, the next focusable
    /// sibling is selected first so focus never lands on `new`.
    pub fn replace_widget(&mut self, old: WidgetHandle, new: WidgetHandle) {
        let Some(group) = self.widget(old).owner else {
            panic!("widget {:?} has no owner", self.widget(old).id);
        };
        assert!(
            self.widget(new).owner.is_none(),
            "widget {:?} already has an owner",
            self.widget(new).id
        );
        let Some(slot) = self
            .group_data(group)
            .children
            .iter()
            .position(|&h| h == old)
        else {
            return;
        };
        let should_focus = self.widget(old).state.contains(StateFlags::FOCUSED)
            && self.widget(new).options.contains(WidgetOptions::SELECTABLE);

        if !should_focus && self.group_data(group).current == Some(old) {
            let children = self.group_data(group).children.clone();
            let len = children.len();
            let mut index = (slot + 1) % len;
            while index != slot && !self.is_focusable(children[index]) {
                index = (index + 1) % len;
            }
            self.select_widget(children[index]);
        }

        let (old_id, old_rect) = {
            let node = self.widget(old);
            (node.id, node.rect)
        };
        {
            let node = self.widget_mut(new);
            node.id = old_id;
            node.owner = Some(group);
            node.rect = old_rect;
        }
        let data = self.group_data_mut(group);
        data.children[slot] = new;
        if data.current == Some(old) {
            data.current = Some(new);
        }
        debug!(group = self.widget(group).id.0, id = old_id.0, "replace widget");

        self.widget_mut(old).owner = None;
        self.free_widget(old);
        self.send_message(new, None, &Message::Init);
        if should_focus {
            self.select_widget(new);
        } else {
            self.draw(new);
        }
    }

    pub(crate) fn group_default_callback(
        &mut self,
        g: WidgetHandle,
        sender: Option<WidgetHandle>,
        msg: &Message,
    ) -> CbResult {
        match msg {
            Message::Init => {
                for child in self.group_data(g).children.clone() {
                    self.send_message(child, None, &Message::Init);
                }
                CbResult::Handled
            }
            Message::Draw => {
                self.group_draw(g);
                CbResult::Handled
            }
            Message::Key(key) => self.group_handle_key(g, *key),
            Message::Hotkey(key) => self.group_handle_hotkey(g, *key),
            Message::Cursor => self.group_update_cursor(g),
            Message::Resize(rect) => {
                self.group_resize(g, *rect);
                CbResult::Handled
            }
            Message::Destroy => {
                let children = std::mem::take(&mut self.group_data_mut(g).children);
                self.group_data_mut(g).current = None;
                for child in children {
                    self.free_widget(child);
                }
                CbResult::Handled
            }
            _ => self.widget_default_callback(g, sender, msg),
        }
    }

    fn group_draw(&mut self, g: WidgetHandle) {
        if self.widget(g).state.phase() != Phase::Active {
            return;
        }
        for child in self.group_data(g).children.clone() {
            self.draw(child);
        }
        self.update_cursor(g);
    }

    /// Position the terminal cursor for `w`: a group asks its children,
    /// starting at `current`.
    pub fn update_cursor(&mut self, w: WidgetHandle) -> bool {
        self.send_message(w, None, &Message::Cursor).is_handled()
    }

    fn group_update_cursor(&mut self, g: WidgetHandle) -> CbResult {
        if self.widget(g).state.phase() != Phase::Active {
            return CbResult::NotHandled;
        }
        let data = self.group_data(g);
        let Some(start) = data
            .current
            .and_then(|c| data.children.iter().position(|&h| h == c))
        else {
            return CbResult::NotHandled;
        };
        let children = data.children.clone();
        let len = children.len();
        for step in 0..len {
            let child = children[(start + step) % len];
            let node = self.widget(child);
            let eligible = node.options.contains(WidgetOptions::WANT_CURSOR)
                && node.state.contains(StateFlags::VISIBLE)
                && !node.state.contains(StateFlags::DISABLED);
            if eligible && self.update_cursor(child) {
                return CbResult::Handled;
            }
        }
        CbResult::NotHandled
    }

    fn group_handle_key(&mut self, g: WidgetHandle, key: KeyEvent) -> CbResult {
        let mut handled = self.send_message(g, None, &Message::Hotkey(key));
        if let Some(current) = self.group_data(g).current {
            if !handled.is_handled() {
                handled = self.send_message(current, None, &Message::Key(key));
            }
            if !handled.is_handled() {
                handled = self.send_message(g, Some(current), &Message::UnhandledKey(key));
            }
        }
        handled
    }

    fn group_handle_hotkey(&mut self, g: WidgetHandle, key: KeyEvent) -> CbResult {
        let data = self.group_data(g);
        if data.children.is_empty() {
            return CbResult::NotHandled;
        }
        let current = data.current.unwrap_or(data.children[0]);
        let children = data.children.clone();
        let Some(start) = children.iter().position(|&h| h == current) else {
            return CbResult::NotHandled;
        };
        let node = self.widget(current);
        if !node.state.contains(StateFlags::VISIBLE) || node.state.contains(StateFlags::DISABLED) {
            return CbResult::NotHandled;
        }
        if node.options.contains(WidgetOptions::IS_INPUT) && is_printable(&key) {
            return CbResult::NotHandled;
        }
        let key = fold_hotkey(key);
        let wants = node.options.contains(WidgetOptions::WANT_HOTKEY);
        if wants && self.send_message(current, None, &Message::Hotkey(key)).is_handled() {
            return CbResult::Handled;
        }

        let len = children.len();
        for step in 1..len {
            let w = children[(start + step) % len];
            let node = self.widget(w);
            let wants = node.options.contains(WidgetOptions::WANT_HOTKEY)
                && !node.state.contains(StateFlags::DISABLED);
            if wants && self.send_message(w, None, &Message::Hotkey(key)).is_handled() {
                self.select_widget(w);
                self.send_message(g, Some(w), &Message::HotkeyHandled);
                return CbResult::Handled;
            }
        }
        CbResult::NotHandled
    }

    fn group_resize(&mut self, g: WidgetHandle, rect: Rect) {
        let old = self.widget(g).rect;
        self.widget_mut(g).rect = rect;
        for child in self.group_data(g).children.clone() {
            let node = self.widget(child);
            let placed = follow_owner(node.pos_flags, node.rect, old, rect);
            self.send_message(child, None, &Message::Resize(placed));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::headless::HeadlessDriver;
    use crate::window::{DefaultCallback, DialogSpec};
    use std::cell::RefCell;

    fn manager() -> WindowManager {
        WindowManager::new(Box::new(HeadlessDriver::new(80, 24)), Default::default()).unwrap()
    }

    fn plain(wm: &mut WindowManager, y: i32, opts: WidgetOptions) -> WidgetHandle {
        wm.create_widget(
            Rect::new(y, 1, 1, 10),
            PosFlags::KEEP_DEFAULT,
            opts,
            Rc::new(DefaultCallback),
        )
    }

    #[test]
    fn add_to_idle_group_makes_child_current() {
        let mut wm = manager();
        let g = wm.create_group(
            Rect::new(2, 3, 10, 20),
            PosFlags::KEEP_DEFAULT,
            WidgetOptions::empty(),
            Rc::new(DefaultCallback),
        );
        let a = plain(&mut wm, 1, WidgetOptions::SELECTABLE);
        let b = plain(&mut wm, 2, WidgetOptions::SELECTABLE);
        wm.add_widget(g, a, InsertPos::Append);
        wm.add_widget(g, b, InsertPos::Append);
        assert_eq!(wm.widget(g).current(), Some(b));
        assert_eq!(wm.widget(g).children(), &[a, b]);
        assert_eq!(wm.widget(a).rect(), Rect::new(3, 4, 1, 10));
        assert_eq!(wm.widget(a).owner(), Some(g));
    }

    #[test]
    fn centered_child_is_centered_in_group() {
        let mut wm = manager();
        let g = wm.create_group(
            Rect::new(2, 4, 10, 20),
            PosFlags::KEEP_DEFAULT,
            WidgetOptions::empty(),
            Rc::new(DefaultCallback),
        );
        let c = wm.create_widget(
            Rect::new(1, 0, 1, 6),
            PosFlags::CENTER_HORZ,
            WidgetOptions::empty(),
            Rc::new(DefaultCallback),
        );
        wm.add_widget(g, c, InsertPos::Append);
        assert_eq!(wm.widget(c).rect(), Rect::new(3, 11, 1, 6));
    }

    #[test]
    fn insert_positions() {
        let mut wm = manager();
        let g = wm.create_group(
            Rect::new(0, 0, 10, 20),
            PosFlags::KEEP_DEFAULT,
            WidgetOptions::empty(),
            Rc::new(DefaultCallback),
        );
        let a = plain(&mut wm, 5, WidgetOptions::empty());
        let b = plain(&mut wm, 1, WidgetOptions::empty());
        let c = plain(&mut wm, 3, WidgetOptions::empty());
        let d = plain(&mut wm, 2, WidgetOptions::empty());
        wm.add_widget(g, a, InsertPos::Append);
        // current is a
        wm.add_widget(g, b, InsertPos::BeforeCurrent);
        assert_eq!(wm.widget(g).children(), &[b, a]);
        // current is b
        wm.add_widget(g, c, InsertPos::AfterCurrent);
        assert_eq!(wm.widget(g).children(), &[b, c, a]);

        let by_row: fn(&Widget, &Widget) -> Ordering = |x, y| x.rect().y.cmp(&y.rect().y);
        wm.add_widget(g, d, InsertPos::Sorted(by_row));
        assert_eq!(wm.widget(g).children(), &[b, d, c, a]);
    }

    #[test]
    fn reorder_moves_to_either_end_without_focus_change() {
        let mut wm = manager();
        let g = wm.create_group(
            Rect::new(0, 0, 10, 20),
            PosFlags::KEEP_DEFAULT,
            WidgetOptions::empty(),
            Rc::new(DefaultCallback),
        );
        let a = plain(&mut wm, 1, WidgetOptions::SELECTABLE);
        let b = plain(&mut wm, 2, WidgetOptions::SELECTABLE);
        let c = plain(&mut wm, 3, WidgetOptions::SELECTABLE);
        for w in [a, b, c] {
            wm.add_widget(g, w, InsertPos::Append);
        }
        wm.reorder_widget(a, true);
        assert_eq!(wm.widget(g).children(), &[b, c, a]);
        wm.reorder_widget(c, false);
        assert_eq!(wm.widget(g).children(), &[c, b, a]);
        assert_eq!(wm.widget(g).current(), Some(c));
    }

    #[test]
    fn top_select_raises_before_focusing() {
        let mut wm = manager();
        let d = wm.create_dialog(
            DialogSpec::new(Rect::new(0, 0, 10, 30)),
            Rc::new(DefaultCallback),
        );
        let a = plain(&mut wm, 1, WidgetOptions::SELECTABLE | WidgetOptions::TOP_SELECT);
        let b = plain(&mut wm, 2, WidgetOptions::SELECTABLE);
        wm.add_widget(d, a, InsertPos::Append);
        wm.add_widget(d, b, InsertPos::Append);
        wm.init_dialog(d);
        wm.select_widget(a);
        assert_eq!(wm.widget(d).children(), &[b, a]);
        assert!(wm.has_state(a, StateFlags::FOCUSED));
        assert!(!wm.has_state(b, StateFlags::FOCUSED));
    }

    #[test]
    fn remove_current_advances_and_detaches() {
        let mut wm = manager();
        let d = wm.create_dialog(
            DialogSpec::new(Rect::new(0, 0, 10, 30)),
            Rc::new(DefaultCallback),
        );
        let a = plain(&mut wm, 1, WidgetOptions::SELECTABLE);
        let b = plain(&mut wm, 2, WidgetOptions::SELECTABLE);
        wm.add_widget(d, a, InsertPos::Append);
        wm.add_widget(d, b, InsertPos::Append);
        wm.init_dialog(d);
        wm.select_widget(a);
        wm.remove_widget(a);
        assert_eq!(wm.widget(d).current(), Some(b));
        assert!(wm.has_state(b, StateFlags::FOCUSED));
        assert!(wm.widget(a).owner().is_none());
        assert!(!wm.has_state(a, StateFlags::FOCUSED));
    }

    struct HotkeyWidget {
        key: char,
        hits: RefCell<u32>,
    }

    impl WidgetCallback for HotkeyWidget {
        fn callback(
            &self,
            wm: &mut WindowManager,
            w: WidgetHandle,
            sender: Option<WidgetHandle>,
            msg: &Message,
        ) -> CbResult {
            match msg {
                Message::Hotkey(k) if k.code == KeyCode::Char(self.key) => {
                    *self.hits.borrow_mut() += 1;
                    CbResult::Handled
                }
                _ => wm.default_callback(w, sender, msg),
            }
        }
    }

    #[test]
    fn hotkey_selects_sibling_unless_current_is_input() {
        let mut wm = manager();
        let d = wm.create_dialog(
            DialogSpec::new(Rect::new(0, 0, 10, 30)),
            Rc::new(DefaultCallback),
        );
        let input = plain(&mut wm, 1, WidgetOptions::SELECTABLE | WidgetOptions::IS_INPUT);
        let hot = Rc::new(HotkeyWidget {
            key: 'o',
            hits: RefCell::new(0),
        });
        let button = wm.create_widget(
            Rect::new(2, 1, 1, 6),
            PosFlags::KEEP_DEFAULT,
            WidgetOptions::SELECTABLE | WidgetOptions::WANT_HOTKEY,
            hot.clone(),
        );
        wm.add_widget(d, input, InsertPos::Append);
        wm.add_widget(d, button, InsertPos::Append);
        wm.init_dialog(d);
        wm.select_widget(input);

        let plain_o = KeyEvent::new(KeyCode::Char('o'), KeyModifiers::NONE);
        assert!(!wm.send_message(d, None, &Message::Hotkey(plain_o)).is_handled());
        assert_eq!(*hot.hits.borrow(), 0);

        let alt_o = KeyEvent::new(KeyCode::Char('O'), KeyModifiers::ALT);
        assert!(wm.send_message(d, None, &Message::Hotkey(alt_o)).is_handled());
        assert_eq!(*hot.hits.borrow(), 1);
        assert_eq!(wm.widget(d).current(), Some(button));
    }

    #[test]
    fn resize_cascades_with_anchors() {
        let mut wm = manager();
        let g = wm.create_group(
            Rect::new(0, 0, 10, 20),
            PosFlags::KEEP_DEFAULT,
            WidgetOptions::empty(),
            Rc::new(DefaultCallback),
        );
        let right = wm.create_widget(
            Rect::new(1, 15, 1, 4),
            PosFlags::KEEP_RIGHT | PosFlags::KEEP_TOP,
            WidgetOptions::empty(),
            Rc::new(DefaultCallback),
        );
        wm.add_widget(g, right, InsertPos::Append);
        wm.send_message(g, None, &Message::Resize(Rect::new(0, 0, 12, 30)));
        assert_eq!(wm.widget(g).rect(), Rect::new(0, 0, 12, 30));
        assert_eq!(wm.widget(right).rect(), Rect::new(1, 25, 1, 4));
    }

    #[test]
    #[should_panic(expected = "already has an owner")]
    fn replace_refuses_a_widget_owned_elsewhere() {
        let mut wm = manager();
        let g1 = wm.create_group(
            Rect::new(0, 0, 10, 20),
            PosFlags::KEEP_DEFAULT,
            WidgetOptions::empty(),
            Rc::new(DefaultCallback),
        );
        let g2 = wm.create_group(
            Rect::new(0, 0, 10, 20),
            PosFlags::KEEP_DEFAULT,
            WidgetOptions::empty(),
            Rc::new(DefaultCallback),
        );
        let old = plain(&mut wm, 1, WidgetOptions::SELECTABLE);
        let taken = plain(&mut wm, 2, WidgetOptions::SELECTABLE);
        wm.add_widget(g1, old, InsertPos::Append);
        wm.add_widget(g2, taken, InsertPos::Append);
        wm.replace_widget(old, taken);
    }

    #[test]
    fn replace_leaves_the_old_widget_unlisted() {
        let mut wm = manager();
        let g = wm.create_group(
            Rect::new(0, 0, 10, 20),
            PosFlags::KEEP_DEFAULT,
            WidgetOptions::empty(),
            Rc::new(DefaultCallback),
        );
        let old = plain(&mut wm, 1, WidgetOptions::SELECTABLE);
        let new = plain(&mut wm, 2, WidgetOptions::SELECTABLE);
        wm.add_widget(g, old, InsertPos::Append);
        wm.replace_widget(old, new);
        assert_eq!(wm.widget(g).children(), &[new]);
        wm.destroy_widget(g);
        assert_eq!(wm.widget_count(), 0);
    }

    #[test]
    fn destroy_frees_children() {
        let mut wm = manager();
        let g = wm.create_group(
            Rect::new(0, 0, 10, 20),
            PosFlags::KEEP_DEFAULT,
            WidgetOptions::empty(),
            Rc::new(DefaultCallback),
        );
        let a = plain(&mut wm, 1, WidgetOptions::empty());
        wm.add_widget(g, a, InsertPos::Append);
        wm.destroy_widget(g);
        assert!(!wm.contains(a));
        assert!(!wm.contains(g));
        assert_eq!(wm.widget_count(), 0);
    }
}
