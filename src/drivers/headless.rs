//! An in-memory driver for tests and scripted runs.
//!
//! Input comes from a queue filled through a [`HeadlessHandle`]; output is
//! kept as a copy of the last presented screen. When the queue runs dry the
//! driver reports an interrupt, so a running dialog cancels instead of
//! blocking forever.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use super::{InputDriver, InputEvent, OutputDriver};
use crate::window::MouseEvent;

#[derive(Debug)]
struct HeadlessState {
    events: VecDeque<InputEvent>,
    size: (u16, u16),
    pending_resize: Option<(u16, u16)>,
    interrupt: bool,
    frames: usize,
    full_repaints: usize,
    last_frame: Buffer,
    cursor: Option<(u16, u16)>,
    mouse_capture: bool,
    entered: bool,
}

#[derive(Debug, Clone)]
pub struct HeadlessDriver {
    state: Rc<RefCell<HeadlessState>>,
}

/// Shared view of a [`HeadlessDriver`] that stays usable after the driver
/// has been boxed into a window manager.
#[derive(Debug, Clone)]
pub struct HeadlessHandle {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessDriver {
    pub fn new(cols: u16, lines: u16) -> Self {
        Self {
            state: Rc::new(RefCell::new(HeadlessState {
                events: VecDeque::new(),
                size: (cols, lines),
                pending_resize: None,
                interrupt: false,
                frames: 0,
                full_repaints: 0,
                last_frame: Buffer::empty(Rect::new(0, 0, cols, lines)),
                cursor: None,
                mouse_capture: false,
                entered: false,
            })),
        }
    }

    pub fn handle(&self) -> HeadlessHandle {
        HeadlessHandle {
            state: Rc::clone(&self.state),
        }
    }
}

impl HeadlessHandle {
    pub fn push(&self, event: InputEvent) {
        self.state.borrow_mut().events.push_back(event);
    }

    pub fn push_key(&self, code: KeyCode) {
        self.push_key_with(code, KeyModifiers::NONE);
    }

    pub fn push_key_with(&self, code: KeyCode, modifiers: KeyModifiers) {
        self.push(InputEvent::Key(KeyEvent::new(code, modifiers)));
    }

    pub fn push_mouse(&self, event: MouseEvent) {
        self.push(InputEvent::Mouse(event));
    }

    /// Change the terminal size; the manager picks it up on its next turn.
    pub fn push_resize(&self, cols: u16, lines: u16) {
        let mut state = self.state.borrow_mut();
        state.size = (cols, lines);
        state.pending_resize = Some((cols, lines));
    }

    pub fn interrupt(&self) {
        self.state.borrow_mut().interrupt = true;
    }

    pub fn queued(&self) -> usize {
        self.state.borrow().events.len()
    }

    pub fn frames(&self) -> usize {
        self.state.borrow().frames
    }

    pub fn full_repaints(&self) -> usize {
        self.state.borrow().full_repaints
    }

    pub fn cursor(&self) -> Option<(u16, u16)> {
        self.state.borrow().cursor
    }

    pub fn mouse_capture(&self) -> bool {
        self.state.borrow().mouse_capture
    }

    pub fn entered(&self) -> bool {
        self.state.borrow().entered
    }

    pub fn last_frame(&self) -> Buffer {
        self.state.borrow().last_frame.clone()
    }

    /// Text of screen line `y` in the last presented frame.
    pub fn line(&self, y: u16) -> String {
        let state = self.state.borrow();
        let buf = &state.last_frame;
        if y >= buf.area.height {
            return String::new();
        }
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect()
    }
}

impl InputDriver for HeadlessDriver {
    fn next_event(&mut self, _redo: bool) -> io::Result<InputEvent> {
        let mut state = self.state.borrow_mut();
        match state.events.pop_front() {
            Some(event) => Ok(event),
            None => {
                state.interrupt = true;
                Ok(InputEvent::None)
            }
        }
    }

    fn is_pending(&mut self) -> io::Result<bool> {
        Ok(!self.state.borrow().events.is_empty())
    }

    fn got_interrupt(&mut self) -> bool {
        std::mem::take(&mut self.state.borrow_mut().interrupt)
    }

    fn take_resize(&mut self) -> Option<(u16, u16)> {
        self.state.borrow_mut().pending_resize.take()
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        self.state.borrow_mut().mouse_capture = enabled;
        Ok(())
    }
}

impl OutputDriver for HeadlessDriver {
    fn size(&self) -> io::Result<(u16, u16)> {
        Ok(self.state.borrow().size)
    }

    fn enter(&mut self) -> io::Result<()> {
        self.state.borrow_mut().entered = true;
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        self.state.borrow_mut().entered = false;
        Ok(())
    }

    fn present(
        &mut self,
        screen: &Buffer,
        cursor: Option<(u16, u16)>,
        full: bool,
    ) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        state.frames += 1;
        if full {
            state.full_repaints += 1;
        }
        state.last_frame = screen.clone();
        state.cursor = cursor;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_queue_reports_interrupt() {
        let mut driver = HeadlessDriver::new(20, 5);
        let handle = driver.handle();
        handle.push_key(KeyCode::Char('a'));
        assert!(driver.is_pending().unwrap());
        assert!(matches!(driver.next_event(false).unwrap(), InputEvent::Key(_)));
        assert!(!driver.got_interrupt());
        assert_eq!(driver.next_event(false).unwrap(), InputEvent::None);
        assert!(driver.got_interrupt());
        assert!(!driver.got_interrupt());
    }

    #[test]
    fn resize_changes_size_once() {
        let mut driver = HeadlessDriver::new(20, 5);
        driver.handle().push_resize(30, 10);
        assert_eq!(driver.size().unwrap(), (30, 10));
        assert_eq!(driver.take_resize(), Some((30, 10)));
        assert_eq!(driver.take_resize(), None);
    }

    #[test]
    fn present_keeps_last_frame() {
        let mut driver = HeadlessDriver::new(4, 2);
        let handle = driver.handle();
        let mut screen = Buffer::empty(Rect::new(0, 0, 4, 2));
        screen.set_string(0, 1, "ok", ratatui::style::Style::default());
        driver.present(&screen, Some((1, 1)), true).unwrap();
        assert_eq!(handle.frames(), 1);
        assert_eq!(handle.full_repaints(), 1);
        assert_eq!(handle.line(1), "ok  ");
        assert_eq!(handle.cursor(), Some((1, 1)));
    }
}
