use std::collections::VecDeque;
use std::io::{self, Stdout};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, MouseEventKind};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Position;

use super::keyboard::KeyboardNormalizer;
use super::{InputDriver, InputEvent, OutputDriver};
use crate::config::WmConfig;
use crate::ui::UiFrame;
use crate::window::{MouseEvent, MouseKind, MouseResult};

/// Counts repeated presses of the same button at the same cell.
#[derive(Debug)]
struct ClickTracker {
    interval: Duration,
    last: Option<(Instant, i32, i32)>,
    count: u8,
}

impl ClickTracker {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
            count: 0,
        }
    }

    fn press(&mut self, x: i32, y: i32, now: Instant) -> u8 {
        let repeated = matches!(
            self.last,
            Some((at, lx, ly)) if lx == x && ly == y && now.duration_since(at) <= self.interval
        );
        self.count = if repeated {
            self.count.saturating_add(1).min(3)
        } else {
            1
        };
        self.last = Some((now, x, y));
        self.count
    }
}

pub struct ConsoleInputDriver {
    normalizer: KeyboardNormalizer,
    event_queue: VecDeque<Event>,
    poll_interval: Duration,
    repeat_delay: Duration,
    clicks: ClickTracker,
    last_mouse: Option<MouseEvent>,
    interrupt: Arc<AtomicBool>,
    pending_resize: Option<(u16, u16)>,
}

impl Default for ConsoleInputDriver {
    fn default() -> Self {
        Self::new(&WmConfig::default())
    }
}

impl ConsoleInputDriver {
    pub fn new(config: &WmConfig) -> Self {
        Self {
            normalizer: KeyboardNormalizer::new(),
            event_queue: VecDeque::new(),
            poll_interval: config.poll_interval,
            repeat_delay: config.mouse_repeat_delay,
            clicks: ClickTracker::new(config.double_click_interval),
            last_mouse: None,
            interrupt: Arc::new(AtomicBool::new(false)),
            pending_resize: None,
        }
    }

    /// Flag other threads (signal handlers, timers) can raise to make the
    /// current wait return `InputEvent::None`.
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupt)
    }

    fn translate(&mut self, evt: Event) -> Option<InputEvent> {
        match evt {
            Event::Key(key) => self.normalizer.normalize(key).map(InputEvent::Key),
            Event::Mouse(mouse) => self.translate_mouse(mouse).map(InputEvent::Mouse),
            Event::Resize(cols, lines) => {
                self.pending_resize = Some((cols, lines));
                Some(InputEvent::None)
            }
            _ => None,
        }
    }

    fn translate_mouse(&mut self, mouse: event::MouseEvent) -> Option<MouseEvent> {
        // Widgets work with 1-based pointer coordinates.
        let x = i32::from(mouse.column) + 1;
        let y = i32::from(mouse.row) + 1;
        let (kind, count) = match mouse.kind {
            MouseEventKind::Down(button) => {
                (MouseKind::Down(button), self.clicks.press(x, y, Instant::now()))
            }
            MouseEventKind::Up(button) => (MouseKind::Up(button), self.clicks.count.max(1)),
            MouseEventKind::Drag(button) => (MouseKind::Drag(button), 1),
            MouseEventKind::Moved => (MouseKind::Moved, 0),
            MouseEventKind::ScrollUp => (MouseKind::ScrollUp, 1),
            MouseEventKind::ScrollDown => (MouseKind::ScrollDown, 1),
            MouseEventKind::ScrollLeft | MouseEventKind::ScrollRight => return None,
        };
        let translated = MouseEvent {
            kind,
            x,
            y,
            count,
            modifiers: mouse.modifiers,
            result: MouseResult::default(),
        };
        self.last_mouse = Some(translated.clone());
        Some(translated)
    }

    fn next_raw(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        if let Some(evt) = self.event_queue.pop_front() {
            return Ok(Some(evt));
        }
        if event::poll(timeout)? {
            return event::read().map(Some);
        }
        Ok(None)
    }
}

impl InputDriver for ConsoleInputDriver {
    fn next_event(&mut self, redo: bool) -> io::Result<InputEvent> {
        let started = Instant::now();
        loop {
            if self.interrupt.load(Ordering::SeqCst) {
                return Ok(InputEvent::None);
            }
            let timeout = if redo {
                self.repeat_delay.min(self.poll_interval)
            } else {
                self.poll_interval
            };
            match self.next_raw(timeout)? {
                Some(evt) => {
                    if let Some(input) = self.translate(evt) {
                        return Ok(input);
                    }
                }
                None => {
                    if redo
                        && started.elapsed() >= self.repeat_delay
                        && let Some(mut last) = self.last_mouse.clone()
                    {
                        last.result = MouseResult::default();
                        return Ok(InputEvent::Mouse(last));
                    }
                }
            }
        }
    }

    fn is_pending(&mut self) -> io::Result<bool> {
        if !self.event_queue.is_empty() {
            return Ok(true);
        }
        event::poll(Duration::ZERO)
    }

    fn got_interrupt(&mut self) -> bool {
        self.interrupt.swap(false, Ordering::SeqCst)
    }

    fn take_resize(&mut self) -> Option<(u16, u16)> {
        self.pending_resize.take()
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        if enabled {
            execute!(io::stdout(), EnableMouseCapture)
        } else {
            execute!(io::stdout(), DisableMouseCapture)
        }
    }
}

pub struct ConsoleOutputDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    entered: bool,
}

impl ConsoleOutputDriver {
    pub fn new() -> io::Result<Self> {
        let stdout = io::stdout();
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            entered: false,
        })
    }
}

impl OutputDriver for ConsoleOutputDriver {
    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn enter(&mut self) -> io::Result<()> {
        if self.entered {
            return Ok(());
        }
        execute!(self.terminal.backend_mut(), EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        self.terminal.hide_cursor()?;
        self.entered = true;
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        terminal::disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        self.terminal.show_cursor()?;
        self.entered = false;
        Ok(())
    }

    fn present(
        &mut self,
        screen: &Buffer,
        cursor: Option<(u16, u16)>,
        full: bool,
    ) -> io::Result<()> {
        if full {
            self.terminal
                .clear()
                .map_err(|err| io::Error::other(err.to_string()))?;
        }
        self.terminal
            .draw(|frame| {
                if let Some((x, y)) = cursor {
                    frame.set_cursor_position(Position::new(x, y));
                }
                let area = frame.area();
                let mut ui = UiFrame::new(frame);
                ui.blit_from(screen, area);
            })
            .map(|_| ())
            .map_err(|err| io::Error::other(err.to_string()))
    }
}

impl Drop for ConsoleOutputDriver {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}

/// Console input and output bundled into one `Driver`.
pub struct ConsoleDriver {
    pub input: ConsoleInputDriver,
    pub output: ConsoleOutputDriver,
}

impl ConsoleDriver {
    pub fn new(config: &WmConfig) -> io::Result<Self> {
        Ok(Self {
            input: ConsoleInputDriver::new(config),
            output: ConsoleOutputDriver::new()?,
        })
    }
}

impl InputDriver for ConsoleDriver {
    fn next_event(&mut self, redo: bool) -> io::Result<InputEvent> {
        self.input.next_event(redo)
    }

    fn is_pending(&mut self) -> io::Result<bool> {
        self.input.is_pending()
    }

    fn got_interrupt(&mut self) -> bool {
        self.input.got_interrupt()
    }

    fn take_resize(&mut self) -> Option<(u16, u16)> {
        self.input.take_resize()
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        self.input.set_mouse_capture(enabled)
    }
}

impl OutputDriver for ConsoleDriver {
    fn size(&self) -> io::Result<(u16, u16)> {
        self.output.size()
    }

    fn enter(&mut self) -> io::Result<()> {
        self.output.enter()
    }

    fn exit(&mut self) -> io::Result<()> {
        self.output.exit()
    }

    fn present(
        &mut self,
        screen: &Buffer,
        cursor: Option<(u16, u16)>,
        full: bool,
    ) -> io::Result<()> {
        self.output.present(screen, cursor, full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton};

    fn raw_mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(event::MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn queued_key_is_normalized() {
        let mut d = ConsoleInputDriver::default();
        d.event_queue
            .push_back(Event::Key(KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT)));
        assert!(d.is_pending().unwrap());
        match d.next_event(false).unwrap() {
            InputEvent::Key(k) => assert_eq!(k.code, KeyCode::BackTab),
            other => panic!("expected key, got {other:?}"),
        }
    }

    #[test]
    fn mouse_coordinates_are_one_based() {
        let mut d = ConsoleInputDriver::default();
        d.event_queue
            .push_back(raw_mouse(MouseEventKind::Down(MouseButton::Left), 0, 4));
        match d.next_event(false).unwrap() {
            InputEvent::Mouse(m) => {
                assert_eq!((m.x, m.y), (1, 5));
                assert_eq!(m.kind, MouseKind::Down(MouseButton::Left));
                assert_eq!(m.count, 1);
            }
            other => panic!("expected mouse, got {other:?}"),
        }
    }

    #[test]
    fn resize_is_stored_and_reported_as_none() {
        let mut d = ConsoleInputDriver::default();
        d.event_queue.push_back(Event::Resize(100, 40));
        assert_eq!(d.next_event(false).unwrap(), InputEvent::None);
        assert_eq!(d.take_resize(), Some((100, 40)));
        assert_eq!(d.take_resize(), None);
    }

    #[test]
    fn interrupt_flag_is_cleared_on_read() {
        let mut d = ConsoleInputDriver::default();
        d.interrupt_handle().store(true, Ordering::SeqCst);
        assert_eq!(d.next_event(false).unwrap(), InputEvent::None);
        assert!(d.got_interrupt());
        assert!(!d.got_interrupt());
    }

    #[test]
    fn quick_presses_on_same_cell_count_up() {
        let mut clicks = ClickTracker::new(Duration::from_millis(250));
        let t0 = Instant::now();
        assert_eq!(clicks.press(3, 3, t0), 1);
        assert_eq!(clicks.press(3, 3, t0 + Duration::from_millis(100)), 2);
        assert_eq!(clicks.press(3, 3, t0 + Duration::from_millis(200)), 3);
        assert_eq!(clicks.press(4, 3, t0 + Duration::from_millis(250)), 1);
        assert_eq!(clicks.press(4, 3, t0 + Duration::from_secs(5)), 1);
    }
}
