pub mod console;
pub mod headless;
pub mod keyboard;

use std::io;

use crossterm::event::KeyEvent;
use ratatui::buffer::Buffer;

use crate::window::MouseEvent;

/// One unit of input, as handed to the top dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Nothing arrived: the wait was interrupted or a resize landed.
    None,
    Key(KeyEvent),
    Mouse(MouseEvent),
}

pub trait InputDriver {
    /// Block until the next event. With `redo` set, the driver may return
    /// the previous mouse event again if nothing new arrives in time
    /// (auto-repeat while a button is held).
    fn next_event(&mut self, redo: bool) -> io::Result<InputEvent>;

    /// Non-blocking check whether input is waiting.
    fn is_pending(&mut self) -> io::Result<bool>;

    /// Read and clear the interrupt flag.
    fn got_interrupt(&mut self) -> bool;

    /// Read and clear a pending terminal resize, as `(cols, lines)`.
    fn take_resize(&mut self) -> Option<(u16, u16)>;

    fn set_mouse_capture(&mut self, _enabled: bool) -> io::Result<()> {
        Ok(())
    }
}

pub trait OutputDriver {
    /// Current terminal size as `(cols, lines)`.
    fn size(&self) -> io::Result<(u16, u16)>;

    fn enter(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Push the composed screen to the terminal. `full` forces every cell
    /// to be rewritten instead of diffed.
    fn present(
        &mut self,
        screen: &Buffer,
        cursor: Option<(u16, u16)>,
        full: bool,
    ) -> io::Result<()>;
}

/// Everything the window manager needs from the terminal.
pub trait Driver: InputDriver + OutputDriver {}

impl<T: InputDriver + OutputDriver + ?Sized> Driver for T {}
