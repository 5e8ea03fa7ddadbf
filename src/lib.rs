//! Dialogs, widget groups and mouse routing for character-cell terminals.
//!
//! A [`window::WindowManager`] owns every widget. Widgets are composed
//! into groups, groups into dialogs, and running dialogs form a stack whose
//! top receives input. Everything is driven by synchronous messages that a
//! widget answers `Handled` or `NotHandled`.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod drivers;
pub mod error;
pub mod events;
pub mod geometry;
pub mod history;
pub mod keybindings;
pub mod message;
pub mod state;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
pub mod window;

pub use commands::{Command, ResultCode};
pub use config::WmConfig;
pub use error::{Error, Result};
pub use message::{CbResult, Message};
pub use window::{WidgetHandle, WindowManager};
