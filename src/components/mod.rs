//! Reference widgets built on the window manager's message contract.

pub mod button;
pub mod frame;
pub mod label;

pub use button::{Button, ButtonAction, ButtonKind, HotkeyText};
pub use frame::Frame;
pub use label::Label;
