//! The message protocol every widget kind implements.
//!
//! Messages are delivered synchronously: sending one is a direct call into
//! the receiving widget's callback, which answers [`CbResult::Handled`] or
//! [`CbResult::NotHandled`]. Unhandled messages travel the fallback chain
//! widget → group → dialog command table.

use crossterm::event::KeyEvent;

use crate::commands::Command;
use crate::geometry::Rect;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Sent once before the widget is first shown.
    Init,
    /// Paint yourself into the screen buffer.
    Draw,
    /// A key offered to the widget.
    Key(KeyEvent),
    /// A key offered as a possible hotkey.
    Hotkey(KeyEvent),
    /// Sent to a group after one of its children consumed a hotkey.
    HotkeyHandled,
    /// A key that neither the hotkey pass nor `current` consumed.
    UnhandledKey(KeyEvent),
    /// Sent to a dialog after every key, handled or not.
    PostKey(KeyEvent),
    /// A logical command (keymap, button bar or menu).
    Action(Command),
    /// Application notification with an integer payload.
    Notify(i64),
    /// Position the terminal cursor.
    Cursor,
    Focus,
    Unfocus,
    /// Sent to a group after focus moved between its children.
    ChangedFocus,
    Enable,
    Disable,
    /// Background work slot while no input is pending.
    Idle,
    /// New absolute rectangle for the widget.
    Resize(Rect),
    /// Last chance to veto (or clean up after) a closing dialog.
    Validate,
    /// The dialog loop finished while closed.
    End,
    /// Tear down; the widget is freed right after.
    Destroy,
    /// Entries read from the history store for a subscribed widget.
    HistoryLoad(Vec<String>),
    /// Persist your history now.
    HistorySave,
}

impl Message {
    /// Short name used in trace output.
    pub fn name(&self) -> &'static str {
        match self {
            Message::Init => "init",
            Message::Draw => "draw",
            Message::Key(_) => "key",
            Message::Hotkey(_) => "hotkey",
            Message::HotkeyHandled => "hotkey_handled",
            Message::UnhandledKey(_) => "unhandled_key",
            Message::PostKey(_) => "post_key",
            Message::Action(_) => "action",
            Message::Notify(_) => "notify",
            Message::Cursor => "cursor",
            Message::Focus => "focus",
            Message::Unfocus => "unfocus",
            Message::ChangedFocus => "changed_focus",
            Message::Enable => "enable",
            Message::Disable => "disable",
            Message::Idle => "idle",
            Message::Resize(_) => "resize",
            Message::Validate => "validate",
            Message::End => "end",
            Message::Destroy => "destroy",
            Message::HistoryLoad(_) => "history_load",
            Message::HistorySave => "history_save",
        }
    }
}

/// Outcome of delivering a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CbResult {
    Handled,
    #[default]
    NotHandled,
}

impl CbResult {
    pub fn is_handled(self) -> bool {
        self == CbResult::Handled
    }

    /// Run `f` only if this result is `NotHandled`.
    pub fn or_else(self, f: impl FnOnce() -> CbResult) -> CbResult {
        match self {
            CbResult::Handled => CbResult::Handled,
            CbResult::NotHandled => f(),
        }
    }
}

impl From<bool> for CbResult {
    fn from(handled: bool) -> Self {
        if handled {
            CbResult::Handled
        } else {
            CbResult::NotHandled
        }
    }
}
