use std::fmt;

use crate::constants::B_USER;

/// Logical commands produced by keymap lookup and consumed by
/// `WindowManager::execute_cmd`.
///
/// Application command tables use [`Command::User`], which never collides
/// with the reserved variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Ok,
    Cancel,
    Up,
    Down,
    Left,
    Right,
    Help,
    Suspend,
    Refresh,
    // Dialog switching
    ScreenList,
    ScreenNext,
    ScreenPrev,
    User(u32),
}

impl Command {
    pub fn is_reserved(self) -> bool {
        !matches!(self, Command::User(_))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Command::Ok => "Ok",
            Command::Cancel => "Cancel",
            Command::Up => "Focus previous (Up)",
            Command::Down => "Focus next (Down)",
            Command::Left => "Focus previous (Left)",
            Command::Right => "Focus next (Right)",
            Command::Help => "Help",
            Command::Suspend => "Suspend",
            Command::Refresh => "Refresh screen",
            Command::ScreenList => "Screen list",
            Command::ScreenNext => "Next screen",
            Command::ScreenPrev => "Previous screen",
            Command::User(code) => return write!(f, "User command {code}"),
        };
        write!(f, "{}", s)
    }
}

/// Outcome of running a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResultCode {
    /// The dialog ended without an explicit choice.
    #[default]
    Exit,
    Cancel,
    /// Accepted (Enter / Ok).
    Enter,
    Help,
    /// Application-defined outcome; numbered from [`B_USER`] upward.
    User(u32),
}

impl ResultCode {
    pub fn code(self) -> i32 {
        match self {
            ResultCode::Exit => 0,
            ResultCode::Cancel => 1,
            ResultCode::Enter => 2,
            ResultCode::Help => 3,
            // Saturate so a huge user value never wraps into a reserved code.
            ResultCode::User(n) => i32::try_from(n).map_or(i32::MAX, |n| B_USER.saturating_add(n)),
        }
    }

    pub fn from_code(code: i32) -> Self {
        match code {
            0 => ResultCode::Exit,
            1 => ResultCode::Cancel,
            2 => ResultCode::Enter,
            3 => ResultCode::Help,
            n if n >= B_USER => ResultCode::User((n - B_USER) as u32),
            _ => ResultCode::Exit,
        }
    }
}
