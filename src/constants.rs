//! Shared crate-wide constants.

/// First result code available to applications; everything below is
/// reserved for the built-in outcomes (exit, cancel, enter, help).
pub const B_USER: i32 = 100;

/// Default number of entries kept per input history list.
pub const DEFAULT_HISTORY_SIZE: usize = 60;

/// Window in which a second press at the same cell counts as a double
/// (then triple) click.
pub const DOUBLE_CLICK_MS: u64 = 250;

/// Delay before a held mouse button starts auto-repeating.
pub const MOUSE_REPEAT_MS: u64 = 100;

/// Input poll granularity of the console driver. Interrupts and resize
/// notifications are observed at most this late.
pub const POLL_INTERVAL_MS: u64 = 50;

/// Smallest terminal the console driver accepts.
pub const MIN_SCREEN_COLS: u16 = 20;
pub const MIN_SCREEN_LINES: u16 = 5;
