//! Runtime knobs for the window manager.

use std::path::PathBuf;
use std::time::Duration;

use tracing::Level;

use crate::constants::{DEFAULT_HISTORY_SIZE, DOUBLE_CLICK_MS, MOUSE_REPEAT_MS, POLL_INTERVAL_MS};

#[derive(Debug, Clone)]
pub struct WmConfig {
    /// Redraw only the top dialog instead of compositing the stack.
    pub fast_refresh: bool,
    /// Entries kept per history list; zero disables history entirely.
    pub history_size: usize,
    /// Close a non-fullscreen dialog on a left click outside of it.
    pub mouse_close_dialog: bool,
    pub mouse_enabled: bool,
    pub poll_interval: Duration,
    pub double_click_interval: Duration,
    pub mouse_repeat_delay: Duration,
    pub log_level: Level,
    pub log_file: Option<PathBuf>,
}

impl Default for WmConfig {
    fn default() -> Self {
        Self {
            fast_refresh: false,
            history_size: DEFAULT_HISTORY_SIZE,
            mouse_close_dialog: false,
            mouse_enabled: true,
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
            double_click_interval: Duration::from_millis(DOUBLE_CLICK_MS),
            mouse_repeat_delay: Duration::from_millis(MOUSE_REPEAT_MS),
            log_level: Level::INFO,
            log_file: None,
        }
    }
}

impl WmConfig {
    pub fn with_fast_refresh(mut self, enabled: bool) -> Self {
        self.fast_refresh = enabled;
        self
    }

    pub fn with_history_size(mut self, size: usize) -> Self {
        self.history_size = size;
        self
    }

    pub fn with_mouse_close_dialog(mut self, enabled: bool) -> Self {
        self.mouse_close_dialog = enabled;
        self
    }

    pub fn with_mouse_enabled(mut self, enabled: bool) -> Self {
        self.mouse_enabled = enabled;
        self
    }

    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }

    pub fn with_log_level(mut self, level: Level) -> Self {
        self.log_level = level;
        self
    }

    pub fn history_enabled(&self) -> bool {
        self.history_size > 0
    }
}
