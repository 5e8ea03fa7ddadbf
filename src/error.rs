use std::io;

use thiserror::Error;

/// Failures at the terminal/driver boundary.
///
/// Message handling itself never fails: handlers answer handled or not
/// handled. Misusing the widget tree (stale handles, a dialog without the
/// children an operation requires) panics instead of returning an error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("terminal is {cols}x{lines}, need at least {min_cols}x{min_lines}")]
    TerminalTooSmall {
        cols: u16,
        lines: u16,
        min_cols: u16,
        min_lines: u16,
    },
    #[error("history store {path}: {source}")]
    History {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("history store {path} is malformed: {source}")]
    HistoryFormat {
        path: String,
        #[source]
        source: ini::ParseError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
