use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::Level;

use crate::config::WmConfig;

/// Where log lines go. The terminal is owned by the dialog stack while it
/// runs, so without a log file output is discarded rather than painted over
/// the screen.
#[derive(Clone, Debug)]
enum Target {
    File(Arc<Mutex<File>>),
    Stderr,
    Sink,
}

pub struct DelegatingWriter {
    target: Target,
}

impl Write for DelegatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &self.target {
            Target::File(file) => match file.lock() {
                Ok(mut f) => f.write(buf),
                Err(_) => Ok(buf.len()),
            },
            Target::Stderr => io::stderr().write(buf),
            Target::Sink => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &self.target {
            Target::File(file) => match file.lock() {
                Ok(mut f) => f.flush(),
                Err(_) => Ok(()),
            },
            Target::Stderr => io::stderr().flush(),
            Target::Sink => Ok(()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SubscriberMakeWriter {
    target: Target,
}

impl SubscriberMakeWriter {
    pub fn file(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            target: Target::File(Arc::new(Mutex::new(file))),
        })
    }

    pub fn stderr() -> Self {
        Self {
            target: Target::Stderr,
        }
    }

    pub fn sink() -> Self {
        Self {
            target: Target::Sink,
        }
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        DelegatingWriter {
            target: self.target.clone(),
        }
    }
}

fn install(level: Level, writer: SubscriberMakeWriter) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(writer)
        .with_target(false)
        .with_thread_names(false)
        .with_ansi(false)
        .try_init();
}

/// Install the global subscriber described by `config`: append to
/// `log_file` when set, otherwise discard. Safe to call multiple times;
/// later calls are no-ops.
pub fn init_with(config: &WmConfig) -> io::Result<()> {
    let writer = match &config.log_file {
        Some(path) => SubscriberMakeWriter::file(path)?,
        None => SubscriberMakeWriter::sink(),
    };
    install(config.log_level, writer);
    Ok(())
}

/// Debug-level logging to stderr, for tests and non-interactive runs.
pub fn init_default() {
    install(Level::DEBUG, SubscriberMakeWriter::stderr());
}
