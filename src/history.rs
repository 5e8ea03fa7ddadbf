//! Input history persistence.
//!
//! Widgets that keep a history (input lines, search boxes) subscribe to
//! their dialog's event group under a list name. The dialog reads every
//! subscribed list when it first starts and asks the widgets to save when
//! it is destroyed. The store itself only maps names to string lists.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ini::{EscapePolicy, Ini, ParseOption, WriteOption};

use crate::error::{Error, Result};

pub trait HistoryStore {
    fn load(&mut self, name: &str) -> Result<Vec<String>>;
    fn save(&mut self, name: &str, entries: &[String]) -> Result<()>;
}

/// Keep only the newest `max` entries.
pub fn trim_to(entries: &[String], max: usize) -> &[String] {
    let skip = entries.len().saturating_sub(max);
    &entries[skip..]
}

#[derive(Debug, Default, Clone)]
pub struct MemoryHistory {
    lists: BTreeMap<String, Vec<String>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.lists.get(name).map(Vec::as_slice)
    }
}

impl HistoryStore for MemoryHistory {
    fn load(&mut self, name: &str) -> Result<Vec<String>> {
        Ok(self.lists.get(name).cloned().unwrap_or_default())
    }

    fn save(&mut self, name: &str, entries: &[String]) -> Result<()> {
        self.lists.insert(name.to_string(), entries.to_vec());
        Ok(())
    }
}

/// History kept in an ini file, one section per list:
///
/// ```text
/// [name]
/// 0="first entry"
/// 1="second entry"
/// ```
///
/// Values are escaped on write and kept in quotes, so control characters,
/// the ini delimiters and surrounding whitespace survive a reload.
#[derive(Debug, Clone)]
pub struct FileHistory {
    path: PathBuf,
}

impl FileHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> Error {
        Error::History {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn read_ini(&self) -> Result<Ini> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Ini::new()),
            Err(err) => return Err(self.io_error(err)),
        };
        let opt = ParseOption {
            enabled_quote: false,
            enabled_escape: true,
            ..ParseOption::default()
        };
        Ini::load_from_str_opt(&text, opt).map_err(|source| Error::HistoryFormat {
            path: self.path.display().to_string(),
            source,
        })
    }

    fn write_ini(&self, ini: &Ini) -> Result<()> {
        let opt = WriteOption {
            escape_policy: EscapePolicy::Reserved,
            ..WriteOption::default()
        };
        ini.write_to_file_opt(&self.path, opt).map_err(|err| self.io_error(err))
    }
}

impl HistoryStore for FileHistory {
    fn load(&mut self, name: &str) -> Result<Vec<String>> {
        let ini = self.read_ini()?;
        let Some(section) = ini.section(Some(name)) else {
            return Ok(Vec::new());
        };
        let mut entries: Vec<(usize, String)> = section
            .iter()
            .filter_map(|(key, value)| {
                let idx = key.trim().parse::<usize>().ok()?;
                Some((idx, unquote(value).to_string()))
            })
            .collect();
        entries.sort_by_key(|(idx, _)| *idx);
        Ok(entries.into_iter().map(|(_, value)| value).collect())
    }

    fn save(&mut self, name: &str, entries: &[String]) -> Result<()> {
        let mut ini = self.read_ini()?;
        ini.delete(Some(name));
        let mut section = ini.with_section(Some(name));
        for (idx, entry) in entries.iter().enumerate() {
            section.set(idx.to_string(), format!("\"{entry}\""));
        }
        self.write_ini(&ini)
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
