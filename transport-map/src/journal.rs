//! Timestamped record of what happened during a session.

use std::fmt;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};

/// One journal line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    pub at: DateTime<Utc>,
    pub message: String,
}

impl fmt::Display for JournalEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.at.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.message
        )
    }
}

/// In-memory journal, oldest entry first.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message stamped with the current time.
    pub fn record(&mut self, message: impl Into<String>) {
        self.record_at(Utc::now(), message);
    }

    pub fn record_at(&mut self, at: DateTime<Utc>, message: impl Into<String>) {
        self.entries.push(JournalEntry {
            at,
            message: message.into(),
        });
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends every entry to a file, one per line. The file is created if
    /// missing.
    pub fn append_to(&self, path: &Path) -> std::io::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        for entry in &self.entries {
            writeln!(file, "{entry}")?;
        }
        Ok(())
    }

    /// Reads a journal file back as lines. A missing file reads as empty.
    pub fn read_lines(path: &Path) -> std::io::Result<Vec<String>> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(contents.lines().map(str::to_string).collect()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Empties a journal file.
    pub fn clear_file(path: &Path) -> std::io::Result<()> {
        std::fs::write(path, "")
    }
}
