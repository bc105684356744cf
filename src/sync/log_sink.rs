//! Human-readable status log.
//!
//! Separate from `tracing` output: this is the activity log an operator
//! reads to see what the last sync passes did.

use chrono::{SecondsFormat, Utc};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Destination for status messages.
///
/// Appending never fails from the caller's point of view.
pub trait LogSink {
    fn append(&self, text: &str);
}

/// Appends timestamped lines to a file.
#[derive(Debug, Clone)]
pub struct FileLogSink {
    path: PathBuf,
}

impl FileLogSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&self, text: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(
            file,
            "{} {}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            text
        )
    }
}

impl LogSink for FileLogSink {
    fn append(&self, text: &str) {
        if let Err(e) = self.write_line(text) {
            tracing::warn!(
                "Failed to write status log '{}': {}",
                self.path.display(),
                e
            );
        }
    }
}
