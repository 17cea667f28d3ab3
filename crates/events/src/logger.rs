//! File-backed and in-memory audit sinks

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use vigil_errors::Error;

use crate::{trace_record, AuditSink, LogRecord, Severity};

/// Audit log that duplicates every record to stdout and an append-only file.
#[derive(Debug)]
pub struct Logger {
    path: PathBuf,
    file: Mutex<File>,
    echo: bool,
}

impl Logger {
    /// Open (or create) the log file, creating its parent directory first.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file cannot
    /// be opened for appending.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io_with_path(&e, parent))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| Error::io_with_path(&e, &path))?;

        tracing::debug!(path = %path.display(), "Opened audit log");
        Ok(Self {
            path,
            file: Mutex::new(file),
            echo: true,
        })
    }

    /// Enable or disable the stdout copy of each record.
    #[must_use]
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file(&self) -> MutexGuard<'_, File> {
        // A panic mid-append leaves at worst a partial line behind.
        self.file.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl AuditSink for Logger {
    fn record(&self, message: &str, severity: Severity) {
        if self.echo {
            println!("{message}");
        }

        let record = LogRecord::new(message, severity);
        let written = {
            let mut file = self.file();
            writeln!(file, "{record}").and_then(|()| file.flush())
        };
        if let Err(e) = written {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to append audit record");
        }

        trace_record(message, severity);
    }
}

/// Sink that keeps records in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    #[must_use]
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Messages recorded at the given severity.
    #[must_use]
    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|r| r.severity == severity)
            .map(|r| r.message)
            .collect()
    }
}

impl AuditSink for MemorySink {
    fn record(&self, message: &str, severity: Severity) {
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(LogRecord::new(message, severity));
        trace_record(message, severity);
    }
}
