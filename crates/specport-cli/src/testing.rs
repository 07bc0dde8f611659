// ABOUTME: Test doubles for specport commands: a recording logger and a scripted file writer.
// ABOUTME: Used in tests to inspect output and simulate write success or failure without touching disk.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::logger::Logger;
use crate::write_file::{FileWriter, WriteError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Entries captured by a [`RecordingLogger`], in the order they were logged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogEntries {
    pub log: Vec<String>,
    pub fatal: Vec<String>,
}

/// A logger that keeps every entry in memory instead of printing.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    entries: Mutex<LogEntries>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of everything logged so far.
    pub fn entries(&self) -> LogEntries {
        lock(&self.entries).clone()
    }

    /// Drop all captured entries.
    pub fn reset(&self) {
        *lock(&self.entries) = LogEntries::default();
    }
}

impl Logger for RecordingLogger {
    fn log(&self, message: &str) {
        lock(&self.entries).log.push(message.to_owned());
    }

    fn fatal(&self, message: &str) {
        lock(&self.entries).fatal.push(message.to_owned());
    }
}

/// Arguments of one [`FileWriter::write`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteCall {
    pub path: PathBuf,
    pub contents: String,
    pub working_dir: PathBuf,
}

#[derive(Debug, Clone)]
enum Outcome {
    Resolve(PathBuf),
    Reject { kind: io::ErrorKind, message: String },
}

/// A file writer that records its calls and returns a scripted outcome.
#[derive(Debug)]
pub struct MockFileWriter {
    outcome: Outcome,
    calls: Mutex<Vec<WriteCall>>,
}

impl MockFileWriter {
    /// Every write succeeds and reports `final_path` as the written location.
    pub fn resolving(final_path: impl Into<PathBuf>) -> Self {
        Self {
            outcome: Outcome::Resolve(final_path.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every write fails with an I/O error carrying `message`.
    pub fn rejecting(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Reject {
                kind: io::ErrorKind::Other,
                message: message.into(),
            },
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<WriteCall> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl FileWriter for MockFileWriter {
    async fn write(
        &self,
        path: &Path,
        contents: &str,
        working_dir: &Path,
    ) -> Result<PathBuf, WriteError> {
        lock(&self.calls).push(WriteCall {
            path: path.to_path_buf(),
            contents: contents.to_owned(),
            working_dir: working_dir.to_path_buf(),
        });

        match &self.outcome {
            Outcome::Resolve(final_path) => Ok(final_path.clone()),
            Outcome::Reject { kind, message } => Err(WriteError::Write {
                path: path.to_path_buf(),
                source: io::Error::new(*kind, message.clone()),
            }),
        }
    }
}
