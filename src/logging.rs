//! Event log for user-facing messages.
//!
//! Every human-readable event of a run goes to the terminal and to a
//! persistent log file. One [`EventLog`] is created per invocation and handed
//! to the session and workflow by reference.

use crate::cli::OutputManager;
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Severity of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Progress and per-upload reports
    Info,
    /// Completed steps
    Success,
    /// Non-fatal problems
    Warning,
    /// Fatal problems
    Error,
}

impl Level {
    /// Label written to the log file
    pub fn label(self) -> &'static str {
        match self {
            Level::Info | Level::Success => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }
}

/// An event kept by a capturing log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Severity
    pub level: Level,
    /// Message text
    pub message: String,
}

/// Dual-sink event log
#[derive(Debug)]
pub struct EventLog {
    terminal: Option<OutputManager>,
    file: Option<File>,
    captured: Option<Mutex<Vec<LogRecord>>>,
}

impl EventLog {
    /// Log to the terminal and append to the file at `path`
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            terminal: Some(OutputManager::new()),
            file: Some(file),
            captured: None,
        })
    }

    /// Keep events in memory only
    pub fn capturing() -> Self {
        Self {
            terminal: None,
            file: None,
            captured: Some(Mutex::new(Vec::new())),
        }
    }

    /// Also append events to `path`
    pub fn with_file(mut self, path: &Path) -> std::io::Result<Self> {
        self.file = Some(OpenOptions::new().create(true).append(true).open(path)?);
        Ok(self)
    }

    /// Record an informational event
    pub fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    /// Record a completed step
    pub fn success(&self, message: &str) {
        self.emit(Level::Success, message);
    }

    /// Record a non-fatal problem
    pub fn warn(&self, message: &str) {
        self.emit(Level::Warning, message);
    }

    /// Record a fatal problem
    pub fn error(&self, message: &str) {
        self.emit(Level::Error, message);
    }

    /// Events seen so far by a capturing log
    pub fn records(&self) -> Vec<LogRecord> {
        self.captured
            .as_ref()
            .and_then(|captured| captured.lock().ok().map(|records| records.clone()))
            .unwrap_or_default()
    }

    fn emit(&self, level: Level, message: &str) {
        if let Some(output) = &self.terminal {
            let printed = match level {
                Level::Info => output.println(message),
                Level::Success => output.success(message),
                Level::Warning => output.warn(message),
                Level::Error => {
                    output.error(message);
                    Ok(())
                }
            };
            if let Err(e) = printed {
                log::warn!("Failed to write to terminal: {e}");
            }
        }

        if let Some(file) = &self.file {
            let mut file = file;
            let stamp = Local::now().format("%Y-%m-%d %H:%M:%S,%3f");
            if let Err(e) = writeln!(file, "{stamp} [{}] {message}", level.label()) {
                log::warn!("Failed to write event log: {e}");
            }
        }

        if let Some(captured) = &self.captured
            && let Ok(mut records) = captured.lock()
        {
            records.push(LogRecord {
                level,
                message: message.to_string(),
            });
        }
    }
}
