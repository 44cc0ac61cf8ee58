//! This module defines the structure for a single captured console entry.
use chrono::{DateTime, Local};
use std::fmt;
use tracing::Level;

/// The console channel an entry was produced on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Log,
    Info,
    Warn,
    Error,
}

impl Severity {
    /// All channels, in increasing order of urgency.
    pub const ALL: [Severity; 4] = [Severity::Log, Severity::Info, Severity::Warn, Severity::Error];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Log => "log",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::ERROR => Severity::Error,
            Level::WARN => Severity::Warn,
            Level::INFO => Severity::Info,
            Level::DEBUG | Level::TRACE => Severity::Log,
        }
    }
}

/// Represents a single captured call with its channel, rendered message and
/// capture time.
///
/// Entries are immutable once created; the fields are only reachable through
/// accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    severity: Severity,
    message: String,
    timestamp: String,
    captured_at: DateTime<Local>,
    origin: Option<String>,
}

impl LogEntry {
    /// Creates an entry stamped with the current local time.
    ///
    /// # Arguments
    ///
    /// * `severity` - The channel the entry was produced on.
    /// * `message` - The already rendered message text.
    /// * `time_format` - A `chrono` format string for the time-of-day stamp.
    pub fn now(severity: Severity, message: String, time_format: &str) -> Self {
        let captured_at = Local::now();
        Self {
            severity,
            message,
            timestamp: captured_at.format(time_format).to_string(),
            captured_at,
            origin: None,
        }
    }

    /// Attaches the module the entry originated from.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The formatted time of day at which the entry was captured.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn captured_at(&self) -> DateTime<Local> {
        self.captured_at
    }

    /// The module path component for entries captured from `tracing`.
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }
}
