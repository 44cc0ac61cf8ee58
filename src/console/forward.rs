//! Destinations that receive the original console output.
use super::Severity;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

/// The original destination of console output.
///
/// Implementations must not fail outward: write errors are swallowed.
pub trait Forward: Send + Sync {
    fn forward(&self, severity: Severity, line: &str);
}

/// Writes `log`/`info` to stdout and `warn`/`error` to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdStreams;

impl Forward for StdStreams {
    fn forward(&self, severity: Severity, line: &str) {
        let _ = match severity {
            Severity::Log | Severity::Info => writeln!(std::io::stdout().lock(), "{}", line),
            Severity::Warn | Severity::Error => writeln!(std::io::stderr().lock(), "{}", line),
        };
    }
}

/// Discards output.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Forward for Silent {
    fn forward(&self, _severity: Severity, _line: &str) {}
}

/// Appends `severity line` rows to a transcript file.
///
/// Used while a TUI owns the terminal, so output still has a destination.
#[derive(Debug)]
pub struct FileForward {
    file: Mutex<File>,
}

impl FileForward {
    /// Opens `path` for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl Forward for FileForward {
    fn forward(&self, severity: Severity, line: &str) {
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(file, "{:<5} {}", severity.as_str(), line);
    }
}

/// Keeps every forwarded line in memory.
#[derive(Debug, Default)]
pub struct Recorder {
    lines: Mutex<Vec<(Severity, String)>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(Severity, String)> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Forward for Recorder {
    fn forward(&self, severity: Severity, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((severity, line.to_string()));
    }
}
