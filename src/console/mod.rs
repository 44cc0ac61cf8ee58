//! This module contains the console: the handle code uses to emit diagnostics
//! on the four console channels.
//!
//! Every call is forwarded to the original destination first and then captured
//! into the shared `CaptureHub`.
pub mod entry;
pub mod format;
pub mod forward;

pub use entry::{LogEntry, Severity};
pub use format::{render_args, LogArg};
pub use forward::{FileForward, Forward, Recorder, Silent, StdStreams};

use crate::capture::CaptureHub;
use std::sync::Arc;

/// A tee over the original console output and the capture hub.
#[derive(Clone)]
pub struct Console {
    hub: Arc<CaptureHub>,
    forward: Arc<dyn Forward>,
}

impl Console {
    /// Creates a console forwarding to the standard streams.
    pub fn new(hub: Arc<CaptureHub>) -> Self {
        Self::with_forward(hub, Arc::new(StdStreams))
    }

    /// Creates a console forwarding to `forward`.
    pub fn with_forward(hub: Arc<CaptureHub>, forward: Arc<dyn Forward>) -> Self {
        Self { hub, forward }
    }

    pub fn log(&self, args: &[LogArg]) {
        self.emit(Severity::Log, args);
    }

    pub fn info(&self, args: &[LogArg]) {
        self.emit(Severity::Info, args);
    }

    pub fn warn(&self, args: &[LogArg]) {
        self.emit(Severity::Warn, args);
    }

    pub fn error(&self, args: &[LogArg]) {
        self.emit(Severity::Error, args);
    }

    /// Forwards and captures one call on the given channel.
    ///
    /// Forwarding does not depend on the state of the hub or its subscriber.
    pub fn emit(&self, severity: Severity, args: &[LogArg]) {
        let message = render_args(args);
        self.forward.forward(severity, &message);
        self.hub.capture(severity, message);
    }

    pub fn hub(&self) -> &Arc<CaptureHub> {
        &self.hub
    }
}

/// Emits on the `log` channel: `console_log!(console, "count:", 3)`.
#[macro_export]
macro_rules! console_log {
    ($console:expr $(, $arg:expr)* $(,)?) => {
        $console.log(&[$($crate::console::LogArg::from($arg)),*])
    };
}

/// Emits on the `info` channel.
#[macro_export]
macro_rules! console_info {
    ($console:expr $(, $arg:expr)* $(,)?) => {
        $console.info(&[$($crate::console::LogArg::from($arg)),*])
    };
}

/// Emits on the `warn` channel.
#[macro_export]
macro_rules! console_warn {
    ($console:expr $(, $arg:expr)* $(,)?) => {
        $console.warn(&[$($crate::console::LogArg::from($arg)),*])
    };
}

/// Emits on the `error` channel.
#[macro_export]
macro_rules! console_error {
    ($console:expr $(, $arg:expr)* $(,)?) => {
        $console.error(&[$($crate::console::LogArg::from($arg)),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn recorded_console() -> (Console, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::new());
        let console = Console::with_forward(CaptureHub::new().shared(), recorder.clone());
        (console, recorder)
    }

    #[test]
    fn every_channel_forwards_and_captures() {
        let (console, recorder) = recorded_console();

        crate::console_log!(console, "count:", 1);
        crate::console_info!(console, "ready");
        crate::console_warn!(console, "careful", true);
        crate::console_error!(console, "failed", ());

        assert_eq!(
            recorder.lines(),
            vec![
                (Severity::Log, "count: 1".to_string()),
                (Severity::Info, "ready".to_string()),
                (Severity::Warn, "careful true".to_string()),
                (Severity::Error, "failed null".to_string()),
            ]
        );
        assert_eq!(console.hub().pending_len(), 4);
    }

    #[test]
    fn forwarding_does_not_depend_on_a_subscriber() {
        let (console, recorder) = recorded_console();
        crate::console_log!(console, "before");

        let subscription = console.hub().attach(|_| {});
        crate::console_log!(console, "during");
        drop(subscription);
        crate::console_log!(console, "after");

        let forwarded: Vec<String> = recorder.lines().into_iter().map(|(_, line)| line).collect();
        assert_eq!(forwarded, vec!["before", "during", "after"]);
    }

    #[test]
    fn structured_arguments_are_captured_pretty() {
        let (console, _) = recorded_console();
        let received = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = received.clone();
        let _subscription = console
            .hub()
            .attach(move |entries| sink.lock().unwrap().extend(entries));

        console.log(&[LogArg::from("user"), LogArg::from(json!({ "id": 7 }))]);
        console.hub().flush_now();

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].message(), "user {\n  \"id\": 7\n}");
        assert_eq!(received[0].severity(), Severity::Log);
    }

    #[test]
    fn zero_arguments_yield_an_empty_message() {
        let (console, recorder) = recorded_console();
        crate::console_info!(console);
        assert_eq!(recorder.lines(), vec![(Severity::Info, String::new())]);
    }
}
