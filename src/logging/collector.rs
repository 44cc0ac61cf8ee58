//! This module provides a `tracing` layer that captures events emitted
//! anywhere in the process into the capture hub, and its one-time installation.
use crate::capture::CaptureHub;
use crate::console::{LogEntry, Severity};
use crate::error::Result;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{Event, Subscriber};
use tracing_subscriber::{
    fmt::{
        format::{DefaultFields, Format},
        writer::BoxMakeWriter,
    },
    layer::{Context, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Filter used when neither `RUST_LOG` nor an explicit filter is given.
pub const DEFAULT_FILTER: &str = "info,console_playground=debug";

/// Targets whose events are never captured: the pipeline's own diagnostics
/// would otherwise feed back into it.
const PIPELINE_TARGETS: [&str; 2] = [
    concat!(env!("CARGO_CRATE_NAME"), "::capture"),
    concat!(env!("CARGO_CRATE_NAME"), "::logging"),
];

static INSTALLED: Mutex<bool> = Mutex::new(false);

/// A `tracing` layer that turns events into captured console entries.
pub struct ConsoleLayer {
    hub: Arc<CaptureHub>,
}

impl ConsoleLayer {
    /// Creates a new `ConsoleLayer`.
    ///
    /// # Arguments
    ///
    /// * `hub` - The `CaptureHub` events are appended to.
    pub fn new(hub: Arc<CaptureHub>) -> Self {
        Self { hub }
    }
}

impl<S> Layer<S> for ConsoleLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    /// Extracts the message and origin of an event and appends it to the hub.
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();
        if PIPELINE_TARGETS
            .iter()
            .any(|pipeline| target.starts_with(pipeline))
        {
            return;
        }

        let mut message = String::new();
        event.record(&mut MessageVisitor(&mut message));

        let origin = metadata
            .module_path()
            .and_then(|path| path.split("::").last())
            .unwrap_or(target)
            .to_string();

        let entry = LogEntry::now(
            Severity::from(*metadata.level()),
            message,
            self.hub.time_format(),
        )
        .with_origin(origin);

        self.hub.append(entry);
    }
}

/// Where `tracing` events are written besides the console panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TracingOutput {
    #[default]
    Stderr,
    /// Appends to a file. Used while a TUI owns the terminal.
    File(PathBuf),
}

/// Options for the process-wide `tracing` subscriber.
#[derive(Debug, Clone, Default)]
pub struct LoggingOptions {
    /// An `EnvFilter` directive. Falls back to `RUST_LOG`, then `DEFAULT_FILTER`.
    pub filter: Option<String>,
    /// The original destination of events. Capturing never replaces it.
    pub output: TracingOutput,
}

/// Outcome of `install`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Installation {
    Installed,
    AlreadyInstalled,
}

/// The `fmt` layer that writes events to their original destination.
pub type OutputLayer<S> = tracing_subscriber::fmt::Layer<S, DefaultFields, Format, BoxMakeWriter>;

/// Builds the `fmt` layer writing events to `output`.
///
/// # Errors
///
/// Returns an error if the output file cannot be opened.
pub fn output_layer<S>(output: &TracingOutput) -> Result<OutputLayer<S>> {
    let (writer, ansi) = match output {
        TracingOutput::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
        TracingOutput::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (BoxMakeWriter::new(Arc::new(file)), false)
        }
    };

    Ok(tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi))
}

/// Installs the global subscriber: an `EnvFilter`, a `fmt` layer writing to
/// the configured output, and a `ConsoleLayer` feeding `hub`.
///
/// Installing more than once is a no-op; later calls neither add layers nor
/// replace the hub.
///
/// # Errors
///
/// Returns an error if the filter does not parse, the output file cannot be
/// opened, or another global subscriber was installed outside of this function.
pub fn install(hub: Arc<CaptureHub>, options: &LoggingOptions) -> Result<Installation> {
    let mut installed = INSTALLED.lock().unwrap_or_else(PoisonError::into_inner);
    if *installed {
        return Ok(Installation::AlreadyInstalled);
    }

    let filter = match &options.filter {
        Some(directive) => EnvFilter::try_new(directive)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(output_layer(&options.output)?)
        .with(ConsoleLayer::new(hub))
        .try_init()?;

    *installed = true;
    Ok(Installation::Installed)
}

/// A `tracing::field::Visit` implementation for extracting the message from an event.
struct MessageVisitor<'a>(&'a mut String);

impl MessageVisitor<'_> {
    /// The message always leads, whatever order fields are recorded in.
    fn set_message(&mut self, message: &str) {
        if self.0.is_empty() {
            self.0.push_str(message);
        } else {
            self.0.insert_str(0, &format!("{} ", message));
        }
    }

    fn push_field(&mut self, name: &str, value: impl std::fmt::Display) {
        if !self.0.is_empty() {
            self.0.push(' ');
        }
        self.0.push_str(&format!("{}={}", name, value));
    }
}

impl tracing::field::Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.set_message(&format!("{:?}", value));
        } else {
            self.push_field(field.name(), format!("{:?}", value));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.set_message(value);
        } else {
            self.push_field(field.name(), value);
        }
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.push_field(field.name(), value);
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.push_field(field.name(), value);
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.push_field(field.name(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured(hub: &Arc<CaptureHub>) -> Vec<LogEntry> {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        let subscription = hub.attach(move |entries| sink.lock().unwrap().extend(entries));
        drop(subscription);
        let entries = received.lock().unwrap().clone();
        entries
    }

    #[test]
    fn events_are_captured_with_their_console_channel() {
        let hub = CaptureHub::new().shared();
        let subscriber = tracing_subscriber::registry().with(ConsoleLayer::new(hub.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(target: "demo::widget", "disk almost full");
            tracing::debug!(target: "demo::widget", retries = 3, "reconnecting");
        });

        let entries = captured(&hub);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].severity(), Severity::Warn);
        assert_eq!(entries[0].message(), "disk almost full");
        assert_eq!(entries[0].origin(), Some("tests"));
        assert_eq!(entries[1].severity(), Severity::Log);
        assert_eq!(entries[1].message(), "reconnecting retries=3");
    }

    #[test]
    fn pipeline_events_are_not_captured() {
        let hub = CaptureHub::new().shared();
        let subscriber = tracing_subscriber::registry().with(ConsoleLayer::new(hub.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "console_playground::capture::hub", "internal");
            tracing::info!(target: "console_playground::logging::collector", "internal");
            tracing::info!(target: "app", "visible");
        });

        let messages: Vec<String> = captured(&hub)
            .iter()
            .map(|entry| entry.message().to_string())
            .collect();
        assert_eq!(messages, vec!["visible"]);
    }

    #[test]
    fn installing_twice_is_a_no_op() {
        let hub = CaptureHub::new().shared();
        let options = LoggingOptions {
            filter: Some("warn".to_string()),
            output: TracingOutput::File(std::env::temp_dir().join(format!(
                "console-install-{}.log",
                std::process::id()
            ))),
        };

        assert_eq!(install(hub.clone(), &options).unwrap(), Installation::Installed);
        assert_eq!(install(hub, &options).unwrap(), Installation::AlreadyInstalled);
    }

    #[test]
    fn file_output_keeps_events_that_are_also_captured() {
        let path = std::env::temp_dir().join(format!("console-tracing-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let hub = CaptureHub::new().shared();
        let subscriber = tracing_subscriber::registry()
            .with(output_layer(&TracingOutput::File(path.clone())).unwrap())
            .with(ConsoleLayer::new(hub.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "demo", "terminal mode started");
        });

        let messages: Vec<String> = captured(&hub)
            .iter()
            .map(|entry| entry.message().to_string())
            .collect();
        assert_eq!(messages, vec!["terminal mode started"]);

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("INFO"));
        assert!(written.contains("terminal mode started"));
        let _ = std::fs::remove_file(&path);
    }
}
