//! A console-capture and log-streaming harness for an embedded playground.
//!
//! Code logs through a [`Console`] (or through `tracing`, captured by
//! [`logging::ConsoleLayer`]). Every call is forwarded to its original
//! destination and captured into a shared [`CaptureHub`], which hands entries
//! in batches to a single mounted subscriber on a deferred task. A
//! [`Playground`] is that subscriber: it shows a preview next to an
//! append-only, auto-scrolling console panel.
pub mod capture;
pub mod console;
pub mod error;
pub mod logging;
pub mod playground;

pub use capture::{CaptureHub, Subscription};
pub use console::{Console, LogArg, LogEntry, Severity};
pub use error::PlaygroundError;
pub use playground::{Playground, PlaygroundConfig, Preview};
