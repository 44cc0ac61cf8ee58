//! This module contains the logging infrastructure: a `tracing` layer that
//! captures events into the capture hub, and the process-wide subscriber setup.
pub mod collector;

pub use collector::{
    install, output_layer, ConsoleLayer, Installation, LoggingOptions, OutputLayer, TracingOutput,
    DEFAULT_FILTER,
};
