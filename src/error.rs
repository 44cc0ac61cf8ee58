//! Error types for the playground harness.
use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::TryInitError;

#[derive(Debug, Error)]
pub enum PlaygroundError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),
    #[error("failed to install the log collector: {0}")]
    Install(#[from] TryInitError),
    #[error("failed to open the log output: {0}")]
    Output(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PlaygroundError>;
