//! This module handles the initial setup of the application.
use super::args::AppArgs;
use anyhow::{Context, Result};
use console_playground::capture::CaptureHub;
use console_playground::console::{Console, FileForward, Forward, StdStreams};
use console_playground::logging::{self, Installation, LoggingOptions, TracingOutput};
use console_playground::playground::PlaygroundConfig;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, info};

/// Contains all the necessary components for the application to run.
pub struct PreparedApp {
    /// The command-line arguments.
    pub args: AppArgs,
    /// The console handed to the previewed component.
    pub console: Console,
    /// Settings for the mounted playground.
    pub config: PlaygroundConfig,
}

/// Prepares the application for running.
///
/// This function performs the following steps:
/// 1. Creates the capture hub, pinned to the current runtime.
/// 2. Installs the global `tracing` subscriber feeding the hub.
/// 3. Picks where console output is forwarded: the standard streams, or a
///    transcript file while the TUI owns the terminal.
///
/// # Arguments
///
/// * `args` - The command-line arguments.
///
/// # Errors
///
/// This function will return an error if the log filter is invalid, another
/// global subscriber is already installed, or the transcript cannot be opened.
pub fn prepare(args: AppArgs) -> Result<PreparedApp> {
    let config = args.playground_config();

    let hub = CaptureHub::new()
        .with_time_format(args.time_format.clone())
        .with_runtime(Handle::current())
        .shared();

    configure_logging(hub.clone(), &args)?;

    let forward: Arc<dyn Forward> = if args.no_tui {
        Arc::new(StdStreams)
    } else {
        let transcript = FileForward::open(&args.transcript)
            .with_context(|| format!("Failed to open transcript '{}'", args.transcript))?;
        Arc::new(transcript)
    };

    info!(
        "Starting console playground ({} mode)",
        if args.no_tui { "headless" } else { "terminal" }
    );

    Ok(PreparedApp {
        console: Console::with_forward(hub, forward),
        args,
        config,
    })
}

/// Configures logging for the application.
///
/// In terminal mode events go to the transcript instead of stderr; writing to
/// stderr would tear the alternate screen.
fn configure_logging(hub: Arc<CaptureHub>, args: &AppArgs) -> Result<()> {
    let output = if args.no_tui {
        TracingOutput::Stderr
    } else {
        TracingOutput::File(args.transcript.clone().into())
    };
    let options = LoggingOptions {
        filter: args.log_filter.clone(),
        output,
    };

    if logging::install(hub, &options)? == Installation::AlreadyInstalled {
        debug!("Log collector already installed");
    }
    Ok(())
}
