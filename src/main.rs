//! The main entry point for the console playground.
mod app;

use anyhow::Result;

/// The main function of the application.
///
/// Mounts the demo preview next to the console panel, either in the terminal
/// or headless, based on command-line arguments.
///
/// # Errors
///
/// Returns an error if setup fails or the terminal cannot be driven.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    app::launch().await
}
