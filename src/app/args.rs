use clap::Parser;
use console_playground::capture::DEFAULT_TIME_FORMAT;
use console_playground::playground::{PlaygroundConfig, DEFAULT_MAX_ENTRIES};

#[derive(Parser, Debug, Clone)]
#[command(name = "console-playground")]
#[command(about = "Preview a component next to a live console panel")]
pub struct AppArgs {
    #[arg(long, default_value_t = DEFAULT_MAX_ENTRIES, help = "Entries kept by the console panel")]
    pub max_entries: usize,

    #[arg(
        long,
        env = "PLAYGROUND_TIME_FORMAT",
        default_value = DEFAULT_TIME_FORMAT,
        help = "chrono format for entry timestamps"
    )]
    pub time_format: String,

    #[arg(long, help = "tracing filter directive (defaults to RUST_LOG)")]
    pub log_filter: Option<String>,

    #[arg(
        long,
        default_value = "playground-console.log",
        help = "File receiving console output while the TUI owns the terminal"
    )]
    pub transcript: String,

    #[arg(long, help = "Replay --script without a TUI and print the console panel")]
    pub no_tui: bool,

    #[arg(long, default_value = "++---rs", help = "Keys replayed in --no-tui mode")]
    pub script: String,
}

impl AppArgs {
    pub fn from_cli() -> Self {
        <Self as Parser>::parse()
    }

    pub fn playground_config(&self) -> PlaygroundConfig {
        PlaygroundConfig {
            max_entries: self.max_entries,
        }
    }
}
