pub mod args;
mod headless;
mod setup;

pub use args::AppArgs;

use anyhow::Result;
use console_playground::playground::{run_tui, Counter, Playground};

pub async fn launch() -> Result<()> {
    launch_with_args(AppArgs::from_cli()).await
}

pub async fn launch_with_args(args: AppArgs) -> Result<()> {
    let setup::PreparedApp {
        args,
        console,
        config,
    } = setup::prepare(args)?;

    let playground = Playground::mount(console, Counter::new(), &config);

    if args.no_tui {
        headless::run(playground, &args.script).await
    } else {
        run_tui(playground).await
    }
}
