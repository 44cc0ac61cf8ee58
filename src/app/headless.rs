//! Replays a key script against a playground and prints its console panel.
use anyhow::Result;
use console_playground::playground::{Flow, Playground, PlaygroundEvent, Preview};
use crossterm::event::{KeyCode, KeyEvent};

pub async fn run<P: Preview>(mut playground: Playground<P>, script: &str) -> Result<()> {
    let sender = playground.sender();
    for key in script.chars() {
        sender.send(PlaygroundEvent::Key(KeyEvent::from(KeyCode::Char(key))))?;
    }

    let mut flow = playground.drain_events();

    // Let the deferred flush land before printing.
    while flow == Flow::Continue && playground.console().hub().flush_pending() {
        tokio::task::yield_now().await;
        flow = playground.drain_events();
    }
    playground.drain_events();

    println!();
    println!("── {} ──", playground.preview().title());
    for line in playground.preview().lines() {
        println!("{}", line);
    }

    println!();
    println!("── Console ({} entries) ──", playground.view().len());
    for line in playground.view().lines() {
        println!("{:<5} {}", line.severity.as_str(), line.text);
    }

    playground.unmount();
    Ok(())
}
