//! Runs a playground in the terminal.
use super::render::{render_console, render_preview, split};
use super::{Flow, Playground, PlaygroundEvent, Preview};
use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, Event},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType},
};
use std::io::{stdout, Write};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// Raw mode and the alternate screen, restored on drop.
struct TerminalSession;

impl TerminalSession {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(Self)
    }

    fn cleanup(&mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        execute!(stdout(), cursor::Show, terminal::LeaveAlternateScreen)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Runs `playground` until the user quits.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or written to.
pub async fn run_tui<P: Preview>(mut playground: Playground<P>) -> Result<()> {
    let _session = TerminalSession::enter()?;
    let (width, height) = terminal::size()?;
    playground.set_terminal_size(width, height);

    spawn_input_reader(playground.sender());
    debug!("Starting playground loop");

    draw(&mut stdout(), &playground)?;
    while let Some(event) = playground.next_event().await {
        if playground.handle_event(event) == Flow::Exit || playground.drain_events() == Flow::Exit {
            break;
        }
        draw(&mut stdout(), &playground)?;
    }

    playground.unmount();
    Ok(())
}

/// Forwards terminal key and resize events until the playground goes away.
fn spawn_input_reader(sender: mpsc::UnboundedSender<PlaygroundEvent>) {
    tokio::task::spawn_blocking(move || {
        while !sender.is_closed() {
            if !event::poll(Duration::from_millis(100)).unwrap_or(false) {
                continue;
            }
            let forwarded = match event::read() {
                Ok(Event::Key(key)) => sender.send(PlaygroundEvent::Key(key)),
                Ok(Event::Resize(width, height)) => sender.send(PlaygroundEvent::Resize(width, height)),
                _ => Ok(()),
            };
            if forwarded.is_err() {
                break;
            }
        }
    });
}

fn draw<P: Preview>(stdout: &mut impl Write, playground: &Playground<P>) -> Result<()> {
    queue!(stdout, Clear(ClearType::All), cursor::MoveTo(0, 0))?;

    let (width, height) = playground.terminal_size();
    let (preview_area, console_area) = split(width, height);

    let preview = playground.preview();
    render_preview(stdout, preview.title(), &preview.lines(), preview_area)?;

    for row in 0..height {
        queue!(stdout, cursor::MoveTo(preview_area.2, row), Print("│"))?;
    }

    render_console(stdout, playground.view(), console_area)?;

    stdout.flush()?;
    Ok(())
}
