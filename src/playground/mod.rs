//! This module contains the playground: a mountable unit that runs a preview
//! next to a live console panel fed by the capture hub.
pub mod counter;
pub mod render;
pub mod terminal;
pub mod view;

pub use counter::Counter;
pub use terminal::run_tui;
pub use view::{LogLine, LogView, EMPTY_PLACEHOLDER};

use crate::capture::Subscription;
use crate::console::{Console, LogEntry};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tracing::debug;

/// The default cap on entries kept by the console panel.
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Settings for a mounted playground.
///
/// Timestamps are stamped at capture time, so their format belongs to the
/// `CaptureHub` (`CaptureHub::with_time_format`), not to the view.
#[derive(Debug, Clone)]
pub struct PlaygroundConfig {
    /// The most entries the console panel keeps before evicting the oldest.
    pub max_entries: usize,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

/// Content shown in the preview pane.
pub trait Preview: Send {
    fn title(&self) -> &str;

    /// Runs once at mount, after the playground has subscribed, so anything
    /// logged here reaches the console panel.
    fn setup(&mut self, _console: &Console) {}

    /// Handles a key the playground itself did not consume. Returns whether
    /// the key was used.
    fn handle_key(&mut self, key: KeyEvent, console: &Console) -> bool;

    /// The preview's current content, one string per row.
    fn lines(&self) -> Vec<String>;
}

#[derive(Debug)]
pub enum PlaygroundEvent {
    LogBatch(Vec<LogEntry>),
    Key(KeyEvent),
    Resize(u16, u16),
}

/// What the run loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// A mounted preview and its console panel.
pub struct Playground<P: Preview> {
    preview: P,
    console: Console,
    view: LogView,
    events: mpsc::UnboundedReceiver<PlaygroundEvent>,
    sender: mpsc::UnboundedSender<PlaygroundEvent>,
    subscription: Option<Subscription>,
    terminal_size: (u16, u16),
}

impl<P: Preview> Playground<P> {
    /// Mounts `preview`.
    ///
    /// The playground subscribes to the console's hub before the preview's
    /// `setup` runs. Entries buffered before mounting are delivered at once.
    pub fn mount(console: Console, mut preview: P, config: &PlaygroundConfig) -> Self {
        let (sender, events) = mpsc::unbounded_channel();

        let batches = sender.clone();
        let subscription = console.hub().attach(move |entries| {
            let _ = batches.send(PlaygroundEvent::LogBatch(entries));
        });

        debug!("Mounting preview '{}'", preview.title());
        preview.setup(&console);

        Self {
            preview,
            console,
            view: LogView::new(config.max_entries),
            events,
            sender,
            subscription: Some(subscription),
            terminal_size: (80, 24),
        }
    }

    /// Detaches from the hub. Entries logged afterwards stay buffered for the
    /// next subscriber.
    pub fn unmount(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.detach();
            debug!("Unmounted preview '{}'", self.preview.title());
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// A sender for feeding key and resize events into the run loop.
    pub fn sender(&self) -> mpsc::UnboundedSender<PlaygroundEvent> {
        self.sender.clone()
    }

    /// Waits for the next event.
    pub async fn next_event(&mut self) -> Option<PlaygroundEvent> {
        self.events.recv().await
    }

    /// Applies every event already queued, without waiting.
    pub fn drain_events(&mut self) -> Flow {
        while let Ok(event) = self.events.try_recv() {
            if self.handle_event(event) == Flow::Exit {
                return Flow::Exit;
            }
        }
        Flow::Continue
    }

    pub fn handle_event(&mut self, event: PlaygroundEvent) -> Flow {
        match event {
            PlaygroundEvent::LogBatch(entries) => {
                self.view.append_batch(entries);
                Flow::Continue
            }
            PlaygroundEvent::Key(key) => self.handle_key(key),
            PlaygroundEvent::Resize(width, height) => {
                self.terminal_size = (width, height);
                Flow::Continue
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        let page = self.console_height();
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => {
                return Flow::Exit;
            }
            (KeyCode::Char('c'), _) => self.view.clear(),
            (KeyCode::Up, _) => self.view.scroll_up(1, page),
            (KeyCode::Down, _) => self.view.scroll_down(1),
            (KeyCode::PageUp, _) => self.view.scroll_up(page, page),
            (KeyCode::PageDown, _) => self.view.scroll_down(page),
            (KeyCode::End, _) => self.view.jump_to_bottom(),
            _ => {
                self.preview.handle_key(key, &self.console);
            }
        }
        Flow::Continue
    }

    /// Rows available to log lines below the console header.
    fn console_height(&self) -> usize {
        (self.terminal_size.1 as usize).saturating_sub(1).max(1)
    }

    pub fn view(&self) -> &LogView {
        &self.view
    }

    pub fn preview(&self) -> &P {
        &self.preview
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    pub fn set_terminal_size(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
    }
}

impl<P: Preview> Drop for Playground<P> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureHub;
    use crate::console::Silent;
    use crate::console_log;
    use std::sync::Arc;

    struct Greeter {
        greeted: usize,
    }

    impl Preview for Greeter {
        fn title(&self) -> &str {
            "Greeter"
        }

        fn setup(&mut self, console: &Console) {
            console_log!(console, "mounted");
        }

        fn handle_key(&mut self, key: KeyEvent, console: &Console) -> bool {
            if key.code == KeyCode::Char('g') {
                self.greeted += 1;
                console_log!(console, "hello", self.greeted);
                return true;
            }
            false
        }

        fn lines(&self) -> Vec<String> {
            vec![format!("greeted {} times", self.greeted)]
        }
    }

    fn console() -> Console {
        Console::with_forward(CaptureHub::new().shared(), Arc::new(Silent))
    }

    fn key(c: char) -> PlaygroundEvent {
        PlaygroundEvent::Key(KeyEvent::from(KeyCode::Char(c)))
    }

    fn messages<P: Preview>(playground: &Playground<P>) -> Vec<String> {
        playground
            .view()
            .entries()
            .map(|entry| entry.message().to_string())
            .collect()
    }

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn logs_from_setup_and_earlier_reach_the_panel() {
        let console = console();
        console_log!(console, "before mount");

        let mut playground = Playground::mount(console, Greeter { greeted: 0 }, &PlaygroundConfig::default());
        settle().await;
        playground.drain_events();

        assert_eq!(messages(&playground), vec!["before mount", "mounted"]);
    }

    #[tokio::test]
    async fn keys_reach_the_preview_and_clear_the_panel() {
        let mut playground = Playground::mount(console(), Greeter { greeted: 0 }, &PlaygroundConfig::default());
        let sender = playground.sender();

        sender.send(key('g')).unwrap();
        sender.send(key('g')).unwrap();
        assert_eq!(playground.drain_events(), Flow::Continue);
        settle().await;
        playground.drain_events();

        assert_eq!(playground.preview().lines(), vec!["greeted 2 times"]);
        assert_eq!(messages(&playground), vec!["mounted", "hello 1", "hello 2"]);

        sender.send(key('c')).unwrap();
        playground.drain_events();
        assert!(playground.view().is_empty());
        assert_eq!(playground.console().hub().pending_len(), 0);

        sender.send(key('q')).unwrap();
        assert_eq!(playground.drain_events(), Flow::Exit);
    }

    #[tokio::test]
    async fn unmounting_leaves_later_logs_buffered() {
        let mut playground = Playground::mount(console(), Greeter { greeted: 0 }, &PlaygroundConfig::default());
        let console = playground.console().clone();
        settle().await;
        playground.drain_events();

        playground.unmount();
        assert!(!playground.is_mounted());
        console_log!(console, "after unmount");
        settle().await;

        assert_eq!(playground.drain_events(), Flow::Continue);
        assert_eq!(messages(&playground), vec!["mounted"]);
        assert_eq!(console.hub().pending_len(), 1);
    }

    #[tokio::test]
    async fn panel_shows_timestamps_in_the_hub_format() {
        let hub = CaptureHub::new().with_time_format("t%H").shared();
        let console = Console::with_forward(hub, Arc::new(Silent));
        let config = PlaygroundConfig { max_entries: 5 };

        let mut playground = Playground::mount(console, Greeter { greeted: 0 }, &config);
        settle().await;
        playground.drain_events();

        let lines = playground.view().lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].text.starts_with("[t"));
        assert!(lines[0].text.ends_with("] mounted"));
    }
}
