//! A counter preview that logs around every state change.
use super::Preview;
use crate::console::{Console, LogArg};
use crate::{console_info, console_log, console_warn};
use crossterm::event::{KeyCode, KeyEvent};
use serde::Serialize;

#[derive(Debug, Default)]
pub struct Counter {
    count: i64,
    history: Vec<i64>,
}

#[derive(Debug, Serialize)]
struct Snapshot<'a> {
    count: i64,
    history: &'a [i64],
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn increment(&mut self, console: &Console) {
        let before = self.count;
        console_log!(console, "Avant:", before);
        self.set(before + 1, console);
        // The handler still sees the value it started with.
        console_log!(console, "Après (dans le handler):", before);
    }

    pub fn decrement(&mut self, console: &Console) {
        self.set(self.count - 1, console);
        if self.count < 0 {
            console_warn!(console, "Compteur négatif:", self.count);
        }
    }

    pub fn reset(&mut self, console: &Console) {
        console_log!(console, "Reset du compteur");
        self.set(0, console);
    }

    /// Logs the whole state as a structured value.
    pub fn snapshot(&self, console: &Console) {
        let snapshot = Snapshot {
            count: self.count,
            history: &self.history,
        };
        console.info(&[LogArg::from("Snapshot:"), LogArg::structured(&snapshot)]);
    }

    fn set(&mut self, count: i64, console: &Console) {
        self.history.push(self.count);
        self.count = count;
        self.render_log(console);
    }

    fn render_log(&self, console: &Console) {
        console_log!(console, "Render - count actuel:", self.count);
    }
}

impl Preview for Counter {
    fn title(&self) -> &str {
        "Compteur"
    }

    fn setup(&mut self, console: &Console) {
        console_info!(console, "Counter monté");
        self.render_log(console);
    }

    fn handle_key(&mut self, key: KeyEvent, console: &Console) -> bool {
        match key.code {
            KeyCode::Char('+') | KeyCode::Right => self.increment(console),
            KeyCode::Char('-') | KeyCode::Left => self.decrement(console),
            KeyCode::Char('r') => self.reset(console),
            KeyCode::Char('s') => self.snapshot(console),
            _ => return false,
        }
        true
    }

    fn lines(&self) -> Vec<String> {
        vec![
            format!("Compteur: {}", self.count),
            String::new(),
            "[-] décrémenter  [+] incrémenter".to_string(),
            "[r] reset  [s] snapshot  [q] quitter".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{CaptureHub, Subscription};
    use crate::console::{LogEntry, Recorder, Severity};
    use std::sync::{Arc, Mutex};

    type Received = Arc<Mutex<Vec<LogEntry>>>;

    fn setup() -> (Counter, Console, Received, Subscription) {
        let console = Console::with_forward(CaptureHub::new().shared(), Arc::new(Recorder::new()));
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        let subscription = console
            .hub()
            .attach(move |entries| sink.lock().unwrap().extend(entries));
        (Counter::new(), console, received, subscription)
    }

    #[test]
    fn increment_logs_the_value_seen_by_the_handler() {
        let (mut counter, console, received, _subscription) = setup();
        counter.increment(&console);
        console.hub().flush_now();

        let messages: Vec<String> = received
            .lock()
            .unwrap()
            .iter()
            .map(|entry| entry.message().to_string())
            .collect();
        assert_eq!(
            messages,
            vec!["Avant: 0", "Render - count actuel: 1", "Après (dans le handler): 0"]
        );
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn going_negative_warns() {
        let (mut counter, console, received, _subscription) = setup();
        counter.decrement(&console);
        console.hub().flush_now();

        let received = received.lock().unwrap();
        let last = received.last().unwrap();
        assert_eq!(last.severity(), Severity::Warn);
        assert_eq!(last.message(), "Compteur négatif: -1");
    }

    #[test]
    fn snapshot_is_structured() {
        let (mut counter, console, received, _subscription) = setup();
        counter.handle_key(KeyEvent::from(KeyCode::Char('+')), &console);
        counter.handle_key(KeyEvent::from(KeyCode::Char('s')), &console);
        console.hub().flush_now();

        let received = received.lock().unwrap();
        let snapshot = received.last().unwrap();
        assert_eq!(snapshot.severity(), Severity::Info);
        assert_eq!(
            snapshot.message(),
            "Snapshot: {\n  \"count\": 1,\n  \"history\": [\n    0\n  ]\n}"
        );
    }

    #[test]
    fn unknown_keys_are_not_consumed() {
        let (mut counter, console, _, _subscription) = setup();
        assert!(!counter.handle_key(KeyEvent::from(KeyCode::Char('x')), &console));
        assert_eq!(counter.lines()[0], "Compteur: 0");
    }
}
