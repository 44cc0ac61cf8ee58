//! The playground's own list of delivered log entries.
use crate::console::{LogEntry, Severity};
use std::collections::VecDeque;
use unicode_width::UnicodeWidthStr;

/// Shown in the console panel while no entries have been delivered.
pub const EMPTY_PLACEHOLDER: &str = "Pas de logs pour le moment...";

/// One display row of the console panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub severity: Severity,
    pub text: String,
}

/// An append-only, auto-scrolling list of delivered entries.
///
/// The scroll offset counts display rows above the bottom; zero means the
/// latest entry is visible.
#[derive(Debug)]
pub struct LogView {
    entries: VecDeque<LogEntry>,
    max_entries: usize,
    scroll_offset: usize,
}

impl LogView {
    /// Creates an empty view that keeps at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries: max_entries.max(1),
            scroll_offset: 0,
        }
    }

    /// Appends a delivered batch in order and scrolls to the bottom.
    pub fn append_batch(&mut self, entries: Vec<LogEntry>) {
        for entry in entries {
            if self.entries.len() >= self.max_entries {
                self.entries.pop_front();
            }
            self.entries.push_back(entry);
        }
        self.jump_to_bottom();
    }

    /// Empties the displayed list. Entries still waiting in the capture hub
    /// are unaffected.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.scroll_offset = 0;
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn is_at_bottom(&self) -> bool {
        self.scroll_offset == 0
    }

    pub fn jump_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }

    /// Scrolls towards older rows, never past the first one.
    pub fn scroll_up(&mut self, rows: usize, height: usize) {
        let max_scroll = self.lines().len().saturating_sub(height);
        self.scroll_offset = self.scroll_offset.saturating_add(rows).min(max_scroll);
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(rows);
    }

    /// Flattens entries into display rows. Multi-line messages (pretty-printed
    /// objects) continue on indented rows under their timestamp.
    pub fn lines(&self) -> Vec<LogLine> {
        let mut lines = Vec::new();
        for entry in &self.entries {
            let prefix = format!("[{}] ", entry.timestamp());
            let indent = " ".repeat(prefix.width());
            for (index, row) in entry.message().split('\n').enumerate() {
                let lead = if index == 0 { &prefix } else { &indent };
                lines.push(LogLine {
                    severity: entry.severity(),
                    text: format!("{}{}", lead, row),
                });
            }
        }
        lines
    }

    /// The rows that fit in `height`, honouring the scroll offset.
    pub fn visible_lines(&self, height: usize) -> Vec<LogLine> {
        let lines = self.lines();
        let end = lines.len().saturating_sub(self.scroll_offset);
        let start = end.saturating_sub(height);
        lines[start..end].to_vec()
    }
}
