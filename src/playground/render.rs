//! This module contains the rendering logic for the playground screen: the
//! preview pane on the left and the console panel on the right.
use super::view::{LogView, EMPTY_PLACEHOLDER};
use crate::console::Severity;
use anyhow::Result;
use crossterm::{
    cursor, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
};
use std::io::Write;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// A rectangle on screen: x, y, width, height.
pub type Area = (u16, u16, u16, u16);

const CONSOLE_TITLE: &str = "📋 Console";
const CLEAR_HINT: &str = "[c] Clear";

/// Splits the screen into preview and console areas, separated by one column.
pub fn split(width: u16, height: u16) -> (Area, Area) {
    let preview_width = width / 2;
    let console_x = preview_width.saturating_add(1);
    (
        (0, 0, preview_width, height),
        (console_x, 0, width.saturating_sub(console_x), height),
    )
}

/// Renders the preview title and its lines.
pub fn render_preview(
    stdout: &mut impl Write,
    title: &str,
    lines: &[String],
    area: Area,
) -> Result<()> {
    let (x, y, width, height) = area;
    if height == 0 {
        return Ok(());
    }

    queue!(
        stdout,
        cursor::MoveTo(x, y),
        SetAttribute(Attribute::Bold),
        Print(fit(title, width as usize)),
        SetAttribute(Attribute::Reset)
    )?;

    for (row, line) in lines.iter().take(height as usize - 1).enumerate() {
        queue!(
            stdout,
            cursor::MoveTo(x, y + 1 + row as u16),
            Print(fit(line, width as usize))
        )?;
    }

    Ok(())
}

/// Renders the console panel: a header, then the visible log rows coloured by
/// severity, or the placeholder when the view is empty.
pub fn render_console(stdout: &mut impl Write, view: &LogView, area: Area) -> Result<()> {
    let (x, y, width, height) = area;
    if height == 0 || width == 0 {
        return Ok(());
    }

    let gap = (width as usize).saturating_sub(CONSOLE_TITLE.width() + CLEAR_HINT.width());
    let header = format!("{}{}{}", CONSOLE_TITLE, " ".repeat(gap), CLEAR_HINT);
    queue!(
        stdout,
        cursor::MoveTo(x, y),
        SetAttribute(Attribute::Bold),
        Print(fit(&header, width as usize)),
        SetAttribute(Attribute::Reset)
    )?;

    let body_height = height as usize - 1;
    if view.is_empty() {
        queue!(
            stdout,
            cursor::MoveTo(x, y + 1),
            SetForegroundColor(Color::DarkGrey),
            SetAttribute(Attribute::Italic),
            Print(fit(EMPTY_PLACEHOLDER, width as usize)),
            SetAttribute(Attribute::Reset),
            ResetColor
        )?;
        return Ok(());
    }

    for (row, line) in view.visible_lines(body_height).iter().enumerate() {
        queue!(
            stdout,
            cursor::MoveTo(x, y + 1 + row as u16),
            SetForegroundColor(severity_color(line.severity)),
            Print(fit(&line.text, width as usize)),
            ResetColor
        )?;
    }

    if view.scroll_offset() > 0 {
        let indicator = format!("↑ +{}", view.scroll_offset());
        let indicator_x = x + width.saturating_sub(indicator.width() as u16);
        queue!(
            stdout,
            cursor::MoveTo(indicator_x, y + 1),
            SetForegroundColor(Color::Yellow),
            Print(indicator),
            ResetColor
        )?;
    }

    Ok(())
}

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Log => Color::White,
        Severity::Info => Color::Blue,
        Severity::Warn => Color::Yellow,
        Severity::Error => Color::Red,
    }
}

/// Truncates `text` to `width` display columns, marking the cut with "...".
pub fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width <= 3 {
        return ".".repeat(width);
    }

    let budget = width - 3;
    let mut used = 0;
    let mut fitted = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        fitted.push(c);
    }
    fitted.push_str("...");
    fitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::LogEntry;

    #[test]
    fn fit_truncates_by_display_width() {
        assert_eq!(fit("short", 10), "short");
        assert_eq!(fit("abcdefghij", 6), "abc...");
        assert_eq!(fit("日本語テキスト", 7), "日本...");
        assert_eq!(fit("abcdef", 2), "..");
    }

    #[test]
    fn split_leaves_a_separator_column() {
        let (preview, console) = split(80, 24);
        assert_eq!(preview, (0, 0, 40, 24));
        assert_eq!(console, (41, 0, 39, 24));
    }

    #[test]
    fn empty_console_shows_the_placeholder() {
        let mut out = Vec::new();
        render_console(&mut out, &LogView::new(10), (0, 0, 40, 5)).unwrap();
        let rendered = String::from_utf8_lossy(&out);
        assert!(rendered.contains(EMPTY_PLACEHOLDER));
    }

    #[test]
    fn console_renders_latest_rows() {
        let mut view = LogView::new(10);
        view.append_batch(vec![
            LogEntry::now(Severity::Error, "first".to_string(), "%H:%M:%S"),
            LogEntry::now(Severity::Log, "second".to_string(), "%H:%M:%S"),
        ]);

        let mut out = Vec::new();
        render_console(&mut out, &view, (0, 0, 40, 2)).unwrap();
        let rendered = String::from_utf8_lossy(&out);
        assert!(rendered.contains("second"));
        assert!(!rendered.contains("first"));
    }
}
