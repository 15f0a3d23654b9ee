//! Logs panel — live view of engine and front-end events.

use abacus_core::LogReader;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use tracing::Level;

use super::PanelState;

/// Scrollable log viewer with auto-follow.
pub struct LogsPanel {
    reader: LogReader,
    /// Snapshot refreshed on tick.
    entries: Vec<LogLine>,
    /// Lines scrolled up from the bottom (0 = latest).
    scroll_offset: usize,
    /// Stick to the newest entry.
    auto_follow: bool,
}

struct LogLine {
    elapsed: String,
    level: Level,
    message: String,
    fields: String,
}

impl LogsPanel {
    pub fn new(reader: LogReader) -> Self {
        Self {
            reader,
            entries: Vec::new(),
            scroll_offset: 0,
            auto_follow: true,
        }
    }

    /// Re-read entries from the collector.
    pub fn refresh(&mut self) {
        self.entries = self
            .reader
            .entries()
            .into_iter()
            .map(|e| LogLine {
                elapsed: format!("{:>8.2}s", e.elapsed_secs),
                level: e.level,
                message: e.message,
                fields: e.fields,
            })
            .collect();

        if self.auto_follow {
            self.scroll_offset = 0;
        } else {
            let max_offset = self.entries.len().saturating_sub(1);
            self.scroll_offset = self.scroll_offset.min(max_offset);
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if self.entries.is_empty() {
            let empty = Paragraph::new("  (no events yet; press some keys)")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().title(" Logs (0) ").borders(Borders::ALL));
            frame.render_widget(empty, area);
            return;
        }

        let visible_height = area.height.saturating_sub(2) as usize;
        let total = self.entries.len();
        let skip = total.saturating_sub(visible_height + self.scroll_offset);

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .skip(skip)
            .take(visible_height)
            .map(|entry| {
                let mut spans = vec![
                    Span::styled(
                        format!("{} ", entry.elapsed),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(format!("{:>5} ", entry.level), level_style(entry.level)),
                    Span::raw(entry.message.as_str()),
                ];
                if !entry.fields.is_empty() {
                    spans.push(Span::styled(
                        format!("  {}", entry.fields),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let follow_indicator = if self.auto_follow { " [follow]" } else { "" };
        let title = format!(" Logs ({total}){follow_indicator} ");

        let list = List::new(items).block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(list, area);
    }
}

fn level_style(level: Level) -> Style {
    match level {
        Level::ERROR => Style::default().fg(Color::Red),
        Level::WARN => Style::default().fg(Color::Yellow),
        Level::INFO => Style::default().fg(Color::Green),
        Level::DEBUG => Style::default().fg(Color::Blue),
        Level::TRACE => Style::default().fg(Color::DarkGray),
    }
}

impl PanelState for LogsPanel {
    fn scroll_down(&mut self, n: usize) {
        if self.scroll_offset > n {
            self.scroll_offset -= n;
        } else {
            self.scroll_offset = 0;
            self.auto_follow = true;
        }
    }

    fn scroll_up(&mut self, n: usize) {
        self.auto_follow = false;
        let max_offset = self.entries.len().saturating_sub(1);
        self.scroll_offset = (self.scroll_offset + n).min(max_offset);
    }

    fn scroll_to_top(&mut self) {
        self.auto_follow = false;
        self.scroll_offset = self.entries.len().saturating_sub(1);
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
        self.auto_follow = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abacus_core::{Calculator, LogCollector, parse_sequence};
    use tracing_subscriber::layer::SubscriberExt;

    fn panel_with_entries(count: usize) -> LogsPanel {
        let collector = LogCollector::new(1000);
        let reader = collector.reader();

        let subscriber = tracing_subscriber::registry().with(collector);
        let _guard = tracing::subscriber::set_default(subscriber);
        for i in 0..count {
            tracing::info!(index = i, "test log entry");
        }

        let mut panel = LogsPanel::new(reader);
        panel.refresh();
        panel
    }

    #[test]
    fn test_new_panel_starts_empty() {
        let collector = LogCollector::new(100);
        let panel = LogsPanel::new(collector.reader());
        assert_eq!(panel.entries.len(), 0);
        assert!(panel.auto_follow);
        assert_eq!(panel.scroll_offset, 0);
    }

    #[test]
    fn test_refresh_captures_entries() {
        let panel = panel_with_entries(5);
        assert_eq!(panel.entries.len(), 5);
        assert_eq!(panel.entries[4].fields, "index=4");
    }

    #[test]
    fn test_refresh_captures_engine_events() {
        let collector = LogCollector::new(100);
        let reader = collector.reader();
        let subscriber = tracing_subscriber::registry().with(collector);
        let _guard = tracing::subscriber::set_default(subscriber);

        let mut calc = Calculator::new();
        calc.apply_all(parse_sequence("6*7="));

        let mut panel = LogsPanel::new(reader);
        panel.refresh();
        assert!(
            panel
                .entries
                .iter()
                .any(|e| e.message == "Calculated" && e.fields.contains("result=42"))
        );
    }

    #[test]
    fn test_scroll_up_disables_auto_follow() {
        let mut panel = panel_with_entries(20);
        assert!(panel.auto_follow);

        panel.scroll_up(5);
        assert!(!panel.auto_follow);
        assert_eq!(panel.scroll_offset, 5);
    }

    #[test]
    fn test_scroll_down_re_enables_auto_follow_at_bottom() {
        let mut panel = panel_with_entries(20);

        panel.scroll_up(3);
        assert!(!panel.auto_follow);

        panel.scroll_down(10);
        assert!(panel.auto_follow);
        assert_eq!(panel.scroll_offset, 0);
    }

    #[test]
    fn test_scroll_to_top_and_bottom() {
        let mut panel = panel_with_entries(20);
        panel.scroll_to_top();
        assert!(!panel.auto_follow);
        assert_eq!(panel.scroll_offset, 19);

        panel.scroll_to_bottom();
        assert!(panel.auto_follow);
        assert_eq!(panel.scroll_offset, 0);
    }

    #[test]
    fn test_scroll_up_clamped_to_max() {
        let mut panel = panel_with_entries(5);
        panel.scroll_up(100);
        assert_eq!(panel.scroll_offset, 4);
    }

    #[test]
    fn test_scroll_on_empty_panel() {
        let collector = LogCollector::new(100);
        let mut panel = LogsPanel::new(collector.reader());
        panel.scroll_up(5);
        panel.scroll_down(5);
        panel.scroll_to_top();
        panel.scroll_to_bottom();
        assert_eq!(panel.scroll_offset, 0);
    }
}
