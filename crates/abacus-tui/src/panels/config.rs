//! Config panel — the resolved configuration as TOML.

use std::path::Path;

use abacus_config::AppConfig;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use super::PanelState;

/// Read-only view of the configuration the session started with.
pub struct ConfigPanel {
    lines: Vec<String>,
    scroll_offset: usize,
}

impl ConfigPanel {
    /// Render `config` to TOML, headed by a comment naming where it came from.
    pub fn new(config: &AppConfig, source: Option<&Path>) -> Self {
        let origin = match source {
            Some(path) => format!("# loaded from {}", path.display()),
            None => "# built-in defaults (no config file found)".to_string(),
        };
        let body = toml::to_string_pretty(config).unwrap_or_else(|e| format!("# (error: {e})"));

        let lines = std::iter::once(origin)
            .chain(body.lines().map(String::from))
            .collect();
        Self {
            lines,
            scroll_offset: 0,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let visible_height = area.height.saturating_sub(2) as usize;

        let visible_lines: Vec<Line> = self
            .lines
            .iter()
            .skip(self.scroll_offset)
            .take(visible_height)
            .map(|line| highlight(line))
            .collect();

        let paragraph = Paragraph::new(visible_lines)
            .block(Block::default().title(" Config ").borders(Borders::ALL));
        frame.render_widget(paragraph, area);
    }
}

fn highlight(line: &str) -> Line<'_> {
    if line.starts_with('#') {
        Line::from(Span::styled(line, Style::default().fg(Color::DarkGray)))
    } else if line.starts_with('[') {
        Line::from(Span::styled(
            line,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
    } else if let Some((key, value)) = line.split_once(" = ") {
        Line::from(vec![
            Span::styled(key, Style::default().fg(Color::Yellow)),
            Span::raw(" = "),
            Span::styled(value, Style::default().fg(Color::Green)),
        ])
    } else {
        Line::from(line)
    }
}

impl PanelState for ConfigPanel {
    fn scroll_down(&mut self, n: usize) {
        let max = self.lines.len().saturating_sub(1);
        self.scroll_offset = (self.scroll_offset + n).min(max);
    }

    fn scroll_up(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n);
    }

    fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.lines.len().saturating_sub(1);
    }
}
