//! Core TUI application state and event handling.

use std::path::Path;

use abacus_config::AppConfig;
use abacus_core::{Calculator, LogReader, build_info};
use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use tracing::debug;

use crate::keymap::{Action, KeyMapper, KeyMode};
use crate::panels::{CalculatorPanel, ConfigPanel, LogsPanel, PanelState};

/// The panels available in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Calculator,
    Logs,
    Config,
}

impl Panel {
    pub fn title(self) -> &'static str {
        match self {
            Panel::Calculator => "Calculator",
            Panel::Logs => "Logs",
            Panel::Config => "Config",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Panel::Calculator => Panel::Logs,
            Panel::Logs => Panel::Config,
            Panel::Config => Panel::Calculator,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Panel::Calculator => Panel::Config,
            Panel::Logs => Panel::Calculator,
            Panel::Config => Panel::Logs,
        }
    }

    fn key_mode(self) -> KeyMode {
        match self {
            Panel::Calculator => KeyMode::Calculator,
            Panel::Logs | Panel::Config => KeyMode::Browse,
        }
    }
}

const ALL_PANELS: [Panel; 3] = [Panel::Calculator, Panel::Logs, Panel::Config];

/// TUI application state.
pub struct App {
    /// Whether the application should quit.
    pub should_quit: bool,

    /// Currently selected panel.
    pub active_panel: Panel,

    pub keymap: KeyMapper,

    /// Calculator panel, owning the session's engine.
    pub calculator: CalculatorPanel,

    pub logs: LogsPanel,

    pub config_panel: ConfigPanel,
}

impl App {
    /// Create the app around an engine built by the caller.
    pub fn new(
        calculator: Calculator,
        config: &AppConfig,
        config_source: Option<&Path>,
        log_reader: LogReader,
    ) -> Self {
        Self {
            should_quit: false,
            active_panel: Panel::Calculator,
            keymap: KeyMapper::new(),
            calculator: CalculatorPanel::new(calculator, config.tui.flash_ticks),
            logs: LogsPanel::new(log_reader),
            config_panel: ConfigPanel::new(config, config_source),
        }
    }

    /// Resolve a key press against the active panel's bindings.
    pub fn handle_key(&mut self, key: KeyEvent) {
        let action = self.keymap.resolve(key, self.active_panel.key_mode());
        self.handle_action(action);
    }

    /// Handle a mouse event. `screen` is the full terminal area.
    pub fn handle_mouse(&mut self, event: MouseEvent, screen: Rect) {
        if event.kind != MouseEventKind::Down(MouseButton::Left)
            || self.active_panel != Panel::Calculator
        {
            return;
        }
        let [_, main, _] = layout(screen);
        if let Some(input) = self.calculator.button_at(main, event.column, event.row) {
            debug!(?input, column = event.column, row = event.row, "Keypad click");
            self.handle_action(Action::Calc(input));
        }
    }

    /// Process a resolved action.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::NextPanel => self.active_panel = self.active_panel.next(),
            Action::PrevPanel => self.active_panel = self.active_panel.prev(),
            Action::GoToPanel(n) => {
                if let Some(&panel) = ALL_PANELS.get(n) {
                    self.active_panel = panel;
                }
            }
            Action::Calc(input) => self.calculator.press(input),
            Action::ScrollDown => self.scroll(|p| p.scroll_down(1)),
            Action::ScrollUp => self.scroll(|p| p.scroll_up(1)),
            Action::HalfPageDown => self.scroll(|p| p.scroll_down(10)),
            Action::HalfPageUp => self.scroll(|p| p.scroll_up(10)),
            Action::ScrollToTop => self.scroll(|p| p.scroll_to_top()),
            Action::ScrollToBottom => self.scroll(|p| p.scroll_to_bottom()),
            Action::None => {}
        }
    }

    /// Tick: age the button flash and refresh captured logs.
    pub fn tick(&mut self) {
        self.calculator.tick();
        self.logs.refresh();
    }

    fn scroll(&mut self, f: impl FnOnce(&mut dyn PanelState)) {
        let panel: &mut dyn PanelState = match self.active_panel {
            Panel::Calculator => return,
            Panel::Logs => &mut self.logs,
            Panel::Config => &mut self.config_panel,
        };
        f(panel);
    }

    /// Get the status line text.
    pub fn status_line(&self) -> String {
        let keys = match self.active_panel {
            Panel::Calculator => "0-9 . + - * /  Enter/=:calc  Esc/c:clear  Bksp:delete",
            Panel::Logs | Panel::Config => "j/k:scroll  gg/G:top/bottom",
        };
        format!(
            " q:quit  Tab:next  F1-F3:panels  {keys}  [{panel}]",
            panel = self.active_panel.title()
        )
    }

    pub fn render(&self, frame: &mut Frame) {
        let [header_area, main, status_area] = layout(frame.area());

        let header = Paragraph::new(format!("Abacus {}", build_info::version_string()))
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(header, header_area);

        match self.active_panel {
            Panel::Calculator => self.calculator.render(frame, main),
            Panel::Logs => self.logs.render(frame, main),
            Panel::Config => self.config_panel.render(frame, main),
        }

        let status = Paragraph::new(self.status_line())
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::TOP));
        frame.render_widget(status, status_area);
    }
}

/// Header, main content, status bar.
fn layout(area: Rect) -> [Rect; 3] {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // header
            Constraint::Min(1),    // main content
            Constraint::Length(2), // status bar
        ])
        .areas(area)
}
