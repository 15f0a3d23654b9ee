//! Calculator panel — display and clickable keypad.

use abacus_core::{Calculator, Input, Operator};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

/// One keypad button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub input: Input,
}

const fn button(label: &'static str, input: Input) -> Button {
    Button { label, input }
}

const fn digit(label: &'static str, c: char) -> Button {
    button(label, Input::Number(c))
}

const fn op(label: &'static str, operator: Operator) -> Button {
    button(label, Input::Operator(operator))
}

/// Keypad layout, top row first.
pub const KEYPAD: &[&[Button]] = &[
    &[
        button("C", Input::Clear),
        button("⌫", Input::DeleteLast),
        op("÷", Operator::Divide),
        op("×", Operator::Multiply),
    ],
    &[
        digit("7", '7'),
        digit("8", '8'),
        digit("9", '9'),
        op("−", Operator::Subtract),
    ],
    &[
        digit("4", '4'),
        digit("5", '5'),
        digit("6", '6'),
        op("+", Operator::Add),
    ],
    &[
        digit("1", '1'),
        digit("2", '2'),
        digit("3", '3'),
        button("=", Input::Calculate),
    ],
    &[digit("0", '0'), digit(".", '.')],
];

/// Height of the display block: two text lines plus borders.
const DISPLAY_HEIGHT: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Flash {
    input: Input,
    remaining: u8,
}

/// Calculator panel state. Owns the engine for the session.
pub struct CalculatorPanel {
    calculator: Calculator,
    flash: Option<Flash>,
    flash_ticks: u8,
}

impl CalculatorPanel {
    pub fn new(calculator: Calculator, flash_ticks: u8) -> Self {
        Self {
            calculator,
            flash: None,
            flash_ticks,
        }
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    /// Apply an input and highlight its button.
    pub fn press(&mut self, input: Input) {
        self.calculator.apply(input);
        if self.flash_ticks > 0 {
            self.flash = Some(Flash {
                input,
                remaining: self.flash_ticks,
            });
        }
    }

    /// Age the button highlight by one tick.
    pub fn tick(&mut self) {
        if let Some(flash) = &mut self.flash {
            flash.remaining = flash.remaining.saturating_sub(1);
            if flash.remaining == 0 {
                self.flash = None;
            }
        }
    }

    /// The input whose button is currently highlighted.
    pub fn flashed(&self) -> Option<Input> {
        self.flash.map(|f| f.input)
    }

    /// The keypad input under a terminal cell, given the panel's area.
    pub fn button_at(&self, area: Rect, column: u16, row: u16) -> Option<Input> {
        let (_, keypad) = split(area);
        let position = Position::new(column, row);
        keypad_cells(keypad)
            .into_iter()
            .find(|(rect, _)| rect.contains(position))
            .map(|(_, button)| button.input)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let (display_area, keypad_area) = split(area);

        // Display
        let value_style = if self.calculator.is_error() {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        let display_text = vec![
            Line::from(Span::styled(
                self.calculator.expression(),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(Span::styled(
                self.calculator.current_display_value(),
                value_style,
            )),
        ];
        let display = Paragraph::new(display_text)
            .alignment(Alignment::Right)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(display, display_area);

        // Keypad
        let pending = self.calculator.state().operator();
        let flashed = self.flashed();
        for (rect, button) in keypad_cells(keypad_area) {
            let mut style = match button.input {
                Input::Operator(op) if Some(op) == pending => {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                }
                Input::Operator(_) | Input::Calculate => Style::default().fg(Color::Cyan),
                Input::Clear | Input::DeleteLast => Style::default().fg(Color::Red),
                Input::Number(_) => Style::default(),
            };
            if flashed == Some(button.input) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let widget = Paragraph::new(button.label)
                .style(style)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(widget, rect);
        }
    }
}

fn split(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(DISPLAY_HEIGHT), Constraint::Min(0)])
        .split(area);
    (chunks[0], chunks[1])
}

fn keypad_cells(area: Rect) -> Vec<(Rect, &'static Button)> {
    let row_count = KEYPAD.len() as u32;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(KEYPAD.iter().map(|_| Constraint::Ratio(1, row_count)))
        .split(area);

    let mut cells = Vec::with_capacity(KEYPAD.iter().map(|r| r.len()).sum());
    for (buttons, row_area) in KEYPAD.iter().zip(rows.iter()) {
        let col_count = buttons.len() as u32;
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(buttons.iter().map(|_| Constraint::Ratio(1, col_count)))
            .split(*row_area);
        cells.extend(cols.iter().copied().zip(buttons.iter()));
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn panel() -> CalculatorPanel {
        CalculatorPanel::new(Calculator::new(), 2)
    }

    fn area() -> Rect {
        Rect::new(0, 0, 40, 24)
    }

    #[test]
    fn test_keypad_covers_key_contract() {
        let inputs: Vec<Input> = KEYPAD.iter().flat_map(|r| r.iter().map(|b| b.input)).collect();
        for c in "0123456789.".chars() {
            assert!(inputs.contains(&Input::Number(c)), "missing {c}");
        }
        for op in Operator::ALL {
            assert!(inputs.contains(&Input::Operator(op)), "missing {op}");
        }
        assert!(inputs.contains(&Input::Calculate));
        assert!(inputs.contains(&Input::Clear));
        assert!(inputs.contains(&Input::DeleteLast));
    }

    #[test]
    fn test_press_updates_calculator() {
        let mut panel = panel();
        for input in abacus_core::parse_sequence("12+3=") {
            panel.press(input);
        }
        assert_eq!(panel.calculator().current_display_value(), "15");
    }

    #[test]
    fn test_flash_decays() {
        let mut panel = panel();
        panel.press(Input::Number('7'));
        assert_eq!(panel.flashed(), Some(Input::Number('7')));
        panel.tick();
        assert_eq!(panel.flashed(), Some(Input::Number('7')));
        panel.tick();
        assert_eq!(panel.flashed(), None);
        panel.tick();
        assert_eq!(panel.flashed(), None);
    }

    #[test]
    fn test_flash_disabled() {
        let mut panel = CalculatorPanel::new(Calculator::new(), 0);
        panel.press(Input::Number('7'));
        assert_eq!(panel.flashed(), None);
    }

    #[test]
    fn test_button_hit_testing() {
        let panel = panel();
        // Keypad starts below the 4-row display; rows are 4 cells high.
        assert_eq!(panel.button_at(area(), 1, 5), Some(Input::Clear));
        assert_eq!(
            panel.button_at(area(), 35, 6),
            Some(Input::Operator(Operator::Multiply))
        );
        assert_eq!(panel.button_at(area(), 12, 9), Some(Input::Number('8')));
        assert_eq!(panel.button_at(area(), 38, 17), Some(Input::Calculate));
        assert_eq!(panel.button_at(area(), 5, 22), Some(Input::Number('0')));
        assert_eq!(panel.button_at(area(), 25, 22), Some(Input::Number('.')));
    }

    #[test]
    fn test_click_outside_keypad() {
        let panel = panel();
        assert_eq!(panel.button_at(area(), 5, 1), None);
        assert_eq!(panel.button_at(area(), 60, 10), None);
    }

    #[test]
    fn test_render_shows_display_value() {
        let mut panel = panel();
        for input in abacus_core::parse_sequence("1000+234.5=") {
            panel.press(input);
        }

        let mut terminal = Terminal::new(TestBackend::new(40, 24)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                panel.render(frame, area);
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("1,234.5"));
    }
}
