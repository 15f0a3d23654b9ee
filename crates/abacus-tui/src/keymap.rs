//! Keybindings.
//!
//! On the calculator panel, keys go through the shared key contract
//! ([`Input::from_key`]). On the scrollable panels, vim-style keys move the
//! view, including the two-key `gg` sequence. `q`, `Ctrl+C`, `Tab`,
//! `BackTab` and `F1`–`F3` work everywhere.

use std::borrow::Cow;

use abacus_core::Input;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// An action the TUI can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextPanel,
    PrevPanel,
    GoToPanel(usize),
    Calc(Input),
    ScrollDown,
    ScrollUp,
    HalfPageDown,
    HalfPageUp,
    ScrollToTop,
    ScrollToBottom,
    None,
}

/// Which set of bindings applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    /// Keys feed the calculator.
    Calculator,
    /// Keys scroll the active panel.
    Browse,
}

/// Key mapper with support for multi-key sequences.
pub struct KeyMapper {
    /// Pending first key of a two-key sequence (the first `g` in `gg`).
    pending: Option<KeyCode>,
}

impl KeyMapper {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Feed a key event and return the resolved action.
    pub fn resolve(&mut self, key: KeyEvent, mode: KeyMode) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            self.pending = None;
            return match key.code {
                KeyCode::Char('c') => Action::Quit,
                _ => Action::None,
            };
        }
        if key.modifiers.contains(KeyModifiers::ALT) {
            self.pending = None;
            return Action::None;
        }

        let global = match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Tab => Some(Action::NextPanel),
            KeyCode::BackTab => Some(Action::PrevPanel),
            KeyCode::F(n @ 1..=3) => Some(Action::GoToPanel(usize::from(n - 1))),
            _ => None,
        };
        if let Some(action) = global {
            self.pending = None;
            return action;
        }

        match mode {
            KeyMode::Calculator => {
                self.pending = None;
                key_name(key.code)
                    .and_then(|name| Input::from_key(&name))
                    .map_or(Action::None, Action::Calc)
            }
            KeyMode::Browse => self.resolve_browse(key.code),
        }
    }

    fn resolve_browse(&mut self, key: KeyCode) -> Action {
        if let Some(prev) = self.pending.take() {
            return match (prev, key) {
                (KeyCode::Char('g'), KeyCode::Char('g')) => Action::ScrollToTop,
                // Unknown sequence: interpret the second key on its own
                _ => self.resolve_browse(key),
            };
        }

        match key {
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::Char('d') | KeyCode::PageDown => Action::HalfPageDown,
            KeyCode::Char('u') | KeyCode::PageUp => Action::HalfPageUp,
            KeyCode::Char('G') | KeyCode::End => Action::ScrollToBottom,
            KeyCode::Home => Action::ScrollToTop,
            KeyCode::Char('g') => {
                self.pending = Some(key);
                Action::None
            }
            _ => Action::None,
        }
    }
}

impl Default for KeyMapper {
    fn default() -> Self {
        Self::new()
    }
}

/// The key-contract name of a terminal key code.
fn key_name(code: KeyCode) -> Option<Cow<'static, str>> {
    match code {
        KeyCode::Enter => Some(Cow::Borrowed("Enter")),
        KeyCode::Esc => Some(Cow::Borrowed("Escape")),
        KeyCode::Backspace => Some(Cow::Borrowed("Backspace")),
        KeyCode::Char(c) => Some(Cow::Owned(c.to_string())),
        _ => None,
    }
}
