//! Key-to-input mapping shared by every front end.
//!
//! | Key                     | Input          |
//! |-------------------------|----------------|
//! | `0`–`9`, `.`            | `Number`       |
//! | `+` `-` `*` `/`         | `Operator`     |
//! | `Enter`, `=`            | `Calculate`    |
//! | `Escape`, `c`, `C`      | `Clear`        |
//! | `Backspace`             | `DeleteLast`   |
//!
//! Everything else is ignored.

use crate::operator::Operator;

/// One user input the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Input {
    Number(char),
    Operator(Operator),
    Calculate,
    Clear,
    DeleteLast,
}

impl Input {
    /// Map a key name (`"7"`, `"+"`, `"Enter"`, `"Backspace"`, ...) to an input.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Enter" => Some(Input::Calculate),
            "Escape" => Some(Input::Clear),
            "Backspace" => Some(Input::DeleteLast),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::from_char(c),
                    _ => None,
                }
            }
        }
    }

    /// Map a single typed character to an input.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0'..='9' | '.' => Some(Input::Number(c)),
            '=' => Some(Input::Calculate),
            'c' | 'C' => Some(Input::Clear),
            _ => Operator::from_symbol(c).map(Input::Operator),
        }
    }
}

/// Parse a scripted key sequence.
///
/// Single characters map through [`Input::from_char`]; named keys are
/// written in braces, e.g. `"12{Backspace}3+4{Enter}"`. Whitespace, unknown
/// characters and unknown key names are skipped; an unterminated `{` is
/// read as plain characters.
pub fn parse_sequence(text: &str) -> Vec<Input> {
    let mut inputs = Vec::with_capacity(text.len());
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if c == '{' {
            if let Some(end) = rest.find('}') {
                if let Some(input) = Input::from_key(&rest[1..end]) {
                    inputs.push(input);
                }
                rest = &rest[end + 1..];
                continue;
            }
        }
        if let Some(input) = Input::from_char(c) {
            inputs.push(input);
        }
        rest = &rest[c.len_utf8()..];
    }

    inputs
}
