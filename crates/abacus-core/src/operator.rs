//! Binary arithmetic operators.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::CalcError;

/// One of the four supported binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// All operators, in keypad order.
    pub const ALL: [Operator; 4] = [
        Operator::Divide,
        Operator::Multiply,
        Operator::Subtract,
        Operator::Add,
    ];

    /// Parse an operator from its ASCII symbol.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            '*' => Some(Operator::Multiply),
            '/' => Some(Operator::Divide),
            _ => None,
        }
    }

    /// The ASCII symbol for this operator.
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    /// Apply the operator to two operands.
    ///
    /// Division by exactly zero (either sign) fails; every other
    /// combination of finite operands produces a value, which may itself
    /// be non-finite on overflow.
    pub fn apply(self, lhs: f64, rhs: f64) -> Result<f64, CalcError> {
        match self {
            Operator::Add => Ok(lhs + rhs),
            Operator::Subtract => Ok(lhs - rhs),
            Operator::Multiply => Ok(lhs * rhs),
            Operator::Divide if rhs == 0.0 => Err(CalcError::DivisionByZero),
            Operator::Divide => Ok(lhs / rhs),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.symbol())
    }
}
