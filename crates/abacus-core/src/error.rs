//! Computation failures.
//!
//! These never escape the engine's public operations: [`Calculator`]
//! turns every [`CalcError`] into the `"Error"` display sentinel. They are
//! kept typed so the cause can be logged.
//!
//! [`Calculator`]: crate::Calculator

/// Why a pending operation could not be resolved.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalcError {
    #[error("operand is not a number: {0:?}")]
    InvalidOperand(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("result is not finite")]
    NonFinite,
}
