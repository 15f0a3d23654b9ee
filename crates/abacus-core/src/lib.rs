#![deny(unsafe_code)]

//! Abacus core: a four-function calculator engine.
//!
//! The [`Calculator`] is a small state machine driven by [`Input`]s. Front
//! ends (the TUI and the CLI) own one engine each, translate their own
//! events into inputs, and re-read [`Calculator::current_display_value`]
//! after every call.

/// Compile-time build metadata (version, git hash, profile).
pub mod build_info;
/// Number formatting for the display.
pub mod display;
/// The calculator state machine.
pub mod engine;
/// Internal computation failures.
pub mod error;
/// Key-to-input mapping.
pub mod input;
/// In-memory log collector for the TUI.
pub mod logging;
/// Binary arithmetic operators.
pub mod operator;

pub use display::DisplayFormat;
pub use engine::{Calculator, CalculatorState, ERROR_SENTINEL, PendingOperation, Settings};
pub use error::CalcError;
pub use input::{Input, parse_sequence};
pub use logging::{LogCollector, LogEntry, LogReader};
pub use operator::Operator;
