//! The calculator state machine.
//!
//! A [`Calculator`] owns one [`CalculatorState`] and mutates it through the
//! five input operations. It evaluates at most one pending binary
//! operation at a time, left to right, with no precedence.
//!
//! Failed computations never surface as errors to the caller. They put the
//! literal [`ERROR_SENTINEL`] into the current input and drop the pending
//! operation. From there:
//!
//! - digits and `.` start a fresh number,
//! - `delete_last` and `clear` reset to the default state,
//! - operators and `calculate` are ignored.

use abacus_config::AppConfig;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::{debug, trace, warn};

use crate::display::DisplayFormat;
use crate::error::CalcError;
use crate::input::Input;
use crate::operator::Operator;

/// Text stored as the current input after a failed computation.
pub const ERROR_SENTINEL: &str = "Error";

/// An operator together with the left operand frozen when it was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOperation {
    pub operator: Operator,
    pub left: String,
}

/// Running state of one calculator session.
///
/// The operator and the previous input are stored together, so one is
/// never present without the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatorState {
    current_input: String,
    pending: Option<PendingOperation>,
    should_reset_display: bool,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            current_input: "0".to_string(),
            pending: None,
            should_reset_display: false,
        }
    }
}

impl CalculatorState {
    /// The operand being typed or just computed. Never empty.
    pub fn current_input(&self) -> &str {
        &self.current_input
    }

    /// The pending operator, if any.
    pub fn operator(&self) -> Option<Operator> {
        self.pending.as_ref().map(|p| p.operator)
    }

    /// The left operand of the pending operation, if any.
    pub fn previous_input(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.left.as_str())
    }

    pub fn pending(&self) -> Option<&PendingOperation> {
        self.pending.as_ref()
    }

    /// Whether the next digit starts a new number.
    pub fn should_reset_display(&self) -> bool {
        self.should_reset_display
    }

    /// Whether the last computation failed.
    pub fn is_error(&self) -> bool {
        self.current_input == ERROR_SENTINEL
    }
}

impl Serialize for CalculatorState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("CalculatorState", 4)?;
        s.serialize_field("current_input", &self.current_input)?;
        s.serialize_field("operator", &self.operator())?;
        s.serialize_field("previous_input", &self.previous_input())?;
        s.serialize_field("should_reset_display", &self.should_reset_display)?;
        s.end()
    }
}

/// Engine settings derived from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Decimal places results are rounded to.
    pub precision: u32,
    pub display: DisplayFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for Settings {
    fn from(config: &AppConfig) -> Self {
        Self {
            precision: config.engine.precision,
            display: DisplayFormat::from(&config.display),
        }
    }
}

/// A basic four-function calculator.
#[derive(Debug, Clone, Default)]
pub struct Calculator {
    state: CalculatorState,
    settings: Settings,
}

impl Calculator {
    /// Create a calculator with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            state: CalculatorState::default(),
            settings,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_settings(Settings::from(config))
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_error(&self) -> bool {
        self.state.is_error()
    }

    /// Append a digit or the decimal point to the current operand.
    ///
    /// Any other character is ignored.
    pub fn append_number(&mut self, token: char) {
        if !(token.is_ascii_digit() || token == '.') {
            trace!(?token, "Ignoring non-numeric token");
            return;
        }

        if self.state.should_reset_display || self.state.is_error() {
            self.state.current_input = "0".to_string();
            self.state.should_reset_display = false;
        }

        let current = &mut self.state.current_input;
        if token == '.' && current.contains('.') {
            trace!(current = %current, "Rejecting second decimal point");
            return;
        }
        if *current == "0" && token != '.' {
            current.clear();
        }
        current.push(token);
        trace!(current = %current, "Appended number");
    }

    /// Choose the pending operator, resolving any earlier operation whose
    /// right operand has already been typed.
    pub fn append_operator(&mut self, operator: Operator) {
        if self.state.is_error() {
            debug!(%operator, "Ignoring operator in error state");
            return;
        }

        if self.state.pending.is_some() && !self.state.should_reset_display {
            self.calculate();
            if self.state.is_error() {
                return;
            }
        }

        self.state.pending = Some(PendingOperation {
            operator,
            left: self.state.current_input.clone(),
        });
        self.state.should_reset_display = true;
        debug!(%operator, left = %self.state.current_input, "Operator pending");
    }

    /// Resolve the pending operation.
    ///
    /// Does nothing without a pending operator or before a right operand
    /// has been entered.
    pub fn calculate(&mut self) {
        let Some(pending) = self.state.pending.as_ref() else {
            trace!("Nothing to calculate");
            return;
        };
        if self.state.should_reset_display {
            trace!("Right operand missing, not calculating");
            return;
        }

        match evaluate(pending, &self.state.current_input, self.settings.precision) {
            Ok(value) => {
                let result = format_result(value);
                debug!(
                    left = %pending.left,
                    operator = %pending.operator,
                    right = %self.state.current_input,
                    %result,
                    "Calculated"
                );
                self.state.current_input = result;
            }
            Err(err) => {
                warn!(
                    left = %pending.left,
                    operator = %pending.operator,
                    right = %self.state.current_input,
                    error = %err,
                    "Calculation failed"
                );
                self.state.current_input = ERROR_SENTINEL.to_string();
            }
        }
        self.state.pending = None;
        self.state.should_reset_display = true;
    }

    /// Reset to the default state.
    pub fn clear(&mut self) {
        self.state = CalculatorState::default();
        debug!("Cleared");
    }

    /// Remove the last character of the current operand.
    pub fn delete_last(&mut self) {
        if self.state.is_error() {
            self.clear();
            return;
        }

        let current = &mut self.state.current_input;
        current.pop();
        if current.is_empty() || *current == "-" {
            *current = "0".to_string();
        }
        trace!(current = %current, "Deleted last character");
    }

    /// The current operand as it should be shown.
    pub fn current_display_value(&self) -> String {
        self.settings.display.format(&self.state.current_input)
    }

    /// The pending expression, e.g. `"1,500 +"`. Empty when nothing is pending.
    pub fn expression(&self) -> String {
        match &self.state.pending {
            Some(p) => format!("{} {}", self.settings.display.format(&p.left), p.operator),
            None => String::new(),
        }
    }

    /// Dispatch one mapped input to the matching operation.
    pub fn apply(&mut self, input: Input) {
        match input {
            Input::Number(token) => self.append_number(token),
            Input::Operator(op) => self.append_operator(op),
            Input::Calculate => self.calculate(),
            Input::Clear => self.clear(),
            Input::DeleteLast => self.delete_last(),
        }
    }

    pub fn apply_all(&mut self, inputs: impl IntoIterator<Item = Input>) {
        for input in inputs {
            self.apply(input);
        }
    }
}

fn evaluate(pending: &PendingOperation, right: &str, precision: u32) -> Result<f64, CalcError> {
    let lhs = parse_operand(&pending.left)?;
    let rhs = parse_operand(right)?;
    let raw = pending.operator.apply(lhs, rhs)?;
    let rounded = round_to(raw, precision);
    if rounded.is_finite() {
        Ok(rounded)
    } else {
        Err(CalcError::NonFinite)
    }
}

fn parse_operand(text: &str) -> Result<f64, CalcError> {
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CalcError::InvalidOperand(text.to_string()))
}

/// Round half away from zero after nudging by one machine epsilon, so
/// binary representation error (e.g. `0.1 + 0.2`) does not leak into the
/// displayed digits.
fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    ((value + f64::EPSILON) * factor).round() / factor
}

fn format_result(value: f64) -> String {
    if value == 0.0 {
        // Collapses -0
        "0".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn press(calc: &mut Calculator, keys: &str) {
        calc.apply_all(crate::input::parse_sequence(keys));
    }

    fn run(keys: &str) -> Calculator {
        let mut calc = Calculator::new();
        press(&mut calc, keys);
        calc
    }

    // ── Number entry ──────────────────────────────────────────────

    #[test]
    fn test_default_state() {
        let calc = Calculator::new();
        assert_eq!(calc.state().current_input(), "0");
        assert_eq!(calc.state().operator(), None);
        assert_eq!(calc.state().previous_input(), None);
        assert!(!calc.state().should_reset_display());
        assert_eq!(calc.current_display_value(), "0");
    }

    #[test]
    fn test_leading_zero_replaced() {
        assert_eq!(run("7").state().current_input(), "7");
        assert_eq!(run("007").state().current_input(), "7");
        assert_eq!(run("0.07").state().current_input(), "0.07");
        assert_eq!(run("120").state().current_input(), "120");
    }

    #[test]
    fn test_second_decimal_point_ignored() {
        let mut calc = run("1.2");
        calc.append_number('.');
        assert_eq!(calc.state().current_input(), "1.2");
        assert_eq!(run("1.2.3").state().current_input(), "1.23");
    }

    #[test]
    fn test_leading_decimal_point() {
        assert_eq!(run(".5").state().current_input(), "0.5");
    }

    #[test]
    fn test_non_numeric_token_ignored() {
        let mut calc = run("4");
        calc.append_number('x');
        assert_eq!(calc.state().current_input(), "4");
    }

    // ── Delete / clear ────────────────────────────────────────────

    #[test]
    fn test_delete_last() {
        let mut calc = run("5");
        calc.delete_last();
        assert_eq!(calc.state().current_input(), "0");

        let mut calc = run("12");
        calc.delete_last();
        assert_eq!(calc.state().current_input(), "1");

        let mut calc = Calculator::new();
        calc.delete_last();
        assert_eq!(calc.state().current_input(), "0");
    }

    #[test]
    fn test_delete_last_on_negative_result() {
        let mut calc = run("3-5=");
        assert_eq!(calc.state().current_input(), "-2");
        calc.delete_last();
        assert_eq!(calc.state().current_input(), "0");
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut calc = run("12+3");
        calc.clear();
        assert_eq!(calc.state(), Calculator::new().state());
    }

    // ── Operators and calculation ─────────────────────────────────

    #[test]
    fn test_operator_freezes_operand() {
        let calc = run("12+");
        assert_eq!(calc.state().operator(), Some(Operator::Add));
        assert_eq!(calc.state().previous_input(), Some("12"));
        assert!(calc.state().should_reset_display());
        assert_eq!(calc.current_display_value(), "12");
    }

    #[test]
    fn test_digit_after_operator_starts_new_number() {
        let calc = run("12+3");
        assert_eq!(calc.state().current_input(), "3");
        assert!(!calc.state().should_reset_display());
    }

    #[test]
    fn test_basic_operations() {
        assert_eq!(run("5+3=").current_display_value(), "8");
        assert_eq!(run("5-8=").current_display_value(), "-3");
        assert_eq!(run("6*7=").current_display_value(), "42");
        assert_eq!(run("7/2=").current_display_value(), "3.5");
    }

    #[test]
    fn test_calculate_without_operator_is_noop() {
        let mut calc = run("42");
        let before = calc.state().clone();
        calc.calculate();
        assert_eq!(calc.state(), &before);
    }

    #[test]
    fn test_calculate_without_second_operand_is_noop() {
        let mut calc = run("42+");
        let before = calc.state().clone();
        calc.calculate();
        assert_eq!(calc.state(), &before);
    }

    #[test]
    fn test_chained_operators_left_to_right() {
        assert_eq!(run("5+3+2=").current_display_value(), "10");
        assert_eq!(run("2+3*4=").current_display_value(), "20");
    }

    #[test]
    fn test_replacing_operator() {
        let calc = run("5+-");
        assert_eq!(calc.state().operator(), Some(Operator::Subtract));
        assert_eq!(calc.state().previous_input(), Some("5"));
        assert_eq!(run("5+-2=").current_display_value(), "3");
    }

    #[test]
    fn test_result_feeds_next_operation() {
        assert_eq!(run("2+3=*4=").current_display_value(), "20");
    }

    #[test]
    fn test_digit_after_result_starts_new_number() {
        let calc = run("2+3=7");
        assert_eq!(calc.state().current_input(), "7");
    }

    #[test]
    fn test_repeated_equals_is_noop() {
        let calc = run("2+3==");
        assert_eq!(calc.state().current_input(), "5");
    }

    #[test]
    fn test_floating_point_rounding() {
        assert_eq!(run("0.1+0.2=").current_display_value(), "0.3");
        assert_eq!(run("1/3=").current_display_value(), "0.33333333");
        assert_eq!(run("2/3=").current_display_value(), "0.66666667");
    }

    #[test]
    fn test_negative_zero_collapses() {
        assert_eq!(run("0-0=").state().current_input(), "0");
        assert_eq!(run("0*5=").state().current_input(), "0");
    }

    #[test]
    fn test_grouped_result() {
        assert_eq!(run("1000+234.5=").current_display_value(), "1,234.5");
        assert_eq!(run("1000-1=").current_display_value(), "999");
    }

    #[test]
    fn test_custom_precision() {
        let settings = Settings {
            precision: 2,
            ..Settings::default()
        };
        let mut calc = Calculator::with_settings(settings);
        press(&mut calc, "1/3=");
        assert_eq!(calc.current_display_value(), "0.33");
    }

    #[test]
    fn test_expression() {
        assert_eq!(Calculator::new().expression(), "");
        assert_eq!(run("1500+").expression(), "1,500 +");
        assert_eq!(run("1500+2").expression(), "1,500 +");
        assert_eq!(run("1500+2=").expression(), "");
    }

    // ── Error state ───────────────────────────────────────────────

    #[test]
    fn test_division_by_zero() {
        let calc = run("8/0=");
        assert_eq!(calc.current_display_value(), "Error");
        assert!(calc.is_error());
        assert_eq!(calc.state().operator(), None);
        assert_eq!(calc.state().previous_input(), None);
    }

    #[test]
    fn test_overflow_is_error() {
        let mut calc = Calculator::new();
        for _ in 0..200 {
            calc.append_number('9');
        }
        press(&mut calc, "*");
        for _ in 0..200 {
            calc.append_number('9');
        }
        calc.calculate();
        assert!(calc.is_error());
    }

    #[test]
    fn test_digit_after_error_starts_fresh() {
        let calc = run("8/0=5");
        assert_eq!(calc.state().current_input(), "5");
        assert!(!calc.is_error());
    }

    #[test]
    fn test_decimal_after_error_starts_fresh() {
        let calc = run("8/0=.");
        assert_eq!(calc.state().current_input(), "0.");
    }

    #[test]
    fn test_delete_after_error_clears() {
        let mut calc = run("8/0=");
        calc.delete_last();
        assert_eq!(calc.state(), Calculator::new().state());
    }

    #[test]
    fn test_operator_after_error_ignored() {
        let mut calc = run("8/0=");
        calc.append_operator(Operator::Add);
        assert!(calc.is_error());
        assert_eq!(calc.state().operator(), None);
    }

    #[test]
    fn test_chained_division_by_zero() {
        let calc = run("8/0+");
        assert!(calc.is_error());
        assert_eq!(calc.state().operator(), None);
    }

    #[test]
    fn test_clear_after_error() {
        let mut calc = run("8/0=");
        calc.clear();
        assert_eq!(calc.state(), Calculator::new().state());
    }

    // ── Helpers ───────────────────────────────────────────────────

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.1 + 0.2, 8), 0.3);
        assert_eq!(round_to(2.5, 0), 3.0);
    }

    #[test]
    fn test_parse_operand_rejects_non_finite() {
        assert!(parse_operand("inf").is_err());
        assert!(parse_operand("NaN").is_err());
        assert!(parse_operand("Error").is_err());
        assert_eq!(parse_operand("5.").unwrap(), 5.0);
    }

    #[test]
    fn test_state_serializes_flat() {
        let calc = run("12+");
        let json = serde_json::to_value(calc.state()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "current_input": "12",
                "operator": "+",
                "previous_input": "12",
                "should_reset_display": true,
            })
        );
    }
}
