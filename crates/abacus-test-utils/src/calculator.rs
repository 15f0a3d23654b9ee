//! Calculator fixtures.

use abacus_config::AppConfig;
use abacus_core::{Calculator, parse_sequence};

/// Feed a scripted key sequence (see [`parse_sequence`]) into `calc`.
pub fn press(calc: &mut Calculator, keys: &str) {
    calc.apply_all(parse_sequence(keys));
}

/// A default calculator after `keys` have been pressed.
pub fn run_keys(keys: &str) -> Calculator {
    let mut calc = Calculator::new();
    press(&mut calc, keys);
    calc
}

/// A calculator built from `config` after `keys` have been pressed.
pub fn run_keys_with(config: &AppConfig, keys: &str) -> Calculator {
    let mut calc = Calculator::from_config(config);
    press(&mut calc, keys);
    calc
}

/// Display value after `keys` on a default calculator.
pub fn display_after(keys: &str) -> String {
    run_keys(keys).current_display_value()
}
