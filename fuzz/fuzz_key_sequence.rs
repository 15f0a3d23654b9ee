//! Fuzz target for the calculator engine.
//!
//! Run with: cargo +nightly fuzz run fuzz_key_sequence
//!
//! The first byte picks the rounding precision; the rest is read as a
//! scripted key sequence. After every input the engine state must stay
//! well formed.

#![no_main]

use abacus_config::AppConfig;
use abacus_core::{Calculator, CalculatorState, parse_sequence};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&first, rest)) = data.split_first() else {
        return;
    };
    let Ok(keys) = std::str::from_utf8(rest) else {
        return;
    };

    let mut config = AppConfig::default();
    config.engine.precision = u32::from(first) % 16;
    let mut calc = Calculator::from_config(&config);

    for input in parse_sequence(keys) {
        calc.apply(input);
        let state = calc.state();
        assert!(!state.current_input().is_empty());
        assert_eq!(state.operator().is_some(), state.previous_input().is_some());
        let _ = calc.current_display_value();
        let _ = calc.expression();
    }

    calc.clear();
    assert_eq!(calc.state(), &CalculatorState::default());
});
