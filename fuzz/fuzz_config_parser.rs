//! Fuzz target for the TOML configuration parser.
//!
//! Run with: cargo +nightly fuzz run fuzz_config_parser
//!
//! Feeds arbitrary text to `AppConfig::parse()`. Any config that passes
//! validation must also yield a display formatter that handles a few
//! awkward values without panicking.

#![no_main]

use abacus_config::AppConfig;
use abacus_core::DisplayFormat;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = AppConfig::parse(s) {
        let format = DisplayFormat::from(&config.display);
        for value in ["0", "-1234567.891", "1e300", "0.", "Error", "NaN"] {
            let _ = format.format(value);
        }
    }
});
