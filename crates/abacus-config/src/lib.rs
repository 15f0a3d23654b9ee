#![deny(unsafe_code)]

//! Configuration loading and validation for Abacus.
//!
//! Loads TOML configuration files and validates them against expected ranges.
//! Provides the [`AppConfig`] type as the central configuration structure
//! shared by the engine and both front ends.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Largest rounding precision / fraction width accepted. Beyond this an
/// `f64` no longer carries meaningful decimal digits.
pub const MAX_DECIMAL_PLACES: u32 = 15;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Top-level application configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Arithmetic engine configuration.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Display formatting configuration.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Terminal front-end configuration.
    #[serde(default)]
    pub tui: TuiConfig,
}

/// Arithmetic engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of decimal places results are rounded to.
    #[serde(default = "default_precision")]
    pub precision: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
        }
    }
}

fn default_precision() -> u32 {
    8
}

/// How numbers are rendered on the display.
///
/// ## TOML Example
///
/// ```toml
/// [display]
/// group_separator = "."
/// decimal_separator = ","
/// grouping_threshold = 10000.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Separator inserted between thousands groups.
    #[serde(default = "default_group_separator")]
    pub group_separator: String,

    /// Separator between the integer and fractional parts.
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: String,

    /// Magnitude from which grouping kicks in.
    #[serde(default = "default_grouping_threshold")]
    pub grouping_threshold: f64,

    /// Maximum fractional digits shown for grouped numbers.
    #[serde(default = "default_max_fraction_digits")]
    pub max_fraction_digits: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            group_separator: default_group_separator(),
            decimal_separator: default_decimal_separator(),
            grouping_threshold: default_grouping_threshold(),
            max_fraction_digits: default_max_fraction_digits(),
        }
    }
}

fn default_group_separator() -> String {
    ",".to_string()
}

fn default_decimal_separator() -> String {
    ".".to_string()
}

fn default_grouping_threshold() -> f64 {
    1000.0
}

fn default_max_fraction_digits() -> u32 {
    8
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Terminal front-end configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuiConfig {
    /// Event poll interval in milliseconds.
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,

    /// How many ticks a pressed keypad button stays highlighted.
    #[serde(default = "default_flash_ticks")]
    pub flash_ticks: u8,

    /// Whether mouse clicks on the keypad are captured.
    #[serde(default = "default_mouse")]
    pub mouse: bool,

    /// Capacity of the in-memory log buffer shown in the Logs panel.
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate_ms(),
            flash_ticks: default_flash_ticks(),
            mouse: default_mouse(),
            log_capacity: default_log_capacity(),
        }
    }
}

fn default_tick_rate_ms() -> u64 {
    100
}

fn default_flash_ticks() -> u8 {
    2
}

fn default_mouse() -> bool {
    true
}

fn default_log_capacity() -> usize {
    500
}

impl AppConfig {
    /// Load configuration from a TOML file at the given path using async I/O.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        debug!(path = %path.display(), bytes = content.len(), "Read config file");
        Self::parse(&content)
    }

    /// Load the file if it exists, otherwise fall back to defaults.
    ///
    /// A file that exists but fails to parse or validate is still an error.
    pub async fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if tokio::fs::try_exists(path).await? {
            Self::load(path).await
        } else {
            debug!(path = %path.display(), "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.precision > MAX_DECIMAL_PLACES {
            return Err(ConfigError::Validation(format!(
                "engine.precision must be at most {MAX_DECIMAL_PLACES}, got {}",
                self.engine.precision
            )));
        }

        // Validate display config
        let display = &self.display;
        if display.decimal_separator.is_empty() {
            return Err(ConfigError::Validation(
                "display.decimal_separator must not be empty".to_string(),
            ));
        }
        if display.group_separator == display.decimal_separator {
            return Err(ConfigError::Validation(format!(
                "display.group_separator and display.decimal_separator must differ, both are {:?}",
                display.decimal_separator
            )));
        }
        for (name, sep) in [
            ("group_separator", &display.group_separator),
            ("decimal_separator", &display.decimal_separator),
        ] {
            if sep.chars().any(|c| c.is_ascii_digit() || c == '-') {
                return Err(ConfigError::Validation(format!(
                    "display.{name} must not contain digits or '-', got {sep:?}"
                )));
            }
        }
        if !display.grouping_threshold.is_finite() || display.grouping_threshold <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "display.grouping_threshold must be a positive number, got {}",
                display.grouping_threshold
            )));
        }
        if display.max_fraction_digits > MAX_DECIMAL_PLACES {
            return Err(ConfigError::Validation(format!(
                "display.max_fraction_digits must be at most {MAX_DECIMAL_PLACES}, got {}",
                display.max_fraction_digits
            )));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {:?}, got {:?}",
                valid_levels, self.logging.level
            )));
        }

        // Validate TUI config
        if self.tui.tick_rate_ms == 0 {
            return Err(ConfigError::Validation(
                "tui.tick_rate_ms must be non-zero".to_string(),
            ));
        }
        if self.tui.log_capacity == 0 {
            return Err(ConfigError::Validation(
                "tui.log_capacity must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
