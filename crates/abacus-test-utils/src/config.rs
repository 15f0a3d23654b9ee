//! Configuration builders for tests.
//!
//! Use [`TestConfigBuilder`] to create customised [`AppConfig`] values, and
//! [`TempConfigFile`] when the code under test loads from disk.

use std::path::{Path, PathBuf};

use abacus_config::AppConfig;
use tempfile::TempDir;

/// Fluent builder for [`AppConfig`] in tests.
///
/// # Example
///
/// ```ignore
/// let config = TestConfigBuilder::new()
///     .precision(2)
///     .separators(".", ",")
///     .build();
/// ```
pub struct TestConfigBuilder {
    config: AppConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn precision(mut self, places: u32) -> Self {
        self.config.engine.precision = places;
        self
    }

    pub fn separators(mut self, group: &str, decimal: &str) -> Self {
        self.config.display.group_separator = group.to_string();
        self.config.display.decimal_separator = decimal.to_string();
        self
    }

    pub fn grouping_threshold(mut self, threshold: f64) -> Self {
        self.config.display.grouping_threshold = threshold;
        self
    }

    pub fn max_fraction_digits(mut self, digits: u32) -> Self {
        self.config.display.max_fraction_digits = digits;
        self
    }

    pub fn log_level(mut self, level: &str) -> Self {
        self.config.logging.level = level.to_string();
        self
    }

    pub fn flash_ticks(mut self, ticks: u8) -> Self {
        self.config.tui.flash_ticks = ticks;
        self
    }

    pub fn mouse(mut self, enabled: bool) -> Self {
        self.config.tui.mouse = enabled;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A config file in a temporary directory, deleted on drop.
pub struct TempConfigFile {
    path: PathBuf,
    _temp_dir: TempDir,
}

impl TempConfigFile {
    /// Write `toml_content` to `abacus.toml` in a fresh temp directory.
    pub async fn with_toml(toml_content: &str) -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("abacus.toml");
        tokio::fs::write(&path, toml_content)
            .await
            .expect("failed to write test config");
        Self {
            path,
            _temp_dir: temp_dir,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the file through the regular config loader.
    pub async fn load(&self) -> AppConfig {
        AppConfig::load(&self.path)
            .await
            .expect("failed to parse test config")
    }
}
