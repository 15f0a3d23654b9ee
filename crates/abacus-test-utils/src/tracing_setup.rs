//! Tracing initialisation helpers for tests.
//!
//! Call [`init_test_tracing`] at the top of any test whose engine logs you
//! want to see. The subscriber is installed at most once per process.

use tracing_subscriber::EnvFilter;

/// Install a subscriber that writes to the test-harness writer and
/// respects `RUST_LOG` (default `debug`, so engine transitions show up).
///
/// Safe to call multiple times; later calls are ignored.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
