#![deny(unsafe_code)]

//! Shared test utilities for the Abacus workspace.
//!
//! Provides config builders, calculator fixtures and tracing helpers so
//! that individual crate tests stay concise and consistent.
//!
//! Add this crate as a `[dev-dependency]` in any workspace member:
//!
//! ```toml
//! [dev-dependencies]
//! abacus-test-utils = { workspace = true }
//! ```

pub mod calculator;
pub mod config;
pub mod tracing_setup;
