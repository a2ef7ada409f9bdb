//! Test harness for the terminal control
//!
//! Provides infrastructure for testing the control without a real UI.
//!
//! # Modules
//!
//! - `fake_core`: Recording terminal core
//! - `headless`: Control on a `calloop` loop with a recording host
//! - `loopback`: In-memory backend connection
//! - `assertions`: Common test assertions
//! - `fixtures`: Test fixture helpers

pub mod assertions;
pub mod fake_core;
pub mod fixtures;
pub mod headless;
pub mod loopback;

pub use fake_core::{CoreCall, FakeCore};
pub use headless::{ControlHarness, TestControl, TestHost};
pub use loopback::LoopbackConnection;

/// Route `tracing` output to the test writer, filtered by `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
