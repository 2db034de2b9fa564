// --- File: crates/courier_common/src/logging.rs ---
//! Logging utilities for the Courier application.
//!
//! Provides a standardized tracing-subscriber setup used by the backend
//! binary and by integration tests that want log output.

use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber with the default log level (INFO).
///
/// This should be called once at the start of the application. Repeated
/// calls are harmless: initialization is attempted with `try_init` so a
/// subscriber that is already installed wins.
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level.
///
/// The `RUST_LOG` environment variable still takes precedence via
/// `EnvFilter::from_default_env`; `level` only sets the directive for the
/// `courier` crates.
pub fn init_with_level(level: Level) {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("courier={}", level).parse().expect("valid directive"));

    let result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_file(true).with_line_number(true))
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}
