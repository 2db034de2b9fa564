// --- File: crates/courier_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error taxonomy shared across the workspace
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities

// Re-export error types and utilities for easier access
pub use error::{config_error, delivery_error, validation_error, CourierError, HttpStatusCode};

// Re-export HTTP utilities for easier access
pub use http::client::HTTP_CLIENT;

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level};
