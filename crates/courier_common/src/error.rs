// --- File: crates/courier_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The error taxonomy shared by every Courier operation.
///
/// Each crate keeps its own specific error enum and converts it into this
/// type at the handler boundary, so the HTTP layer deals with exactly one
/// representation. Nothing here ever escalates past the initiating request.
#[derive(Error, Debug)]
pub enum CourierError {
    /// A required piece of configuration (usually a webhook URL) is missing
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The delivery endpoint answered with a non-success status
    #[error("Delivery failed: HTTP {status}")]
    Delivery { status: u16 },

    /// The outbound HTTP call itself failed (no status available)
    #[error("Request failed: {0}")]
    Http(String),

    /// A document-store read could not be completed
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Client-side input failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// A document-store write or delete failed
    #[error("Store error: {0}")]
    Store(String),

    /// Anything that does not fit the categories above
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A trait for converting errors to HTTP status codes.
///
/// Implemented by error types so handlers can map any operation failure
/// to a response status consistently.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for CourierError {
    fn status_code(&self) -> u16 {
        match self {
            CourierError::Configuration(_) => 500,
            CourierError::Delivery { .. } => 502,
            CourierError::Http(_) => 502,
            CourierError::Retrieval(_) => 500,
            CourierError::Validation(_) => 400,
            CourierError::Store(_) => 500,
            CourierError::Internal(_) => 500,
        }
    }
}

// Common error conversions
impl From<reqwest::Error> for CourierError {
    fn from(err: reqwest::Error) -> Self {
        CourierError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for CourierError {
    fn from(err: serde_json::Error) -> Self {
        CourierError::Internal(err.to_string())
    }
}

// Utility functions for error construction
pub fn config_error<T: fmt::Display>(message: T) -> CourierError {
    CourierError::Configuration(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> CourierError {
    CourierError::Validation(message.to_string())
}

pub fn delivery_error(status: u16) -> CourierError {
    CourierError::Delivery { status }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_bad_request() {
        assert_eq!(validation_error("empty message").status_code(), 400);
    }

    #[test]
    fn delivery_errors_map_to_bad_gateway_and_carry_the_status() {
        let err = delivery_error(404);
        assert_eq!(err.status_code(), 502);
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn configuration_errors_map_to_internal_server_error() {
        assert_eq!(config_error("missing webhook URL").status_code(), 500);
    }
}
