// --- File: crates/courier_webhook/src/screen.rs ---
//! The send-form lifecycle as an explicit state machine.
//!
//! The form moves `Idle -> Sending -> Success | Error`; a rejected submit
//! stays `Idle` with only its error string set. Keeping this as one value
//! with two transition functions makes the "exactly one of success/error"
//! invariant checkable instead of living in loose flags.

use crate::logic::{DispatchOutcome, WebhookError};
use courier_common::CourierError;
use courier_config::Channel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendScreen {
    Idle { error: Option<String> },
    Sending,
    Success { response: String, message_id: String },
    Error { error: String },
}

/// Result of a submit attempt: whether the dispatch should be started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submit {
    Accepted,
    Rejected,
}

impl SendScreen {
    pub fn new() -> Self {
        SendScreen::Idle { error: None }
    }

    /// Validates the submit inputs. On acceptance the screen enters
    /// `Sending` with both outcome strings cleared; on rejection it stays
    /// idle with only the error string set.
    pub fn submit(&mut self, channel: Option<Channel>, message: &str) -> Submit {
        if channel.is_none() {
            *self = SendScreen::Idle {
                error: Some("Select a destination channel".to_string()),
            };
            return Submit::Rejected;
        }
        if message.trim().is_empty() {
            *self = SendScreen::Idle {
                error: Some("Enter a message".to_string()),
            };
            return Submit::Rejected;
        }
        *self = SendScreen::Sending;
        Submit::Accepted
    }

    /// Moves a `Sending` screen to its terminal state.
    pub fn resolve(&mut self, result: Result<DispatchOutcome, WebhookError>) {
        *self = match result {
            Ok(outcome) => SendScreen::Success {
                response: "Message sent successfully".to_string(),
                message_id: outcome.message_id,
            },
            Err(err) => SendScreen::Error {
                error: CourierError::from(err).to_string(),
            },
        };
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SendScreen::Sending)
    }

    pub fn response(&self) -> Option<&str> {
        match self {
            SendScreen::Success { response, .. } => Some(response),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SendScreen::Idle { error } => error.as_deref(),
            SendScreen::Error { error } => Some(error),
            _ => None,
        }
    }
}

impl Default for SendScreen {
    fn default() -> Self {
        Self::new()
    }
}
