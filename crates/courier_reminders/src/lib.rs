//! Future-dated reminder registration for Courier.
//!
//! Reminders are validated, stored with status `pending`, and surfaced to
//! the form through a live-updating list. Nothing here dispatches them:
//! delivery at the scheduled time belongs to an external scheduler that
//! polls the same collection.

pub mod handlers;
pub mod logic;
pub mod routes;

#[cfg(feature = "openapi")]
pub mod doc;

// Re-export the routes function to be used by the main backend service
pub use routes::routes;

#[cfg(feature = "openapi")]
pub mod openapi {
    pub use crate::doc::ReminderApiDoc;
}
