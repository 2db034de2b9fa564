//! Webhook dispatch and message history for Courier.
//!
//! This crate owns the outbound side of the system: sending a message to a
//! channel's delivery endpoint, recording the denormalized history copy in
//! the document store, reading that history back, and the compound delete
//! that removes the remote message before the local record.
//!
//! # Delivery semantics
//!
//! Delivery success is authoritative: once the endpoint accepts a message
//! the operation reports success even when the follow-up history write
//! fails (that failure is logged only). The reverse asymmetry holds for
//! deletion: the store record is removed only after the endpoint confirmed
//! the remote delete, so the remote message can never outlive its local
//! record unnoticed.

pub mod handlers;
pub mod logic;
pub mod routes;
pub mod screen;

#[cfg(feature = "openapi")]
pub mod doc;

// Re-export the routes function to be used by the main backend service
pub use routes::routes;

#[cfg(feature = "openapi")]
pub mod openapi {
    pub use crate::doc::WebhookApiDoc;
}
