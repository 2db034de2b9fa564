// --- File: crates/courier_reminders/src/routes.rs ---

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use courier_store::DocumentStore;

use crate::handlers::{
    create_reminder_handler, delete_reminder_handler, list_reminders_handler,
    stream_reminders_handler, ReminderState,
};

/// Creates the router for reminder endpoints.
pub fn routes(store: Arc<dyn DocumentStore>) -> Router {
    let state = Arc::new(ReminderState { store });

    Router::new()
        .route(
            "/reminders",
            post(create_reminder_handler).get(list_reminders_handler),
        )
        .route("/reminders/stream", get(stream_reminders_handler))
        .route("/reminders/{id}", delete(delete_reminder_handler))
        .with_state(state)
}
