// --- File: crates/courier_webhook/src/routes.rs ---
use axum::{
    routing::{get, post},
    Router,
};
use courier_config::AppConfig;
use courier_store::DocumentStore;
use std::sync::Arc;
use tracing::info;

use crate::handlers::{
    delete_history_handler, get_history_handler, list_channels_handler, send_message_handler,
    WebhookState,
};

/// Create the dispatch and history routes.
///
/// # Arguments
///
/// * `config` - The application configuration with the per-channel webhooks
/// * `store` - The document store holding the history collections
pub fn routes(config: Arc<AppConfig>, store: Arc<dyn DocumentStore>) -> Router {
    info!("Webhook routes initialized");

    let state = Arc::new(WebhookState { config, store });

    Router::new()
        .route("/send", post(send_message_handler))
        .route("/channels", get(list_channels_handler))
        .route(
            "/history/{channel}",
            get(get_history_handler).delete(delete_history_handler),
        )
        .with_state(state)
}
