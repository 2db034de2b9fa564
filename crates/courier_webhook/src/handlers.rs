// --- File: crates/courier_webhook/src/handlers.rs ---
//! HTTP handlers for message dispatch and history.

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

use courier_common::{HttpStatusCode, HTTP_CLIENT};
use courier_config::{AppConfig, Channel};
use courier_store::DocumentStore;

use crate::logic::{delete_history, dispatch_message, get_history, HistoryRecord};
use crate::screen::{SendScreen, Submit};

/// Shared state for webhook handlers
#[derive(Clone)]
pub struct WebhookState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DocumentStore>,
}

/// Request body for sending a message
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SendMessageRequest {
    /// Destination channel; rejected with a validation error when absent
    pub channel: Option<Channel>,
    pub message: String,
}

/// Response body for the send endpoint — the terminal send-screen state
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SendMessageResponse {
    pub success: bool,
    /// Identifier the endpoint assigned to the delivered message
    pub message_id: Option<String>,
    /// Success string shown to the user
    pub response: Option<String>,
    /// Error string shown to the user
    pub error: Option<String>,
}

impl SendMessageResponse {
    fn from_screen(screen: &SendScreen) -> Self {
        let message_id = match screen {
            SendScreen::Success { message_id, .. } => Some(message_id.clone()),
            _ => None,
        };
        SendMessageResponse {
            success: screen.response().is_some(),
            message_id,
            response: screen.response().map(str::to_string),
            error: screen.error().map(str::to_string),
        }
    }
}

/// One entry of the channel listing
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ChannelInfo {
    pub channel: Channel,
    pub label: String,
    /// Whether a webhook URL is configured for this channel
    pub configured: bool,
}

/// Response body for the history listing endpoint
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HistoryListResponse {
    pub success: bool,
    pub histories: Vec<HistoryRecord>,
    pub error: Option<String>,
}

/// Request body for deleting one history entry
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DeleteHistoryRequest {
    /// Identifier of the message at the delivery endpoint
    pub message_id: String,
    /// Identifier of the history record in the document store
    pub doc_id: String,
}

/// Response body for the history deletion endpoint
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DeleteHistoryResponse {
    pub success: bool,
    pub error: Option<String>,
}

/// Handler for dispatching a message to a channel's webhook.
///
/// Drives one send screen through its lifecycle: validate, dispatch,
/// resolve; the response body is the serialized terminal state.
#[axum::debug_handler]
pub async fn send_message_handler(
    State(state): State<Arc<WebhookState>>,
    Json(payload): Json<SendMessageRequest>,
) -> Response {
    let mut screen = SendScreen::new();
    if screen.submit(payload.channel, &payload.message) == Submit::Rejected {
        return (
            StatusCode::BAD_REQUEST,
            Json(SendMessageResponse::from_screen(&screen)),
        )
            .into_response();
    }
    // submit only accepts with a channel present
    let channel = payload.channel.expect("channel validated by submit");

    debug!(channel = %channel, "dispatching message");
    let result = dispatch_message(
        &HTTP_CLIENT,
        state.store.as_ref(),
        channel,
        state.config.webhook(channel),
        &payload.message,
    )
    .await;

    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(err) => {
            error!(channel = %channel, "dispatch failed: {err}");
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        }
    };
    screen.resolve(result);

    (status, Json(SendMessageResponse::from_screen(&screen))).into_response()
}

/// Handler returning the channel list with display labels, so the form can
/// populate its selector from configuration.
#[axum::debug_handler]
pub async fn list_channels_handler(State(state): State<Arc<WebhookState>>) -> Json<Vec<ChannelInfo>> {
    let channels = Channel::ALL
        .iter()
        .map(|&channel| {
            let webhook = state.config.webhook(channel);
            ChannelInfo {
                channel,
                label: webhook.label.clone(),
                configured: webhook.url.as_deref().map(|url| !url.is_empty()).unwrap_or(false),
            }
        })
        .collect();
    Json(channels)
}

/// Handler for reading a channel's history, newest first.
#[axum::debug_handler]
pub async fn get_history_handler(
    State(state): State<Arc<WebhookState>>,
    Path(channel): Path<Channel>,
) -> Response {
    match get_history(state.store.as_ref(), channel).await {
        Ok(histories) => Json(HistoryListResponse {
            success: true,
            histories,
            error: None,
        })
        .into_response(),
        Err(err) => {
            error!(channel = %channel, "history retrieval failed: {err}");
            (
                StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                Json(HistoryListResponse {
                    success: false,
                    histories: Vec::new(),
                    error: Some(err.to_string()),
                }),
            )
                .into_response()
        }
    }
}

/// Handler for the compound history deletion: remote message first, store
/// record only after the endpoint confirmed.
#[axum::debug_handler]
pub async fn delete_history_handler(
    State(state): State<Arc<WebhookState>>,
    Path(channel): Path<Channel>,
    Json(payload): Json<DeleteHistoryRequest>,
) -> Response {
    match delete_history(
        &HTTP_CLIENT,
        state.store.as_ref(),
        channel,
        state.config.webhook(channel),
        &payload.message_id,
        &payload.doc_id,
    )
    .await
    {
        Ok(()) => Json(DeleteHistoryResponse {
            success: true,
            error: None,
        })
        .into_response(),
        Err(err) => {
            error!(channel = %channel, "history deletion failed: {err}");
            (
                StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                Json(DeleteHistoryResponse {
                    success: false,
                    error: Some(err.to_string()),
                }),
            )
                .into_response()
        }
    }
}
