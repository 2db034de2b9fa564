// --- File: crates/courier_reminders/src/handlers.rs ---

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::IntoResponse,
    Json,
};
use courier_common::HttpStatusCode;
use courier_store::{DocumentStore, Subscription};
use futures_util::stream::Stream;
use serde::Serialize;
use tracing::{error, info};

// Conditionally import ToSchema if openapi feature is enabled
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::logic::{
    create_reminder, decode_reminders, delete_reminder, list_reminders, subscribe_reminders,
    NewReminder, Reminder,
};

/// Shared state for the reminder handlers.
#[derive(Clone)]
pub struct ReminderState {
    pub store: Arc<dyn DocumentStore>,
}

// --- Response Structs ---

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateReminderResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder: Option<Reminder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ReminderListResponse {
    pub success: bool,
    pub reminders: Vec<Reminder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct DeleteReminderResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// --- Handlers ---

/// Handler to register a new reminder.
#[axum::debug_handler]
pub async fn create_reminder_handler(
    State(state): State<Arc<ReminderState>>,
    Json(payload): Json<NewReminder>,
) -> impl IntoResponse {
    info!("Received request to register a reminder");
    match create_reminder(state.store.as_ref(), &payload).await {
        Ok(reminder) => (
            StatusCode::OK,
            Json(CreateReminderResponse {
                success: true,
                reminder: Some(reminder),
                error: None,
            }),
        ),
        Err(err) => {
            error!("Failed to register reminder: {}", err);
            let status = StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status,
                Json(CreateReminderResponse {
                    success: false,
                    reminder: None,
                    error: Some(err.to_string()),
                }),
            )
        }
    }
}

/// Handler to return the current reminder list, soonest first.
#[axum::debug_handler]
pub async fn list_reminders_handler(
    State(state): State<Arc<ReminderState>>,
) -> impl IntoResponse {
    match list_reminders(state.store.as_ref()).await {
        Ok(reminders) => (
            StatusCode::OK,
            Json(ReminderListResponse {
                success: true,
                reminders,
                error: None,
            }),
        ),
        Err(err) => {
            error!("Failed to list reminders: {}", err);
            (
                StatusCode::from_u16(err.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                Json(ReminderListResponse {
                    success: false,
                    reminders: Vec::new(),
                    error: Some(err.to_string()),
                }),
            )
        }
    }
}

/// Handler to delete a reminder by document id.
#[axum::debug_handler]
pub async fn delete_reminder_handler(
    State(state): State<Arc<ReminderState>>,
    Path(doc_id): Path<String>,
) -> impl IntoResponse {
    info!("Received request to delete reminder {}", doc_id);
    match delete_reminder(state.store.as_ref(), &doc_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(DeleteReminderResponse {
                success: true,
                error: None,
            }),
        ),
        Err(err) => {
            error!("Failed to delete reminder {}: {}", doc_id, err);
            (
                StatusCode::from_u16(err.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                Json(DeleteReminderResponse {
                    success: false,
                    error: Some(err.to_string()),
                }),
            )
        }
    }
}

/// Handler streaming live reminder snapshots as server-sent events.
///
/// Each event carries the full decoded list. The underlying subscription is
/// released when the client disconnects and the stream is dropped.
#[axum::debug_handler]
pub async fn stream_reminders_handler(
    State(state): State<Arc<ReminderState>>,
) -> impl IntoResponse {
    match subscribe_reminders(state.store.as_ref()).await {
        Ok(subscription) => {
            info!("Opened reminder subscription stream");
            Sse::new(snapshot_events(subscription))
                .keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
                .into_response()
        }
        Err(err) => {
            error!("Failed to open reminder subscription: {}", err);
            (
                StatusCode::from_u16(err.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                Json(ReminderListResponse {
                    success: false,
                    reminders: Vec::new(),
                    error: Some(err.to_string()),
                }),
            )
                .into_response()
        }
    }
}

/// Adapts the subscription into an SSE event stream. Dropping the stream
/// drops the subscription, which cancels the underlying watch task.
fn snapshot_events(
    subscription: Subscription,
) -> impl Stream<Item = Result<Event, Infallible>> {
    futures_util::stream::unfold(subscription, |mut subscription| async move {
        let documents = subscription.next().await?;
        let reminders = decode_reminders(&documents);
        let event = Event::default()
            .json_data(ReminderListResponse {
                success: true,
                reminders,
                error: None,
            })
            .unwrap_or_else(|_| Event::default().data("{}"));
        Some((Ok(event), subscription))
    })
}
