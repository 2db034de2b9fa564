// --- File: crates/courier_webhook/src/logic.rs ---

use chrono::{DateTime, Utc};
use courier_common::{CourierError, HttpStatusCode};
use courier_config::{Channel, HttpMethod, WebhookConfig};
use courier_store::{Document, DocumentStore, FieldValue, Fields, Order, StoreError};
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, warn};

// Conditionally import ToSchema if openapi feature is enabled
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Substituted when a success response carries no message identifier.
pub const UNKNOWN_MESSAGE_ID: &str = "unknown_id";

// --- Error Handling ---
#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("No webhook URL configured for channel {0}")]
    MissingUrl(Channel),
    #[error("Webhook request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Webhook delivery failed: HTTP {status}")]
    DeliveryFailed { status: u16 },
    #[error("History retrieval failed: {0}")]
    RetrievalError(#[source] StoreError),
    #[error("History record deletion failed: {0}")]
    StoreDeleteError(#[source] StoreError),
}

impl HttpStatusCode for WebhookError {
    fn status_code(&self) -> u16 {
        match self {
            WebhookError::MissingUrl(_) => 500,
            WebhookError::RequestError(_) => 502,
            WebhookError::DeliveryFailed { .. } => 502,
            WebhookError::RetrievalError(_) => 500,
            WebhookError::StoreDeleteError(_) => 500,
        }
    }
}

impl From<WebhookError> for CourierError {
    fn from(err: WebhookError) -> Self {
        match err {
            WebhookError::MissingUrl(channel) => {
                CourierError::Configuration(format!("no webhook URL configured for {channel}"))
            }
            WebhookError::RequestError(e) => CourierError::Http(e.to_string()),
            WebhookError::DeliveryFailed { status } => CourierError::Delivery { status },
            WebhookError::RetrievalError(e) => CourierError::Retrieval(e.to_string()),
            WebhookError::StoreDeleteError(e) => CourierError::Store(e.to_string()),
        }
    }
}

// --- Data Structures ---

/// One previously dispatched message, as stored in the channel's history
/// collection.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct HistoryRecord {
    /// Identity of the record in the document store
    pub doc_id: String,
    /// Identity the delivery endpoint assigned to the message
    pub message_id: String,
    pub message: String,
    /// None when the stored timestamp is missing or unreadable
    pub created_at: Option<DateTime<Utc>>,
}

/// Terminal result of a successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub message_id: String,
}

fn request_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Appends the flag asking the endpoint to wait for completion and return
/// the created message object.
pub fn with_wait_flag(url: &str) -> String {
    if url.contains('?') {
        format!("{url}&wait=true")
    } else {
        format!("{url}?wait=true")
    }
}

fn configured_url(config: &WebhookConfig, channel: Channel) -> Result<&str, WebhookError> {
    config
        .url
        .as_deref()
        .filter(|url| !url.is_empty())
        .ok_or(WebhookError::MissingUrl(channel))
}

fn extract_message_id(body: &Value) -> String {
    match body.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => UNKNOWN_MESSAGE_ID.to_string(),
    }
}

// --- Operations ---

/// Sends `message` to the channel's endpoint and records it in the
/// channel's history collection.
///
/// Exactly one outbound call is made, and on delivery success exactly one
/// store write is attempted. The write is best-effort: once the endpoint
/// has accepted the message the outcome is success, and a failed history
/// write is only logged.
pub async fn dispatch_message(
    client: &Client,
    store: &dyn DocumentStore,
    channel: Channel,
    config: &WebhookConfig,
    message: &str,
) -> Result<DispatchOutcome, WebhookError> {
    let url = with_wait_flag(configured_url(config, channel)?);

    let mut request = client.request(request_method(config.method), &url);
    if config.method != HttpMethod::Get {
        request = request.json(&json!({ "content": message }));
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(WebhookError::DeliveryFailed {
            status: status.as_u16(),
        });
    }

    let message_id = match response.json::<Value>().await {
        Ok(body) => extract_message_id(&body),
        Err(_) => UNKNOWN_MESSAGE_ID.to_string(),
    };

    let mut fields = Fields::new();
    fields.insert("id".to_string(), FieldValue::from(message_id.clone()));
    fields.insert("message".to_string(), FieldValue::from(message));
    fields.insert("createdAt".to_string(), FieldValue::from(Utc::now()));
    if let Err(err) = store.create(&channel.history_collection(), fields).await {
        warn!(channel = %channel, "failed to record message history: {err}");
    }

    info!(channel = %channel, message_id = %message_id, "message delivered");
    Ok(DispatchOutcome { message_id })
}

/// Reads the channel's full history, newest first.
pub async fn get_history(
    store: &dyn DocumentStore,
    channel: Channel,
) -> Result<Vec<HistoryRecord>, WebhookError> {
    let documents = store
        .list(&channel.history_collection(), Order::desc("createdAt"))
        .await
        .map_err(WebhookError::RetrievalError)?;
    Ok(documents.iter().map(decode_history).collect())
}

fn decode_history(document: &Document) -> HistoryRecord {
    HistoryRecord {
        doc_id: document.id.clone(),
        // Old records may predate the id field; fall back to the store id
        message_id: document
            .fields
            .get("id")
            .and_then(FieldValue::as_str)
            .unwrap_or(&document.id)
            .to_string(),
        message: document
            .fields
            .get("message")
            .and_then(FieldValue::as_str)
            .unwrap_or_default()
            .to_string(),
        created_at: document
            .fields
            .get("createdAt")
            .and_then(FieldValue::as_timestamp),
    }
}

/// Deletes one history entry: first the remote message, then the store
/// record.
///
/// The store record is only removed after the endpoint confirms the remote
/// delete, so a failed remote delete (including a message already removed
/// out-of-band) leaves the record in place and surfaces an error.
pub async fn delete_history(
    client: &Client,
    store: &dyn DocumentStore,
    channel: Channel,
    config: &WebhookConfig,
    message_id: &str,
    doc_id: &str,
) -> Result<(), WebhookError> {
    let url = configured_url(config, channel)?;
    let delete_url = format!("{}/messages/{}", url.trim_end_matches('/'), message_id);

    let response = client.delete(&delete_url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(WebhookError::DeliveryFailed {
            status: status.as_u16(),
        });
    }

    store
        .delete(&channel.history_collection(), doc_id)
        .await
        .map_err(WebhookError::StoreDeleteError)?;

    info!(channel = %channel, message_id = %message_id, "history entry deleted");
    Ok(())
}
