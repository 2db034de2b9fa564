// --- File: crates/courier_reminders/src/logic.rs ---

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use courier_common::{CourierError, HttpStatusCode};
use courier_config::Channel;
use courier_store::{Document, DocumentStore, FieldValue, Fields, Order, StoreError, Subscription};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

// Conditionally import ToSchema if openapi feature is enabled
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// The single shared collection holding reminders for every channel.
pub const REMINDERS_COLLECTION: &str = "reminders";

// --- Error Handling ---
// The four validation variants carry the user-facing message for the first
// failing check; validation order is part of the contract.
#[derive(Error, Debug)]
pub enum ReminderError {
    #[error("Enter the reminder message")]
    EmptyMessage,
    #[error("Set both the reminder date and time")]
    MissingSchedule,
    #[error("Select a destination channel")]
    MissingChannel,
    #[error("Invalid reminder date or time")]
    InvalidSchedule,
    #[error("The scheduled time must be in the future")]
    PastSchedule,
    #[error("Reminder retrieval failed: {0}")]
    RetrievalError(#[source] StoreError),
    #[error("Reminder store operation failed: {0}")]
    StoreError(#[source] StoreError),
}

impl HttpStatusCode for ReminderError {
    fn status_code(&self) -> u16 {
        match self {
            ReminderError::EmptyMessage
            | ReminderError::MissingSchedule
            | ReminderError::MissingChannel
            | ReminderError::InvalidSchedule
            | ReminderError::PastSchedule => 400,
            ReminderError::RetrievalError(_) => 500,
            ReminderError::StoreError(_) => 500,
        }
    }
}

impl From<ReminderError> for CourierError {
    fn from(err: ReminderError) -> Self {
        match err {
            ReminderError::RetrievalError(e) => CourierError::Retrieval(e.to_string()),
            ReminderError::StoreError(e) => CourierError::Store(e.to_string()),
            validation => CourierError::Validation(validation.to_string()),
        }
    }
}

// --- Data Structures ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    Pending,
    Sent,
    Failed,
}

impl ReminderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderStatus::Pending => "pending",
            ReminderStatus::Sent => "sent",
            ReminderStatus::Failed => "failed",
        }
    }

    fn parse(raw: &str) -> Option<ReminderStatus> {
        match raw {
            "pending" => Some(ReminderStatus::Pending),
            "sent" => Some(ReminderStatus::Sent),
            "failed" => Some(ReminderStatus::Failed),
            _ => None,
        }
    }
}

/// One registered reminder.
///
/// Created with status `pending`; this system never transitions the status
/// — delivery belongs to an external scheduler.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Reminder {
    pub doc_id: String,
    pub message: String,
    pub scheduled_at: DateTime<Utc>,
    pub channel: Channel,
    pub status: ReminderStatus,
    pub created_at: Option<DateTime<Utc>>,
}

/// Raw reminder registration input, as it arrives from the form.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct NewReminder {
    pub message: String,
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    /// Time of day, `HH:MM`
    pub time: String,
    pub channel: Option<Channel>,
}

// --- Validation ---

/// Runs the registration checks in their contractual order and returns the
/// channel plus the scheduled instant. The date and time are interpreted in
/// the server's local timezone, matching what the form shows the user.
pub fn validate_at(
    input: &NewReminder,
    now: DateTime<Utc>,
) -> Result<(Channel, DateTime<Utc>), ReminderError> {
    if input.message.trim().is_empty() {
        return Err(ReminderError::EmptyMessage);
    }
    if input.date.trim().is_empty() || input.time.trim().is_empty() {
        return Err(ReminderError::MissingSchedule);
    }
    let channel = input.channel.ok_or(ReminderError::MissingChannel)?;

    let date = NaiveDate::parse_from_str(input.date.trim(), "%Y-%m-%d")
        .map_err(|_| ReminderError::InvalidSchedule)?;
    let time = NaiveTime::parse_from_str(input.time.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(input.time.trim(), "%H:%M:%S"))
        .map_err(|_| ReminderError::InvalidSchedule)?;
    let scheduled_at = Local
        .from_local_datetime(&date.and_time(time))
        .single()
        .ok_or(ReminderError::InvalidSchedule)?
        .with_timezone(&Utc);

    if scheduled_at <= now {
        return Err(ReminderError::PastSchedule);
    }

    Ok((channel, scheduled_at))
}

// --- Operations ---

/// Validates and persists a reminder with status `pending`.
pub async fn create_reminder(
    store: &dyn DocumentStore,
    input: &NewReminder,
) -> Result<Reminder, ReminderError> {
    let created_at = Utc::now();
    let (channel, scheduled_at) = validate_at(input, created_at)?;

    let mut fields = Fields::new();
    fields.insert("message".to_string(), FieldValue::from(input.message.as_str()));
    fields.insert("scheduledAt".to_string(), FieldValue::from(scheduled_at));
    fields.insert("channelType".to_string(), FieldValue::from(channel.as_str()));
    fields.insert(
        "status".to_string(),
        FieldValue::from(ReminderStatus::Pending.as_str()),
    );
    fields.insert("createdAt".to_string(), FieldValue::from(created_at));

    let document = store
        .create(REMINDERS_COLLECTION, fields)
        .await
        .map_err(ReminderError::StoreError)?;

    info!(channel = %channel, doc_id = %document.id, "reminder registered");
    Ok(Reminder {
        doc_id: document.id,
        message: input.message.clone(),
        scheduled_at,
        channel,
        status: ReminderStatus::Pending,
        created_at: Some(created_at),
    })
}

/// Reads all reminders, ordered by scheduled time ascending.
pub async fn list_reminders(store: &dyn DocumentStore) -> Result<Vec<Reminder>, ReminderError> {
    let documents = store
        .list(REMINDERS_COLLECTION, Order::asc("scheduledAt"))
        .await
        .map_err(ReminderError::RetrievalError)?;
    Ok(decode_reminders(&documents))
}

/// Opens the live subscription feeding the reminder list view.
pub async fn subscribe_reminders(store: &dyn DocumentStore) -> Result<Subscription, ReminderError> {
    store
        .subscribe(REMINDERS_COLLECTION, Order::asc("scheduledAt"))
        .await
        .map_err(ReminderError::RetrievalError)
}

/// Deletes one reminder. Reminders were never dispatched anywhere, so there
/// is no remote side effect to undo.
pub async fn delete_reminder(store: &dyn DocumentStore, doc_id: &str) -> Result<(), ReminderError> {
    store
        .delete(REMINDERS_COLLECTION, doc_id)
        .await
        .map_err(ReminderError::StoreError)?;
    info!(doc_id = %doc_id, "reminder deleted");
    Ok(())
}

/// Decodes a snapshot, dropping documents that do not form a reminder.
pub fn decode_reminders(documents: &[Document]) -> Vec<Reminder> {
    documents
        .iter()
        .filter_map(|document| match decode_reminder(document) {
            Some(reminder) => Some(reminder),
            None => {
                warn!(doc_id = %document.id, "skipping malformed reminder document");
                None
            }
        })
        .collect()
}

fn decode_reminder(document: &Document) -> Option<Reminder> {
    let fields = &document.fields;
    Some(Reminder {
        doc_id: document.id.clone(),
        message: fields.get("message")?.as_str()?.to_string(),
        scheduled_at: fields.get("scheduledAt")?.as_timestamp()?,
        channel: fields.get("channelType")?.as_str()?.parse().ok()?,
        status: ReminderStatus::parse(fields.get("status")?.as_str()?)?,
        created_at: fields.get("createdAt").and_then(FieldValue::as_timestamp),
    })
}
