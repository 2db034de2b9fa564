#![allow(dead_code)]
// --- File: crates/courier_reminders/src/doc.rs ---
use utoipa::OpenApi;

use crate::handlers::{CreateReminderResponse, DeleteReminderResponse, ReminderListResponse};
use crate::logic::{NewReminder, Reminder, ReminderStatus};

#[utoipa::path(
    post,
    path = "/reminders",
    request_body(content = NewReminder, example = json!({
        "message": "会議の準備",
        "date": "2026-09-01",
        "time": "09:30",
        "channel": "PLAY"
    })),
    responses(
        (status = 200, description = "Reminder registered with status pending", body = CreateReminderResponse),
        (status = 400, description = "Validation failed",
         example = json!({
             "success": false,
             "error": "The scheduled time must be in the future"
         })
        ),
        (status = 500, description = "Store write failed")
    ),
    tag = "Reminders"
)]
fn doc_create_reminder_handler() {}

#[utoipa::path(
    get,
    path = "/reminders",
    responses(
        (status = 200, description = "All reminders, soonest first", body = ReminderListResponse),
        (status = 500, description = "Store read failed")
    ),
    tag = "Reminders"
)]
fn doc_list_reminders_handler() {}

#[utoipa::path(
    get,
    path = "/reminders/stream",
    responses(
        (status = 200, description = "Server-sent event stream of reminder list snapshots"),
        (status = 500, description = "Subscription could not be opened")
    ),
    tag = "Reminders"
)]
fn doc_stream_reminders_handler() {}

#[utoipa::path(
    delete,
    path = "/reminders/{id}",
    params(("id" = String, Path, description = "Reminder document id")),
    responses(
        (status = 200, description = "Reminder deleted", body = DeleteReminderResponse),
        (status = 500, description = "Store delete failed")
    ),
    tag = "Reminders"
)]
fn doc_delete_reminder_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_create_reminder_handler,
        doc_list_reminders_handler,
        doc_stream_reminders_handler,
        doc_delete_reminder_handler,
    ),
    components(
        schemas(
            NewReminder,
            Reminder,
            ReminderStatus,
            CreateReminderResponse,
            ReminderListResponse,
            DeleteReminderResponse,
        )
    ),
    tags(
        (name = "Reminders", description = "Future-dated reminder registration API")
    ),
    servers(
        (url = "/api", description = "Courier API server")
    )
)]
pub struct ReminderApiDoc;
