#![allow(dead_code)]
// --- File: crates/courier_webhook/src/doc.rs ---
use utoipa::OpenApi;

use crate::handlers::{
    ChannelInfo, DeleteHistoryRequest, DeleteHistoryResponse, HistoryListResponse,
    SendMessageRequest, SendMessageResponse,
};
use crate::logic::HistoryRecord;

#[utoipa::path(
    post,
    path = "/send",
    request_body(content = SendMessageRequest, example = json!({
        "channel": "PLAY",
        "message": "テスト"
    })),
    responses(
        (status = 200, description = "Message delivered", body = SendMessageResponse,
         example = json!({
             "success": true,
             "message_id": "123",
             "response": "Message sent successfully",
             "error": null
         })
        ),
        (status = 400, description = "Validation failed",
         example = json!({
             "success": false,
             "message_id": null,
             "response": null,
             "error": "Select a destination channel"
         })
        ),
        (status = 500, description = "No webhook URL configured"),
        (status = 502, description = "Delivery endpoint rejected the message")
    ),
    tag = "Webhook"
)]
fn doc_send_message_handler() {}

#[utoipa::path(
    get,
    path = "/channels",
    responses(
        (status = 200, description = "Channel listing", body = [ChannelInfo])
    ),
    tag = "Webhook"
)]
fn doc_list_channels_handler() {}

#[utoipa::path(
    get,
    path = "/history/{channel}",
    params(("channel" = String, Path, description = "Channel identifier (PLAY, CREATE, DRAFT)")),
    responses(
        (status = 200, description = "History, newest first", body = HistoryListResponse),
        (status = 500, description = "Store read failed")
    ),
    tag = "Webhook"
)]
fn doc_get_history_handler() {}

#[utoipa::path(
    delete,
    path = "/history/{channel}",
    params(("channel" = String, Path, description = "Channel identifier (PLAY, CREATE, DRAFT)")),
    request_body = DeleteHistoryRequest,
    responses(
        (status = 200, description = "Remote message and store record deleted", body = DeleteHistoryResponse),
        (status = 502, description = "Remote delete failed; store record kept")
    ),
    tag = "Webhook"
)]
fn doc_delete_history_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_send_message_handler,
        doc_list_channels_handler,
        doc_get_history_handler,
        doc_delete_history_handler,
    ),
    components(
        schemas(
            SendMessageRequest,
            SendMessageResponse,
            ChannelInfo,
            HistoryListResponse,
            HistoryRecord,
            DeleteHistoryRequest,
            DeleteHistoryResponse,
        )
    ),
    tags(
        (name = "Webhook", description = "Message dispatch and history API")
    ),
    servers(
        (url = "/api", description = "Courier API server")
    )
)]
pub struct WebhookApiDoc;
