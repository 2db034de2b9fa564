//! Integration tests for the Firestore REST client against a mock server.

use courier_config::FirestoreConfig;
use courier_store::{DocumentStore, FieldValue, Fields, FirestoreStore, Order, StoreError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_for(server: &MockServer) -> FirestoreStore {
    FirestoreStore::new(&FirestoreConfig {
        project_id: "test-proj".to_string(),
        key_path: None,
        base_url: Some(server.uri()),
        poll_interval_secs: Some(1),
    })
}

fn message_fields(message: &str) -> Fields {
    let mut fields = Fields::new();
    fields.insert("message".to_string(), FieldValue::from(message));
    fields
}

#[tokio::test]
async fn create_posts_typed_fields_and_returns_the_assigned_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(
            "/projects/test-proj/databases/(default)/documents/PLAY_messages",
        ))
        .and(body_partial_json(json!({
            "fields": { "message": { "stringValue": "テスト" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/test-proj/databases/(default)/documents/PLAY_messages/abc123",
            "fields": { "message": { "stringValue": "テスト" } },
            "createTime": "2026-01-01T00:00:00Z",
            "updateTime": "2026-01-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let document = store
        .create("PLAY_messages", message_fields("テスト"))
        .await
        .unwrap();

    assert_eq!(document.id, "abc123");
    assert_eq!(document.fields["message"].as_str(), Some("テスト"));
}

#[tokio::test]
async fn list_runs_an_ordered_structured_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(
            "/projects/test-proj/databases/(default)/documents:runQuery",
        ))
        .and(body_partial_json(json!({
            "structuredQuery": {
                "from": [{ "collectionId": "PLAY_messages" }],
                "orderBy": [{
                    "field": { "fieldPath": "createdAt" },
                    "direction": "DESCENDING"
                }]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "document": {
                    "name": "projects/test-proj/databases/(default)/documents/PLAY_messages/newer",
                    "fields": { "message": { "stringValue": "second" } }
                }
            },
            {
                "document": {
                    "name": "projects/test-proj/databases/(default)/documents/PLAY_messages/older",
                    "fields": { "message": { "stringValue": "first" } }
                }
            },
            { "readTime": "2026-01-01T00:00:00Z" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let documents = store
        .list("PLAY_messages", Order::desc("createdAt"))
        .await
        .unwrap();

    let ids: Vec<_> = documents.iter().map(|doc| doc.id.as_str()).collect();
    assert_eq!(ids, ["newer", "older"]);
}

#[tokio::test]
async fn delete_targets_the_document_resource() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(
            "/projects/test-proj/databases/(default)/documents/reminders/rem1",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.delete("reminders", "rem1").await.unwrap();
}

#[tokio::test]
async fn api_failures_surface_the_status_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("permission denied"))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let err = store
        .create("PLAY_messages", message_fields("nope"))
        .await
        .unwrap_err();

    match err {
        StoreError::ApiError { status, message } => {
            assert_eq!(status, 403);
            assert!(message.contains("permission denied"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn subscription_polls_and_emits_on_change() {
    let server = MockServer::start().await;

    // First response: empty collection; afterwards one document.
    Mock::given(method("POST"))
        .and(path(
            "/projects/test-proj/databases/(default)/documents:runQuery",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "readTime": "2026-01-01T00:00:00Z" }
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(
            "/projects/test-proj/databases/(default)/documents:runQuery",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "document": {
                    "name": "projects/test-proj/databases/(default)/documents/reminders/r1",
                    "fields": { "message": { "stringValue": "会議" } }
                }
            }
        ])))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let mut subscription = store
        .subscribe("reminders", Order::asc("scheduledAt"))
        .await
        .unwrap();

    let initial = subscription.next().await.unwrap();
    assert!(initial.is_empty());

    let changed = subscription.next().await.unwrap();
    assert_eq!(changed.len(), 1);
    assert_eq!(changed[0].id, "r1");
}
