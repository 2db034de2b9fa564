//! Integration tests for dispatch and history against a mock delivery
//! endpoint, with the in-memory store standing in for the document store.

use courier_config::{Channel, HttpMethod, WebhookConfig};
use courier_store::{
    BoxFuture, Document, DocumentStore, FieldValue, Fields, MemoryStore, Order, StoreError,
    Subscription,
};
use courier_webhook::logic::{
    delete_history, dispatch_message, get_history, WebhookError, UNKNOWN_MESSAGE_ID,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn webhook_config(url: Option<String>) -> WebhookConfig {
    WebhookConfig {
        label: "プレイ会".to_string(),
        url,
        method: HttpMethod::Post,
    }
}

async fn history_documents(store: &MemoryStore, channel: Channel) -> Vec<courier_store::Document> {
    store
        .list(&channel.history_collection(), Order::desc("createdAt"))
        .await
        .unwrap()
}

#[tokio::test]
async fn dispatch_without_a_configured_url_fails_fast() {
    let server = MockServer::start().await;
    let store = MemoryStore::new();

    let err = dispatch_message(
        &reqwest::Client::new(),
        &store,
        Channel::Create,
        &webhook_config(None),
        "hello",
    )
    .await
    .unwrap_err();

    assert!(matches!(err, WebhookError::MissingUrl(Channel::Create)));
    assert!(err.to_string().contains("CREATE"));
    // no network call was made
    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(history_documents(&store, Channel::Create).await.is_empty());
}

#[tokio::test]
async fn dispatch_delivers_and_records_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(query_param("wait", "true"))
        .and(body_json(json!({ "content": "テスト" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "123" })))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let outcome = dispatch_message(
        &reqwest::Client::new(),
        &store,
        Channel::Play,
        &webhook_config(Some(format!("{}/hook", server.uri()))),
        "テスト",
    )
    .await
    .unwrap();

    assert_eq!(outcome.message_id, "123");

    let documents = history_documents(&store, Channel::Play).await;
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].fields["id"].as_str(), Some("123"));
    assert_eq!(documents[0].fields["message"].as_str(), Some("テスト"));
    assert!(documents[0].fields["createdAt"].as_timestamp().is_some());
}

#[tokio::test]
async fn dispatch_substitutes_the_sentinel_when_the_response_has_no_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let outcome = dispatch_message(
        &reqwest::Client::new(),
        &store,
        Channel::Play,
        &webhook_config(Some(format!("{}/hook", server.uri()))),
        "no id here",
    )
    .await
    .unwrap();

    assert_eq!(outcome.message_id, UNKNOWN_MESSAGE_ID);
    let documents = history_documents(&store, Channel::Play).await;
    assert_eq!(documents[0].fields["id"].as_str(), Some(UNKNOWN_MESSAGE_ID));
}

/// Store double whose every operation fails, standing in for an
/// unreachable document store.
struct UnavailableStore;

impl DocumentStore for UnavailableStore {
    fn create(&self, _collection: &str, _fields: Fields) -> BoxFuture<'_, Document, StoreError> {
        Box::pin(async { Err(StoreError::ConfigError("store unavailable".to_string())) })
    }

    fn list(&self, _collection: &str, _order: Order) -> BoxFuture<'_, Vec<Document>, StoreError> {
        Box::pin(async { Err(StoreError::ConfigError("store unavailable".to_string())) })
    }

    fn delete(&self, _collection: &str, _doc_id: &str) -> BoxFuture<'_, (), StoreError> {
        Box::pin(async { Err(StoreError::ConfigError("store unavailable".to_string())) })
    }

    fn subscribe(&self, _collection: &str, _order: Order) -> BoxFuture<'_, Subscription, StoreError> {
        Box::pin(async { Err(StoreError::ConfigError("store unavailable".to_string())) })
    }
}

#[tokio::test]
async fn a_failed_history_write_does_not_undo_the_delivery() {
    // Delivery success is authoritative: once the endpoint accepted the
    // message, a failing history write is logged and the outcome stays
    // success with the delivered id.
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(query_param("wait", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "123" })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = dispatch_message(
        &reqwest::Client::new(),
        &UnavailableStore,
        Channel::Play,
        &webhook_config(Some(format!("{}/hook", server.uri()))),
        "テスト",
    )
    .await
    .unwrap();

    assert_eq!(outcome.message_id, "123");
}

#[tokio::test]
async fn dispatch_failure_writes_no_history_and_carries_the_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let err = dispatch_message(
        &reqwest::Client::new(),
        &store,
        Channel::Play,
        &webhook_config(Some(format!("{}/hook", server.uri()))),
        "failing",
    )
    .await
    .unwrap_err();

    assert!(matches!(err, WebhookError::DeliveryFailed { status: 500 }));
    assert!(err.to_string().contains("500"));
    assert!(history_documents(&store, Channel::Play).await.is_empty());
}

#[tokio::test]
async fn get_method_sends_no_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hook"))
        .and(query_param("wait", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "9" })))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let config = WebhookConfig {
        label: "get hook".to_string(),
        url: Some(format!("{}/hook", server.uri())),
        method: HttpMethod::Get,
    };
    let outcome = dispatch_message(&reqwest::Client::new(), &store, Channel::Draft, &config, "ping")
        .await
        .unwrap();
    assert_eq!(outcome.message_id, "9");

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn history_comes_back_newest_first() {
    let store = MemoryStore::new();
    for (id, minutes) in [("old", 0i64), ("new", 30), ("mid", 15)] {
        let mut fields = Fields::new();
        fields.insert("id".to_string(), FieldValue::from(id));
        fields.insert("message".to_string(), FieldValue::from(format!("m-{id}")));
        fields.insert(
            "createdAt".to_string(),
            FieldValue::from(chrono::Utc::now() + chrono::Duration::minutes(minutes)),
        );
        store
            .create(&Channel::Play.history_collection(), fields)
            .await
            .unwrap();
    }

    let histories = get_history(&store, Channel::Play).await.unwrap();
    let ids: Vec<_> = histories.iter().map(|h| h.message_id.as_str()).collect();
    assert_eq!(ids, ["new", "mid", "old"]);
}

#[tokio::test]
async fn history_deletion_removes_remote_then_local() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/hook/messages/123"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let mut fields = Fields::new();
    fields.insert("id".to_string(), FieldValue::from("123"));
    fields.insert("message".to_string(), FieldValue::from("bye"));
    fields.insert("createdAt".to_string(), FieldValue::from(chrono::Utc::now()));
    let document = store
        .create(&Channel::Play.history_collection(), fields)
        .await
        .unwrap();

    delete_history(
        &reqwest::Client::new(),
        &store,
        Channel::Play,
        &webhook_config(Some(format!("{}/hook", server.uri()))),
        "123",
        &document.id,
    )
    .await
    .unwrap();

    assert!(history_documents(&store, Channel::Play).await.is_empty());
}

#[tokio::test]
async fn failed_remote_delete_keeps_the_store_record() {
    let server = MockServer::start().await;
    // message already removed out-of-band
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let mut fields = Fields::new();
    fields.insert("id".to_string(), FieldValue::from("123"));
    fields.insert("message".to_string(), FieldValue::from("survivor"));
    fields.insert("createdAt".to_string(), FieldValue::from(chrono::Utc::now()));
    let document = store
        .create(&Channel::Play.history_collection(), fields)
        .await
        .unwrap();

    let err = delete_history(
        &reqwest::Client::new(),
        &store,
        Channel::Play,
        &webhook_config(Some(format!("{}/hook", server.uri()))),
        "123",
        &document.id,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, WebhookError::DeliveryFailed { status: 404 }));
    let documents = history_documents(&store, Channel::Play).await;
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].id, document.id);
}

#[tokio::test]
async fn history_deletion_without_a_url_touches_nothing() {
    let store = MemoryStore::new();
    let mut fields = Fields::new();
    fields.insert("id".to_string(), FieldValue::from("123"));
    fields.insert("message".to_string(), FieldValue::from("kept"));
    fields.insert("createdAt".to_string(), FieldValue::from(chrono::Utc::now()));
    let document = store
        .create(&Channel::Draft.history_collection(), fields)
        .await
        .unwrap();

    let err = delete_history(
        &reqwest::Client::new(),
        &store,
        Channel::Draft,
        &webhook_config(None),
        "123",
        &document.id,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, WebhookError::MissingUrl(Channel::Draft)));
    assert_eq!(history_documents(&store, Channel::Draft).await.len(), 1);
}
