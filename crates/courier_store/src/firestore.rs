//! Firestore REST v1 implementation of the document store capability.
//!
//! Documents are created with `POST …/documents/{collection}`, read back
//! ordered through `:runQuery` with a structured query, and deleted with
//! `DELETE …/documents/{collection}/{id}`. The live subscription is an
//! interval re-query that emits a snapshot whenever the result set differs
//! from the previous one; the realtime Listen channel is gRPC-only and out
//! of reach of the REST surface.

use crate::auth::get_access_token;
use crate::{value, Direction, Document, DocumentStore, Fields, Order};
use crate::{BoxFuture, StoreError, Subscription};
use courier_config::FirestoreConfig;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;

const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Client for one Firestore database.
#[derive(Clone)]
pub struct FirestoreStore {
    client: Client,
    project_id: String,
    base_url: String,
    key_path: Option<String>,
    poll_interval: Duration,
}

impl FirestoreStore {
    /// Creates a store from the Firestore section of the app config.
    pub fn new(config: &FirestoreConfig) -> Self {
        FirestoreStore {
            client: Client::new(),
            project_id: config.project_id.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            key_path: config.key_path.clone(),
            poll_interval: Duration::from_secs(
                config.poll_interval_secs.unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
            ),
        }
    }

    fn documents_root(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents",
            self.base_url, self.project_id
        )
    }

    async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, StoreError> {
        match self.key_path.as_deref() {
            Some(key_path) => {
                let token = get_access_token(key_path)
                    .await
                    .map_err(|e| StoreError::AuthError(e.to_string()))?;
                Ok(request.bearer_auth(token))
            }
            None => Ok(request),
        }
    }

    async fn create_document(
        &self,
        collection: String,
        fields: Fields,
    ) -> Result<Document, StoreError> {
        let url = format!("{}/{}", self.documents_root(), collection);
        let body = json!({ "fields": value::encode_fields(&fields) });

        let request = self.client.post(&url).json(&body);
        let response = self.authorize(request).await?.send().await?;
        let document: Value = check_status(response).await?.json().await?;
        value::decode_document(&document)
    }

    async fn run_query(
        &self,
        collection: String,
        order: Order,
    ) -> Result<Vec<Document>, StoreError> {
        let url = format!("{}:runQuery", self.documents_root());
        let direction = match order.direction {
            Direction::Ascending => "ASCENDING",
            Direction::Descending => "DESCENDING",
        };
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": collection }],
                "orderBy": [{
                    "field": { "fieldPath": order.field },
                    "direction": direction,
                }],
            }
        });

        let request = self.client.post(&url).json(&body);
        let response = self.authorize(request).await?.send().await?;
        let results: Vec<Value> = check_status(response).await?.json().await?;

        // runQuery interleaves read-time markers with documents
        results
            .iter()
            .filter_map(|entry| entry.get("document"))
            .map(value::decode_document)
            .collect()
    }

    async fn delete_document(&self, collection: String, doc_id: String) -> Result<(), StoreError> {
        let url = format!("{}/{}/{}", self.documents_root(), collection, doc_id);

        let request = self.client.delete(&url);
        let response = self.authorize(request).await?.send().await?;
        check_status(response).await?;
        Ok(())
    }

    async fn open_subscription(
        &self,
        collection: String,
        order: Order,
    ) -> Result<Subscription, StoreError> {
        // The opening query runs eagerly so configuration and auth problems
        // surface to the caller instead of dying inside the poll task.
        let initial = self.run_query(collection.clone(), order.clone()).await?;

        let (tx, rx) = mpsc::channel(16);
        let store = self.clone();
        let poll_interval = self.poll_interval;

        let task = tokio::spawn(async move {
            let mut last = initial.clone();
            if tx.send(initial).await.is_err() {
                return;
            }
            loop {
                tokio::time::sleep(poll_interval).await;
                match store.run_query(collection.clone(), order.clone()).await {
                    Ok(snapshot) => {
                        if snapshot != last {
                            last = snapshot.clone();
                            if tx.send(snapshot).await.is_err() {
                                return;
                            }
                        }
                    }
                    Err(err) => {
                        warn!(collection = %collection, "subscription poll failed: {err}");
                    }
                }
            }
        });

        Ok(Subscription::new(rx, task))
    }
}

async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(StoreError::ApiError {
        status: status.as_u16(),
        message,
    })
}

impl DocumentStore for FirestoreStore {
    fn create(&self, collection: &str, fields: Fields) -> BoxFuture<'_, Document, StoreError> {
        let collection = collection.to_string();
        Box::pin(async move { self.create_document(collection, fields).await })
    }

    fn list(&self, collection: &str, order: Order) -> BoxFuture<'_, Vec<Document>, StoreError> {
        let collection = collection.to_string();
        Box::pin(async move { self.run_query(collection, order).await })
    }

    fn delete(&self, collection: &str, doc_id: &str) -> BoxFuture<'_, (), StoreError> {
        let collection = collection.to_string();
        let doc_id = doc_id.to_string();
        Box::pin(async move { self.delete_document(collection, doc_id).await })
    }

    fn subscribe(&self, collection: &str, order: Order) -> BoxFuture<'_, Subscription, StoreError> {
        let collection = collection.to_string();
        Box::pin(async move { self.open_subscription(collection, order).await })
    }
}
