//! Document store capability for Courier.
//!
//! This crate provides the `DocumentStore` trait — the capability interface
//! the rest of the workspace programs against — plus two implementations:
//!
//! - `FirestoreStore`: Google Cloud Firestore via its REST v1 API, with
//!   service-account authentication
//! - `MemoryStore`: an in-process store used for local runs and tests
//!
//! All records live in named collections of flat documents. A collection
//! supports create, ordered read-all, delete-by-id, and a live subscription
//! that yields a full ordered snapshot whenever the collection changes. The
//! subscription handle releases its background task exactly once on drop,
//! whichever way the consumer exits.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub mod auth;
pub mod firestore;
pub mod memory;
pub mod value;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;
pub use value::FieldValue;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Errors that can occur when talking to the document store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Error during the HTTP request to the store
    #[error("Store request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error during authentication with the store
    #[error("Store authentication error: {0}")]
    AuthError(String),

    /// Missing required configuration
    #[error("Store configuration error: {0}")]
    ConfigError(String),

    /// Error returned by the store API
    #[error("Store API error: status={status}, message='{message}'")]
    ApiError { status: u16, message: String },

    /// A document could not be decoded into the expected shape
    #[error("Failed to decode store document: {0}")]
    DecodeError(String),
}

/// The flat field map of one document.
pub type Fields = BTreeMap<String, FieldValue>;

/// A document as stored: its store-assigned id plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Ordering for read-all and subscription snapshots.
#[derive(Debug, Clone)]
pub struct Order {
    pub field: String,
    pub direction: Direction,
}

impl Order {
    pub fn asc(field: &str) -> Self {
        Order {
            field: field.to_string(),
            direction: Direction::Ascending,
        }
    }

    pub fn desc(field: &str) -> Self {
        Order {
            field: field.to_string(),
            direction: Direction::Descending,
        }
    }
}

/// A live subscription to one collection.
///
/// Yields the full ordered snapshot after every observed change. Dropping
/// the handle aborts the background task that feeds it; there is no other
/// release step.
pub struct Subscription {
    rx: mpsc::Receiver<Vec<Document>>,
    task: JoinHandle<()>,
}

impl Subscription {
    pub(crate) fn new(rx: mpsc::Receiver<Vec<Document>>, task: JoinHandle<()>) -> Self {
        Subscription { rx, task }
    }

    /// Waits for the next snapshot. Returns `None` once the feeding task
    /// has stopped.
    pub async fn next(&mut self) -> Option<Vec<Document>> {
        self.rx.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// The document store capability.
///
/// Operations borrow `&self` only for the duration of the call; arguments
/// are cloned into the returned future.
pub trait DocumentStore: Send + Sync {
    /// Create a document in `collection` and return it with its assigned id.
    fn create(&self, collection: &str, fields: Fields) -> BoxFuture<'_, Document, StoreError>;

    /// Read the full collection, ordered.
    fn list(&self, collection: &str, order: Order) -> BoxFuture<'_, Vec<Document>, StoreError>;

    /// Delete one document by id.
    fn delete(&self, collection: &str, doc_id: &str) -> BoxFuture<'_, (), StoreError>;

    /// Open a live snapshot subscription on `collection`.
    fn subscribe(&self, collection: &str, order: Order) -> BoxFuture<'_, Subscription, StoreError>;
}
