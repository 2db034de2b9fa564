//! In-memory implementation of the document store capability.
//!
//! Used when no Firestore configuration is present and as the store double
//! in tests. Subscriptions are fed from a broadcast of collection names:
//! every mutation announces its collection and each subscription re-reads
//! and re-emits its snapshot.

use crate::{BoxFuture, Direction, Document, DocumentStore, Fields, Order};
use crate::{StoreError, Subscription};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

#[derive(Clone)]
pub struct MemoryStore {
    collections: Arc<Mutex<HashMap<String, Vec<Document>>>>,
    changes: broadcast::Sender<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(64);
        MemoryStore {
            collections: Arc::new(Mutex::new(HashMap::new())),
            changes,
        }
    }

    fn snapshot(&self, collection: &str, order: &Order) -> Vec<Document> {
        let collections = self.collections.lock().expect("store lock");
        let mut documents = collections.get(collection).cloned().unwrap_or_default();
        documents.sort_by(|a, b| {
            let ordering = match (a.fields.get(&order.field), b.fields.get(&order.field)) {
                (Some(left), Some(right)) => left.compare(right),
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                (None, None) => Ordering::Equal,
            };
            match order.direction {
                Direction::Ascending => ordering,
                Direction::Descending => ordering.reverse(),
            }
        });
        documents
    }

    fn announce(&self, collection: &str) {
        // No receivers is fine; nobody is subscribed right now.
        let _ = self.changes.send(collection.to_string());
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for MemoryStore {
    fn create(&self, collection: &str, fields: Fields) -> BoxFuture<'_, Document, StoreError> {
        let collection = collection.to_string();
        Box::pin(async move {
            let document = Document {
                id: format!("mem_{}", Uuid::new_v4().simple()),
                fields,
            };
            {
                let mut collections = self.collections.lock().expect("store lock");
                collections
                    .entry(collection.clone())
                    .or_default()
                    .push(document.clone());
            }
            self.announce(&collection);
            Ok(document)
        })
    }

    fn list(&self, collection: &str, order: Order) -> BoxFuture<'_, Vec<Document>, StoreError> {
        let collection = collection.to_string();
        Box::pin(async move { Ok(self.snapshot(&collection, &order)) })
    }

    fn delete(&self, collection: &str, doc_id: &str) -> BoxFuture<'_, (), StoreError> {
        let collection = collection.to_string();
        let doc_id = doc_id.to_string();
        Box::pin(async move {
            {
                let mut collections = self.collections.lock().expect("store lock");
                if let Some(documents) = collections.get_mut(&collection) {
                    documents.retain(|doc| doc.id != doc_id);
                }
            }
            self.announce(&collection);
            Ok(())
        })
    }

    fn subscribe(&self, collection: &str, order: Order) -> BoxFuture<'_, Subscription, StoreError> {
        let collection = collection.to_string();
        Box::pin(async move {
            // Register for changes before reading the snapshot, so a write
            // committing in between is picked up by the receiver instead of
            // falling between the two.
            let mut changes = self.changes.subscribe();
            let initial = self.snapshot(&collection, &order);
            let (tx, rx) = mpsc::channel(16);
            let store = self.clone();

            let task = tokio::spawn(async move {
                if tx.send(initial).await.is_err() {
                    return;
                }
                loop {
                    match changes.recv().await {
                        Ok(changed) if changed == collection => {
                            let snapshot = store.snapshot(&collection, &order);
                            if tx.send(snapshot).await.is_err() {
                                return;
                            }
                        }
                        Ok(_) => continue,
                        // Lagged: resync with a fresh snapshot
                        Err(broadcast::error::RecvError::Lagged(_)) => {
                            let snapshot = store.snapshot(&collection, &order);
                            if tx.send(snapshot).await.is_err() {
                                return;
                            }
                        }
                        Err(broadcast::error::RecvError::Closed) => return,
                    }
                }
            });

            Ok(Subscription::new(rx, task))
        })
    }
}
