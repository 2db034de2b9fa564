// --- File: crates/services/courier_backend/src/app_state.rs ---
use std::sync::Arc;

use courier_config::AppConfig;
use courier_store::{DocumentStore, FirestoreStore, MemoryStore};
use tracing::{info, warn};

/// Application state that is shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    /// Builds the shared state, selecting the document store backend from
    /// configuration. Without a Firestore section the in-memory store is
    /// used; history and reminders then do not survive a restart.
    pub fn new(config: Arc<AppConfig>) -> Self {
        let store: Arc<dyn DocumentStore> = if config.use_firestore {
            match config.firestore.as_ref() {
                Some(firestore_config) => {
                    info!(
                        project_id = %firestore_config.project_id,
                        "Using the Firestore document store"
                    );
                    Arc::new(FirestoreStore::new(firestore_config))
                }
                None => {
                    warn!("use_firestore is set but no [firestore] section exists, falling back to the in-memory store");
                    Arc::new(MemoryStore::new())
                }
            }
        } else {
            info!("Using the in-memory document store");
            Arc::new(MemoryStore::new())
        };

        Self { config, store }
    }
}
