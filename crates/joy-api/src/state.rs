use std::sync::Arc;

use joy_processing::DEFAULT_COLLECTION;
use joy_store::DocumentStore;

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}
