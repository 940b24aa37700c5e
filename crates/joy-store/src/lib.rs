//! Document store abstraction used to publish episode documents, with a Firestore REST
//! backend and an in-memory backend.

mod auth;
mod firestore;
mod memory;
mod query;
mod value;

use async_trait::async_trait;
use thiserror::Error;

pub use auth::{ServiceAccountKey, TokenProvider};
pub use firestore::{FIRESTORE_BASE_URL, FirestoreConfig, FirestoreStore};
pub use memory::MemoryStore;
pub use query::{FieldFilter, FilterOp, Query};
pub use value::{Document, Value};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("credential error: {0}")]
    Credentials(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed document: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub fields: Document,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Writes `document` at `collection/id`, replacing whatever was there.
    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        document: &Document,
    ) -> Result<(), StoreError>;

    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError>;

    /// Documents matching every filter in `query`, ordered by id, truncated to `query.limit`.
    async fn query(
        &self,
        collection: &str,
        query: &Query,
    ) -> Result<Vec<StoredDocument>, StoreError>;
}
