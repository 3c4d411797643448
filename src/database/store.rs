use async_trait::async_trait;
use bson::{oid::ObjectId, Document};
use std::time::Duration;
use thiserror::Error;

/// Errors from the document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Store call exceeded deadline of {0:?}")]
    Timeout(Duration),

    #[error("Store did not return an object id for the inserted document")]
    MissingInsertedId,

    #[error("Failed to encode document: {0}")]
    Serialization(#[from] bson::ser::Error),

    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
}

impl StoreError {
    /// True when the store could not be reached at all, as opposed to a failed operation.
    pub fn is_unavailable(&self) -> bool {
        match self {
            StoreError::ConnectionError(_) => true,
            StoreError::Mongo(e) => matches!(
                *e.kind,
                mongodb::error::ErrorKind::ServerSelection { .. }
                    | mongodb::error::ErrorKind::ConnectionPoolCleared { .. }
                    | mongodb::error::ErrorKind::Io(_)
            ),
            _ => false,
        }
    }
}

/// Find request: an equality filter plus an optional exclusion projection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindQuery {
    pub filter: Document,
    pub projection: Option<Document>,
}

impl FindQuery {
    pub fn new(filter: Document) -> Self {
        Self { filter, projection: None }
    }

    pub fn with_projection(mut self, projection: Document) -> Self {
        self.projection = Some(projection);
        self
    }
}

/// Acknowledgment returned by a successful insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertAck {
    pub inserted_id: ObjectId,
}

/// The document operations handlers need. Implemented by the Mongo gateway;
/// collection names are resolved against the store's configured database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert_one(&self, collection: &str, document: Document) -> Result<InsertAck, StoreError>;

    /// Returns matches in natural (insertion) order; no sort, no limit.
    async fn find(&self, collection: &str, query: FindQuery) -> Result<Vec<Document>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
