use bson::Document;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use super::store::{DocumentStore, FindQuery, InsertAck, StoreError};

/// Collection-scoped access to the document store.
///
/// Every call is bounded by `deadline`; a store that does not answer in time
/// yields `StoreError::Timeout` and the in-flight call is dropped.
pub struct Repository {
    collection: &'static str,
    store: Arc<dyn DocumentStore>,
    deadline: Duration,
}

impl Repository {
    pub fn new(collection: &'static str, store: Arc<dyn DocumentStore>, deadline: Duration) -> Self {
        Self {
            collection,
            store,
            deadline,
        }
    }

    pub async fn insert_one(&self, document: Document) -> Result<InsertAck, StoreError> {
        self.bounded(self.store.insert_one(self.collection, document)).await
    }

    pub async fn find(&self, query: FindQuery) -> Result<Vec<Document>, StoreError> {
        self.bounded(self.store.find(self.collection, query)).await
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match tokio::time::timeout(self.deadline, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Store call on '{}' exceeded {:?}", self.collection, self.deadline);
                Err(StoreError::Timeout(self.deadline))
            }
        }
    }
}
