use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    http::{header, Request, StatusCode},
    Router,
};
use bson::{oid::ObjectId, Bson, Document};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use crate::app::{app, AppState};
use crate::config::AppConfig;
use crate::database::{DocumentStore, FindQuery, InsertAck, StoreError};

/// In-memory document store with the subset of Mongo semantics the handlers use:
/// top-level equality filters, exclusion projections, insertion order.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    /// Raw stored documents, bypassing projection
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        let collections = self.collections.lock().unwrap();
        collections.get(collection).cloned().unwrap_or_default()
    }

    fn matches(document: &Document, filter: &Document) -> bool {
        filter.iter().all(|(key, value)| document.get(key) == Some(value))
    }

    fn project(mut document: Document, projection: &Document) -> Document {
        for (key, value) in projection {
            let excluded = matches!(value, Bson::Int32(0) | Bson::Int64(0) | Bson::Boolean(false));
            if excluded {
                document.remove(key);
            }
        }
        document
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_one(&self, collection: &str, mut document: Document) -> Result<InsertAck, StoreError> {
        let inserted_id = match document.get_object_id("_id") {
            Ok(id) => id,
            Err(_) => {
                let id = ObjectId::new();
                document.insert("_id", id);
                id
            }
        };

        let mut collections = self.collections.lock().unwrap();
        collections.entry(collection.to_string()).or_default().push(document);
        Ok(InsertAck { inserted_id })
    }

    async fn find(&self, collection: &str, query: FindQuery) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.lock().unwrap();
        let documents = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| Self::matches(doc, &query.filter))
                    .cloned()
                    .map(|doc| match &query.projection {
                        Some(projection) => Self::project(doc, projection),
                        None => doc,
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(documents)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Store that is never reachable
pub struct FailingStore;

#[async_trait]
impl DocumentStore for FailingStore {
    async fn insert_one(&self, _collection: &str, _document: Document) -> Result<InsertAck, StoreError> {
        Err(StoreError::ConnectionError("connection refused".to_string()))
    }

    async fn find(&self, _collection: &str, _query: FindQuery) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::ConnectionError("connection refused".to_string()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::ConnectionError("connection refused".to_string()))
    }
}

/// Store whose calls never complete
pub struct StallingStore;

#[async_trait]
impl DocumentStore for StallingStore {
    async fn insert_one(&self, _collection: &str, _document: Document) -> Result<InsertAck, StoreError> {
        futures::future::pending().await
    }

    async fn find(&self, _collection: &str, _query: FindQuery) -> Result<Vec<Document>, StoreError> {
        futures::future::pending().await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        futures::future::pending().await
    }
}

/// Development profile with cheap hashing and a short store deadline
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.bcrypt_cost = 4;
    config.database.operation_timeout_ms = 200;
    config
}

/// Router wired to an in-memory store
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("response is not JSON ({}): {}", e, self.text()))
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn content_type(&self) -> Option<String> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::default());
        let router = app(AppState::new(store.clone(), config));
        Self { store, router }
    }

    /// Route against another store; `self.store` stays empty
    pub fn with_store(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_store_and_config(store, test_config())
    }

    pub fn with_store_and_config(store: Arc<dyn DocumentStore>, config: AppConfig) -> Self {
        Self {
            store: Arc::new(MemoryStore::default()),
            router: app(AppState::new(store, config)),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> TestResponse {
        self.post_raw(uri, &body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// POST with no Content-Type header at all
    pub async fn post_untyped(&self, uri: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        TestResponse { status, headers, body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[tokio::test]
    async fn memory_store_filters_and_projects() {
        let store = MemoryStore::default();
        let ack = store.insert_one("users", doc! { "name": "ada", "password": "h" }).await.unwrap();
        store.insert_one("users", doc! { "name": "grace", "password": "h" }).await.unwrap();

        let all = store.find("users", FindQuery::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let query = FindQuery::new(doc! { "_id": ack.inserted_id }).with_projection(doc! { "password": 0 });
        let found = store.find("users", query).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get_str("name").unwrap(), "ada");
        assert!(!found[0].contains_key("password"));
    }
}
