use async_trait::async_trait;
use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::{options::ClientOptions, Client, Collection, Database};
use tracing::{debug, info};

use crate::config::DatabaseConfig;

use super::store::{DocumentStore, FindQuery, InsertAck, StoreError};

/// Long-lived, pooled MongoDB connection shared by every request.
///
/// `Client` is internally reference counted and thread-safe; cloning a
/// `MongoStore` shares the same pool.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    database: Database,
}

impl MongoStore {
    /// Connect to MongoDB and verify the connection with a ping.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        info!("Connecting to MongoDB at {}", config.uri);

        let mut options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| StoreError::ConnectionError(format!("invalid MongoDB URI: {}", e)))?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.max_pool_size = Some(config.max_pool_size);
        // Fail fast on an unreachable server instead of hanging startup
        options.connect_timeout = Some(config.connect_timeout());
        options.server_selection_timeout = Some(config.connect_timeout());

        let client = Client::with_options(options)
            .map_err(|e| StoreError::ConnectionError(format!("failed to create client: {}", e)))?;
        let database = client.database(&config.name);

        let store = Self { client, database };
        store
            .ping()
            .await
            .map_err(|e| StoreError::ConnectionError(format!("MongoDB ping failed: {}", e)))?;

        info!("Connected to MongoDB database '{}'", config.name);
        Ok(store)
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }

    pub fn database_name(&self) -> &str {
        self.database.name()
    }

    /// Close the connection pool (e.g., on shutdown)
    pub async fn close(self) {
        let name = self.database.name().to_string();
        self.client.shutdown().await;
        info!("Closed MongoDB connection pool for: {}", name);
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn insert_one(&self, collection: &str, document: Document) -> Result<InsertAck, StoreError> {
        let result = self.collection(collection).insert_one(document).await?;

        let inserted_id = result
            .inserted_id
            .as_object_id()
            .ok_or(StoreError::MissingInsertedId)?;

        debug!("Inserted {} into {}", inserted_id, collection);
        Ok(InsertAck { inserted_id })
    }

    async fn find(&self, collection: &str, query: FindQuery) -> Result<Vec<Document>, StoreError> {
        let collection_handle = self.collection(collection);
        let mut action = collection_handle.find(query.filter);
        if let Some(projection) = query.projection {
            action = action.projection(projection);
        }

        let documents: Vec<Document> = action.await?.try_collect().await?;
        debug!("Found {} documents in {}", documents.len(), collection);
        Ok(documents)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
