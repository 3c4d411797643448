pub mod models;
pub mod mongo;
pub mod repository;
pub mod store;

pub use mongo::MongoStore;
pub use repository::Repository;
pub use store::{DocumentStore, FindQuery, InsertAck, StoreError};
