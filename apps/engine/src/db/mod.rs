//! Local persistence: SQLite key-value store with typed collection access.

pub mod cache;
pub mod date_utils;
pub mod error;
pub mod repository;
pub mod schema;
pub mod store;

pub use cache::{CollectionCache, ReadMode, DEFAULT_CACHE_TTL};
pub use error::StoreError;
pub use repository::{KeyValueStore, SqliteStore};
pub use store::{keys, ItemCollection, LocalStore, Sentences, Vocabulary};
