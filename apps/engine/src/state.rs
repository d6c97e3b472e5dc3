//! Application state.

use crate::config::EngineConfig;
use crate::content::ContentLibrary;
use crate::db::{LocalStore, SqliteStore};
use anyhow::Context;
use std::sync::Arc;
use tokio::sync::Mutex;

/// State shared by every command. The store mutex makes each
/// read-modify-write chain atomic.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<LocalStore>>,
    pub content: Arc<ContentLibrary>,
    pub config: EngineConfig,
}

impl AppState {
    pub fn new(store: LocalStore, content: ContentLibrary, config: EngineConfig) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            content: Arc::new(content),
            config,
        }
    }

    /// Open the database and load content as configured.
    pub async fn open(config: EngineConfig) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&config.data_dir)
            .await
            .with_context(|| format!("failed to create {}", config.data_dir.display()))?;

        let db_path = config.db_path();
        tracing::info!(path = %db_path.display(), "opening database");
        let backend = SqliteStore::open(&db_path)
            .with_context(|| format!("failed to open database at {}", db_path.display()))?;
        let store = LocalStore::new(Box::new(backend), config.cache_ttl);

        let content = ContentLibrary::load(&config.content_dir).await;
        Ok(Self::new(store, content, config))
    }
}
