//! Lernpfad engine: local persistence, static content and the commands a
//! host application calls.

pub mod commands;
pub mod config;
pub mod content;
pub mod db;
pub mod services;
pub mod state;
pub mod telemetry;

pub use commands::CommandError;
pub use config::EngineConfig;
pub use content::{ContentError, ContentLibrary};
pub use db::{LocalStore, ReadMode, StoreError};
pub use state::AppState;

/// Bootstrap used by hosts: tracing, configuration from the environment,
/// database and content.
pub async fn run() -> anyhow::Result<AppState> {
    telemetry::init_tracing();
    let config = EngineConfig::from_env();
    tracing::info!(
        data_dir = %config.data_dir.display(),
        content_dir = %config.content_dir.display(),
        "starting engine"
    );
    AppState::open(config).await
}
