//! Shared setup for engine integration tests.
//!
//! Each context owns a temporary directory holding both the content tree and
//! the learner database, so tests never touch the real data directory.

#![allow(dead_code)]

pub mod fixtures;

use std::time::Duration;

use lernpfad_engine::{AppState, EngineConfig};
use tempfile::TempDir;

pub struct TestContext {
    pub state: AppState,
    dir: TempDir,
}

impl TestContext {
    /// Context over the standard fixture curriculum.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        fixtures::write_curriculum(dir.path());
        Self::open(dir).await
    }

    async fn open(dir: TempDir) -> Self {
        let config = EngineConfig {
            data_dir: dir.path().join("data"),
            content_dir: dir.path().join("content"),
            cache_ttl: Duration::from_secs(5),
            daily_reset_hour: 0,
        };
        let state = AppState::open(config).await.expect("open app state");
        Self { state, dir }
    }

    /// Drop the in-process state and open the same directory again.
    pub async fn reopen(self) -> Self {
        let Self { state, dir } = self;
        drop(state);
        Self::open(dir).await
    }
}
