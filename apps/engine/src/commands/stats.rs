//! Progress and statistics commands.

use crate::db::date_utils::get_adjusted_today;
use crate::db::ReadMode;
use crate::services::{progress, DailyActivity};
use crate::state::AppState;
use chrono::Utc;
use lernpfad_core::queue::{self, TestStats};
use lernpfad_core::{UserProgress, VocabularyItem};

use super::CommandError;

const DEFAULT_DIFFICULT_LIMIT: usize = 20;

/// Recompute overall progress. Never fails; store errors yield defaults.
pub async fn get_progress(state: &AppState) -> UserProgress {
    let mut store = state.store.lock().await;
    progress::calculate_progress(&mut store, &state.content)
}

/// Count today toward the streak and return refreshed progress.
pub async fn update_daily_progress(state: &AppState) -> UserProgress {
    let today = get_adjusted_today(state.config.daily_reset_hour);
    let mut store = state.store.lock().await;
    progress::update_daily_progress(&mut store, &state.content, today)
}

/// Items reviewed today against the daily goal.
pub async fn get_daily_activity(state: &AppState) -> DailyActivity {
    let mut store = state.store.lock().await;
    progress::daily_activity(&mut store, Utc::now().date_naive())
}

pub async fn get_test_stats(state: &AppState) -> Result<TestStats, CommandError> {
    let words = state.store.lock().await.get_vocabulary(ReadMode::Cached)?;
    Ok(queue::test_stats(&words, Utc::now()))
}

pub async fn get_difficult_words(
    limit: Option<usize>,
    state: &AppState,
) -> Result<Vec<VocabularyItem>, CommandError> {
    let words = state.store.lock().await.get_vocabulary(ReadMode::Cached)?;
    Ok(queue::difficult_words(
        &words,
        limit.unwrap_or(DEFAULT_DIFFICULT_LIMIT),
    ))
}
