//! Progress and streak bookkeeping.
//!
//! These never fail: store errors are logged and replaced with defaults so a
//! dashboard can always render.

use crate::content::ContentLibrary;
use crate::db::{LocalStore, ReadMode, StoreError};
use chrono::{DateTime, NaiveDate, Utc};
use lernpfad_core::progress::advance_streak;
use lernpfad_core::{DailyGoal, ProgressSnapshot, UserProgress};
use serde::{Deserialize, Serialize};

fn compute_progress(
    store: &mut LocalStore,
    content: &ContentLibrary,
) -> Result<UserProgress, StoreError> {
    let vocabulary = store.get_vocabulary(ReadMode::Cached)?;
    let sentences = store.get_sentences(ReadMode::Cached)?;
    let lesson_progress = store.get_lesson_progress(ReadMode::Fresh)?;
    let streak = store.get_streak()?;
    let daily_goal = store
        .get_progress()?
        .map(|p| p.daily_goal)
        .unwrap_or_default();

    let lessons = content.all_lessons();
    let vocab_targets = content.vocabulary_targets();
    let sentence_targets = content.sentence_targets();

    Ok(lernpfad_core::calculate_progress(&ProgressSnapshot {
        vocabulary: &vocabulary,
        sentences: &sentences,
        lessons: &lessons,
        lesson_progress: &lesson_progress,
        vocab_targets: &vocab_targets,
        sentence_targets: &sentence_targets,
        streak,
        daily_goal: &daily_goal,
    }))
}

/// Recompute progress from the stored collections and persist it.
pub fn calculate_progress(store: &mut LocalStore, content: &ContentLibrary) -> UserProgress {
    let progress = match compute_progress(store, content) {
        Ok(progress) => progress,
        Err(e) => {
            tracing::error!(error = %e, "progress calculation failed");
            return UserProgress::default();
        }
    };

    if let Err(e) = store.set_progress(&progress) {
        tracing::error!(error = %e, "failed to save progress");
    }
    progress
}

/// Count `today` as a study day. Returns the new streak length, 0 on failure.
pub fn update_streak(store: &mut LocalStore, today: NaiveDate) -> u32 {
    let result = store.get_streak().and_then(|current| {
        let next = advance_streak(current, today);
        if next != current {
            store.set_streak(&next)?;
            tracing::info!(streak_days = next.streak_days, %today, "streak updated");
        }
        Ok(next.streak_days)
    });

    result.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to update streak");
        0
    })
}

/// End-of-session bookkeeping: advance the streak, then recompute progress so
/// the returned figures include it.
pub fn update_daily_progress(
    store: &mut LocalStore,
    content: &ContentLibrary,
    today: NaiveDate,
) -> UserProgress {
    update_streak(store, today);
    calculate_progress(store, content)
}

/// Items reviewed on one day against the daily goal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailyActivity {
    pub words_reviewed: u32,
    pub sentences_reviewed: u32,
    pub goal: DailyGoal,
}

impl DailyActivity {
    pub fn goal_met(&self) -> bool {
        self.words_reviewed >= self.goal.words && self.sentences_reviewed >= self.goal.sentences
    }
}

fn reviewed_on(marker: Option<DateTime<Utc>>, day: NaiveDate) -> bool {
    marker.map(|at| at.date_naive() == day).unwrap_or(false)
}

/// Words and sentences whose daily marker falls on `day` (UTC).
pub fn daily_activity(store: &mut LocalStore, day: NaiveDate) -> DailyActivity {
    let result = (|| -> Result<DailyActivity, StoreError> {
        let vocabulary = store.get_vocabulary(ReadMode::Cached)?;
        let sentences = store.get_sentences(ReadMode::Cached)?;
        let goal = store
            .get_progress()?
            .map(|p| p.daily_goal)
            .unwrap_or_default();

        Ok(DailyActivity {
            words_reviewed: vocabulary
                .iter()
                .filter(|v| reviewed_on(v.daily_reviewed_date, day))
                .count() as u32,
            sentences_reviewed: sentences
                .iter()
                .filter(|s| reviewed_on(s.daily_reviewed_date, day))
                .count() as u32,
            goal,
        })
    })();

    result.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to read daily activity");
        DailyActivity::default()
    })
}
