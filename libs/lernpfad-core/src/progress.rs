//! Progress aggregation.
//!
//! Level completion is measured in completed lessons. Mastered word and
//! sentence counts are reported per level for display only.

use crate::mastery::Reviewable;
use crate::types::{
    DailyGoal, Lesson, LessonProgressMap, Level, LevelProgress, SentenceItem, StreakRecord,
    UserProgress, VocabularyItem,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Everything the aggregator reads. Borrowed so callers can keep ownership of
/// their collections.
#[derive(Debug, Clone, Copy)]
pub struct ProgressSnapshot<'a> {
    pub vocabulary: &'a [VocabularyItem],
    pub sentences: &'a [SentenceItem],
    /// Lessons of every level.
    pub lessons: &'a [Lesson],
    pub lesson_progress: &'a LessonProgressMap,
    /// Static vocabulary size per level.
    pub vocab_targets: &'a BTreeMap<Level, usize>,
    /// Static sentence count per level.
    pub sentence_targets: &'a BTreeMap<Level, usize>,
    pub streak: StreakRecord,
    pub daily_goal: &'a DailyGoal,
}

/// `round(min(100, completed / target * 100))`, 0 for an empty level.
pub fn completion_percentage(completed: usize, target: usize) -> u8 {
    if target == 0 {
        return 0;
    }
    let ratio = completed as f64 / target as f64;
    (ratio * 100.0).round().min(100.0) as u8
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn mastered_by_level<T: Reviewable>(items: &[T]) -> BTreeMap<Level, usize> {
    let mut counts = BTreeMap::new();
    for item in items.iter().filter(|i| i.is_mastered()) {
        if let Some(level) = item.level() {
            *counts.entry(level).or_insert(0) += 1;
        }
    }
    counts
}

/// Lowest level not yet at 100 %, or the highest level once everything is done.
pub fn current_level(levels: &BTreeMap<Level, LevelProgress>) -> Level {
    Level::ALL
        .iter()
        .copied()
        .find(|level| {
            levels
                .get(level)
                .map(|p| p.percentage < 100)
                .unwrap_or(true)
        })
        .unwrap_or(Level::B2)
}

/// Compute per-level figures for one level.
pub fn level_progress(level: Level, snapshot: &ProgressSnapshot<'_>) -> LevelProgress {
    let lessons: Vec<&Lesson> = snapshot
        .lessons
        .iter()
        .filter(|lesson| lesson.level == level)
        .collect();
    let completed = lessons
        .iter()
        .filter(|lesson| {
            snapshot
                .lesson_progress
                .get(&lesson.lesson_id)
                .map(|p| p.completed)
                .unwrap_or(false)
        })
        .count();

    let vocab_mastered = mastered_by_level(snapshot.vocabulary);
    let sentences_mastered = mastered_by_level(snapshot.sentences);

    LevelProgress {
        lessons_completed: to_u32(completed),
        lessons_target: to_u32(lessons.len()),
        vocab_mastered: to_u32(vocab_mastered.get(&level).copied().unwrap_or(0)),
        vocab_target: to_u32(snapshot.vocab_targets.get(&level).copied().unwrap_or(0)),
        sentences_mastered: to_u32(sentences_mastered.get(&level).copied().unwrap_or(0)),
        sentences_target: to_u32(snapshot.sentence_targets.get(&level).copied().unwrap_or(0)),
        percentage: completion_percentage(completed, lessons.len()),
    }
}

/// Recompute the learner's progress from a snapshot. Pure and deterministic.
pub fn calculate_progress(snapshot: &ProgressSnapshot<'_>) -> UserProgress {
    let level_progress: BTreeMap<Level, LevelProgress> = Level::ALL
        .iter()
        .map(|level| (*level, level_progress(*level, snapshot)))
        .collect();

    UserProgress {
        total_words_mastered: to_u32(snapshot.vocabulary.iter().filter(|v| v.is_mastered()).count()),
        total_sentences_mastered: to_u32(snapshot.sentences.iter().filter(|s| s.is_mastered()).count()),
        streak_days: snapshot.streak.streak_days,
        last_study_date: snapshot.streak.last_study_date,
        current_level: current_level(&level_progress),
        level_progress,
        daily_goal: snapshot.daily_goal.clone(),
    }
}

/// Advance the study streak for a study session on `today`.
pub fn advance_streak(record: StreakRecord, today: NaiveDate) -> StreakRecord {
    match record.last_study_date {
        Some(last) if last == today => record,
        Some(last) if today.pred_opt() == Some(last) => StreakRecord {
            streak_days: record.streak_days.saturating_add(1),
            last_study_date: Some(today),
        },
        None => StreakRecord {
            streak_days: record.streak_days.saturating_add(1),
            last_study_date: Some(today),
        },
        Some(_) => StreakRecord {
            streak_days: 1,
            last_study_date: Some(today),
        },
    }
}
