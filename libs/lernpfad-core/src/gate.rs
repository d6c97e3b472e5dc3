//! Lesson unlocking and completion.
//!
//! A lesson moves `new -> in_progress -> completed`. `locked` is never stored;
//! it is derived from the lessons before it.

use crate::error::{CoreError, Result};
use crate::mastery::Reviewable;
use crate::types::{
    ItemKey, ItemStatus, Lesson, LessonProgress, LessonProgressMap, Level, SentenceItem,
    VocabularyItem,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The very first lesson, open no matter what is stored.
pub const FIRST_LESSON_ID: &str = "A1_L01";

/// Known count at which a lesson word counts as mastered.
pub const VOCAB_MASTERED_THRESHOLD: u32 = crate::mastery::MASTERED_THRESHOLD;

/// Practice count at which a lesson sentence counts as done. Lower than the
/// free-review threshold: one successful pass inside a lesson is enough.
pub const LESSON_SENTENCE_THRESHOLD: u32 = 1;

/// Lesson state as shown in the lesson list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonStatus {
    Locked,
    New,
    InProgress,
    Completed,
}

/// Level encoded in a lesson id such as `A2_L07`.
pub fn lesson_level(lesson_id: &str) -> Result<Level> {
    let (prefix, rest) = lesson_id
        .split_once('_')
        .ok_or_else(|| CoreError::InvalidLessonId(lesson_id.to_string()))?;
    if rest.is_empty() {
        return Err(CoreError::InvalidLessonId(lesson_id.to_string()));
    }
    Level::parse(prefix)
}

fn is_completed(progress: &LessonProgressMap, lesson_id: &str) -> bool {
    progress
        .get(lesson_id)
        .map(|p| p.completed)
        .unwrap_or(false)
}

/// Whether `lesson_id` is locked given the ordered lessons of every level.
///
/// Unknown lessons are locked. Crossing a level boundary needs the whole
/// previous level completed, not just the lesson right before.
pub fn is_locked(lesson_id: &str, ordered: &[Lesson], progress: &LessonProgressMap) -> bool {
    if lesson_id == FIRST_LESSON_ID {
        return false;
    }

    let index = match ordered.iter().position(|l| l.lesson_id == lesson_id) {
        Some(index) => index,
        None => return true,
    };
    if index == 0 {
        return false;
    }

    let current = &ordered[index];
    let previous = &ordered[index - 1];
    if !is_completed(progress, &previous.lesson_id) {
        return true;
    }

    if current.level != previous.level {
        return !ordered
            .iter()
            .filter(|l| l.level == previous.level)
            .all(|l| is_completed(progress, &l.lesson_id));
    }

    false
}

/// Status of one lesson.
pub fn lesson_status(lesson_id: &str, ordered: &[Lesson], progress: &LessonProgressMap) -> LessonStatus {
    if is_locked(lesson_id, ordered, progress) {
        return LessonStatus::Locked;
    }
    match progress.get(lesson_id) {
        Some(p) if p.completed => LessonStatus::Completed,
        Some(p) if p.grammar_read || p.started_at.is_some() => LessonStatus::InProgress,
        _ => LessonStatus::New,
    }
}

/// Outcome of checking a lesson against the stored item state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompletionReport {
    pub grammar_read: bool,
    pub vocab_mastered: u32,
    pub vocab_total: u32,
    pub sentences_mastered: u32,
    pub sentences_total: u32,
}

impl CompletionReport {
    pub fn is_complete(&self) -> bool {
        self.grammar_read
            && self.vocab_mastered == self.vocab_total
            && self.sentences_mastered == self.sentences_total
    }
}

fn lesson_word_mastered(item: &VocabularyItem) -> bool {
    item.stored_status() == ItemStatus::Mastered || item.known_count >= VOCAB_MASTERED_THRESHOLD
}

fn lesson_sentence_done(item: &SentenceItem) -> bool {
    item.stored_status() == ItemStatus::Mastered
        || item.practiced_count >= LESSON_SENTENCE_THRESHOLD
        || item.practiced
}

/// Check whether every word and sentence of a lesson has been learned.
///
/// `vocabulary` and `sentences` are the stored learner collections; items the
/// learner never touched are simply absent and count as not learned.
pub fn check_completion(
    lesson: &Lesson,
    progress: Option<&LessonProgress>,
    vocabulary: &[VocabularyItem],
    sentences: &[SentenceItem],
) -> CompletionReport {
    let words: HashMap<ItemKey, &VocabularyItem> = vocabulary
        .iter()
        .filter_map(|v| v.key().map(|k| (k, v)))
        .collect();
    let stored_sentences: HashMap<ItemKey, &SentenceItem> = sentences
        .iter()
        .filter_map(|s| s.key().map(|k| (k, s)))
        .collect();

    let vocab_mastered = lesson
        .vocab_ids
        .iter()
        .filter(|id| {
            words
                .get(&ItemKey::Id(**id))
                .map(|v| lesson_word_mastered(v))
                .unwrap_or(false)
        })
        .count();
    let sentences_mastered = lesson
        .sentence_ids
        .iter()
        .filter(|id| {
            stored_sentences
                .get(&ItemKey::Id(**id))
                .map(|s| lesson_sentence_done(s))
                .unwrap_or(false)
        })
        .count();

    CompletionReport {
        grammar_read: progress.map(|p| p.grammar_read).unwrap_or(false),
        vocab_mastered: vocab_mastered as u32,
        vocab_total: lesson.vocab_ids.len() as u32,
        sentences_mastered: sentences_mastered as u32,
        sentences_total: lesson.sentence_ids.len() as u32,
    }
}
