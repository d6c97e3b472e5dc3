//! Lesson gate operations over stored lesson progress.
//!
//! Every read here bypasses the cache: a lesson finished a moment ago must
//! unlock the next one immediately.

use crate::content::ContentLibrary;
use crate::db::{LocalStore, ReadMode, StoreError};
use chrono::{DateTime, Utc};
use lernpfad_core::gate::{self, CompletionReport, LessonStatus};
use lernpfad_core::{
    merge_with_stored, ItemKey, Lesson, LessonProgress, Level, SentenceItem, VocabularyItem,
};
use serde::{Deserialize, Serialize};

type Result<T> = std::result::Result<T, StoreError>;

fn find_lesson<'a>(content: &'a ContentLibrary, lesson_id: &str) -> Result<&'a Lesson> {
    content
        .lesson(lesson_id)
        .ok_or_else(|| StoreError::LessonNotFound(lesson_id.to_string()))
}

pub fn is_lesson_locked(
    store: &mut LocalStore,
    content: &ContentLibrary,
    lesson_id: &str,
) -> Result<bool> {
    let progress = store.get_lesson_progress(ReadMode::Fresh)?;
    Ok(gate::is_locked(lesson_id, &content.all_lessons(), &progress))
}

pub fn lesson_status(
    store: &mut LocalStore,
    content: &ContentLibrary,
    lesson_id: &str,
) -> Result<LessonStatus> {
    let progress = store.get_lesson_progress(ReadMode::Fresh)?;
    Ok(gate::lesson_status(lesson_id, &content.all_lessons(), &progress))
}

/// One row of the lesson list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonSummary {
    pub lesson_id: String,
    pub level: Level,
    pub title: String,
    pub status: LessonStatus,
}

/// Status of every lesson in `level`, in file order.
pub fn lesson_overview(
    store: &mut LocalStore,
    content: &ContentLibrary,
    level: Level,
) -> Result<Vec<LessonSummary>> {
    let progress = store.get_lesson_progress(ReadMode::Fresh)?;
    let ordered = content.all_lessons();

    Ok(content
        .lessons(level)
        .iter()
        .map(|lesson| LessonSummary {
            lesson_id: lesson.lesson_id.clone(),
            level: lesson.level,
            title: lesson.title.clone(),
            status: gate::lesson_status(&lesson.lesson_id, &ordered, &progress),
        })
        .collect())
}

/// Resolve a lesson for a write. Unknown and locked lessons are refused
/// before anything is stored.
fn open_lesson<'a>(
    store: &mut LocalStore,
    content: &'a ContentLibrary,
    lesson_id: &str,
) -> Result<&'a Lesson> {
    let lesson = find_lesson(content, lesson_id)?;
    let progress = store.get_lesson_progress(ReadMode::Fresh)?;
    if gate::is_locked(lesson_id, &content.all_lessons(), &progress) {
        tracing::warn!(lesson_id, "write to locked lesson refused");
        return Err(StoreError::LessonLocked(lesson_id.to_string()));
    }
    Ok(lesson)
}

/// Record that the grammar section was read. Also marks the lesson started.
pub fn mark_grammar_read(
    store: &mut LocalStore,
    content: &ContentLibrary,
    lesson_id: &str,
    now: DateTime<Utc>,
) -> Result<LessonProgress> {
    open_lesson(store, content, lesson_id)?;
    store.update_lesson_progress(lesson_id, |p| {
        p.grammar_read = true;
        p.started_at.get_or_insert(now);
    })
}

pub fn start_lesson(
    store: &mut LocalStore,
    content: &ContentLibrary,
    lesson_id: &str,
    now: DateTime<Utc>,
) -> Result<LessonProgress> {
    open_lesson(store, content, lesson_id)?;
    store.update_lesson_progress(lesson_id, |p| {
        p.started_at.get_or_insert(now);
    })
}

pub fn mark_lesson_completed(
    store: &mut LocalStore,
    content: &ContentLibrary,
    lesson_id: &str,
    now: DateTime<Utc>,
) -> Result<LessonProgress> {
    open_lesson(store, content, lesson_id)?;
    let progress = store.update_lesson_progress(lesson_id, |p| {
        p.completed = true;
        p.completed_at.get_or_insert(now);
    })?;
    tracing::info!(lesson_id, "lesson completed");
    Ok(progress)
}

/// Check a lesson against the stored items and mark it completed once every
/// requirement holds. Already completed lessons stay completed.
pub fn refresh_completion(
    store: &mut LocalStore,
    content: &ContentLibrary,
    lesson_id: &str,
    now: DateTime<Utc>,
) -> Result<CompletionReport> {
    let lesson = open_lesson(store, content, lesson_id)?;
    let vocabulary = store.get_vocabulary(ReadMode::Fresh)?;
    let sentences = store.get_sentences(ReadMode::Fresh)?;
    let progress = store.get_lesson_progress_by_id(lesson_id)?;

    let report = gate::check_completion(lesson, progress.as_ref(), &vocabulary, &sentences);
    let already_completed = progress.map(|p| p.completed).unwrap_or(false);

    if report.is_complete() && !already_completed {
        store.update_lesson_progress(lesson_id, |p| {
            p.completed = true;
            p.completed_at.get_or_insert(now);
            p.vocab_mastered = report.vocab_mastered;
            p.sentences_mastered = report.sentences_mastered;
        })?;
        tracing::info!(
            lesson_id,
            vocab = report.vocab_mastered,
            sentences = report.sentences_mastered,
            "lesson completed"
        );
    } else {
        tracing::debug!(lesson_id, ?report, "lesson not complete yet");
    }
    Ok(report)
}

/// Words of a lesson with the learner's state applied.
pub fn lesson_vocabulary(
    store: &mut LocalStore,
    content: &ContentLibrary,
    lesson_id: &str,
) -> Result<Vec<VocabularyItem>> {
    let lesson = find_lesson(content, lesson_id)?;
    let words: Vec<VocabularyItem> = lesson
        .vocab_ids
        .iter()
        .filter_map(|id| content.vocabulary_by_key(&ItemKey::Id(*id)).cloned())
        .collect();
    let stored = store.get_vocabulary(ReadMode::Fresh)?;
    Ok(merge_with_stored(words, &stored))
}

/// Sentences of a lesson with the learner's state applied.
pub fn lesson_sentences(
    store: &mut LocalStore,
    content: &ContentLibrary,
    lesson_id: &str,
) -> Result<Vec<SentenceItem>> {
    let lesson = find_lesson(content, lesson_id)?;
    let sentences: Vec<SentenceItem> = lesson
        .sentence_ids
        .iter()
        .filter_map(|id| content.sentence_by_key(&ItemKey::Id(*id)).cloned())
        .collect();
    let stored = store.get_sentences(ReadMode::Fresh)?;
    Ok(merge_with_stored(sentences, &stored))
}
