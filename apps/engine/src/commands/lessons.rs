//! Lesson list and lesson flow commands.

use crate::content::ContentError;
use crate::services::{lessons, LessonSummary};
use crate::state::AppState;
use chrono::Utc;
use lernpfad_core::gate::{CompletionReport, LessonStatus};
use lernpfad_core::{Lesson, LessonProgress, Level, SentenceItem, VocabularyItem};

use super::CommandError;

/// Lessons of one level with their status.
pub async fn list_lessons(level: &str, state: &AppState) -> Result<Vec<LessonSummary>, CommandError> {
    let level = Level::parse(level)?;
    let mut store = state.store.lock().await;
    lessons::lesson_overview(&mut store, &state.content, level).map_err(Into::into)
}

pub async fn get_lesson(lesson_id: &str, state: &AppState) -> Result<Lesson, CommandError> {
    state
        .content
        .lesson(lesson_id)
        .cloned()
        .ok_or_else(|| ContentError::UnknownLesson(lesson_id.to_string()).into())
}

pub async fn get_lesson_status(
    lesson_id: &str,
    state: &AppState,
) -> Result<LessonStatus, CommandError> {
    let mut store = state.store.lock().await;
    lessons::lesson_status(&mut store, &state.content, lesson_id).map_err(Into::into)
}

/// Open a lesson. Locked and unknown lessons are refused.
pub async fn start_lesson(lesson_id: &str, state: &AppState) -> Result<LessonProgress, CommandError> {
    let mut store = state.store.lock().await;
    lessons::start_lesson(&mut store, &state.content, lesson_id, Utc::now()).map_err(Into::into)
}

pub async fn mark_grammar_read(
    lesson_id: &str,
    state: &AppState,
) -> Result<LessonProgress, CommandError> {
    let mut store = state.store.lock().await;
    lessons::mark_grammar_read(&mut store, &state.content, lesson_id, Utc::now()).map_err(Into::into)
}

/// Re-check a lesson, completing it when every requirement is met.
pub async fn check_lesson_completion(
    lesson_id: &str,
    state: &AppState,
) -> Result<CompletionReport, CommandError> {
    let mut store = state.store.lock().await;
    lessons::refresh_completion(&mut store, &state.content, lesson_id, Utc::now())
        .map_err(Into::into)
}

pub async fn get_lesson_vocabulary(
    lesson_id: &str,
    state: &AppState,
) -> Result<Vec<VocabularyItem>, CommandError> {
    let mut store = state.store.lock().await;
    lessons::lesson_vocabulary(&mut store, &state.content, lesson_id).map_err(Into::into)
}

pub async fn get_lesson_sentences(
    lesson_id: &str,
    state: &AppState,
) -> Result<Vec<SentenceItem>, CommandError> {
    let mut store = state.store.lock().await;
    lessons::lesson_sentences(&mut store, &state.content, lesson_id).map_err(Into::into)
}
