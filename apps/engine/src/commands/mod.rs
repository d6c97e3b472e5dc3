//! Commands exposed to the host application.
//!
//! Each command locks the store for its whole read-modify-write chain.

pub mod data;
pub mod lessons;
pub mod stats;
pub mod study;

use std::fmt;

pub use data::clear_all_data;
pub use lessons::{
    check_lesson_completion, get_lesson, get_lesson_sentences, get_lesson_status,
    get_lesson_vocabulary, list_lessons, mark_grammar_read, start_lesson,
};
pub use stats::{
    get_daily_activity, get_difficult_words, get_progress, get_test_stats,
    update_daily_progress,
};
pub use study::{
    answer_sentence_test, answer_vocabulary_test, get_sentence_queue, get_test_sentences,
    get_test_words, get_vocabulary_queue, swipe_sentence, swipe_vocabulary, ItemRef,
    SwipeRequest, TestAnswerRequest,
};

/// Error returned to the host. Serialized as `{ "message": ... }`.
#[derive(Debug, serde::Serialize)]
pub struct CommandError {
    pub message: String,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CommandError {}

impl From<crate::db::StoreError> for CommandError {
    fn from(e: crate::db::StoreError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<lernpfad_core::CoreError> for CommandError {
    fn from(e: lernpfad_core::CoreError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<crate::content::ContentError> for CommandError {
    fn from(e: crate::content::ContentError) -> Self {
        Self { message: e.to_string() }
    }
}
