//! Swipe and test session commands.

use crate::db::{ReadMode, Sentences, Vocabulary};
use crate::services::mastery;
use crate::state::AppState;
use chrono::Utc;
use lernpfad_core::queue::{self, StudyQueue};
use lernpfad_core::{
    merge_with_stored, CoreError, ItemKey, Level, SentenceItem, TestMode, VocabularyItem,
};
use serde::Deserialize;

use super::CommandError;

/// Identifies a card. Words without an id are matched by headword.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemRef {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub word: Option<String>,
}

impl ItemRef {
    fn key(&self) -> Result<ItemKey, CoreError> {
        if let Some(id) = self.id.filter(|id| *id != 0) {
            return Ok(ItemKey::Id(id));
        }
        self.word
            .as_deref()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(|w| ItemKey::Headword(w.to_string()))
            .ok_or(CoreError::MissingIdentifier)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SwipeRequest {
    #[serde(flatten)]
    pub item: ItemRef,
    /// Right swipe ("I know this").
    pub positive: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TestAnswerRequest {
    #[serde(flatten)]
    pub item: ItemRef,
    pub correct: bool,
    #[serde(default)]
    pub mode: TestMode,
}

async fn level_vocabulary(state: &AppState, level: Level) -> Result<Vec<VocabularyItem>, CommandError> {
    let stored = state.store.lock().await.get_vocabulary(ReadMode::Cached)?;
    Ok(merge_with_stored(state.content.vocabulary(level).to_vec(), &stored))
}

async fn level_sentences(state: &AppState, level: Level) -> Result<Vec<SentenceItem>, CommandError> {
    let stored = state.store.lock().await.get_sentences(ReadMode::Cached)?;
    Ok(merge_with_stored(state.content.sentences(level).to_vec(), &stored))
}

/// Swipe queue for one level: due reviews, then learning, then new words.
pub async fn get_vocabulary_queue(
    level: &str,
    state: &AppState,
) -> Result<StudyQueue<VocabularyItem>, CommandError> {
    let words = level_vocabulary(state, Level::parse(level)?).await?;
    Ok(queue::vocabulary_queue(words, Utc::now()))
}

pub async fn get_sentence_queue(
    level: &str,
    state: &AppState,
) -> Result<StudyQueue<SentenceItem>, CommandError> {
    let sentences = level_sentences(state, Level::parse(level)?).await?;
    Ok(queue::sentence_queue(sentences, Utc::now()))
}

/// Record a swipe on a word. `None` when the word is unknown.
pub async fn swipe_vocabulary(
    request: SwipeRequest,
    state: &AppState,
) -> Result<Option<VocabularyItem>, CommandError> {
    let key = request.item.key()?;
    let mut store = state.store.lock().await;
    mastery::record_swipe::<Vocabulary>(&mut store, &state.content, &key, request.positive, Utc::now())
        .map_err(Into::into)
}

pub async fn swipe_sentence(
    request: SwipeRequest,
    state: &AppState,
) -> Result<Option<SentenceItem>, CommandError> {
    let key = request.item.key()?;
    let mut store = state.store.lock().await;
    mastery::record_swipe::<Sentences>(&mut store, &state.content, &key, request.positive, Utc::now())
        .map_err(Into::into)
}

pub async fn answer_vocabulary_test(
    request: TestAnswerRequest,
    state: &AppState,
) -> Result<Option<VocabularyItem>, CommandError> {
    let key = request.item.key()?;
    let mut store = state.store.lock().await;
    mastery::record_test_result::<Vocabulary>(
        &mut store,
        &state.content,
        &key,
        request.correct,
        request.mode,
        Utc::now(),
    )
    .map_err(Into::into)
}

pub async fn answer_sentence_test(
    request: TestAnswerRequest,
    state: &AppState,
) -> Result<Option<SentenceItem>, CommandError> {
    let key = request.item.key()?;
    let mut store = state.store.lock().await;
    mastery::record_test_result::<Sentences>(
        &mut store,
        &state.content,
        &key,
        request.correct,
        request.mode,
        Utc::now(),
    )
    .map_err(Into::into)
}

/// Words for a test session.
pub async fn get_test_words(
    level: &str,
    mode: TestMode,
    limit: Option<usize>,
    state: &AppState,
) -> Result<Vec<VocabularyItem>, CommandError> {
    let words = level_vocabulary(state, Level::parse(level)?).await?;
    Ok(queue::words_for_test(words, mode, Utc::now(), limit))
}

pub async fn get_test_sentences(
    level: &str,
    mode: TestMode,
    limit: Option<usize>,
    state: &AppState,
) -> Result<Vec<SentenceItem>, CommandError> {
    let sentences = level_sentences(state, Level::parse(level)?).await?;
    Ok(queue::sentences_for_test(sentences, mode, Utc::now(), limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_ref_prefers_id() {
        let both = ItemRef {
            id: Some(3),
            word: Some("Haus".into()),
        };
        assert_eq!(both.key().unwrap(), ItemKey::Id(3));

        let zero = ItemRef {
            id: Some(0),
            word: Some(" Haus ".into()),
        };
        assert_eq!(zero.key().unwrap(), ItemKey::Headword("Haus".into()));

        assert_eq!(ItemRef::default().key(), Err(CoreError::MissingIdentifier));
    }

    #[test]
    fn swipe_request_shape() {
        let request: SwipeRequest =
            serde_json::from_str(r#"{"word": "Baum", "positive": false}"#).unwrap();
        assert_eq!(request.item.key().unwrap(), ItemKey::Headword("Baum".into()));
        assert!(!request.positive);

        let answer: TestAnswerRequest =
            serde_json::from_str(r#"{"id": 4, "correct": true, "mode": "known"}"#).unwrap();
        assert_eq!(answer.mode, TestMode::Known);
    }
}
