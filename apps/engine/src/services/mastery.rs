//! Recording swipe and test outcomes against the stored collections.

use crate::content::ContentLibrary;
use crate::db::{ItemCollection, LocalStore, ReadMode, Sentences, StoreError, Vocabulary};
use chrono::{DateTime, Utc};
use lernpfad_core::{ItemKey, Reviewable, SentenceItem, TestMode, VocabularyItem};

/// A stored collection whose items can be seeded from static content.
pub trait StudyCollection: ItemCollection {
    /// Fresh copy of the content record for `key`, with no learner state.
    fn seed(content: &ContentLibrary, key: &ItemKey) -> Option<Self::Item>;
}

impl StudyCollection for Vocabulary {
    fn seed(content: &ContentLibrary, key: &ItemKey) -> Option<VocabularyItem> {
        content.vocabulary_by_key(key).map(VocabularyItem::content_only)
    }
}

impl StudyCollection for Sentences {
    fn seed(content: &ContentLibrary, key: &ItemKey) -> Option<SentenceItem> {
        content.sentence_by_key(key).map(SentenceItem::content_only)
    }
}

/// Read-modify-write one item.
///
/// The collection is read past the cache. A failed read returns the error
/// before anything is written, so stored progress is never replaced by a
/// partial list. Items missing from the store are seeded from content; keys
/// known to neither yield `Ok(None)`. Content lookups accept a headword for
/// words that have an id.
fn update_item<C, F>(
    store: &mut LocalStore,
    content: &ContentLibrary,
    key: &ItemKey,
    update: F,
) -> Result<Option<C::Item>, StoreError>
where
    C: StudyCollection,
    F: FnOnce(&mut C::Item),
{
    let mut items = store.load::<C>(ReadMode::Fresh)?;

    // A headword naming a word that has an id resolves to that id.
    let seed = C::seed(content, key);
    let key = seed
        .as_ref()
        .and_then(|item| item.key())
        .unwrap_or_else(|| key.clone());

    let index = match items.iter().position(|item| item.key().as_ref() == Some(&key)) {
        Some(index) => index,
        None => match seed {
            Some(seeded) => {
                items.push(seeded);
                items.len() - 1
            }
            None => {
                tracing::warn!(collection = C::NAME, %key, "outcome for unknown item ignored");
                return Ok(None);
            }
        },
    };

    update(&mut items[index]);
    let updated = items[index].clone();
    store.save::<C>(&items)?;
    Ok(Some(updated))
}

/// Apply one swipe to the item identified by `key`.
pub fn record_swipe<C: StudyCollection>(
    store: &mut LocalStore,
    content: &ContentLibrary,
    key: &ItemKey,
    positive: bool,
    now: DateTime<Utc>,
) -> Result<Option<C::Item>, StoreError> {
    let updated = update_item::<C, _>(store, content, key, |item| item.record_swipe(positive, now))?;
    if let Some(item) = &updated {
        tracing::debug!(
            collection = C::NAME,
            %key,
            positive,
            count = item.mastery_count(),
            status = ?item.stored_status(),
            "swipe recorded"
        );
    }
    Ok(updated)
}

/// Apply one test answer to the item identified by `key`.
pub fn record_test_result<C: StudyCollection>(
    store: &mut LocalStore,
    content: &ContentLibrary,
    key: &ItemKey,
    correct: bool,
    mode: TestMode,
    now: DateTime<Utc>,
) -> Result<Option<C::Item>, StoreError> {
    let updated = update_item::<C, _>(store, content, key, |item| {
        item.record_test_result(correct, mode, now)
    })?;
    if updated.is_some() {
        tracing::debug!(collection = C::NAME, %key, correct, ?mode, "test answer recorded");
    }
    Ok(updated)
}
