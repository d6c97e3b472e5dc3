//! Typed whole-collection access on top of a [`KeyValueStore`].
//!
//! Every collection is one JSON document. Reads return the entire collection
//! and writes replace it; there is no partial update.

use crate::db::cache::{CollectionCache, ReadMode, DEFAULT_CACHE_TTL};
use crate::db::error::StoreError;
use crate::db::repository::{KeyValueStore, SqliteStore};
use lernpfad_core::{
    LessonProgress, LessonProgressMap, Reviewable, SentenceItem, StreakRecord, UserProgress,
    VocabularyItem,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

type Result<T> = std::result::Result<T, StoreError>;

/// Storage keys, one per collection.
pub mod keys {
    pub const VOCABULARY: &str = "lernpfad:vocabulary";
    pub const SENTENCES: &str = "lernpfad:sentences";
    pub const PROGRESS: &str = "lernpfad:progress";
    pub const LESSON_PROGRESS: &str = "lernpfad:lesson_progress";
    pub const STREAK: &str = "lernpfad:streak";

    pub const ALL: [&str; 5] = [VOCABULARY, SENTENCES, PROGRESS, LESSON_PROGRESS, STREAK];
}

/// A persisted collection of reviewable items.
pub trait ItemCollection {
    type Item: Reviewable + Clone + Serialize + DeserializeOwned;

    const KEY: &'static str;
    const NAME: &'static str;

    fn cache(store: &mut LocalStore) -> &mut CollectionCache<Vec<Self::Item>>;
}

/// Vocabulary items the learner has interacted with.
pub struct Vocabulary;

/// Sentence items the learner has interacted with.
pub struct Sentences;

impl ItemCollection for Vocabulary {
    type Item = VocabularyItem;
    const KEY: &'static str = keys::VOCABULARY;
    const NAME: &'static str = "vocabulary";

    fn cache(store: &mut LocalStore) -> &mut CollectionCache<Vec<VocabularyItem>> {
        &mut store.vocabulary_cache
    }
}

impl ItemCollection for Sentences {
    type Item = SentenceItem;
    const KEY: &'static str = keys::SENTENCES;
    const NAME: &'static str = "sentences";

    fn cache(store: &mut LocalStore) -> &mut CollectionCache<Vec<SentenceItem>> {
        &mut store.sentence_cache
    }
}

/// Local store with per-collection caches.
pub struct LocalStore {
    backend: Box<dyn KeyValueStore>,
    vocabulary_cache: CollectionCache<Vec<VocabularyItem>>,
    sentence_cache: CollectionCache<Vec<SentenceItem>>,
    lesson_cache: CollectionCache<LessonProgressMap>,
}

impl LocalStore {
    pub fn new(backend: Box<dyn KeyValueStore>, cache_ttl: Duration) -> Self {
        Self {
            backend,
            vocabulary_cache: CollectionCache::new(cache_ttl),
            sentence_cache: CollectionCache::new(cache_ttl),
            lesson_cache: CollectionCache::new(cache_ttl),
        }
    }

    /// In-memory SQLite store (for testing).
    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(
            Box::new(SqliteStore::open_in_memory()?),
            DEFAULT_CACHE_TTL,
        ))
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.backend.get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StoreError::json(key, e)),
            None => Ok(None),
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value).map_err(|e| StoreError::json(key, e))?;
        self.backend.set(key, &raw)
    }

    /// Load a whole item collection.
    pub fn load<C: ItemCollection>(&mut self, mode: ReadMode) -> Result<Vec<C::Item>> {
        if mode == ReadMode::Cached {
            if let Some(items) = C::cache(self).get() {
                tracing::debug!(collection = C::NAME, "cache hit");
                return Ok(items);
            }
        }
        let items: Vec<C::Item> = self.read_json(C::KEY)?.unwrap_or_default();
        C::cache(self).put(items.clone());
        Ok(items)
    }

    /// Replace a whole item collection.
    pub fn save<C: ItemCollection>(&mut self, items: &[C::Item]) -> Result<()> {
        C::cache(self).invalidate();
        self.write_json(C::KEY, items)?;
        tracing::debug!(collection = C::NAME, count = items.len(), "collection written");
        Ok(())
    }

    pub fn get_vocabulary(&mut self, mode: ReadMode) -> Result<Vec<VocabularyItem>> {
        self.load::<Vocabulary>(mode)
    }

    pub fn set_vocabulary(&mut self, items: &[VocabularyItem]) -> Result<()> {
        self.save::<Vocabulary>(items)
    }

    pub fn get_sentences(&mut self, mode: ReadMode) -> Result<Vec<SentenceItem>> {
        self.load::<Sentences>(mode)
    }

    pub fn set_sentences(&mut self, items: &[SentenceItem]) -> Result<()> {
        self.save::<Sentences>(items)
    }

    pub fn get_progress(&self) -> Result<Option<UserProgress>> {
        self.read_json(keys::PROGRESS)
    }

    pub fn set_progress(&self, progress: &UserProgress) -> Result<()> {
        self.write_json(keys::PROGRESS, progress)
    }

    pub fn get_lesson_progress(&mut self, mode: ReadMode) -> Result<LessonProgressMap> {
        if mode == ReadMode::Cached {
            if let Some(map) = self.lesson_cache.get() {
                return Ok(map);
            }
        }
        let map: LessonProgressMap = self.read_json(keys::LESSON_PROGRESS)?.unwrap_or_default();
        self.lesson_cache.put(map.clone());
        Ok(map)
    }

    pub fn set_lesson_progress(&mut self, map: &LessonProgressMap) -> Result<()> {
        self.lesson_cache.invalidate();
        self.write_json(keys::LESSON_PROGRESS, map)
    }

    /// Progress for one lesson, always read past the cache.
    pub fn get_lesson_progress_by_id(&mut self, lesson_id: &str) -> Result<Option<LessonProgress>> {
        Ok(self
            .get_lesson_progress(ReadMode::Fresh)?
            .remove(lesson_id))
    }

    /// Read-modify-write one lesson record, creating it when missing.
    pub fn update_lesson_progress<F>(&mut self, lesson_id: &str, update: F) -> Result<LessonProgress>
    where
        F: FnOnce(&mut LessonProgress),
    {
        let mut map = self.get_lesson_progress(ReadMode::Fresh)?;
        let record = map
            .entry(lesson_id.to_string())
            .or_insert_with(|| LessonProgress::new(lesson_id));
        update(record);
        let updated = record.clone();
        self.set_lesson_progress(&map)?;
        Ok(updated)
    }

    pub fn get_streak(&self) -> Result<StreakRecord> {
        Ok(self.read_json(keys::STREAK)?.unwrap_or_default())
    }

    pub fn set_streak(&self, streak: &StreakRecord) -> Result<()> {
        self.write_json(keys::STREAK, streak)
    }

    /// Wipe every collection.
    pub fn clear_all(&mut self) -> Result<()> {
        self.vocabulary_cache.invalidate();
        self.sentence_cache.invalidate();
        self.lesson_cache.invalidate();
        self.backend.remove_many(&keys::ALL)?;
        tracing::info!("all learner data cleared");
        Ok(())
    }
}

/// Raw access for tests that need to plant unreadable documents.
#[cfg(test)]
pub(crate) mod tests_support {
    use super::LocalStore;

    pub(crate) fn overwrite_raw(store: &mut LocalStore, key: &str, raw: &str) {
        store.backend.set(key, raw).unwrap();
    }

    pub(crate) fn read_raw(store: &LocalStore, key: &str) -> Option<String> {
        store.backend.get(key).unwrap()
    }
}
