//! Static course content: vocabulary, sentences and lessons per level.
//!
//! Files live under `<content_dir>/{vocabulary,sentences,lessons}/<LEVEL>.json`.
//! A missing or unreadable file leaves that level empty instead of failing
//! the whole load.

use lernpfad_core::gate::lesson_level;
use lernpfad_core::{ItemKey, Lesson, LessonFile, Level, SentenceItem, VocabularyItem};
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid content in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown lesson: {0}")]
    UnknownLesson(String),
}

/// Content kinds, one directory each.
#[derive(Debug, Clone, Copy)]
enum Kind {
    Vocabulary,
    Sentences,
    Lessons,
}

impl Kind {
    fn dir(self) -> &'static str {
        match self {
            Kind::Vocabulary => "vocabulary",
            Kind::Sentences => "sentences",
            Kind::Lessons => "lessons",
        }
    }
}

fn content_path(root: &Path, kind: Kind, level: Level) -> PathBuf {
    root.join(kind.dir()).join(format!("{}.json", level))
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ContentError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&raw).map_err(|source| ContentError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Read one content file, degrading to an empty list.
async fn read_or_empty<T: DeserializeOwned + Default>(path: &Path) -> T {
    match read_json(path).await {
        Ok(value) => value,
        Err(ContentError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "content file missing");
            T::default()
        }
        Err(e) => {
            tracing::warn!(error = %e, "content file skipped");
            T::default()
        }
    }
}

/// Everything the learner can study, indexed by item key.
#[derive(Debug, Clone, Default)]
pub struct ContentLibrary {
    vocabulary: BTreeMap<Level, Vec<VocabularyItem>>,
    sentences: BTreeMap<Level, Vec<SentenceItem>>,
    lessons: BTreeMap<Level, Vec<Lesson>>,
    vocab_index: HashMap<ItemKey, (Level, usize)>,
    sentence_index: HashMap<ItemKey, (Level, usize)>,
}

impl ContentLibrary {
    /// Load every level from `root`.
    pub async fn load(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let mut vocabulary = BTreeMap::new();
        let mut sentences = BTreeMap::new();
        let mut lessons = BTreeMap::new();

        for level in Level::ALL {
            let words: Vec<VocabularyItem> =
                read_or_empty(&content_path(root, Kind::Vocabulary, level)).await;
            let level_sentences: Vec<SentenceItem> =
                read_or_empty(&content_path(root, Kind::Sentences, level)).await;
            let level_lessons: Option<LessonFile> =
                read_or_empty(&content_path(root, Kind::Lessons, level)).await;

            vocabulary.insert(level, words);
            sentences.insert(level, level_sentences);
            lessons.insert(
                level,
                level_lessons.map(LessonFile::into_lessons).unwrap_or_default(),
            );
        }

        let library = Self::from_parts(vocabulary, sentences, lessons);
        tracing::info!(
            root = %root.display(),
            words = library.vocabulary.values().map(Vec::len).sum::<usize>(),
            sentences = library.sentence_index.len(),
            lessons = library.all_lessons().len(),
            "content loaded"
        );
        library
    }

    /// Build a library from already parsed content. Items without a level
    /// take the level they are filed under.
    pub fn from_parts(
        mut vocabulary: BTreeMap<Level, Vec<VocabularyItem>>,
        mut sentences: BTreeMap<Level, Vec<SentenceItem>>,
        lessons: BTreeMap<Level, Vec<Lesson>>,
    ) -> Self {
        let mut vocab_index = HashMap::new();
        for (level, items) in vocabulary.iter_mut() {
            for (i, item) in items.iter_mut().enumerate() {
                item.level.get_or_insert(*level);
                match item.key() {
                    Some(key) => {
                        vocab_index.entry(key).or_insert((*level, i));
                    }
                    None => tracing::warn!(%level, index = i, "vocabulary item without identifier"),
                }
            }
        }

        // Words with an id are also reachable by headword, unless an id-less
        // word already owns that headword.
        for (level, items) in &vocabulary {
            for (i, item) in items.iter().enumerate() {
                if item.id.filter(|id| *id != 0).is_none() {
                    continue;
                }
                let headword = item.headword().trim();
                if !headword.is_empty() {
                    vocab_index
                        .entry(ItemKey::Headword(headword.to_string()))
                        .or_insert((*level, i));
                }
            }
        }

        let mut sentence_index = HashMap::new();
        for (level, items) in sentences.iter_mut() {
            for (i, item) in items.iter_mut().enumerate() {
                item.level.get_or_insert(*level);
                if let Some(key) = item.key() {
                    sentence_index.entry(key).or_insert((*level, i));
                }
            }
        }

        for (level, level_lessons) in &lessons {
            for lesson in level_lessons {
                match lesson_level(&lesson.lesson_id) {
                    Ok(parsed) if parsed == *level && lesson.level == *level => {}
                    Ok(_) => tracing::warn!(
                        lesson_id = %lesson.lesson_id,
                        %level,
                        "lesson filed under a different level"
                    ),
                    Err(e) => tracing::warn!(error = %e, "lesson id not in LEVEL_Lnn form"),
                }
            }
        }

        Self {
            vocabulary,
            sentences,
            lessons,
            vocab_index,
            sentence_index,
        }
    }

    pub fn vocabulary(&self, level: Level) -> &[VocabularyItem] {
        self.vocabulary.get(&level).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn sentences(&self, level: Level) -> &[SentenceItem] {
        self.sentences.get(&level).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn lessons(&self, level: Level) -> &[Lesson] {
        self.lessons.get(&level).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Lessons of every level, A1 first, each level in file order.
    pub fn all_lessons(&self) -> Vec<Lesson> {
        self.lessons.values().flatten().cloned().collect()
    }

    pub fn lesson(&self, lesson_id: &str) -> Option<&Lesson> {
        self.lessons
            .values()
            .flatten()
            .find(|lesson| lesson.lesson_id == lesson_id)
    }

    pub fn vocabulary_by_key(&self, key: &ItemKey) -> Option<&VocabularyItem> {
        let (level, i) = self.vocab_index.get(key)?;
        self.vocabulary.get(level)?.get(*i)
    }

    pub fn vocabulary_by_id(&self, id: i64) -> Option<&VocabularyItem> {
        self.vocabulary_by_key(&ItemKey::Id(id))
    }

    pub fn sentence_by_key(&self, key: &ItemKey) -> Option<&SentenceItem> {
        let (level, i) = self.sentence_index.get(key)?;
        self.sentences.get(level)?.get(*i)
    }

    pub fn sentence_by_id(&self, id: i64) -> Option<&SentenceItem> {
        self.sentence_by_key(&ItemKey::Id(id))
    }

    /// Static word count per level.
    pub fn vocabulary_targets(&self) -> BTreeMap<Level, usize> {
        self.vocabulary.iter().map(|(l, v)| (*l, v.len())).collect()
    }

    /// Static sentence count per level.
    pub fn sentence_targets(&self) -> BTreeMap<Level, usize> {
        self.sentences.iter().map(|(l, v)| (*l, v.len())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(root: &Path, kind: &str, level: &str, body: &str) {
        let dir = root.join(kind);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(format!("{level}.json")), body).unwrap();
    }

    #[tokio::test]
    async fn loads_levels_and_indexes_items() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "vocabulary",
            "A1",
            r#"[{"id": 1, "german": "Haus", "english": "house"}, {"german": "Baum"}]"#,
        );
        write(
            dir.path(),
            "sentences",
            "A1",
            r#"[{"id": "5", "german_sentence": "Ich bin hier."}]"#,
        );
        write(
            dir.path(),
            "lessons",
            "A1",
            r#"{"lessons": [{"lesson_id": "A1_L01", "level": "A1", "vocab_ids": [1], "sentence_ids": ["5"]}]}"#,
        );
        write(
            dir.path(),
            "lessons",
            "A2",
            r#"[{"lesson_id": "A2_L01", "level": "A2"}]"#,
        );

        let library = ContentLibrary::load(dir.path()).await;
        assert_eq!(library.vocabulary(Level::A1).len(), 2);
        assert_eq!(library.vocabulary_by_id(1).unwrap().german.as_deref(), Some("Haus"));
        assert_eq!(library.vocabulary_by_id(1).unwrap().level, Some(Level::A1));
        assert!(library
            .vocabulary_by_key(&ItemKey::Headword("Baum".into()))
            .is_some());
        assert_eq!(
            library
                .vocabulary_by_key(&ItemKey::Headword("Haus".into()))
                .and_then(|w| w.id),
            Some(1)
        );
        assert!(library.sentence_by_id(5).is_some());
        assert_eq!(library.lesson("A1_L01").unwrap().sentence_ids, vec![5]);

        let ids: Vec<String> = library
            .all_lessons()
            .into_iter()
            .map(|l| l.lesson_id)
            .collect();
        assert_eq!(ids, vec!["A1_L01".to_string(), "A2_L01".to_string()]);
    }

    #[tokio::test]
    async fn missing_and_malformed_files_yield_empty_levels() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "vocabulary", "B1", "{ nope");

        let library = ContentLibrary::load(dir.path()).await;
        assert!(library.vocabulary(Level::B1).is_empty());
        assert!(library.sentences(Level::B2).is_empty());
        assert!(library.all_lessons().is_empty());
    }
}
