//! Core types for the learning app.

use crate::error::{CoreError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// CEFR proficiency level used to partition content and gate progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    A1,
    A2,
    B1,
    B2,
}

impl Default for Level {
    fn default() -> Self {
        Self::A1
    }
}

impl Level {
    /// All levels in progression order.
    pub const ALL: [Level; 4] = [Level::A1, Level::A2, Level::B1, Level::B2];

    /// Get the level name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::B1 => "B1",
            Self::B2 => "B2",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "A1" => Some(Self::A1),
            "A2" => Some(Self::A2),
            "B1" => Some(Self::B1),
            "B2" => Some(Self::B2),
            _ => None,
        }
    }

    /// Parse from string, reporting the offending value.
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s).ok_or_else(|| CoreError::InvalidLevel(s.to_string()))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card learning status.
///
/// Only `New`, `Learning` and `Mastered` are written by transitions. `Review`
/// is an overlay for items whose next review date has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    New,
    Learning,
    Review,
    Mastered,
}

impl Default for ItemStatus {
    fn default() -> Self {
        Self::New
    }
}

/// Normalized identity of a vocabulary or sentence item.
///
/// Resolved once at ingestion: a numeric id wins, the headword is the fallback
/// for legacy content that carries no id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemKey {
    Id(i64),
    Headword(String),
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Headword(word) => f.write_str(word),
        }
    }
}

/// Test session mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestMode {
    /// Items the learner marked as unknown.
    Unknown,
    /// Items the learner already knows (reinforcement).
    Known,
    /// Everything.
    Mixed,
    /// Items whose review date has passed.
    Review,
}

impl Default for TestMode {
    fn default() -> Self {
        Self::Unknown
    }
}

/// Numeric identifiers written by older app versions were sometimes strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumericId {
    Num(i64),
    Str(String),
}

impl NumericId {
    fn into_i64(self) -> Option<i64> {
        match self {
            Self::Num(n) => Some(n),
            Self::Str(s) => s.trim().parse().ok(),
        }
    }
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<NumericId> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(NumericId::into_i64))
}

fn deserialize_id_list<'de, D>(deserializer: D) -> std::result::Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<NumericId> = Vec::deserialize(deserializer)?;
    Ok(raw.into_iter().filter_map(NumericId::into_i64).collect())
}

/// Vocabulary card: static content merged with the learner's state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VocabularyItem {
    #[serde(default, deserialize_with = "deserialize_optional_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub german: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub word_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_sentence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_translation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    /// Legacy headword field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning_tr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freq_rank: Option<u32>,

    #[serde(default)]
    pub known: bool,
    #[serde(rename = "knownCount", default)]
    pub known_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learned_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_reviewed_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub correct_count: u32,
    #[serde(default)]
    pub wrong_count: u32,
    #[serde(default)]
    pub test_correct_count: u32,
    #[serde(default)]
    pub test_wrong_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<u8>,

    /// Content fields this crate does not interpret (image paths, notes, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl VocabularyItem {
    /// Resolve the item's identity: `id`, then `german`, then legacy `word`.
    pub fn key(&self) -> Option<ItemKey> {
        if let Some(id) = self.id.filter(|id| *id != 0) {
            return Some(ItemKey::Id(id));
        }
        self.german
            .as_deref()
            .or(self.word.as_deref())
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(|w| ItemKey::Headword(w.to_string()))
    }

    /// Headword shown on the card.
    pub fn headword(&self) -> &str {
        self.german.as_deref().or(self.word.as_deref()).unwrap_or("")
    }

    /// Translation shown on the back of the card.
    pub fn translation(&self) -> &str {
        self.english
            .as_deref()
            .or(self.meaning_tr.as_deref())
            .unwrap_or("")
    }

    /// Copy of the static content with every learner field reset.
    pub fn content_only(&self) -> Self {
        Self {
            known: false,
            known_count: 0,
            status: None,
            review_count: 0,
            last_reviewed: None,
            learned_date: None,
            daily_reviewed_date: None,
            next_review_date: None,
            correct_count: 0,
            wrong_count: 0,
            test_correct_count: 0,
            test_wrong_count: 0,
            difficulty_level: None,
            ..self.clone()
        }
    }
}

/// Sentence card. Mirrors [`VocabularyItem`] with a practiced counter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SentenceItem {
    #[serde(default, deserialize_with = "deserialize_optional_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub german_sentence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english_translation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub de: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default)]
    pub practiced: bool,
    #[serde(rename = "practicedCount", default)]
    pub practiced_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practiced_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_reviewed_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub test_correct_count: u32,
    #[serde(default)]
    pub test_wrong_count: u32,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SentenceItem {
    pub fn key(&self) -> Option<ItemKey> {
        self.id.map(ItemKey::Id)
    }

    /// German text, falling back to the Tatoeba-style `de` field.
    pub fn text(&self) -> &str {
        self.german_sentence
            .as_deref()
            .or(self.de.as_deref())
            .unwrap_or("")
    }

    pub fn translation(&self) -> &str {
        self.english_translation
            .as_deref()
            .or(self.en.as_deref())
            .or(self.tr.as_deref())
            .unwrap_or("")
    }

    pub fn content_only(&self) -> Self {
        Self {
            practiced: false,
            practiced_count: 0,
            status: None,
            review_count: 0,
            practiced_date: None,
            daily_reviewed_date: None,
            next_review_date: None,
            test_correct_count: 0,
            test_wrong_count: 0,
            ..self.clone()
        }
    }
}

/// Lesson definition from static content.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Lesson {
    pub lesson_id: String,
    pub level: Level,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grammar_focus: Option<String>,
    #[serde(default, deserialize_with = "deserialize_id_list")]
    pub vocab_ids: Vec<i64>,
    #[serde(default, deserialize_with = "deserialize_id_list")]
    pub sentence_ids: Vec<i64>,

    /// Dialogue, examples and exercises are passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Lesson files come either as a bare array or wrapped in `{ "lessons": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LessonFile {
    Bare(Vec<Lesson>),
    Wrapped { lessons: Vec<Lesson> },
}

impl LessonFile {
    pub fn into_lessons(self) -> Vec<Lesson> {
        match self {
            Self::Bare(lessons) | Self::Wrapped { lessons } => lessons,
        }
    }
}

/// Per-lesson learner state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LessonProgress {
    pub lesson_id: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub grammar_read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub vocab_mastered: u32,
    #[serde(default)]
    pub sentences_mastered: u32,
}

impl LessonProgress {
    pub fn new(lesson_id: impl Into<String>) -> Self {
        Self {
            lesson_id: lesson_id.into(),
            ..Default::default()
        }
    }
}

/// All lesson progress records keyed by lesson id.
pub type LessonProgressMap = BTreeMap<String, LessonProgress>;

/// Completion figures for one level.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelProgress {
    pub lessons_completed: u32,
    pub lessons_target: u32,
    pub vocab_mastered: u32,
    pub vocab_target: u32,
    pub sentences_mastered: u32,
    pub sentences_target: u32,
    /// Overall completion, 0-100.
    pub percentage: u8,
}

/// Daily study goals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyGoal {
    pub words: u32,
    pub sentences: u32,
    pub minutes: u32,
}

impl Default for DailyGoal {
    fn default() -> Self {
        Self {
            words: 10,
            sentences: 5,
            minutes: 30,
        }
    }
}

/// Aggregate learner progress, recomputed from the stored collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProgress {
    pub total_words_mastered: u32,
    pub total_sentences_mastered: u32,
    pub streak_days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_study_date: Option<NaiveDate>,
    pub level_progress: BTreeMap<Level, LevelProgress>,
    pub current_level: Level,
    #[serde(default)]
    pub daily_goal: DailyGoal,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self {
            total_words_mastered: 0,
            total_sentences_mastered: 0,
            streak_days: 0,
            last_study_date: None,
            level_progress: Level::ALL
                .iter()
                .map(|level| (*level, LevelProgress::default()))
                .collect(),
            current_level: Level::A1,
            daily_goal: DailyGoal::default(),
        }
    }
}

/// Consecutive study days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreakRecord {
    pub streak_days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_study_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn level_order_and_navigation() {
        assert!(Level::A1 < Level::B2);
        assert_eq!(Level::from_str("B1"), Some(Level::B1));
        assert_eq!(Level::parse("C1"), Err(CoreError::InvalidLevel("C1".into())));
    }

    #[test]
    fn vocabulary_key_prefers_id_then_headword() {
        let mut item = VocabularyItem {
            id: Some(42),
            german: Some("Haus".into()),
            ..Default::default()
        };
        assert_eq!(item.key(), Some(ItemKey::Id(42)));

        item.id = None;
        assert_eq!(item.key(), Some(ItemKey::Headword("Haus".into())));

        item.german = None;
        item.word = Some("Baum".into());
        assert_eq!(item.key(), Some(ItemKey::Headword("Baum".into())));

        item.word = Some("  ".into());
        assert_eq!(item.key(), None);
    }

    #[test]
    fn vocabulary_wire_names() {
        let json = r#"{
            "id": 7,
            "german": "Hund",
            "english": "dog",
            "type": "noun",
            "level": "A1",
            "knownCount": 1,
            "status": "learning",
            "image_path": "dog.png"
        }"#;
        let item: VocabularyItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.word_type.as_deref(), Some("noun"));
        assert_eq!(item.known_count, 1);
        assert_eq!(item.status, Some(ItemStatus::Learning));
        assert_eq!(item.extra.get("image_path"), Some(&serde_json::json!("dog.png")));

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["knownCount"], 1);
        assert_eq!(value["image_path"], "dog.png");
    }

    #[test]
    fn sentence_id_accepts_numeric_string() {
        let item: SentenceItem =
            serde_json::from_str(r#"{"id": "15", "german_sentence": "Guten Morgen."}"#).unwrap();
        assert_eq!(item.key(), Some(ItemKey::Id(15)));
    }

    #[test]
    fn lesson_file_accepts_both_shapes() {
        let bare = r#"[{"lesson_id": "A1_L01", "level": "A1", "vocab_ids": [1, "2"]}]"#;
        let wrapped = r#"{"lessons": [{"lesson_id": "A1_L01", "level": "A1", "vocab_ids": [1, 2]}]}"#;

        let a: LessonFile = serde_json::from_str(bare).unwrap();
        let b: LessonFile = serde_json::from_str(wrapped).unwrap();
        assert_eq!(a.into_lessons(), b.into_lessons());
    }

    #[test]
    fn content_only_drops_learner_state() {
        let item = VocabularyItem {
            id: Some(3),
            german: Some("Brot".into()),
            known: true,
            known_count: 2,
            status: Some(ItemStatus::Mastered),
            difficulty_level: Some(4),
            ..Default::default()
        };
        let fresh = item.content_only();
        assert_eq!(fresh.german.as_deref(), Some("Brot"));
        assert_eq!(fresh.known_count, 0);
        assert_eq!(fresh.status, None);
        assert!(!fresh.known);
        assert_eq!(fresh.difficulty_level, None);
    }

    #[test]
    fn default_progress_covers_every_level() {
        let progress = UserProgress::default();
        assert_eq!(progress.level_progress.len(), 4);
        assert_eq!(progress.current_level, Level::A1);
        assert_eq!(progress.daily_goal.words, 10);
    }
}
