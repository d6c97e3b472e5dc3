//! Study and test queue selection.

use crate::mastery::Reviewable;
use crate::types::{ItemKey, ItemStatus, SentenceItem, TestMode, VocabularyItem};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;

/// Minimum difficulty for a word to be listed as difficult.
pub const DIFFICULT_THRESHOLD: u8 = 3;

/// Cards for a swipe session, already in presentation order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudyQueue<T> {
    pub review: Vec<T>,
    pub learning: Vec<T>,
    pub new: Vec<T>,
}

impl<T> StudyQueue<T> {
    pub fn len(&self) -> usize {
        self.review.len() + self.learning.len() + self.new.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Review first, then learning, then new.
    pub fn into_ordered(self) -> Vec<T> {
        let mut cards = self.review;
        cards.extend(self.learning);
        cards.extend(self.new);
        cards
    }
}

fn difficulty(item: &VocabularyItem) -> u8 {
    item.difficulty_level.unwrap_or(1)
}

/// Bucket cards by their overlaid status. Mastered cards that are not yet due
/// are left out. Reviews are sorted hardest first when `by_difficulty` is given.
pub fn study_queue<T, F>(items: Vec<T>, now: DateTime<Utc>, by_difficulty: Option<F>) -> StudyQueue<T>
where
    T: Reviewable,
    F: Fn(&T) -> u8,
{
    let mut queue = StudyQueue {
        review: Vec::new(),
        learning: Vec::new(),
        new: Vec::new(),
    };

    for item in items {
        match item.display_status(now) {
            ItemStatus::Review => queue.review.push(item),
            ItemStatus::Learning => queue.learning.push(item),
            ItemStatus::New => queue.new.push(item),
            ItemStatus::Mastered => {}
        }
    }

    if let Some(key) = by_difficulty {
        queue.review.sort_by_key(|item| Reverse(key(item)));
    }
    queue
}

/// Vocabulary swipe queue, hardest reviews first.
pub fn vocabulary_queue(items: Vec<VocabularyItem>, now: DateTime<Utc>) -> StudyQueue<VocabularyItem> {
    study_queue(items, now, Some(difficulty))
}

/// Sentence swipe queue.
pub fn sentence_queue(items: Vec<SentenceItem>, now: DateTime<Utc>) -> StudyQueue<SentenceItem> {
    study_queue(items, now, None::<fn(&SentenceItem) -> u8>)
}

/// Overlay stored learner state onto static content, matched by item key.
/// Content order is kept; content without a stored record passes through.
pub fn merge_with_stored<T: Reviewable + Clone>(content: Vec<T>, stored: &[T]) -> Vec<T> {
    let by_key: HashMap<ItemKey, &T> = stored
        .iter()
        .filter_map(|item| item.key().map(|key| (key, item)))
        .collect();

    content
        .into_iter()
        .map(|item| match item.key().and_then(|key| by_key.get(&key)) {
            Some(stored) => (*stored).clone(),
            None => item,
        })
        .collect()
}

/// Words eligible for a test session in the given mode.
pub fn words_for_test(
    items: Vec<VocabularyItem>,
    mode: TestMode,
    now: DateTime<Utc>,
    limit: Option<usize>,
) -> Vec<VocabularyItem> {
    let mut words: Vec<VocabularyItem> = match mode {
        // Only words the learner has actually seen and swiped away.
        TestMode::Unknown => items
            .into_iter()
            .filter(|w| w.last_reviewed.is_some() && !w.known)
            .collect(),
        TestMode::Known => items.into_iter().filter(|w| w.known).collect(),
        TestMode::Mixed => items,
        TestMode::Review => {
            let mut due: Vec<VocabularyItem> =
                items.into_iter().filter(|w| w.is_due(now)).collect();
            due.sort_by_key(|w| Reverse(difficulty(w)));
            due
        }
    };

    if let Some(limit) = limit {
        words.truncate(limit);
    }
    words
}

/// Sentences eligible for a test session in the given mode.
pub fn sentences_for_test(
    items: Vec<SentenceItem>,
    mode: TestMode,
    now: DateTime<Utc>,
    limit: Option<usize>,
) -> Vec<SentenceItem> {
    let mut sentences: Vec<SentenceItem> = match mode {
        TestMode::Unknown => items
            .into_iter()
            .filter(|s| s.practiced_date.is_some() && !s.practiced)
            .collect(),
        // Known but not yet due, otherwise they belong to the review bucket.
        TestMode::Known => items
            .into_iter()
            .filter(|s| s.practiced && !s.is_due(now))
            .collect(),
        TestMode::Mixed => items,
        TestMode::Review => {
            let mut due: Vec<SentenceItem> = items
                .into_iter()
                .filter(|s| s.practiced && s.is_due(now))
                .collect();
            due.sort_by_key(|s| s.next_review_date);
            due
        }
    };

    if let Some(limit) = limit {
        sentences.truncate(limit);
    }
    sentences
}

/// Words answered wrong often enough to deserve extra practice.
pub fn difficult_words(items: &[VocabularyItem], limit: usize) -> Vec<VocabularyItem> {
    let mut words: Vec<VocabularyItem> = items
        .iter()
        .filter(|w| difficulty(w) >= DIFFICULT_THRESHOLD)
        .cloned()
        .collect();
    words.sort_by_key(|w| (Reverse(difficulty(w)), Reverse(w.wrong_count)));
    words.truncate(limit);
    words
}

/// Test statistics over stored words.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TestStats {
    pub total: usize,
    pub known: usize,
    pub unknown: usize,
    pub total_correct: u32,
    pub total_wrong: u32,
    pub total_attempts: u32,
    /// Share of correct test answers, 0-100.
    pub accuracy: u8,
    pub needs_review: usize,
}

/// Only test answers count toward accuracy; swipe counters are ignored.
pub fn test_stats(items: &[VocabularyItem], now: DateTime<Utc>) -> TestStats {
    let total = items.len();
    let known = items.iter().filter(|w| w.known).count();
    let total_correct: u32 = items.iter().map(|w| w.test_correct_count).sum();
    let total_wrong: u32 = items.iter().map(|w| w.test_wrong_count).sum();
    let total_attempts = total_correct + total_wrong;
    let accuracy = if total_attempts > 0 {
        (total_correct as f64 / total_attempts as f64 * 100.0).round() as u8
    } else {
        0
    };

    TestStats {
        total,
        known,
        unknown: total - known,
        total_correct,
        total_wrong,
        total_attempts,
        accuracy,
        needs_review: items.iter().filter(|w| w.is_due(now)).count(),
    }
}
