//! Mastery tracking for swipe and test outcomes.
//!
//! Every call records one user action, so nothing here is idempotent: two
//! identical outcomes move the counters twice.

use crate::algorithm::doubling::DoublingScheduler;
use crate::algorithm::swipe::SwipeScheduler;
use crate::algorithm::{IntervalScheduler, ReviewInput};
use crate::types::{ItemKey, ItemStatus, Level, SentenceItem, TestMode, VocabularyItem};
use chrono::{DateTime, Utc};

/// Positive outcomes in a row needed for an item to count as mastered.
pub const MASTERED_THRESHOLD: u32 = 2;

/// Upper bound of `difficulty_level`.
pub const MAX_DIFFICULTY: u8 = 5;

/// Difficulty 1-5 from the share of wrong answers, `None` before any attempt.
pub fn difficulty_level(correct: u32, wrong: u32) -> Option<u8> {
    let total = correct as u64 + wrong as u64;
    if total == 0 {
        return None;
    }
    let ratio = wrong as f64 / total as f64;
    let level = (ratio * MAX_DIFFICULTY as f64).ceil() as u8;
    Some(level.clamp(1, MAX_DIFFICULTY))
}

/// Status for records written before statuses were persisted.
pub fn derived_status(count: u32, reviewed: bool) -> ItemStatus {
    if count >= MASTERED_THRESHOLD {
        ItemStatus::Mastered
    } else if count == 1 || reviewed {
        ItemStatus::Learning
    } else {
        ItemStatus::New
    }
}

/// Status written after an outcome, given the already updated counter.
pub fn status_after(count: u32, positive: bool, previously_reviewed: bool) -> ItemStatus {
    match (positive, previously_reviewed) {
        (true, _) if count >= MASTERED_THRESHOLD => ItemStatus::Mastered,
        (true, _) => ItemStatus::Learning,
        (false, true) => ItemStatus::Learning,
        (false, false) => ItemStatus::New,
    }
}

/// Apply the review overlay: learning or mastered items past their review date
/// are shown as `Review`.
pub fn overlay_status(
    status: ItemStatus,
    next_review: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> ItemStatus {
    match (status, next_review) {
        (ItemStatus::Mastered | ItemStatus::Learning | ItemStatus::Review, Some(due))
            if due <= now =>
        {
            ItemStatus::Review
        }
        (ItemStatus::Review, _) => ItemStatus::Learning,
        (status, _) => status,
    }
}

/// Set the per-day review marker unless it already points at today.
fn touch_daily(slot: &mut Option<DateTime<Utc>>, now: DateTime<Utc>) {
    let reviewed_today = slot
        .map(|at| at.date_naive() == now.date_naive())
        .unwrap_or(false);
    if !reviewed_today {
        *slot = Some(now);
    }
}

/// Behaviour shared by vocabulary and sentence cards.
pub trait Reviewable {
    fn key(&self) -> Option<ItemKey>;

    fn level(&self) -> Option<Level>;

    /// `knownCount` for words, `practicedCount` for sentences.
    fn mastery_count(&self) -> u32;

    /// Persisted status, derived from the counters for legacy records.
    fn stored_status(&self) -> ItemStatus;

    fn next_review_date(&self) -> Option<DateTime<Utc>>;

    /// Record a swipe outcome with an explicit scheduler.
    fn record_swipe_with(
        &mut self,
        positive: bool,
        now: DateTime<Utc>,
        scheduler: &dyn IntervalScheduler,
    );

    /// Record a test answer. Test sessions never touch the mastery counter.
    fn record_test_result(&mut self, correct: bool, mode: TestMode, now: DateTime<Utc>);

    fn record_swipe(&mut self, positive: bool, now: DateTime<Utc>) {
        self.record_swipe_with(positive, now, &SwipeScheduler::default());
    }

    fn is_mastered(&self) -> bool {
        self.stored_status() == ItemStatus::Mastered || self.mastery_count() >= MASTERED_THRESHOLD
    }

    fn display_status(&self, now: DateTime<Utc>) -> ItemStatus {
        overlay_status(self.stored_status(), self.next_review_date(), now)
    }

    fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_date().map(|due| due <= now).unwrap_or(false)
    }
}

/// Record one swipe outcome and hand back the updated item.
pub fn record_outcome<T: Reviewable>(mut item: T, positive: bool, now: DateTime<Utc>) -> T {
    item.record_swipe(positive, now);
    item
}

impl Reviewable for VocabularyItem {
    fn key(&self) -> Option<ItemKey> {
        VocabularyItem::key(self)
    }

    fn level(&self) -> Option<Level> {
        self.level
    }

    fn mastery_count(&self) -> u32 {
        self.known_count
    }

    fn stored_status(&self) -> ItemStatus {
        self.status
            .unwrap_or_else(|| derived_status(self.known_count, self.last_reviewed.is_some()))
    }

    fn next_review_date(&self) -> Option<DateTime<Utc>> {
        self.next_review_date
    }

    fn record_swipe_with(
        &mut self,
        positive: bool,
        now: DateTime<Utc>,
        scheduler: &dyn IntervalScheduler,
    ) {
        let previously_reviewed = self.review_count > 0 || self.last_reviewed.is_some();

        if positive {
            self.known_count = self.known_count.saturating_add(1);
            self.correct_count = self.correct_count.saturating_add(1);
            self.learned_date.get_or_insert(now);
        } else {
            self.known_count = 0;
            self.wrong_count = self.wrong_count.saturating_add(1);
        }

        self.known = positive;
        self.status = Some(status_after(self.known_count, positive, previously_reviewed));
        self.review_count = self.review_count.saturating_add(1);
        self.last_reviewed = Some(now);
        touch_daily(&mut self.daily_reviewed_date, now);
        self.difficulty_level =
            difficulty_level(self.correct_count, self.wrong_count).or(self.difficulty_level);

        let input = ReviewInput {
            mastery_count: self.known_count,
            review_count: self.review_count,
        };
        self.next_review_date = Some(scheduler.next_review(input, positive, now));
    }

    fn record_test_result(&mut self, correct: bool, mode: TestMode, now: DateTime<Utc>) {
        self.review_count = self.review_count.saturating_add(1);
        self.last_reviewed = Some(now);
        if correct {
            self.test_correct_count = self.test_correct_count.saturating_add(1);
        } else {
            self.test_wrong_count = self.test_wrong_count.saturating_add(1);
        }

        match mode {
            TestMode::Known if !correct => {
                self.known = false;
                self.learned_date = None;
            }
            TestMode::Known | TestMode::Unknown if correct => {
                self.known = true;
                self.learned_date.get_or_insert(now);
            }
            _ => {}
        }

        touch_daily(&mut self.daily_reviewed_date, now);
        let input = ReviewInput {
            mastery_count: self.known_count,
            review_count: self.review_count,
        };
        self.next_review_date = Some(DoublingScheduler::default().next_review(input, correct, now));
    }
}

impl Reviewable for SentenceItem {
    fn key(&self) -> Option<ItemKey> {
        SentenceItem::key(self)
    }

    fn level(&self) -> Option<Level> {
        self.level
    }

    fn mastery_count(&self) -> u32 {
        self.practiced_count
    }

    fn stored_status(&self) -> ItemStatus {
        self.status.unwrap_or_else(|| {
            derived_status(self.practiced_count, self.practiced_date.is_some())
        })
    }

    fn next_review_date(&self) -> Option<DateTime<Utc>> {
        self.next_review_date
    }

    fn record_swipe_with(
        &mut self,
        positive: bool,
        now: DateTime<Utc>,
        scheduler: &dyn IntervalScheduler,
    ) {
        let previously_reviewed = self.review_count > 0 || self.practiced_date.is_some();

        self.practiced_count = if positive {
            self.practiced_count.saturating_add(1)
        } else {
            0
        };
        self.practiced = positive;
        self.status = Some(status_after(self.practiced_count, positive, previously_reviewed));
        self.review_count = self.review_count.saturating_add(1);
        self.practiced_date = Some(now);
        touch_daily(&mut self.daily_reviewed_date, now);

        let input = ReviewInput {
            mastery_count: self.practiced_count,
            review_count: self.review_count,
        };
        self.next_review_date = Some(scheduler.next_review(input, positive, now));
    }

    fn record_test_result(&mut self, correct: bool, mode: TestMode, now: DateTime<Utc>) {
        self.review_count = self.review_count.saturating_add(1);
        self.practiced_date = Some(now);
        if correct {
            self.test_correct_count = self.test_correct_count.saturating_add(1);
        } else {
            self.test_wrong_count = self.test_wrong_count.saturating_add(1);
        }

        match mode {
            TestMode::Known if !correct => self.practiced = false,
            TestMode::Known | TestMode::Unknown if correct => self.practiced = true,
            _ => {}
        }

        touch_daily(&mut self.daily_reviewed_date, now);
        let input = ReviewInput {
            mastery_count: self.practiced_count,
            review_count: self.review_count,
        };
        self.next_review_date = Some(DoublingScheduler::default().next_review(input, correct, now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 9, 30, 0).unwrap()
    }

    fn word(id: i64) -> VocabularyItem {
        VocabularyItem {
            id: Some(id),
            german: Some("Haus".into()),
            english: Some("house".into()),
            level: Some(Level::A1),
            status: Some(ItemStatus::New),
            ..Default::default()
        }
    }

    #[test]
    fn two_positives_then_negative() {
        let t0 = now();
        let item = record_outcome(word(42), true, t0);
        assert_eq!(item.known_count, 1);
        assert_eq!(item.status, Some(ItemStatus::Learning));
        assert_eq!(item.next_review_date, Some(t0 + Duration::days(1)));

        let t1 = t0 + Duration::minutes(1);
        let item = record_outcome(item, true, t1);
        assert_eq!(item.known_count, 2);
        assert_eq!(item.status, Some(ItemStatus::Mastered));
        assert_eq!(item.next_review_date, Some(t1 + Duration::days(7)));

        let t2 = t1 + Duration::minutes(1);
        let item = record_outcome(item, false, t2);
        assert_eq!(item.known_count, 0);
        assert_eq!(item.status, Some(ItemStatus::Learning));
        assert_eq!(item.next_review_date, Some(t2 + Duration::days(1)));
    }

    #[test]
    fn repeated_positives_stay_mastered() {
        let mut item = word(1);
        let mut at = now();
        for n in 1..=6u32 {
            at += Duration::hours(3);
            item.record_swipe(true, at);
            if n >= 2 {
                assert_eq!(item.status, Some(ItemStatus::Mastered));
                assert!(item.next_review_date.unwrap() >= at + Duration::days(7));
            }
        }
        assert_eq!(item.known_count, 6);
        assert_eq!(item.review_count, 6);
    }

    #[test]
    fn negative_resets_any_count() {
        let mut item = word(1);
        item.known_count = 9;
        item.review_count = 9;
        item.record_swipe(false, now());
        assert_eq!(item.known_count, 0);
        assert!(!item.known);
    }

    #[test]
    fn first_exposure_miss_stays_new() {
        let mut item = word(1);
        item.record_swipe(false, now());
        assert_eq!(item.status, Some(ItemStatus::New));
        assert_eq!(item.wrong_count, 1);
        assert_eq!(item.difficulty_level, Some(5));
    }

    #[test]
    fn difficulty_tracks_wrong_ratio() {
        assert_eq!(difficulty_level(0, 0), None);
        assert_eq!(difficulty_level(10, 0), Some(1));
        assert_eq!(difficulty_level(3, 1), Some(2));
        assert_eq!(difficulty_level(1, 1), Some(3));
        assert_eq!(difficulty_level(0, 4), Some(5));
    }

    #[test]
    fn learned_date_set_once() {
        let t0 = now();
        let mut item = word(1);
        item.record_swipe(true, t0);
        item.record_swipe(false, t0 + Duration::hours(1));
        item.record_swipe(true, t0 + Duration::hours(2));
        assert_eq!(item.learned_date, Some(t0));
    }

    #[test]
    fn daily_marker_kept_within_a_day() {
        let t0 = now();
        let mut item = word(1);
        item.record_swipe(true, t0);
        item.record_swipe(true, t0 + Duration::hours(2));
        assert_eq!(item.daily_reviewed_date, Some(t0));

        let next_day = t0 + Duration::days(1);
        item.record_swipe(true, next_day);
        assert_eq!(item.daily_reviewed_date, Some(next_day));
    }

    #[test]
    fn overlay_marks_due_items_for_review() {
        let t0 = now();
        let item = record_outcome(word(1), true, t0);
        assert_eq!(item.display_status(t0), ItemStatus::Learning);
        assert_eq!(item.display_status(t0 + Duration::days(2)), ItemStatus::Review);

        let fresh = word(2);
        assert_eq!(fresh.display_status(t0), ItemStatus::New);
    }

    #[test]
    fn legacy_records_derive_status() {
        let mut item = word(1);
        item.status = None;
        item.known_count = 2;
        assert_eq!(item.stored_status(), ItemStatus::Mastered);
        assert!(item.is_mastered());

        item.known_count = 0;
        item.last_reviewed = Some(now());
        assert_eq!(item.stored_status(), ItemStatus::Learning);
    }

    #[test]
    fn sentence_swipes_mirror_vocabulary() {
        let t0 = now();
        let mut sentence = SentenceItem {
            id: Some(5),
            german_sentence: Some("Ich bin hier.".into()),
            ..Default::default()
        };
        sentence.record_swipe(true, t0);
        sentence.record_swipe(true, t0);
        assert_eq!(sentence.practiced_count, 2);
        assert_eq!(sentence.status, Some(ItemStatus::Mastered));
        assert_eq!(sentence.next_review_date, Some(t0 + Duration::days(7)));

        sentence.record_swipe(false, t0);
        assert_eq!(sentence.practiced_count, 0);
        assert_eq!(sentence.status, Some(ItemStatus::Learning));
        assert!(!sentence.practiced);
    }

    #[test]
    fn known_mode_wrong_answer_unlearns() {
        let t0 = now();
        let mut item = record_outcome(word(1), true, t0);
        item.record_test_result(false, TestMode::Known, t0);
        assert!(!item.known);
        assert_eq!(item.learned_date, None);
        assert_eq!(item.test_wrong_count, 1);
        assert_eq!(item.known_count, 1);
        assert_eq!(item.next_review_date, Some(t0 + Duration::days(1)));
    }

    #[test]
    fn unknown_mode_correct_answer_learns() {
        let t0 = now();
        let mut item = word(1);
        item.record_test_result(true, TestMode::Unknown, t0);
        assert!(item.known);
        assert_eq!(item.learned_date, Some(t0));
        assert_eq!(item.review_count, 1);
        assert_eq!(item.next_review_date, Some(t0 + Duration::days(2)));
    }

    #[test]
    fn review_mode_leaves_known_flag() {
        let t0 = now();
        let mut item = word(1);
        item.record_test_result(true, TestMode::Review, t0);
        assert!(!item.known);
        assert_eq!(item.test_correct_count, 1);
    }

    #[test]
    fn sentence_unknown_mode_wrong_keeps_practiced() {
        let t0 = now();
        let mut sentence = SentenceItem {
            id: Some(1),
            practiced: true,
            ..Default::default()
        };
        sentence.record_test_result(false, TestMode::Unknown, t0);
        assert!(sentence.practiced);
        sentence.record_test_result(false, TestMode::Known, t0);
        assert!(!sentence.practiced);
    }
}
