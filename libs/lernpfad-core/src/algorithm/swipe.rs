//! Swipe-card scheduling.
//!
//! A card reaching the mastery threshold is checked again after a week;
//! anything short of that, including a miss, comes back the next day.

use super::{IntervalScheduler, ReviewInput};
use crate::mastery::MASTERED_THRESHOLD;
use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone)]
pub struct SwipeScheduler {
    pub mastered_threshold: u32,
    pub mastered_interval_days: i64,
    pub learning_interval_days: i64,
    pub lapse_interval_days: i64,
}

impl Default for SwipeScheduler {
    fn default() -> Self {
        Self {
            mastered_threshold: MASTERED_THRESHOLD,
            mastered_interval_days: 7,
            learning_interval_days: 1,
            lapse_interval_days: 1,
        }
    }
}

impl IntervalScheduler for SwipeScheduler {
    fn name(&self) -> &'static str {
        "swipe"
    }

    fn next_review(&self, input: ReviewInput, positive: bool, now: DateTime<Utc>) -> DateTime<Utc> {
        let days = if !positive {
            self.lapse_interval_days
        } else if input.mastery_count >= self.mastered_threshold {
            self.mastered_interval_days
        } else {
            self.learning_interval_days
        };
        now + Duration::days(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(mastery_count: u32) -> ReviewInput {
        ReviewInput {
            mastery_count,
            review_count: mastery_count,
        }
    }

    #[test]
    fn mastered_card_waits_a_week() {
        let now = Utc::now();
        let next = SwipeScheduler::default().next_review(input(2), true, now);
        assert_eq!(next - now, Duration::days(7));
    }

    #[test]
    fn learning_card_returns_tomorrow() {
        let now = Utc::now();
        let next = SwipeScheduler::default().next_review(input(1), true, now);
        assert_eq!(next - now, Duration::days(1));
    }

    #[test]
    fn miss_returns_tomorrow_regardless_of_count() {
        let now = Utc::now();
        let next = SwipeScheduler::default().next_review(input(5), false, now);
        assert_eq!(next - now, Duration::days(1));
    }
}
