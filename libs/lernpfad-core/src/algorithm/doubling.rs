//! Interval doubling used by test sessions.
//!
//! A correct answer pushes the next review out to `2^reviews` days, capped at
//! a month: 2, 4, 8, 16, 30. A wrong answer brings it back tomorrow.

use super::{IntervalScheduler, ReviewInput};
use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone)]
pub struct DoublingScheduler {
    pub maximum_interval_days: i64,
    pub lapse_interval_days: i64,
}

impl Default for DoublingScheduler {
    fn default() -> Self {
        Self {
            maximum_interval_days: 30,
            lapse_interval_days: 1,
        }
    }
}

impl DoublingScheduler {
    fn interval_days(&self, review_count: u32) -> i64 {
        // 2^5 already exceeds the cap, so larger exponents never matter.
        let exponent = review_count.max(1).min(16);
        (1i64 << exponent).min(self.maximum_interval_days)
    }
}

impl IntervalScheduler for DoublingScheduler {
    fn name(&self) -> &'static str {
        "doubling"
    }

    fn next_review(&self, input: ReviewInput, positive: bool, now: DateTime<Utc>) -> DateTime<Utc> {
        let days = if positive {
            self.interval_days(input.review_count)
        } else {
            self.lapse_interval_days
        };
        now + Duration::days(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intervals_double_until_capped() {
        let scheduler = DoublingScheduler::default();
        let days: Vec<i64> = (1..=6).map(|n| scheduler.interval_days(n)).collect();
        assert_eq!(days, vec![2, 4, 8, 16, 30, 30]);
    }

    #[test]
    fn huge_review_counts_stay_capped() {
        assert_eq!(DoublingScheduler::default().interval_days(u32::MAX), 30);
    }

    #[test]
    fn wrong_answer_returns_tomorrow() {
        let now = Utc::now();
        let input = ReviewInput {
            mastery_count: 0,
            review_count: 4,
        };
        let next = DoublingScheduler::default().next_review(input, false, now);
        assert_eq!(next - now, Duration::days(1));
    }
}
