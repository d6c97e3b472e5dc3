//! Review interval schedulers.

pub mod doubling;
pub mod swipe;

use chrono::{DateTime, Utc};

/// Counters an item carries into scheduling, already updated for the
/// outcome being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewInput {
    /// Consecutive positive outcomes (`knownCount` / `practicedCount`).
    pub mastery_count: u32,
    /// Total reviews including this one.
    pub review_count: u32,
}

/// Trait for review interval rules.
pub trait IntervalScheduler: Send + Sync {
    /// Scheduler identifier.
    fn name(&self) -> &'static str;

    /// Timestamp of the next review after an outcome.
    fn next_review(&self, input: ReviewInput, positive: bool, now: DateTime<Utc>) -> DateTime<Utc>;
}

/// Get scheduler by name.
pub fn get_scheduler(name: &str) -> Option<Box<dyn IntervalScheduler>> {
    match name {
        "swipe" => Some(Box::new(swipe::SwipeScheduler::default())),
        "doubling" => Some(Box::new(doubling::DoublingScheduler::default())),
        _ => None,
    }
}
