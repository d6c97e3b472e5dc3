//! Core learning logic shared by every front end.
//!
//! Provides:
//! - Shared types (VocabularyItem, SentenceItem, Lesson, UserProgress, etc.)
//! - Mastery tracking for swipe and test outcomes
//! - Review interval schedulers
//! - Study and test queue selection
//! - Progress aggregation and streaks
//! - Lesson gate (unlocking and completion)

pub mod algorithm;
pub mod error;
pub mod gate;
pub mod mastery;
pub mod progress;
pub mod queue;
pub mod types;

pub use algorithm::{IntervalScheduler, ReviewInput};
pub use error::{CoreError, Result};
pub use gate::{CompletionReport, LessonStatus};
pub use mastery::{record_outcome, Reviewable, MASTERED_THRESHOLD};
pub use progress::{calculate_progress, ProgressSnapshot};
pub use queue::{merge_with_stored, StudyQueue, TestStats};
pub use types::{
    DailyGoal, ItemKey, ItemStatus, Lesson, LessonFile, LessonProgress, LessonProgressMap, Level,
    LevelProgress, SentenceItem, StreakRecord, TestMode, UserProgress, VocabularyItem,
};
