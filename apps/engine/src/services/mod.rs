//! Read-modify-write operations over the local store and static content.
//!
//! Functions here are synchronous and take the store explicitly; commands
//! hold the store lock around each call.

pub mod lessons;
pub mod mastery;
pub mod progress;

pub use lessons::LessonSummary;
pub use mastery::StudyCollection;
pub use progress::DailyActivity;
