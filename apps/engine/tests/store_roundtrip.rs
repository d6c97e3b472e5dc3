//! Persistence across restarts and data reset.

mod common;

use lernpfad_core::ItemStatus;
use lernpfad_engine::commands::{self, ItemRef, SwipeRequest};
use lernpfad_engine::ReadMode;
use pretty_assertions::assert_eq;

use common::TestContext;

fn right_swipe(id: i64) -> SwipeRequest {
    SwipeRequest {
        item: ItemRef {
            id: Some(id),
            word: None,
        },
        positive: true,
    }
}

#[tokio::test]
async fn learner_state_survives_restart() {
    let ctx = TestContext::new().await;
    commands::swipe_vocabulary(right_swipe(1), &ctx.state).await.unwrap();
    commands::swipe_vocabulary(right_swipe(1), &ctx.state).await.unwrap();
    commands::mark_grammar_read("A1_L01", &ctx.state).await.unwrap();
    let before = ctx
        .state
        .store
        .lock()
        .await
        .get_vocabulary(ReadMode::Fresh)
        .unwrap();

    let ctx = ctx.reopen().await;
    let after = ctx
        .state
        .store
        .lock()
        .await
        .get_vocabulary(ReadMode::Fresh)
        .unwrap();
    assert_eq!(
        serde_json::to_value(&after).unwrap(),
        serde_json::to_value(&before).unwrap()
    );
    assert_eq!(after[0].status, Some(ItemStatus::Mastered));

    let status = commands::get_lesson_status("A1_L01", &ctx.state).await.unwrap();
    assert_eq!(status, lernpfad_core::gate::LessonStatus::InProgress);
}

#[tokio::test]
async fn streak_is_counted_once_per_day() {
    let ctx = TestContext::new().await;
    let first = commands::update_daily_progress(&ctx.state).await;
    let second = commands::update_daily_progress(&ctx.state).await;
    assert_eq!(first.streak_days, 1);
    assert_eq!(second.streak_days, 1);
}

#[tokio::test]
async fn daily_activity_counts_todays_reviews() {
    let ctx = TestContext::new().await;
    commands::swipe_vocabulary(right_swipe(1), &ctx.state).await.unwrap();
    commands::swipe_vocabulary(right_swipe(2), &ctx.state).await.unwrap();

    let activity = commands::get_daily_activity(&ctx.state).await;
    assert_eq!(activity.words_reviewed, 2);
    assert_eq!(activity.goal.words, 10);
}

#[tokio::test]
async fn clearing_data_resets_progress() {
    let ctx = TestContext::new().await;
    commands::swipe_vocabulary(right_swipe(1), &ctx.state).await.unwrap();
    commands::update_daily_progress(&ctx.state).await;

    commands::clear_all_data(&ctx.state).await.unwrap();

    let progress = commands::get_progress(&ctx.state).await;
    assert_eq!(progress.streak_days, 0);
    assert_eq!(progress.total_words_mastered, 0);
    let queue = commands::get_vocabulary_queue("A1", &ctx.state).await.unwrap();
    assert_eq!(queue.new.len(), 4);
}
