//! Integration tests for the round driver task.
//!
//! Time is paused, so the countdown advances only as fast as the tests
//! let the clock move.

use std::time::Duration;

use twentyq_roster::{Participant, Roster};
use twentyq_round::{
    EndReason, Outcome, Phase, QUESTION_QUOTA, RoundConfig, RoundError, spawn_round,
};

// =========================================================================
// Helpers
// =========================================================================

fn participants(names: &[&str]) -> Vec<Participant> {
    let mut roster = Roster::default();
    for name in names {
        roster.add_participant(name).unwrap();
    }
    roster.participants().to_vec()
}

/// Lets the driver task run without moving the clock.
async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

// =========================================================================
// Start
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_spawn_with_empty_roster_is_rejected() {
    let result = spawn_round(Vec::new(), 180, RoundConfig::default());
    assert!(matches!(result, Err(RoundError::InvalidRoster)));
}

#[tokio::test(start_paused = true)]
async fn test_initial_snapshot_is_published() {
    let round = spawn_round(participants(&["Alice", "Bob"]), 180, RoundConfig::default()).unwrap();
    let snapshot = round.snapshot();

    assert_eq!(snapshot.remaining_fraction, 1.0);
    assert_eq!(snapshot.remaining_secs, 180);
    assert_eq!(snapshot.active_participant_index, 0);
    assert!(snapshot.questions.is_empty());
    assert_eq!(snapshot.phase, Phase::Running);
}

// =========================================================================
// Countdown
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_round_ends_when_time_runs_out() {
    let round = spawn_round(participants(&["Alice"]), 10, RoundConfig::default()).unwrap();
    let started = tokio::time::Instant::now();

    let last = round.wait_until_ended().await.unwrap();

    assert_eq!(started.elapsed(), Duration::from_secs(10));
    assert_eq!(last.remaining_fraction, 0.0);
    assert_eq!(last.phase, Phase::Ended);
    assert_eq!(last.end_reason, Some(EndReason::TimeExpired));
}

#[tokio::test(start_paused = true)]
async fn test_subscribers_see_countdown_progress() {
    let round = spawn_round(participants(&["Alice"]), 10, RoundConfig::default()).unwrap();
    let mut updates = round.subscribe();

    updates.changed().await.unwrap();
    let first = updates.borrow_and_update().remaining_fraction;
    updates.changed().await.unwrap();
    let second = updates.borrow_and_update().remaining_fraction;

    assert!((first - 0.99).abs() < 1e-12);
    assert!((second - 0.98).abs() < 1e-12);
}

#[tokio::test(start_paused = true)]
async fn test_no_ticks_after_time_expires() {
    let round = spawn_round(participants(&["Alice"]), 1, RoundConfig::default()).unwrap();
    round.wait_until_ended().await.unwrap();
    let mut updates = round.subscribe();
    updates.mark_unchanged();

    // Nothing is published once the tick source is released.
    let next = tokio::time::timeout(Duration::from_secs(60), updates.changed()).await;
    assert!(next.is_err(), "ended round should publish nothing further");
}

// =========================================================================
// Submissions
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_submit_rotates_turn() {
    let round = spawn_round(participants(&["Alice", "Bob"]), 180, RoundConfig::default()).unwrap();

    let snapshot = round
        .submit_question("likes pizza?", Outcome::Affirmative)
        .await
        .unwrap();
    assert_eq!(snapshot.questions.len(), 1);
    assert_eq!(snapshot.active_participant_index, 1);

    let snapshot = round
        .submit_question("plays chess?", Outcome::Negative)
        .await
        .unwrap();
    assert_eq!(snapshot.active_participant_index, 0);
    assert_eq!(round.snapshot().questions.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_empty_submission_is_rejected() {
    let round = spawn_round(participants(&["Alice", "Bob"]), 180, RoundConfig::default()).unwrap();

    let err = round.submit_question("  ", Outcome::Affirmative).await.unwrap_err();
    assert_eq!(err, RoundError::EmptyQuestion);
    assert!(round.snapshot().questions.is_empty());
    assert_eq!(round.snapshot().active_participant_index, 0);
}

#[tokio::test(start_paused = true)]
async fn test_quota_ends_round_and_stops_countdown() {
    let round = spawn_round(participants(&["Alice", "Bob"]), 180, RoundConfig::default()).unwrap();

    for i in 0..QUESTION_QUOTA {
        round
            .submit_question(format!("question {i}?"), Outcome::Unknown)
            .await
            .unwrap();
    }
    let last = round.wait_until_ended().await.unwrap();
    assert_eq!(last.end_reason, Some(EndReason::QuotaReached));

    let err = round
        .submit_question("one more?", Outcome::Affirmative)
        .await
        .unwrap_err();
    assert_eq!(err, RoundError::RoundAlreadyEnded);

    let frozen = round.snapshot().remaining_fraction;
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(round.snapshot().remaining_fraction, frozen);
    assert_eq!(round.snapshot().questions.len(), QUESTION_QUOTA);
}

#[tokio::test(start_paused = true)]
async fn test_submit_after_time_expired() {
    let round = spawn_round(participants(&["Alice"]), 1, RoundConfig::default()).unwrap();
    round.wait_until_ended().await.unwrap();

    let err = round
        .submit_question("too late?", Outcome::Affirmative)
        .await
        .unwrap_err();
    assert_eq!(err, RoundError::RoundAlreadyEnded);
    assert!(round.snapshot().questions.is_empty());
}

// =========================================================================
// Teardown
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_driver() {
    let round = spawn_round(participants(&["Alice"]), 180, RoundConfig::default()).unwrap();

    round.shutdown().await.unwrap();
    settle().await;

    assert!(round.is_closed());
    assert_eq!(
        round.submit_question("hello?", Outcome::Affirmative).await.unwrap_err(),
        RoundError::Unavailable
    );
    assert_eq!(round.wait_until_ended().await.unwrap_err(), RoundError::Unavailable);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handles_stops_driver() {
    let round = spawn_round(participants(&["Alice"]), 180, RoundConfig::default()).unwrap();
    let mut updates = round.subscribe();

    drop(round);
    settle().await;

    // The driver dropped its watch sender on the way out.
    assert!(updates.changed().await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_close_stops_driver_with_clones_alive() {
    let round = spawn_round(participants(&["Alice"]), 180, RoundConfig::default()).unwrap();
    let other = round.clone();

    round.close();
    settle().await;

    assert!(other.is_closed());
    let before = other.snapshot().remaining_fraction;
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(other.snapshot().remaining_fraction, before);
    assert_eq!(
        other.submit_question("still there?", Outcome::Negative).await.unwrap_err(),
        RoundError::Unavailable
    );

    // A second close is a no-op.
    round.close();
}
