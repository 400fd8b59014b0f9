//! Integration tests for the lobby/game host.

use std::time::Duration;

use twentyq::prelude::*;

fn host_with(names: &[&str], duration_secs: u32) -> Host {
    let mut host = Host::new(Roster::new(duration_secs).unwrap());
    for name in names {
        host.add_participant(name).unwrap();
    }
    host
}

#[tokio::test(start_paused = true)]
async fn test_empty_roster_stays_in_lobby() {
    let mut host = Host::default();

    let err = host.start_round().err().unwrap();
    assert_eq!(err, TwentyqError::Round(RoundError::InvalidRoster));
    assert!(err.is_user_facing());
    assert_eq!(host.screen(), Screen::Lobby);
    assert!(host.round().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_start_round_switches_to_game() {
    let mut host = host_with(&["Alice", "Bob"], 180);

    host.start_round().unwrap();

    assert_eq!(host.screen(), Screen::Game);
    let snapshot = host.snapshot().unwrap();
    assert_eq!(snapshot.participants.len(), 2);
    assert_eq!(snapshot.duration_secs, 180);
    assert_eq!(snapshot.phase, Phase::Running);
}

#[tokio::test(start_paused = true)]
async fn test_roster_is_read_only_during_round() {
    let mut host = host_with(&["Alice"], 180);
    let alice = host.roster().participants()[0].id;
    host.start_round().unwrap();

    assert_eq!(host.add_participant("Bob").unwrap_err(), TwentyqError::RoundActive);
    assert_eq!(host.remove_participant(alice).unwrap_err(), TwentyqError::RoundActive);
    assert_eq!(host.set_duration_secs(30).unwrap_err(), TwentyqError::RoundActive);
    assert_eq!(host.start_round().err().unwrap(), TwentyqError::RoundActive);
    assert_eq!(host.roster().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_submit_forwards_to_round() {
    let mut host = host_with(&["Alice", "Bob"], 180);
    host.start_round().unwrap();

    let snapshot = host
        .submit_question("likes pizza?", Outcome::Affirmative)
        .await
        .unwrap();
    assert_eq!(snapshot.active_participant().unwrap().name, "Bob");

    let err = host.submit_question("", Outcome::Negative).await.unwrap_err();
    assert_eq!(err, TwentyqError::Round(RoundError::EmptyQuestion));
    assert!(err.is_user_facing());
}

#[tokio::test(start_paused = true)]
async fn test_submit_from_lobby() {
    let host = host_with(&["Alice"], 180);
    let err = host.submit_question("hello?", Outcome::Affirmative).await.unwrap_err();
    assert_eq!(err, TwentyqError::NoActiveRound);
}

#[tokio::test(start_paused = true)]
async fn test_return_to_lobby_discards_round() {
    let mut host = host_with(&["Alice"], 180);
    let round = host.start_round().unwrap().clone();
    let mut updates = round.subscribe();
    drop(round);

    host.return_to_lobby();

    assert_eq!(host.screen(), Screen::Lobby);
    assert!(host.snapshot().is_none());
    // The driver shuts down with its last handle, taking the timer with it.
    let closed = tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            if updates.changed().await.is_err() {
                break;
            }
        }
    })
    .await;
    assert!(closed.is_ok(), "round driver should stop after navigation");

    host.add_participant("Bob").unwrap();
    assert_eq!(host.roster().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_return_to_lobby_stops_timer_despite_held_clone() {
    let mut host = host_with(&["Alice"], 180);
    let round = host.start_round().unwrap().clone();

    tokio::time::sleep(Duration::from_secs(1)).await;
    let before = round.snapshot().remaining_fraction;
    assert!(before < 1.0);

    host.return_to_lobby();
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(round.snapshot().remaining_fraction, before);
    assert!(round.is_closed());
    assert_eq!(
        round.submit_question("anyone?", Outcome::Affirmative).await.unwrap_err(),
        RoundError::Unavailable
    );
}

#[tokio::test(start_paused = true)]
async fn test_lobby_edits_apply_to_next_round() {
    let mut host = host_with(&["Alice"], 1);
    host.start_round().unwrap();
    let first = host.round().unwrap().wait_until_ended().await.unwrap();
    assert_eq!(first.end_reason, Some(EndReason::TimeExpired));

    host.return_to_lobby();
    host.add_participant("Bob").unwrap();
    host.set_duration_secs(60).unwrap();
    host.start_round().unwrap();

    let snapshot = host.snapshot().unwrap();
    assert_eq!(snapshot.participants.len(), 2);
    assert_eq!(snapshot.remaining_secs, 60);
    assert!(snapshot.questions.is_empty());
}
