//! Round state machine for Twentyq.
//!
//! A round is one play-through bounded by a time budget and a fixed
//! question quota. Participants take turns; each submitted question is
//! recorded with its outcome and passes the turn on. The round ends the
//! moment the countdown reaches zero or the quota is filled.
//!
//! # Key types
//!
//! - [`RoundEngine`]: the synchronous state machine (tick, submit, end)
//! - [`RoundHandle`]: talk to a round driven by its own Tokio task
//! - [`RoundSnapshot`]: read-only projection for renderers
//! - [`RoundConfig`]: tick cadence
//! - [`Phase`] / [`EndReason`]: lifecycle state
//!
//! [`RoundEngine`] has no timer of its own and can be stepped by hand.
//! [`spawn_round`] pairs it with a [`TickScheduler`](twentyq_tick::TickScheduler)
//! in a single task so ticks and submissions never race.

mod config;
mod engine;
mod error;
mod question;
mod round;

pub use config::{EndReason, Phase, QUESTION_QUOTA, RoundConfig};
pub use engine::{RoundEngine, RoundSnapshot, Transition};
pub use error::RoundError;
pub use question::{Outcome, Question};
pub use round::{RoundHandle, spawn_round};
