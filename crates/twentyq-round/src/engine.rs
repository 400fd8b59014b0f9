//! The round engine: countdown, turn rotation, question log, and end
//! detection.
//!
//! The engine is a plain synchronous state machine. It never reads a
//! clock: the countdown advances only when [`RoundEngine::tick`] is
//! called, and each tick removes exactly one tick interval from the time
//! budget. The elapsed time is kept as an integer tick count, so a
//! 10 s round on a 100 ms cadence reaches zero on exactly the 100th tick.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use twentyq_roster::Participant;

use crate::{EndReason, Outcome, Phase, QUESTION_QUOTA, Question, RoundConfig, RoundError};

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Below this fraction of time left the countdown is shown as urgent.
const LOW_TIME_FRACTION: f64 = 0.1;

/// What a successful tick or submission did to the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The round is still running.
    Continued,
    /// This call ended the round. Reported exactly once per round.
    Ended(EndReason),
}

/// The round state machine.
///
/// Owns a private copy of the participants; the roster it was started
/// from can change afterwards without affecting the round.
#[derive(Debug, Clone)]
pub struct RoundEngine {
    participants: Vec<Participant>,
    duration_secs: u32,
    tick_interval: Duration,
    ticks_elapsed: u64,
    remaining_fraction: f64,
    active_index: usize,
    questions: Vec<Question>,
    phase: Phase,
    end_reason: Option<EndReason>,
}

impl RoundEngine {
    /// Starts a round.
    ///
    /// # Errors
    /// - [`RoundError::InvalidRoster`] if `participants` is empty.
    /// - [`RoundError::InvalidDuration`] if `duration_secs` is zero.
    pub fn start(
        participants: Vec<Participant>,
        duration_secs: u32,
        config: &RoundConfig,
    ) -> Result<Self, RoundError> {
        if participants.is_empty() {
            return Err(RoundError::InvalidRoster);
        }
        if duration_secs == 0 {
            return Err(RoundError::InvalidDuration(duration_secs));
        }
        let tick_interval = config.clone().validated().tick.interval;

        tracing::info!(
            participants = participants.len(),
            duration_secs,
            tick_ms = tick_interval.as_secs_f64() * 1000.0,
            "round started"
        );

        Ok(Self {
            participants,
            duration_secs,
            tick_interval,
            ticks_elapsed: 0,
            remaining_fraction: 1.0,
            active_index: 0,
            questions: Vec::with_capacity(QUESTION_QUOTA),
            phase: Phase::Running,
            end_reason: None,
        })
    }

    /// Advances the countdown by one tick interval, floored at zero.
    ///
    /// Ends the round when no time is left.
    ///
    /// # Errors
    /// [`RoundError::RoundAlreadyEnded`] once the round is over; nothing
    /// changes.
    pub fn tick(&mut self) -> Result<Transition, RoundError> {
        self.ensure_running()?;

        self.ticks_elapsed += 1;
        let elapsed = self.ticks_elapsed as u128 * self.tick_interval.as_nanos();
        let budget = self.duration_nanos();

        if elapsed >= budget {
            self.remaining_fraction = 0.0;
            return Ok(self.end(EndReason::TimeExpired));
        }

        self.remaining_fraction = (budget - elapsed) as f64 / budget as f64;
        tracing::trace!(
            tick = self.ticks_elapsed,
            remaining = self.remaining_fraction,
            "countdown advanced"
        );
        Ok(Transition::Continued)
    }

    /// Records a question for the active participant and passes the turn.
    ///
    /// Content is trimmed before it is stored. Ends the round when the
    /// log reaches [`QUESTION_QUOTA`].
    ///
    /// # Errors
    /// - [`RoundError::RoundAlreadyEnded`] once the round is over.
    /// - [`RoundError::EmptyQuestion`] for blank content.
    ///
    /// In both cases nothing changes.
    pub fn submit_question(
        &mut self,
        content: &str,
        outcome: Outcome,
    ) -> Result<Transition, RoundError> {
        self.ensure_running()?;

        let content = content.trim();
        if content.is_empty() {
            tracing::debug!(
                active = self.active_index,
                "empty question rejected"
            );
            return Err(RoundError::EmptyQuestion);
        }

        self.questions.push(Question {
            content: content.to_string(),
            outcome,
        });
        let asked_by = self.active_index;
        self.active_index = (self.active_index + 1) % self.participants.len();

        tracing::debug!(
            asked_by,
            %outcome,
            questions = self.questions.len(),
            next = self.active_index,
            "question recorded"
        );

        if self.questions.len() >= QUESTION_QUOTA {
            return Ok(self.end(EndReason::QuotaReached));
        }
        Ok(Transition::Continued)
    }

    /// The only place the phase leaves `Running`.
    fn end(&mut self, reason: EndReason) -> Transition {
        if self.phase.is_ended() {
            return Transition::Continued;
        }
        self.phase = Phase::Ended;
        self.end_reason = Some(reason);
        tracing::info!(
            %reason,
            questions = self.questions.len(),
            ticks = self.ticks_elapsed,
            "round ended"
        );
        Transition::Ended(reason)
    }

    fn ensure_running(&self) -> Result<(), RoundError> {
        if self.phase.is_ended() {
            return Err(RoundError::RoundAlreadyEnded);
        }
        Ok(())
    }

    fn duration_nanos(&self) -> u128 {
        self.duration_secs as u128 * NANOS_PER_SEC
    }

    /// Fraction of the time budget left, in `[0, 1]`.
    pub fn remaining_fraction(&self) -> f64 {
        self.remaining_fraction
    }

    /// Time budget left, as counted by ticks.
    pub fn remaining(&self) -> Duration {
        let elapsed = self.ticks_elapsed as u128 * self.tick_interval.as_nanos();
        let left = self.duration_nanos().saturating_sub(elapsed);
        Duration::new(
            (left / NANOS_PER_SEC) as u64,
            (left % NANOS_PER_SEC) as u32,
        )
    }

    /// Index of the participant whose turn it is.
    pub fn active_participant_index(&self) -> usize {
        self.active_index
    }

    /// The participant whose turn it is.
    pub fn active_participant(&self) -> &Participant {
        &self.participants[self.active_index]
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Recorded questions in submission order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase.is_running()
    }

    /// Set once the round has ended.
    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Ticks applied so far.
    pub fn ticks_elapsed(&self) -> u64 {
        self.ticks_elapsed
    }

    /// Read-only projection of the current state.
    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            remaining_fraction: self.remaining_fraction,
            remaining_secs: self.remaining().as_secs() as u32,
            duration_secs: self.duration_secs,
            participants: self.participants.clone(),
            active_participant_index: self.active_index,
            questions: self.questions.clone(),
            phase: self.phase,
            end_reason: self.end_reason,
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// What a renderer sees of a round. Published after every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    /// Fraction of time left, `1.0` at start, `0.0` when expired.
    pub remaining_fraction: f64,
    /// Whole seconds left, rounded down.
    pub remaining_secs: u32,
    pub duration_secs: u32,
    pub participants: Vec<Participant>,
    pub active_participant_index: usize,
    pub questions: Vec<Question>,
    pub phase: Phase,
    pub end_reason: Option<EndReason>,
}

impl RoundSnapshot {
    /// The participant whose turn it is.
    pub fn active_participant(&self) -> Option<&Participant> {
        self.participants.get(self.active_participant_index)
    }

    /// Whether less than a tenth of the time is left.
    pub fn is_low_time(&self) -> bool {
        self.remaining_fraction < LOW_TIME_FRACTION
    }

    /// Questions still allowed before the quota ends the round.
    pub fn questions_left(&self) -> usize {
        QUESTION_QUOTA.saturating_sub(self.questions.len())
    }
}
