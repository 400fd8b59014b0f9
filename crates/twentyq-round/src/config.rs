//! Round configuration and lifecycle state.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use twentyq_tick::TickConfig;

/// Number of questions that ends a round.
pub const QUESTION_QUOTA: usize = 20;

// ---------------------------------------------------------------------------
// RoundConfig
// ---------------------------------------------------------------------------

/// Configuration for a round instance.
///
/// The duration comes from the roster; this only covers how the
/// countdown is driven.
#[derive(Debug, Clone, Default)]
pub struct RoundConfig {
    /// Tick cadence. Each tick removes `interval / duration` of the time
    /// budget.
    pub tick: TickConfig,
}

impl RoundConfig {
    /// Config with a custom tick interval.
    pub fn with_tick_interval(interval: Duration) -> Self {
        Self {
            tick: TickConfig::with_interval(interval),
        }
    }

    /// Clamps the tick config to its supported range.
    pub fn validated(self) -> Self {
        Self {
            tick: self.tick.validated(),
        }
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The lifecycle state of a round.
///
/// ```text
/// Running ──(time runs out | quota filled)──→ Ended
/// ```
///
/// `Ended` is terminal. A new round needs a fresh engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Running,
    Ended,
}

impl Phase {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn is_ended(&self) -> bool {
        matches!(self, Self::Ended)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "Running"),
            Self::Ended => write!(f, "Ended"),
        }
    }
}

/// Which budget ended the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The countdown reached zero.
    TimeExpired,
    /// The question log reached [`QUESTION_QUOTA`].
    QuotaReached,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimeExpired => write!(f, "time expired"),
            Self::QuotaReached => write!(f, "question quota reached"),
        }
    }
}
