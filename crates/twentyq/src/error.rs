//! Unified error type for Twentyq.

use twentyq_roster::RosterError;
use twentyq_round::RoundError;

/// Top-level error wrapping the crate-specific errors plus the host's
/// own navigation rules.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TwentyqError {
    /// A roster edit was rejected.
    #[error(transparent)]
    Roster(#[from] RosterError),

    /// A round operation was rejected.
    #[error(transparent)]
    Round(#[from] RoundError),

    /// The roster is read-only while a round is on screen.
    #[error("roster cannot change while a round is active")]
    RoundActive,

    /// A round operation was requested from the lobby.
    #[error("no round is active")]
    NoActiveRound,
}

impl TwentyqError {
    /// Whether this should be shown to the user as a notice.
    pub fn is_user_facing(&self) -> bool {
        match self {
            Self::Roster(_) => true,
            Self::Round(err) => err.is_user_facing(),
            Self::RoundActive | Self::NoActiveRound => false,
        }
    }
}
