//! Error types for the round layer.

/// Errors that can occur during round operations.
///
/// None of these leave the round in a modified state.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum RoundError {
    /// A round was started with no participants. The host should send
    /// the user back to roster setup.
    #[error("a round needs at least one participant")]
    InvalidRoster,

    /// A round was started with a zero-second duration.
    #[error("round duration must be positive, got {0}s")]
    InvalidDuration(u32),

    /// A question was blank after trimming.
    #[error("question must not be empty")]
    EmptyQuestion,

    /// The round already ended. Indicates a stale caller.
    #[error("round has already ended")]
    RoundAlreadyEnded,

    /// The round driver task is gone (shut down or discarded).
    #[error("round is unavailable")]
    Unavailable,
}

impl RoundError {
    /// Whether this should be shown to the user as a notice.
    ///
    /// `RoundAlreadyEnded` and `Unavailable` come from stale callers and
    /// are meant to be ignored.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::InvalidRoster | Self::InvalidDuration(_) | Self::EmptyQuestion
        )
    }
}
