//! Error types for the roster layer.

use crate::ParticipantId;

/// Errors returned by roster edits.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RosterError {
    /// A participant name was empty or only whitespace.
    #[error("participant name must not be empty")]
    EmptyName,

    /// No participant with this ID is on the roster.
    #[error("participant {0} not found")]
    NotFound(ParticipantId),

    /// Round duration must be at least one second.
    #[error("round duration must be positive, got {0}s")]
    InvalidDuration(u32),

    /// Two participants share an ID in a loaded roster.
    #[error("participant {0} appears more than once")]
    DuplicateId(ParticipantId),
}
