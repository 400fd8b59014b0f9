//! Participant identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A roster-unique identifier for a participant.
///
/// Serialized as the bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub u64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

/// A named entrant in the turn rotation.
///
/// Only [`Roster`](crate::Roster) creates participants, so the name is
/// always non-empty and already trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
}

impl Participant {
    /// First character of the name, used as an avatar label.
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next()
    }
}
