//! The roster: ordered participants and the round duration.

use serde::{Deserialize, Serialize};

use crate::{Participant, ParticipantId, RosterError};

/// Ordered list of participants plus the configured round duration.
///
/// Insertion order is turn order. IDs are assigned from a per-roster
/// counter and are never reused, even after removals.
///
/// Deserializing goes through the same checks as editing: a zero
/// duration, a blank name or a repeated ID is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RosterRecord")]
pub struct Roster {
    participants: Vec<Participant>,
    duration_secs: u32,
    next_id: u64,
}

impl Roster {
    /// Round duration used when none is configured.
    pub const DEFAULT_DURATION_SECS: u32 = 180;

    /// Creates an empty roster with the given round duration.
    pub fn new(duration_secs: u32) -> Result<Self, RosterError> {
        if duration_secs == 0 {
            return Err(RosterError::InvalidDuration(duration_secs));
        }
        Ok(Self {
            participants: Vec::new(),
            duration_secs,
            next_id: 1,
        })
    }

    /// Appends a participant to the end of the turn order.
    ///
    /// The name is trimmed; blank names are rejected.
    pub fn add_participant(&mut self, name: &str) -> Result<ParticipantId, RosterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::EmptyName);
        }

        let id = ParticipantId(self.next_id);
        self.next_id += 1;
        self.participants.push(Participant {
            id,
            name: name.to_string(),
        });
        tracing::debug!(%id, name, participants = self.participants.len(), "participant added");
        Ok(id)
    }

    /// Removes a participant, keeping the order of the rest.
    pub fn remove_participant(&mut self, id: ParticipantId) -> Result<Participant, RosterError> {
        let index = self
            .participants
            .iter()
            .position(|p| p.id == id)
            .ok_or(RosterError::NotFound(id))?;
        let removed = self.participants.remove(index);
        tracing::debug!(%id, participants = self.participants.len(), "participant removed");
        Ok(removed)
    }

    /// Changes the round duration for the next round.
    pub fn set_duration_secs(&mut self, duration_secs: u32) -> Result<(), RosterError> {
        if duration_secs == 0 {
            return Err(RosterError::InvalidDuration(duration_secs));
        }
        self.duration_secs = duration_secs;
        Ok(())
    }

    /// Participants in turn order.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Looks up a participant by ID.
    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Configured round duration in seconds. Always positive.
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

/// Wire form of a [`Roster`], checked before it becomes one.
#[derive(Deserialize)]
struct RosterRecord {
    participants: Vec<Participant>,
    duration_secs: u32,
    #[serde(default)]
    next_id: u64,
}

impl TryFrom<RosterRecord> for Roster {
    type Error = RosterError;

    fn try_from(record: RosterRecord) -> Result<Self, Self::Error> {
        let mut roster = Roster::new(record.duration_secs)?;
        for participant in record.participants {
            if roster.get(participant.id).is_some() {
                return Err(RosterError::DuplicateId(participant.id));
            }
            let name = participant.name.trim();
            if name.is_empty() {
                return Err(RosterError::EmptyName);
            }
            roster.next_id = roster.next_id.max(participant.id.0.saturating_add(1));
            roster.participants.push(Participant {
                id: participant.id,
                name: name.to_string(),
            });
        }
        roster.next_id = roster.next_id.max(record.next_id);
        Ok(roster)
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            participants: Vec::new(),
            duration_secs: Self::DEFAULT_DURATION_SECS,
            next_id: 1,
        }
    }
}
