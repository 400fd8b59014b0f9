//! Participant roster for Twentyq.
//!
//! The roster is the lobby-side state: who is playing, in which turn
//! order, and how long a round lasts. A round never mutates it; it takes
//! an owned snapshot of [`Roster::participants`] and
//! [`Roster::duration_secs`] when it starts.
//!
//! # Key types
//!
//! - [`Participant`]: a named entrant with a roster-unique [`ParticipantId`]
//! - [`Roster`]: ordered participants plus the configured round duration
//! - [`RosterError`]: rejected roster edits

mod error;
mod participant;
mod roster;

pub use error::RosterError;
pub use participant::{Participant, ParticipantId};
pub use roster::Roster;
