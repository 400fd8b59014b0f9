//! # Twentyq
//!
//! A party-game timer for twenty questions. Participants take turns
//! asking yes/no/unsure questions against a shared countdown; the round
//! ends when time runs out or twenty questions have been asked.
//!
//! The [`Host`] plays the part of the application shell: it keeps the
//! roster while players gather in the lobby, starts a round from a
//! snapshot of it, and discards the round when the players leave the
//! game screen.
//!
//! ```rust,no_run
//! use twentyq::prelude::*;
//!
//! # async fn demo() -> Result<(), TwentyqError> {
//! let mut host = Host::new(Roster::default());
//! host.add_participant("Alice")?;
//! host.add_participant("Bob")?;
//!
//! let round = host.start_round()?.clone();
//! round.submit_question("is it alive?", Outcome::Affirmative).await?;
//! let last = round.wait_until_ended().await?;
//! println!("{} questions asked", last.questions.len());
//! # Ok(())
//! # }
//! ```

mod error;
mod host;
pub mod telemetry;

pub use error::TwentyqError;
pub use host::{Host, Screen};

pub use twentyq_roster as roster;
pub use twentyq_round as round;
pub use twentyq_tick as tick;

pub mod prelude {
    pub use crate::{Host, Screen, TwentyqError};
    pub use twentyq_roster::{Participant, ParticipantId, Roster, RosterError};
    pub use twentyq_round::{
        EndReason, Outcome, Phase, QUESTION_QUOTA, Question, RoundConfig, RoundError,
        RoundHandle, RoundSnapshot,
    };
}
