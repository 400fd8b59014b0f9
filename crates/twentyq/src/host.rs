//! The host: lobby and game screens around a single round.
//!
//! ```text
//!   Lobby ──(start_round, roster not empty)──→ Game
//!     ↑                                          │
//!     └──────────────(return_to_lobby)───────────┘
//! ```
//!
//! The roster can only be edited from the lobby. Starting a round hands
//! the round an owned copy of the participants, so nothing the lobby does
//! afterwards can reach a running round.

use twentyq_roster::{Participant, ParticipantId, Roster};
use twentyq_round::{Outcome, RoundConfig, RoundHandle, RoundSnapshot, spawn_round};

use crate::TwentyqError;

/// Which screen the host is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Roster setup.
    Lobby,
    /// A round is on screen (running or finished).
    Game,
}

/// Application shell owning the roster and at most one round.
pub struct Host {
    roster: Roster,
    config: RoundConfig,
    round: Option<RoundHandle>,
    screen: Screen,
}

impl Host {
    /// Creates a host on the lobby screen with the default tick cadence.
    pub fn new(roster: Roster) -> Self {
        Self::with_config(roster, RoundConfig::default())
    }

    /// Creates a host with a custom round config.
    pub fn with_config(roster: Roster, config: RoundConfig) -> Self {
        Self {
            roster,
            config,
            round: None,
            screen: Screen::Lobby,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Adds a participant to the end of the turn order.
    pub fn add_participant(&mut self, name: &str) -> Result<ParticipantId, TwentyqError> {
        self.ensure_lobby()?;
        Ok(self.roster.add_participant(name)?)
    }

    pub fn remove_participant(&mut self, id: ParticipantId) -> Result<Participant, TwentyqError> {
        self.ensure_lobby()?;
        Ok(self.roster.remove_participant(id)?)
    }

    /// Sets the duration of the next round.
    pub fn set_duration_secs(&mut self, duration_secs: u32) -> Result<(), TwentyqError> {
        self.ensure_lobby()?;
        Ok(self.roster.set_duration_secs(duration_secs)?)
    }

    /// Starts a round from the current roster and switches to the game
    /// screen.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// - [`TwentyqError::RoundActive`] if a round is already on screen.
    /// - [`RoundError::InvalidRoster`](twentyq_round::RoundError::InvalidRoster) if nobody has joined. The host
    ///   stays on the lobby.
    pub fn start_round(&mut self) -> Result<&RoundHandle, TwentyqError> {
        self.ensure_lobby()?;

        let round = match spawn_round(
            self.roster.participants().to_vec(),
            self.roster.duration_secs(),
            self.config.clone(),
        ) {
            Ok(round) => round,
            Err(err) => {
                tracing::info!(%err, "round not started, staying in lobby");
                return Err(err.into());
            }
        };

        self.screen = Screen::Game;
        Ok(&*self.round.insert(round))
    }

    /// The round on screen, if any.
    pub fn round(&self) -> Option<&RoundHandle> {
        self.round.as_ref()
    }

    /// Latest snapshot of the round on screen.
    pub fn snapshot(&self) -> Option<RoundSnapshot> {
        self.round.as_ref().map(RoundHandle::snapshot)
    }

    /// Forwards a question to the round on screen.
    pub async fn submit_question(
        &self,
        content: &str,
        outcome: Outcome,
    ) -> Result<RoundSnapshot, TwentyqError> {
        let round = self.round.as_ref().ok_or(TwentyqError::NoActiveRound)?;
        Ok(round.submit_question(content, outcome).await?)
    }

    /// Discards the round on screen and shows the lobby again.
    ///
    /// The round's driver and timer stop even if a caller still holds a
    /// clone of its handle; such clones report [`RoundError::Unavailable`]
    /// from then on.
    ///
    /// [`RoundError::Unavailable`]: twentyq_round::RoundError::Unavailable
    pub fn return_to_lobby(&mut self) {
        if let Some(round) = self.round.take() {
            round.close();
            let snapshot = round.snapshot();
            tracing::info!(
                phase = %snapshot.phase,
                questions = snapshot.questions.len(),
                "round discarded"
            );
        }
        self.screen = Screen::Lobby;
    }

    fn ensure_lobby(&self) -> Result<(), TwentyqError> {
        if self.round.is_some() {
            return Err(TwentyqError::RoundActive);
        }
        Ok(())
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new(Roster::default())
    }
}
