//! Round driver: a Tokio task that owns one engine and its tick source.
//!
//! Ticks and submissions are both delivered to the same task and handled
//! one at a time, in arrival order, so the engine needs no locking and
//! both paths see the phase the other one left behind.
//!
//! The tick source lives exactly as long as it is useful: it is released
//! the moment the round ends, and it goes away with the task when the
//! round is shut down or closed, or every [`RoundHandle`] is dropped.

use std::sync::Arc;

use tokio::sync::{Notify, mpsc, oneshot, watch};
use twentyq_roster::Participant;
use twentyq_tick::{TickInfo, TickScheduler};

use crate::{Outcome, RoundConfig, RoundEngine, RoundError, RoundSnapshot, Transition};

/// Command channel size for round drivers.
const DEFAULT_CHANNEL_SIZE: usize = 16;

/// Commands sent to a round driver through its channel.
pub(crate) enum RoundCommand {
    /// Record a question for the active participant.
    Submit {
        content: String,
        outcome: Outcome,
        reply: oneshot::Sender<Result<RoundSnapshot, RoundError>>,
    },

    /// Stop the driver. The round is discarded.
    Shutdown,
}

/// Handle to a running round.
///
/// Cheap to clone. The driver task stops when any handle calls
/// [`close`](Self::close) or [`shutdown`](Self::shutdown), or once every
/// handle is dropped.
#[derive(Clone)]
pub struct RoundHandle {
    sender: mpsc::Sender<RoundCommand>,
    updates: watch::Receiver<RoundSnapshot>,
    close: Arc<Notify>,
}

impl RoundHandle {
    /// Submits a question and waits for the resulting snapshot.
    ///
    /// # Errors
    /// The engine's rejection ([`RoundError::EmptyQuestion`],
    /// [`RoundError::RoundAlreadyEnded`]) or [`RoundError::Unavailable`]
    /// if the driver is gone.
    pub async fn submit_question(
        &self,
        content: impl Into<String>,
        outcome: Outcome,
    ) -> Result<RoundSnapshot, RoundError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoundCommand::Submit {
                content: content.into(),
                outcome,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoundError::Unavailable)?;
        reply_rx.await.map_err(|_| RoundError::Unavailable)?
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> RoundSnapshot {
        self.updates.borrow().clone()
    }

    /// A receiver that is notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<RoundSnapshot> {
        self.updates.clone()
    }

    /// Waits until the round ends and returns the final snapshot.
    ///
    /// # Errors
    /// [`RoundError::Unavailable`] if the round is shut down first.
    pub async fn wait_until_ended(&self) -> Result<RoundSnapshot, RoundError> {
        let mut updates = self.updates.clone();
        let snapshot = updates
            .wait_for(|s| s.phase.is_ended())
            .await
            .map_err(|_| RoundError::Unavailable)?;
        Ok(snapshot.clone())
    }

    /// Tells the driver to stop. The round is discarded.
    pub async fn shutdown(&self) -> Result<(), RoundError> {
        self.sender
            .send(RoundCommand::Shutdown)
            .await
            .map_err(|_| RoundError::Unavailable)
    }

    /// Stops the driver without waiting, even while other clones of this
    /// handle are still alive. The round is discarded and its timer
    /// released. Idempotent.
    pub fn close(&self) {
        self.close.notify_one();
    }

    /// Whether the driver task has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// The driver state. Runs inside a Tokio task.
struct RoundDriver {
    engine: RoundEngine,
    /// `None` once the round has ended.
    scheduler: Option<TickScheduler>,
    receiver: mpsc::Receiver<RoundCommand>,
    updates: watch::Sender<RoundSnapshot>,
    close: Arc<Notify>,
}

impl RoundDriver {
    /// Runs until shutdown, close, or until every handle is dropped.
    async fn run(mut self) {
        tracing::debug!("round driver started");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    match cmd {
                        Some(RoundCommand::Submit { content, outcome, reply }) => {
                            let result = self.handle_submit(&content, outcome);
                            let _ = reply.send(result);
                        }
                        Some(RoundCommand::Shutdown) => {
                            tracing::info!(phase = %self.engine.phase(), "round shut down");
                            break;
                        }
                        None => {
                            tracing::debug!("all round handles dropped");
                            break;
                        }
                    }
                }
                _ = self.close.notified() => {
                    tracing::info!(phase = %self.engine.phase(), "round closed");
                    break;
                }
                _ = next_tick(&mut self.scheduler) => {
                    self.handle_tick();
                }
            }
        }

        self.release_timer();
        tracing::debug!("round driver stopped");
    }

    fn handle_tick(&mut self) {
        match self.engine.tick() {
            Ok(transition) => self.apply(transition),
            Err(err) => {
                // Only reachable if a tick slipped in after the end.
                tracing::debug!(%err, "tick ignored");
                self.release_timer();
            }
        }
    }

    fn handle_submit(
        &mut self,
        content: &str,
        outcome: Outcome,
    ) -> Result<RoundSnapshot, RoundError> {
        let transition = self.engine.submit_question(content, outcome)?;
        self.apply(transition);
        Ok(self.engine.snapshot())
    }

    fn apply(&mut self, transition: Transition) {
        if let Transition::Ended(_) = transition {
            self.release_timer();
        }
        self.updates.send_replace(self.engine.snapshot());
    }

    /// Drops the tick source. Idempotent.
    fn release_timer(&mut self) {
        if let Some(mut scheduler) = self.scheduler.take() {
            scheduler.stop();
            let metrics = scheduler.metrics();
            tracing::debug!(
                ticks = metrics.total_ticks,
                overruns = metrics.total_overruns,
                lost_ticks = metrics.total_skipped,
                "tick source released"
            );
        }
    }
}

/// Resolves on the next tick, or never once the tick source is released.
async fn next_tick(scheduler: &mut Option<TickScheduler>) -> TickInfo {
    match scheduler {
        Some(scheduler) => scheduler.wait_for_tick().await,
        None => std::future::pending().await,
    }
}

/// Starts a round and spawns its driver task.
///
/// Must be called from within a Tokio runtime. Validation happens before
/// anything is spawned, so a rejected start leaves no task or timer
/// behind.
///
/// # Errors
/// [`RoundError::InvalidRoster`] or [`RoundError::InvalidDuration`].
pub fn spawn_round(
    participants: Vec<Participant>,
    duration_secs: u32,
    config: RoundConfig,
) -> Result<RoundHandle, RoundError> {
    let config = config.validated();
    let engine = RoundEngine::start(participants, duration_secs, &config)?;
    let scheduler = TickScheduler::new(config.tick);

    let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_SIZE);
    let (updates_tx, updates_rx) = watch::channel(engine.snapshot());
    let close = Arc::new(Notify::new());

    let driver = RoundDriver {
        engine,
        scheduler: Some(scheduler),
        receiver: rx,
        updates: updates_tx,
        close: Arc::clone(&close),
    };

    tokio::spawn(driver.run());

    Ok(RoundHandle {
        sender: tx,
        updates: updates_rx,
        close,
    })
}
