//! Fixed-interval tick source for Twentyq rounds.
//!
//! A round's countdown is *tick-counted*: every tick removes one fixed
//! slice of the round duration, no matter how much wall-clock time
//! actually passed. If the runtime starves the timer (a suspended laptop,
//! an overloaded executor), ticks arrive late and the countdown runs
//! slower than real time. The scheduler does not correct for this; it
//! reports late wakes as overruns so the drift is visible in logs and
//! [`TickMetrics`].
//!
//! # Integration
//!
//! The scheduler sits inside the round driver's `tokio::select!` loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         cmd = cmd_rx.recv() => { /* handle submissions */ }
//!         info = scheduler.wait_for_tick() => {
//!             engine.tick();
//!         }
//!     }
//! }
//! ```
//!
//! [`TickScheduler::wait_for_tick`] is cancel-safe: the next deadline is
//! only advanced after the sleep completes, so dropping the future when
//! another branch wins does not lose or shift a tick.

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What to do when a tick fires late.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickPolicy {
    /// Schedule the next tick one interval from *now*. Missed ticks are
    /// lost, so the countdown falls behind real time. This mirrors how a
    /// browser interval timer behaves under throttling.
    #[default]
    Skip,
    /// Keep the original cadence: the next tick fires one interval after
    /// the missed deadline, so late ticks arrive back-to-back.
    Drop,
}

/// Configuration for the tick scheduler.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Time between ticks. Default: 100 ms.
    pub interval: Duration,
    /// Late-tick handling.
    pub policy: TickPolicy,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
            policy: TickPolicy::default(),
        }
    }
}

impl TickConfig {
    /// Default countdown cadence.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);
    /// Shortest accepted interval.
    pub const MIN_INTERVAL: Duration = Duration::from_millis(1);
    /// Longest accepted interval.
    pub const MAX_INTERVAL: Duration = Duration::from_secs(10);

    /// Create a config with a specific interval and default policy.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }

    /// Clamp out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`TickScheduler::new`].
    pub fn validated(mut self) -> Self {
        let clamped = self.interval.clamp(Self::MIN_INTERVAL, Self::MAX_INTERVAL);
        if clamped != self.interval {
            warn!(
                requested_ms = self.interval.as_secs_f64() * 1000.0,
                clamped_ms = clamped.as_secs_f64() * 1000.0,
                "tick interval out of range, clamping"
            );
            self.interval = clamped;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Tick info
// ---------------------------------------------------------------------------

/// Information about a fired tick, returned by [`TickScheduler::wait_for_tick`].
#[derive(Debug, Clone)]
pub struct TickInfo {
    /// Monotonically increasing tick number (starts at 1).
    pub tick: u64,
    /// The fixed interval. Callers count ticks, not elapsed wall-clock time.
    pub dt: Duration,
    /// `true` if this tick fired more than 10% of an interval late.
    pub overrun: bool,
    /// Whole intervals lost to the late wake (0 in normal operation).
    pub ticks_skipped: u64,
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Counters describing how reliably the tick source kept its cadence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickMetrics {
    /// Total ticks fired.
    pub total_ticks: u64,
    /// Ticks that fired late.
    pub total_overruns: u64,
    /// Intervals lost to late wakes. Each one is countdown drift.
    pub total_skipped: u64,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Fixed-interval tick scheduler. One per running round.
pub struct TickScheduler {
    config: TickConfig,
    tick_count: u64,
    /// Deadline of the next tick. `None` once stopped.
    next_tick: Option<Instant>,
    metrics: TickMetrics,
}

impl TickScheduler {
    /// Create a scheduler from config. The first tick is due one interval
    /// from now.
    pub fn new(config: TickConfig) -> Self {
        let config = config.validated();
        let next_tick = Some(Instant::now() + config.interval);

        debug!(
            interval_ms = config.interval.as_secs_f64() * 1000.0,
            policy = ?config.policy,
            "tick scheduler created"
        );

        Self {
            config,
            tick_count: 0,
            next_tick,
            metrics: TickMetrics::default(),
        }
    }

    /// Create a scheduler for a specific interval with the default policy.
    pub fn with_interval(interval: Duration) -> Self {
        Self::new(TickConfig::with_interval(interval))
    }

    /// Wait until the next tick is due.
    ///
    /// Once the scheduler is stopped this future pends forever; inside
    /// `tokio::select!` the other branches keep being served.
    pub async fn wait_for_tick(&mut self) -> TickInfo {
        let Some(next) = self.next_tick else {
            return std::future::pending().await;
        };
        let interval = self.config.interval;

        time::sleep_until(next).await;

        let now = Instant::now();
        self.tick_count += 1;

        let late_by = now.saturating_duration_since(next);
        let overrun = late_by > interval / 10;
        let mut ticks_skipped = 0u64;

        self.next_tick = Some(match self.config.policy {
            TickPolicy::Skip => {
                if overrun {
                    ticks_skipped = (late_by.as_nanos() / interval.as_nanos()) as u64;
                    if ticks_skipped > 0 {
                        warn!(
                            tick = self.tick_count,
                            skipped = ticks_skipped,
                            late_ms = late_by.as_secs_f64() * 1000.0,
                            "tick starved, countdown falling behind real time"
                        );
                    }
                }
                now + interval
            }
            TickPolicy::Drop => {
                if overrun {
                    warn!(
                        tick = self.tick_count,
                        late_ms = late_by.as_secs_f64() * 1000.0,
                        "tick late, keeping original cadence"
                    );
                }
                next + interval
            }
        });

        if overrun {
            self.metrics.total_overruns += 1;
        }
        self.metrics.total_skipped += ticks_skipped;
        self.metrics.total_ticks += 1;

        trace!(tick = self.tick_count, overrun, "tick fired");

        TickInfo {
            tick: self.tick_count,
            dt: interval,
            overrun,
            ticks_skipped,
        }
    }

    /// Release the timer. No further ticks fire; `wait_for_tick` pends.
    ///
    /// Idempotent.
    pub fn stop(&mut self) {
        if self.next_tick.take().is_some() {
            debug!(tick = self.tick_count, "tick scheduler stopped");
        }
    }

    /// Whether [`stop`](Self::stop) has been called.
    pub fn is_stopped(&self) -> bool {
        self.next_tick.is_none()
    }

    /// Ticks fired so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// The fixed tick interval.
    pub fn interval(&self) -> Duration {
        self.config.interval
    }

    /// Snapshot of the cadence counters.
    pub fn metrics(&self) -> &TickMetrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_clamps_zero_interval() {
        let cfg = TickConfig::with_interval(Duration::ZERO).validated();
        assert_eq!(cfg.interval, TickConfig::MIN_INTERVAL);
    }

    #[test]
    fn test_validated_clamps_huge_interval() {
        let cfg = TickConfig::with_interval(Duration::from_secs(3600)).validated();
        assert_eq!(cfg.interval, TickConfig::MAX_INTERVAL);
    }

    #[test]
    fn test_validated_keeps_in_range_interval() {
        let cfg = TickConfig::with_interval(Duration::from_millis(250)).validated();
        assert_eq!(cfg.interval, Duration::from_millis(250));
    }
}
