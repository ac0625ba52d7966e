//! Per-reel animation state machine
//!
//! A reel moves `Idle -> Cycling -> Settling -> Settled`. Every transition is
//! driven by a timer from the shared [`Timers`] queue. Each timer carries the
//! epoch of the `start()` that scheduled it; restarting or cancelling the
//! reel bumps the epoch, so a timer that slipped past cancellation is ignored
//! rather than acted on.

use jackpot_config::ReelSettings;
use jackpot_util::MonotonicInstant;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, trace};

use crate::{TimerId, Timers, WordPool};

/// Shown by a reel that has nothing to display
pub const PLACEHOLDER: &str = "—";

const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReelPhase {
    Idle,
    Cycling,
    Settling,
    Settled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReelTimerKind {
    /// Replace the displayed word while cycling
    Tick,
    /// Stop delay elapsed
    Stop,
    /// Deceleration finished
    Settle,
}

/// Payload of a reel timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReelTimer {
    pub reel: usize,
    pub epoch: u64,
    pub kind: ReelTimerKind,
}

/// Notification that a reel reached its final word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReelSettled {
    pub reel: usize,
    pub epoch: u64,
    pub word: String,
}

pub struct ReelOrchestrator {
    index: usize,
    pool: WordPool,
    tick_interval: Duration,
    settle_duration: Duration,

    phase: ReelPhase,
    epoch: u64,
    display: String,
    final_word: Option<String>,
    pending: Vec<TimerId>,
}

impl ReelOrchestrator {
    pub fn new(index: usize, pool: WordPool, settings: &ReelSettings) -> Self {
        Self {
            index,
            pool,
            tick_interval: settings.tick_interval.max(MIN_TICK_INTERVAL),
            settle_duration: settings.settle_duration,
            phase: ReelPhase::Idle,
            epoch: 0,
            display: PLACEHOLDER.to_string(),
            final_word: None,
            pending: Vec::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn phase(&self) -> ReelPhase {
        self.phase
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Word currently on the reel
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn pool(&self) -> &WordPool {
        &self.pool
    }

    /// Number of this reel's timers still scheduled
    pub fn pending_timers(&self) -> usize {
        self.pending.len()
    }

    /// Set the resting word of an idle or settled reel.
    /// Ignored while the reel is animating.
    pub fn show(&mut self, word: Option<&str>) {
        if self.is_animating() {
            return;
        }
        self.display = word.unwrap_or(PLACEHOLDER).to_string();
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, ReelPhase::Cycling | ReelPhase::Settling)
    }

    /// Begin cycling, settling on `final_word` once `stop_delay` elapses.
    ///
    /// Any run in progress is cancelled first.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        final_word: String,
        stop_delay: Duration,
        now: MonotonicInstant,
        timers: &mut Timers<ReelTimer>,
        rng: &mut R,
    ) {
        self.cancel(timers);

        self.phase = ReelPhase::Cycling;
        self.display = self.pool.draw(rng).text.clone();
        self.final_word = Some(final_word);

        self.schedule(timers, now + self.tick_interval, ReelTimerKind::Tick);
        self.schedule(timers, now + stop_delay, ReelTimerKind::Stop);

        debug!(
            reel = self.index,
            epoch = self.epoch,
            stop_delay_ms = stop_delay.as_millis() as u64,
            "Reel started"
        );
    }

    /// Cancel every pending timer. A reel that had not settled returns to
    /// `Idle` and will never report a settle for the cancelled run.
    pub fn cancel(&mut self, timers: &mut Timers<ReelTimer>) {
        for id in self.pending.drain(..) {
            timers.cancel(id);
        }
        self.epoch += 1;

        if self.phase != ReelPhase::Settled {
            self.phase = ReelPhase::Idle;
        }
    }

    /// Handle one of this reel's timers firing at `deadline`
    pub fn on_timer<R: Rng + ?Sized>(
        &mut self,
        timer: ReelTimer,
        id: TimerId,
        deadline: MonotonicInstant,
        timers: &mut Timers<ReelTimer>,
        rng: &mut R,
    ) -> Option<ReelSettled> {
        if timer.epoch != self.epoch {
            debug!(
                reel = self.index,
                timer_epoch = timer.epoch,
                epoch = self.epoch,
                "Ignoring stale reel timer"
            );
            return None;
        }
        self.pending.retain(|pending| *pending != id);

        match (timer.kind, self.phase) {
            (ReelTimerKind::Tick, ReelPhase::Cycling) => {
                self.display = self.pool.draw(rng).text.clone();
                trace!(reel = self.index, word = %self.display, "Reel tick");
                self.schedule(timers, deadline + self.tick_interval, ReelTimerKind::Tick);
                None
            }
            (ReelTimerKind::Stop, ReelPhase::Cycling) => {
                for pending in self.pending.drain(..) {
                    timers.cancel(pending);
                }
                self.phase = ReelPhase::Settling;
                if let Some(word) = &self.final_word {
                    self.display = word.clone();
                }
                self.schedule(timers, deadline + self.settle_duration, ReelTimerKind::Settle);
                None
            }
            (ReelTimerKind::Settle, ReelPhase::Settling) => {
                self.phase = ReelPhase::Settled;
                debug!(reel = self.index, word = %self.display, "Reel settled");
                Some(ReelSettled {
                    reel: self.index,
                    epoch: self.epoch,
                    word: self.display.clone(),
                })
            }
            (kind, phase) => {
                debug!(reel = self.index, ?kind, ?phase, "Ignoring reel timer in wrong phase");
                None
            }
        }
    }

    fn schedule(
        &mut self,
        timers: &mut Timers<ReelTimer>,
        deadline: MonotonicInstant,
        kind: ReelTimerKind,
    ) {
        let id = timers.schedule(
            deadline,
            ReelTimer {
                reel: self.index,
                epoch: self.epoch,
                kind,
            },
        );
        self.pending.push(id);
    }
}
