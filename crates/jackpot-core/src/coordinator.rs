//! Aggregation of reel settles into a single completion event

use jackpot_api::{Prompt, REEL_COUNT};
use jackpot_config::ReelSettings;
use jackpot_util::MonotonicInstant;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::time::Duration;
use tracing::{debug, info};

use crate::{CoreEvent, ReelOrchestrator, ReelSettled, ReelTimer, Timers, WordPool};

/// Runs the reels of one spin and reports when all of them have stopped.
///
/// Completion is counted, not ordered: `AllReelsStopped` fires when the
/// settle count reaches `REEL_COUNT`, whichever reel reports last. A new
/// `begin` discards the previous count and the previous reels' epochs, so a
/// late settle from a cancelled spin is dropped.
pub struct SpinCoordinator {
    reels: [ReelOrchestrator; REEL_COUNT],
    stop_delays: [Duration; REEL_COUNT],
    timers: Timers<ReelTimer>,
    rng: SmallRng,

    settled: [bool; REEL_COUNT],
    settle_count: usize,
    active: bool,
    final_words: Option<[String; REEL_COUNT]>,
}

impl SpinCoordinator {
    pub fn new(pools: [WordPool; REEL_COUNT], settings: &ReelSettings) -> Self {
        Self::with_rng(pools, settings, SmallRng::from_entropy())
    }

    /// Coordinator with a fixed seed for the cycling animation
    pub fn with_seed(pools: [WordPool; REEL_COUNT], settings: &ReelSettings, seed: u64) -> Self {
        Self::with_rng(pools, settings, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(pools: [WordPool; REEL_COUNT], settings: &ReelSettings, rng: SmallRng) -> Self {
        let mut index = 0;
        let reels = pools.map(|pool| {
            let reel = ReelOrchestrator::new(index, pool, settings);
            index += 1;
            reel
        });

        Self {
            reels,
            stop_delays: settings.stop_delays,
            timers: Timers::new(),
            rng,
            settled: [false; REEL_COUNT],
            settle_count: 0,
            active: false,
            final_words: None,
        }
    }

    /// Start every reel toward `words`, staggered by the stop delays
    pub fn begin(&mut self, words: &[String; REEL_COUNT], now: MonotonicInstant) {
        if self.active {
            debug!(settled = self.settle_count, "Discarding in-progress spin");
        }

        self.settled = [false; REEL_COUNT];
        self.settle_count = 0;
        self.active = true;
        self.final_words = Some(words.clone());

        for (i, reel) in self.reels.iter_mut().enumerate() {
            reel.start(
                words[i].clone(),
                self.stop_delays[i],
                now,
                &mut self.timers,
                &mut self.rng,
            );
        }

        debug!(words = ?words, "Reels spinning");
    }

    /// Count one reel's settle.
    ///
    /// Returns `AllReelsStopped` for the settle that completes the spin.
    /// Settles from a cancelled spin, duplicate settles, and settles while
    /// no spin is active are ignored.
    pub fn on_reel_settled(&mut self, settled: ReelSettled) -> Option<CoreEvent> {
        let Some(reel) = self.reels.get(settled.reel) else {
            debug!(reel = settled.reel, "Ignoring settle from unknown reel");
            return None;
        };

        if !self.active || settled.epoch != reel.epoch() {
            debug!(
                reel = settled.reel,
                epoch = settled.epoch,
                current = reel.epoch(),
                "Ignoring stale reel settle"
            );
            return None;
        }

        if self.settled[settled.reel] {
            debug!(reel = settled.reel, "Ignoring duplicate reel settle");
            return None;
        }

        self.settled[settled.reel] = true;
        self.settle_count += 1;

        if self.settle_count < REEL_COUNT {
            return None;
        }

        self.active = false;
        self.settle_count = 0;
        let words = self
            .final_words
            .take()
            .unwrap_or_else(|| self.display_words());

        info!(words = ?words, "All reels stopped");
        Some(CoreEvent::AllReelsStopped { words })
    }

    /// Fire every timer due at `now`, returning the resulting events in order
    pub fn advance(&mut self, now: MonotonicInstant) -> Vec<CoreEvent> {
        let mut events = Vec::new();

        while let Some((id, deadline, timer)) = self.timers.pop_due(now) {
            let Some(reel) = self.reels.get_mut(timer.reel) else {
                continue;
            };

            if let Some(settled) =
                reel.on_timer(timer, id, deadline, &mut self.timers, &mut self.rng)
            {
                events.push(CoreEvent::ReelSettled {
                    reel: settled.reel,
                    word: settled.word.clone(),
                });
                events.extend(self.on_reel_settled(settled));
            }
        }

        events
    }

    /// Cancel all reels and pending timers
    pub fn teardown(&mut self) {
        for reel in &mut self.reels {
            reel.cancel(&mut self.timers);
        }
        self.timers.clear();

        self.settled = [false; REEL_COUNT];
        self.settle_count = 0;
        self.active = false;
        self.final_words = None;
    }

    /// Put a prompt's words (or placeholders) on reels at rest
    pub fn show_prompt(&mut self, prompt: Option<&Prompt>) {
        for (i, reel) in self.reels.iter_mut().enumerate() {
            reel.show(prompt.map(|p| p.words[i].as_str()));
        }
    }

    pub fn next_deadline(&self) -> Option<MonotonicInstant> {
        self.timers.next_deadline()
    }

    /// True from `begin` until `AllReelsStopped` (or teardown)
    pub fn is_animating(&self) -> bool {
        self.active
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn reels(&self) -> &[ReelOrchestrator; REEL_COUNT] {
        &self.reels
    }

    pub fn display_words(&self) -> [String; REEL_COUNT] {
        std::array::from_fn(|i| self.reels[i].display().to_string())
    }
}
