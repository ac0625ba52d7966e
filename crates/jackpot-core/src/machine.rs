//! Slot machine facade
//!
//! Ties the spin engine to the reel coordinator: a spin that draws a prompt
//! starts the reels toward its words, and a reset tears the reels down.

use chrono::{DateTime, Local};
use jackpot_api::{SlotMachineState, REEL_COUNT};
use jackpot_config::Settings;
use jackpot_store::PromptStore;
use jackpot_util::MonotonicInstant;
use tracing::debug;

use crate::{
    history_view, CoreEvent, EngineError, HistoryView, HistoryWriter, ReelSettled,
    SpinCoordinator, SpinEngine, SpinOutcome, WriteTicket,
};

pub struct SlotMachine {
    engine: SpinEngine,
    coordinator: SpinCoordinator,
}

impl SlotMachine {
    pub fn new(engine: SpinEngine, coordinator: SpinCoordinator) -> Self {
        Self {
            engine,
            coordinator,
        }
    }

    /// Load history from `store` and build engine and reels per `settings`
    pub fn from_settings(
        store: &dyn PromptStore,
        writer: HistoryWriter,
        settings: &Settings,
    ) -> Result<Self, EngineError> {
        let engine = SpinEngine::load(store, writer, settings)?;
        let coordinator = SpinCoordinator::new(engine.pools().clone(), &settings.reels);
        Ok(Self::new(engine, coordinator))
    }

    pub fn state(&self, now: DateTime<Local>) -> SlotMachineState {
        self.engine.state(now)
    }

    /// Spin, and start the reels if a prompt was drawn
    pub fn spin(&mut self, now: DateTime<Local>, now_mono: MonotonicInstant) -> SpinOutcome {
        let outcome = self.engine.spin(now);
        match &outcome {
            SpinOutcome::Spun { prompt, .. } => self.coordinator.begin(&prompt.words, now_mono),
            SpinOutcome::Ignored { reason, .. } => {
                debug!(?reason, "Spin ignored, reels untouched")
            }
        }
        outcome
    }

    /// Report a reel settle from outside the timer queue
    pub fn on_reel_settled(&mut self, settled: ReelSettled) -> Option<CoreEvent> {
        self.coordinator.on_reel_settled(settled)
    }

    /// Drive reel timers up to `now_mono`
    pub fn advance(&mut self, now_mono: MonotonicInstant) -> Vec<CoreEvent> {
        self.coordinator.advance(now_mono)
    }

    /// Abandon the animation and show today's prompt at rest.
    /// The drawn prompt and its durable write are unaffected.
    pub fn stop_reels(&mut self, now: DateTime<Local>) {
        self.coordinator.teardown();
        self.refresh_display(now);
    }

    /// Stop the reels and wipe all history
    pub fn reset_all(&mut self) -> WriteTicket {
        self.coordinator.teardown();
        self.coordinator.show_prompt(None);
        self.engine.reset_all()
    }

    /// Put today's prompt (or placeholders) on the resting reels
    pub fn refresh_display(&mut self, now: DateTime<Local>) {
        let state = self.engine.state(now);
        self.coordinator.show_prompt(state.todays_prompt.as_ref());
    }

    pub fn history_view(&self, now: DateTime<Local>) -> HistoryView {
        history_view(&self.engine.history(), &now)
    }

    pub fn has_history(&self, now: DateTime<Local>) -> bool {
        !self.history_view(now).is_empty()
    }

    pub fn is_animating(&self) -> bool {
        self.coordinator.is_animating()
    }

    pub fn next_deadline(&self) -> Option<MonotonicInstant> {
        self.coordinator.next_deadline()
    }

    pub fn display_words(&self) -> [String; REEL_COUNT] {
        self.coordinator.display_words()
    }
}
