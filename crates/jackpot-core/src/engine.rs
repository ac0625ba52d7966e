//! Core spin engine

use chrono::{DateTime, Local};
use jackpot_api::{HistoryEntry, Prompt, SlotMachineState, REEL_COUNT};
use jackpot_config::Settings;
use jackpot_store::{PromptStore, StoreError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, info};

use crate::{pools_from_settings, HistoryWriter, SpinGate, WordPool, WordPoolError, WriteTicket};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Words(#[from] WordPoolError),
}

/// Why a spin request did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Another spin is being performed right now
    InFlight,
    /// Today already has a valid prompt
    AlreadySpunToday,
}

/// Result of a spin request
#[derive(Debug)]
pub enum SpinOutcome {
    /// A new prompt was drawn and its durable write issued
    Spun {
        prompt: Prompt,
        persisted: WriteTicket,
    },
    /// Nothing was drawn or written; `state` is the current snapshot
    Ignored {
        reason: IgnoreReason,
        state: SlotMachineState,
    },
}

/// Clears the in-flight flag when the spin's in-memory update is done
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// The spin engine.
///
/// Holds the in-memory history, which is the user-visible truth. A spin
/// updates it first and hands the durable append to the history writer,
/// so callers see the new state before storage confirms it. If the process
/// dies between the two, the spin is lost from disk.
pub struct SpinEngine {
    gate: SpinGate,
    pools: [WordPool; REEL_COUNT],
    writer: HistoryWriter,
    history: Mutex<Vec<HistoryEntry>>,
    rng: Mutex<StdRng>,
    in_flight: AtomicBool,
}

impl SpinEngine {
    /// Create an engine over an already-loaded history
    pub fn new(
        gate: SpinGate,
        pools: [WordPool; REEL_COUNT],
        writer: HistoryWriter,
        history: Vec<HistoryEntry>,
    ) -> Self {
        info!(
            entries = history.len(),
            pool_sizes = ?pools.each_ref().map(WordPool::len),
            "Spin engine initialized"
        );

        Self {
            gate,
            pools,
            writer,
            history: Mutex::new(history),
            rng: Mutex::new(StdRng::from_entropy()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Read history from `store` and build an engine per `settings`
    pub fn load(
        store: &dyn PromptStore,
        writer: HistoryWriter,
        settings: &Settings,
    ) -> Result<Self, EngineError> {
        let history = store.read_all()?;
        let pools = pools_from_settings(settings)?;
        let gate = SpinGate::from_settings(&settings.dev);

        Ok(Self::new(gate, pools, writer, history))
    }

    /// Replace the draw RNG with a seeded one
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    pub fn pools(&self) -> &[WordPool; REEL_COUNT] {
        &self.pools
    }

    /// Eligibility derived from the current in-memory history
    pub fn state(&self, now: DateTime<Local>) -> SlotMachineState {
        self.gate.evaluate(&self.lock_history(), &now)
    }

    /// Snapshot of the history, oldest first
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.lock_history().clone()
    }

    /// True while a spin is between its start and its in-memory update
    pub fn is_spinning(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Draw and record today's prompt.
    ///
    /// Only the first call in an eligible window draws. Any call while a
    /// spin is in flight, or after today's prompt exists, returns
    /// `Ignored` without writing anything.
    pub fn spin(&self, now: DateTime<Local>) -> SpinOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Spin already in flight, ignoring");
            return SpinOutcome::Ignored {
                reason: IgnoreReason::InFlight,
                state: self.state(now),
            };
        }
        let _guard = InFlightGuard(&self.in_flight);

        let mut history = self.lock_history();
        if !self.gate.can_spin(&history, &now) {
            debug!("Already spun today, ignoring");
            return SpinOutcome::Ignored {
                reason: IgnoreReason::AlreadySpunToday,
                state: self.gate.evaluate(&history, &now),
            };
        }

        let words = {
            let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
            self.pools
                .each_ref()
                .map(|pool| pool.draw(&mut *rng).text.clone())
        };
        let prompt = Prompt::new(words, now);
        let entry = prompt.to_entry();

        history.push(entry.clone());
        // Issued under the history lock so the writer sees mutations in order
        let persisted = self.writer.append(entry);
        drop(history);

        info!(text = %prompt.text(), "Prompt drawn");
        SpinOutcome::Spun { prompt, persisted }
    }

    /// Forget all history, in memory at once and durably via the writer
    pub fn reset_all(&self) -> WriteTicket {
        let mut history = self.lock_history();
        let removed = history.len();
        history.clear();
        let ticket = self.writer.clear();
        drop(history);

        info!(removed, "History reset");
        ticket
    }

    fn lock_history(&self) -> MutexGuard<'_, Vec<HistoryEntry>> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawn_writer;
    use chrono::{Duration, TimeZone, Timelike};
    use jackpot_store::MemoryStore;
    use std::sync::{Arc, Barrier};

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 12, 25, 15, 0, 0).unwrap()
    }

    fn engine(store: &Arc<MemoryStore>) -> SpinEngine {
        let (writer, _handle) = spawn_writer(store.clone());
        SpinEngine::load(store.as_ref(), writer, &Settings::default())
            .unwrap()
            .with_seed(42)
    }

    #[tokio::test]
    async fn test_first_spin() {
        let store = Arc::new(MemoryStore::new());
        let engine = engine(&store);
        assert!(engine.state(now()).can_spin);

        let SpinOutcome::Spun { prompt, persisted } = engine.spin(now()) else {
            panic!("expected a spin");
        };
        persisted.wait().await.unwrap();

        for (pool, word) in engine.pools().iter().zip(&prompt.words) {
            assert!(pool.contains(word));
        }
        let text = prompt.text();
        let split: Vec<&str> = text.split(' ').collect();
        assert_eq!(split, prompt.words.iter().map(String::as_str).collect::<Vec<_>>());

        let state = engine.state(now());
        assert!(!state.can_spin);
        assert_eq!(state.todays_prompt, Some(prompt));
        assert_eq!(store.read_all().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_second_spin_same_day_ignored() {
        let store = Arc::new(MemoryStore::new());
        let engine = engine(&store);

        let SpinOutcome::Spun { prompt, persisted } = engine.spin(now()) else {
            panic!("expected a spin");
        };
        persisted.wait().await.unwrap();

        let later = now() + Duration::hours(2);
        match engine.spin(later) {
            SpinOutcome::Ignored { reason, state } => {
                assert_eq!(reason, IgnoreReason::AlreadySpunToday);
                assert_eq!(state.todays_prompt, Some(prompt));
            }
            SpinOutcome::Spun { .. } => panic!("second spin must be ignored"),
        }

        assert_eq!(engine.history().len(), 1);
        assert_eq!(store.append_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_spins_draw_once() {
        let store = Arc::new(MemoryStore::new());
        let engine = engine(&store);
        let barrier = Barrier::new(8);

        let outcomes: Vec<SpinOutcome> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        engine.spin(now())
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let mut spun = 0;
        for outcome in outcomes {
            match outcome {
                SpinOutcome::Spun { persisted, .. } => {
                    spun += 1;
                    persisted.wait().await.unwrap();
                }
                SpinOutcome::Ignored { .. } => {}
            }
        }

        assert_eq!(spun, 1);
        assert_eq!(engine.history().len(), 1);
        assert_eq!(store.append_count(), 1);
        assert!(!engine.is_spinning());
    }

    #[tokio::test]
    async fn test_spin_after_yesterday() {
        let yesterday = now() - Duration::days(1);
        let store = Arc::new(MemoryStore::with_history(&[HistoryEntry::new("a b c", yesterday)]).unwrap());
        let engine = engine(&store);
        assert!(engine.state(now()).can_spin);

        let SpinOutcome::Spun { persisted, .. } = engine.spin(now()) else {
            panic!("expected a spin");
        };
        persisted.wait().await.unwrap();

        assert_eq!(store.read_all().unwrap().len(), 2);
        let next = engine.state(now()).next_spin_at.unwrap();
        assert_eq!(next.date_naive(), now().date_naive().succ_opt().unwrap());
        assert_eq!(next.hour(), 0);
    }

    #[tokio::test]
    async fn test_malformed_today_allows_spin() {
        let store = Arc::new(MemoryStore::with_history(&[HistoryEntry::new("  ", now())]).unwrap());
        let engine = engine(&store);

        let state = engine.state(now());
        assert!(state.can_spin);
        assert!(state.todays_prompt.is_none());
        assert!(matches!(engine.spin(now()), SpinOutcome::Spun { .. }));
    }

    #[tokio::test]
    async fn test_write_failure_keeps_optimistic_state() {
        let store = Arc::new(MemoryStore::new());
        store.set_fail_writes(true);
        let engine = engine(&store);

        let SpinOutcome::Spun { persisted, .. } = engine.spin(now()) else {
            panic!("expected a spin");
        };
        assert!(matches!(persisted.wait().await, Err(StoreError::Write(_))));

        // In memory the spin happened; on disk it did not
        assert!(!engine.state(now()).can_spin);
        assert!(store.read_all().unwrap().is_empty());

        // A fresh engine over the same store would allow a spin again
        store.set_fail_writes(false);
        let reloaded = self::engine(&store);
        assert!(reloaded.state(now()).can_spin);
    }

    #[tokio::test]
    async fn test_reset_all() {
        let store = Arc::new(MemoryStore::new());
        let engine = engine(&store);

        if let SpinOutcome::Spun { persisted, .. } = engine.spin(now()) {
            persisted.wait().await.unwrap();
        }
        engine.reset_all().wait().await.unwrap();

        assert!(engine.history().is_empty());
        assert!(engine.state(now()).can_spin);
        assert!(store.read_all().unwrap().is_empty());
        assert!(store.last_spin_at().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_fails_on_read_error() {
        let store = Arc::new(MemoryStore::new());
        store.set_fail_reads(true);
        let (writer, _handle) = spawn_writer(store.clone());

        let result = SpinEngine::load(store.as_ref(), writer, &Settings::default());
        assert!(matches!(result, Err(EngineError::Store(StoreError::Read(_)))));
    }
}
