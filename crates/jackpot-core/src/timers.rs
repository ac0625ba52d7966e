//! Deadline-ordered timer queue
//!
//! The queue is driven by the caller: nothing fires on its own. Callers pass
//! the current monotonic instant to [`Timers::pop_due`], which makes timing
//! deterministic under test.

use jackpot_util::MonotonicInstant;
use std::collections::{BTreeMap, HashMap};

/// Handle for a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
pub struct Timers<T> {
    queue: BTreeMap<(MonotonicInstant, TimerId), T>,
    deadlines: HashMap<TimerId, MonotonicInstant>,
    next_id: u64,
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self {
            queue: BTreeMap::new(),
            deadlines: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<T> Timers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` to fire at `deadline`.
    /// Timers sharing a deadline fire in scheduling order.
    pub fn schedule(&mut self, deadline: MonotonicInstant, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        self.queue.insert((deadline, id), payload);
        self.deadlines.insert(id, deadline);
        id
    }

    /// Cancel a pending timer, returning its payload if it had not fired
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let deadline = self.deadlines.remove(&id)?;
        self.queue.remove(&(deadline, id))
    }

    /// Remove and return the earliest timer due at or before `now`
    pub fn pop_due(&mut self, now: MonotonicInstant) -> Option<(TimerId, MonotonicInstant, T)> {
        let (&(deadline, id), _) = self.queue.first_key_value()?;
        if deadline > now {
            return None;
        }

        let payload = self.queue.remove(&(deadline, id))?;
        self.deadlines.remove(&id);
        Some((id, deadline, payload))
    }

    pub fn next_deadline(&self) -> Option<MonotonicInstant> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.deadlines.clear();
    }
}
