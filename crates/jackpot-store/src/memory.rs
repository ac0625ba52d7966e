//! In-memory store for testing

use chrono::{DateTime, Local};
use jackpot_api::HistoryEntry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::{
    append_history, decode_history, decode_timestamp, encode_history, encode_timestamp,
    PromptStore, StoreError,
    StoreResult, HISTORY_KEY, KEY_NAMESPACE, LAST_SPIN_KEY,
};

/// Map-backed store with failure injection
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,

    /// Make every read fail with `StoreError::Read`
    pub fail_reads: AtomicBool,

    /// Make every write fail with `StoreError::Write`
    pub fail_writes: AtomicBool,

    appends: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with an existing history
    pub fn with_history(entries: &[HistoryEntry]) -> StoreResult<Self> {
        let store = Self::new();
        store.put_raw(HISTORY_KEY, &encode_history(entries)?);
        Ok(store)
    }

    /// Overwrite a raw value, bypassing encoding
    pub fn put_raw(&self, key: &str, value: &str) {
        self.values().insert(key.to_string(), value.to_string());
    }

    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.values().get(key).cloned()
    }

    /// Number of successful appends since creation
    pub fn append_count(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn values(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_read(&self) -> StoreResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Read("simulated read failure".into()));
        }
        Ok(())
    }

    fn check_write(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Write("simulated write failure".into()));
        }
        Ok(())
    }
}

impl PromptStore for MemoryStore {
    fn append(&self, entry: &HistoryEntry) -> StoreResult<()> {
        self.check_read()?;
        let mut values = self.values();

        let payload = append_history(values.get(HISTORY_KEY).map(String::as_str), entry)?;

        self.check_write()?;
        values.insert(HISTORY_KEY.to_string(), payload);
        values.insert(
            LAST_SPIN_KEY.to_string(),
            encode_timestamp(&entry.created_at),
        );
        self.appends.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn read_all(&self) -> StoreResult<Vec<HistoryEntry>> {
        self.check_read()?;
        match self.values().get(HISTORY_KEY) {
            Some(payload) => decode_history(payload),
            None => Ok(Vec::new()),
        }
    }

    fn clear(&self) -> StoreResult<()> {
        self.check_write()?;
        self.values().retain(|key, _| !key.starts_with(KEY_NAMESPACE));
        Ok(())
    }

    fn last_spin_at(&self) -> StoreResult<Option<DateTime<Local>>> {
        self.check_read()?;
        Ok(self
            .values()
            .get(LAST_SPIN_KEY)
            .and_then(|s| decode_timestamp(s)))
    }

    fn is_healthy(&self) -> bool {
        !self.fail_reads.load(Ordering::SeqCst)
    }
}
