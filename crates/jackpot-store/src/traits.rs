//! Store trait definitions

use chrono::{DateTime, Local};
use jackpot_api::HistoryEntry;

use crate::StoreResult;

/// Durable prompt history.
///
/// Every call goes to the backing medium; implementations keep no cache.
/// In normal operation a single history writer calls `append` and `clear`.
pub trait PromptStore: Send + Sync {
    /// Load the log, append `entry`, write the full log back.
    /// Also records `entry.created_at` as the last spin.
    fn append(&self, entry: &HistoryEntry) -> StoreResult<()>;

    /// All entries, oldest first. Empty when nothing was ever written.
    fn read_all(&self) -> StoreResult<Vec<HistoryEntry>>;

    /// Remove the log and the last-spin marker
    fn clear(&self) -> StoreResult<()>;

    /// Timestamp of the most recent successful append, if recorded
    fn last_spin_at(&self) -> StoreResult<Option<DateTime<Local>>>;

    /// Check if store is healthy
    fn is_healthy(&self) -> bool;
}
