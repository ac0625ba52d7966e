//! Persistence layer for journal-jackpot
//!
//! Provides:
//! - Prompt history (append-only, cleared only as a whole)
//! - Last-spin marker
//! - SQLite and in-memory backends over one key-value namespace

mod codec;
mod memory;
mod sqlite;
mod traits;

pub use codec::*;
pub use memory::*;
pub use sqlite::*;
pub use traits::*;

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage read failed: {0}")]
    Read(String),

    #[error("Storage write failed: {0}")]
    Write(String),

    #[error("Stored history is corrupt: {0}")]
    Corrupt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn read(err: impl std::fmt::Display) -> Self {
        Self::Read(err.to_string())
    }

    pub fn write(err: impl std::fmt::Display) -> Self {
        Self::Write(err.to_string())
    }

    pub fn corrupt(err: impl std::fmt::Display) -> Self {
        Self::Corrupt(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Namespace shared by every persisted key
pub const KEY_NAMESPACE: &str = "journal-jackpot:";

/// Key holding the JSON-encoded history array
pub const HISTORY_KEY: &str = "journal-jackpot:prompt-history";

/// Key holding the timestamp of the most recent spin
pub const LAST_SPIN_KEY: &str = "journal-jackpot:last-spin-date";
