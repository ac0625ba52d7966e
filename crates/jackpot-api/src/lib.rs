//! Shared data model for journal-jackpot
//!
//! This crate defines the types every layer agrees on:
//! - `HistoryEntry`, the persisted record of one spin
//! - `Prompt`, the three-word display form derived from an entry
//! - `SlotMachineState`, the eligibility snapshot derived from history

mod types;

pub use types::*;

/// Number of reels on the machine (one word per reel)
pub const REEL_COUNT: usize = 3;

/// Separator between reel words in a persisted prompt
pub const WORD_SEPARATOR: char = ' ';
