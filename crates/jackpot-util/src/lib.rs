//! Shared utilities for journal-jackpot
//!
//! This crate provides:
//! - Time utilities (mockable wall clock, monotonic instants, calendar-day math)
//! - Countdown and relative-day formatting
//! - Default paths for data and config

mod paths;
mod time;

pub use paths::*;
pub use time::*;
