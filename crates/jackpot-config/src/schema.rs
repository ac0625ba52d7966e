//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Where history is persisted
    #[serde(default)]
    pub storage: RawStorage,

    /// Reel animation timing
    #[serde(default)]
    pub reels: RawReels,

    /// Custom vocabulary (built-in words when absent)
    #[serde(default)]
    pub words: Option<RawWords>,

    /// Development-only switches
    #[serde(default)]
    pub dev: RawDev,
}

/// Storage settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawStorage {
    /// Data directory for the history database
    pub data_dir: Option<PathBuf>,
}

/// Reel timing settings, all in milliseconds
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawReels {
    /// Delay from spin start until each reel stops cycling, left to right
    pub stop_delays_ms: Option<Vec<u64>>,

    /// How often a cycling reel shows a new random word
    pub tick_interval_ms: Option<u64>,

    /// Length of the deceleration between stopping and settling
    pub settle_duration_ms: Option<u64>,
}

/// Per-reel vocabulary
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawWords {
    pub reel1: Vec<String>,
    pub reel2: Vec<String>,
    pub reel3: Vec<String>,
}

impl RawWords {
    /// Word lists in reel order
    pub fn reels(&self) -> [&Vec<String>; 3] {
        [&self.reel1, &self.reel2, &self.reel3]
    }
}

/// Development switches (ignored in release builds)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawDev {
    /// Allow unlimited spins per day
    #[serde(default)]
    pub infinite_spins: bool,
}
