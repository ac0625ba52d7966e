//! Validated settings

use crate::schema::{RawConfig, RawReels, RawStorage};
use jackpot_api::REEL_COUNT;
use std::path::PathBuf;
use std::time::Duration;

/// Default stop delays, left to right
pub const DEFAULT_STOP_DELAYS_MS: [u64; REEL_COUNT] = [1000, 1800, 2600];

/// Default interval between random words while a reel cycles
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 80;

/// Default deceleration time between stop and settle
pub const DEFAULT_SETTLE_DURATION_MS: u64 = 250;

/// Validated settings ready for use by the core engine
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub storage: StorageSettings,
    pub reels: ReelSettings,

    /// Custom vocabulary per reel. None means the built-in words.
    pub words: Option<[Vec<String>; REEL_COUNT]>,

    pub dev: DevSettings,
}

impl Settings {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            storage: StorageSettings::from_raw(raw.storage),
            reels: ReelSettings::from_raw(raw.reels),
            words: raw.words.map(|w| [w.reel1, w.reel2, w.reel3]),
            dev: DevSettings {
                infinite_spins: raw.dev.infinite_spins,
            },
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
}

impl StorageSettings {
    fn from_raw(raw: RawStorage) -> Self {
        Self {
            data_dir: raw.data_dir.unwrap_or_else(jackpot_util::default_data_dir),
        }
    }

    pub fn database_path(&self) -> PathBuf {
        jackpot_util::database_path(&self.data_dir)
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: jackpot_util::default_data_dir(),
        }
    }
}

/// Reel timing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReelSettings {
    /// Strictly increasing, one per reel
    pub stop_delays: [Duration; REEL_COUNT],
    pub tick_interval: Duration,
    pub settle_duration: Duration,
}

impl ReelSettings {
    fn from_raw(raw: RawReels) -> Self {
        let defaults = Self::default();

        let stop_delays = raw
            .stop_delays_ms
            .and_then(|delays| <[u64; REEL_COUNT]>::try_from(delays).ok())
            .map(|delays| delays.map(Duration::from_millis))
            .unwrap_or(defaults.stop_delays);

        Self {
            stop_delays,
            tick_interval: raw
                .tick_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.tick_interval),
            settle_duration: raw
                .settle_duration_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.settle_duration),
        }
    }

    /// Time from spin start until the last reel settles
    pub fn total_duration(&self) -> Duration {
        self.stop_delays[REEL_COUNT - 1] + self.settle_duration
    }
}

impl Default for ReelSettings {
    fn default() -> Self {
        Self {
            stop_delays: DEFAULT_STOP_DELAYS_MS.map(Duration::from_millis),
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            settle_duration: Duration::from_millis(DEFAULT_SETTLE_DURATION_MS),
        }
    }
}

/// Development-only switches
#[derive(Debug, Clone, Copy, Default)]
pub struct DevSettings {
    /// Requested unlimited spins; only honoured in debug builds
    pub infinite_spins: bool,
}

impl DevSettings {
    /// Whether unlimited spins are actually in effect for this build.
    ///
    /// Release builds compile this to `false`. In debug builds the switch
    /// only comes from an explicit `[dev]` table: `Settings::default()` and
    /// `SpinGate::new()` leave it off, so eligibility checks under test run
    /// without it unless a test opts in.
    pub fn infinite_spins_enabled(&self) -> bool {
        self.infinite_spins && cfg!(debug_assertions)
    }
}
