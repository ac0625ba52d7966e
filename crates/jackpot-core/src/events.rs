//! Core events emitted by the reel coordinator

use jackpot_api::REEL_COUNT;

/// Events emitted while a spin animates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreEvent {
    /// One reel reached its final word
    ReelSettled { reel: usize, word: String },

    /// Every reel of the current spin has settled.
    ///
    /// Emitted exactly once per spin, after the last `ReelSettled`.
    AllReelsStopped { words: [String; REEL_COUNT] },
}
