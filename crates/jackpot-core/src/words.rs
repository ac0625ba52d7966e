//! Per-reel vocabularies

use jackpot_api::REEL_COUNT;
use jackpot_config::Settings;
use rand::Rng;
use thiserror::Error;

const REEL_1_WORDS: &[&str] = &[
    "favourite",
    "unexpected",
    "forgotten",
    "first",
    "last",
    "strangest",
    "happiest",
    "quietest",
    "loudest",
    "smallest",
    "biggest",
    "embarrassing",
    "proudest",
    "scariest",
    "funniest",
];

const REEL_2_WORDS: &[&str] = &[
    "childhood",
    "morning",
    "summer",
    "secret",
    "family",
    "midnight",
    "birthday",
    "holiday",
    "school",
    "workplace",
    "neighbourhood",
    "weekend",
    "kitchen",
    "travel",
];

const REEL_3_WORDS: &[&str] = &[
    "sandwich",
    "adventure",
    "conversation",
    "mistake",
    "discovery",
    "friendship",
    "lesson",
    "gift",
    "meal",
    "photograph",
    "sound",
    "smell",
    "habit",
    "dream",
    "decision",
];

#[derive(Debug, Error)]
pub enum WordPoolError {
    #[error("Word pool for reel {0} is empty")]
    Empty(usize),
}

/// One word on a reel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub id: String,
    pub text: String,
}

/// Immutable, non-empty vocabulary for one reel position
#[derive(Debug, Clone)]
pub struct WordPool {
    entries: Vec<WordEntry>,
}

impl WordPool {
    /// Build a pool for reel `reel` (0-based). Fails if `words` is empty.
    pub fn new<I, S>(reel: usize, words: I) -> Result<Self, WordPoolError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<WordEntry> = words
            .into_iter()
            .map(|w| {
                let text = w.into();
                WordEntry {
                    id: format!("reel{}-{}", reel + 1, text),
                    text,
                }
            })
            .collect();

        if entries.is_empty() {
            return Err(WordPoolError::Empty(reel));
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.entries.iter().any(|e| e.text == text)
    }

    /// Uniform random draw
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> &WordEntry {
        &self.entries[rng.gen_range(0..self.entries.len())]
    }
}

/// The built-in vocabulary, one pool per reel
pub fn builtin_pools() -> Result<[WordPool; REEL_COUNT], WordPoolError> {
    Ok([
        WordPool::new(0, REEL_1_WORDS.iter().copied())?,
        WordPool::new(1, REEL_2_WORDS.iter().copied())?,
        WordPool::new(2, REEL_3_WORDS.iter().copied())?,
    ])
}

/// Pools from configured words, or the built-in vocabulary
pub fn pools_from_settings(settings: &Settings) -> Result<[WordPool; REEL_COUNT], WordPoolError> {
    match &settings.words {
        Some([reel1, reel2, reel3]) => Ok([
            WordPool::new(0, reel1.iter().cloned())?,
            WordPool::new(1, reel2.iter().cloned())?,
            WordPool::new(2, reel3.iter().cloned())?,
        ]),
        None => builtin_pools(),
    }
}
