//! Configuration validation

use crate::schema::{RawConfig, RawReels, RawWords};
use jackpot_api::REEL_COUNT;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Expected {expected} stop delays, found {found}")]
    StopDelayCount { expected: usize, found: usize },

    #[error("Stop delay for reel {reel} must be greater than zero")]
    StopDelayZero { reel: usize },

    #[error("Stop delay for reel {reel} ({delay_ms}ms) must be greater than reel {previous} ({previous_ms}ms)")]
    StopDelaysNotIncreasing {
        reel: usize,
        delay_ms: u64,
        previous: usize,
        previous_ms: u64,
    },

    #[error("Tick interval must be greater than zero")]
    TickIntervalZero,

    #[error("Word list for reel {reel} is empty")]
    EmptyWordList { reel: usize },

    #[error("Invalid word '{word}' on reel {reel}: {message}")]
    InvalidWord {
        reel: usize,
        word: String,
        message: String,
    },
}

/// Validate a raw configuration, collecting every problem found
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = validate_reels(&config.reels);

    if let Some(words) = &config.words {
        errors.extend(validate_words(words));
    }

    errors
}

fn validate_reels(reels: &RawReels) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(delays) = &reels.stop_delays_ms {
        errors.extend(validate_stop_delays(delays));
    }

    if reels.tick_interval_ms == Some(0) {
        errors.push(ValidationError::TickIntervalZero);
    }

    errors
}

/// Stop delays must be positive and strictly increasing so reels settle
/// left to right.
pub fn validate_stop_delays(delays: &[u64]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if delays.len() != REEL_COUNT {
        errors.push(ValidationError::StopDelayCount {
            expected: REEL_COUNT,
            found: delays.len(),
        });
        return errors;
    }

    for (reel, &delay) in delays.iter().enumerate() {
        if delay == 0 {
            errors.push(ValidationError::StopDelayZero { reel });
        }
    }

    for (reel, pair) in delays.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            errors.push(ValidationError::StopDelaysNotIncreasing {
                reel: reel + 1,
                delay_ms: pair[1],
                previous: reel,
                previous_ms: pair[0],
            });
        }
    }

    errors
}

fn validate_words(words: &RawWords) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (reel, list) in words.reels().into_iter().enumerate() {
        if list.is_empty() {
            errors.push(ValidationError::EmptyWordList { reel });
            continue;
        }

        for word in list {
            if let Err(message) = check_word(word) {
                errors.push(ValidationError::InvalidWord {
                    reel,
                    word: word.clone(),
                    message,
                });
            }
        }
    }

    errors
}

/// A reel word must survive the space-joined round trip intact.
pub fn check_word(word: &str) -> Result<(), String> {
    if word.is_empty() {
        return Err("word cannot be empty".into());
    }
    if word.chars().any(char::is_whitespace) {
        return Err("word cannot contain whitespace".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_delays_valid() {
        assert!(validate_stop_delays(&[1000, 1800, 2600]).is_empty());
    }

    #[test]
    fn test_stop_delays_wrong_count() {
        let errors = validate_stop_delays(&[1000, 1800]);
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            ValidationError::StopDelayCount {
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_stop_delays_must_increase() {
        let errors = validate_stop_delays(&[1000, 1000, 900]);
        assert_eq!(errors.len(), 2);
        assert!(matches!(
            errors[0],
            ValidationError::StopDelaysNotIncreasing { reel: 1, previous: 0, .. }
        ));
        assert!(matches!(
            errors[1],
            ValidationError::StopDelaysNotIncreasing { reel: 2, previous: 1, .. }
        ));
    }

    #[test]
    fn test_stop_delay_zero() {
        let errors = validate_stop_delays(&[0, 500, 900]);
        assert!(matches!(errors[0], ValidationError::StopDelayZero { reel: 0 }));
    }

    #[test]
    fn test_check_word() {
        assert!(check_word("summer").is_ok());
        assert!(check_word("").is_err());
        assert!(check_word("ice cream").is_err());
        assert!(check_word("tab\there").is_err());
    }

    #[test]
    fn test_words_collect_all_errors() {
        let words = RawWords {
            reel1: vec![],
            reel2: vec!["ok".into(), "not ok".into()],
            reel3: vec!["".into()],
        };

        let errors = validate_words(&words);
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], ValidationError::EmptyWordList { reel: 0 }));
        assert!(matches!(errors[1], ValidationError::InvalidWord { reel: 1, .. }));
        assert!(matches!(errors[2], ValidationError::InvalidWord { reel: 2, .. }));
    }
}
