//! Core data types

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::{REEL_COUNT, WORD_SEPARATOR};

/// One past prompt, as recorded in history.
///
/// `text` is expected to hold one word per reel joined by single spaces,
/// but nothing enforces that: a persisted entry may be empty or have the
/// wrong word count. Use [`Prompt::from_entry`] to get a validated view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub text: String,
    pub created_at: DateTime<Local>,
}

impl HistoryEntry {
    pub fn new(text: impl Into<String>, created_at: DateTime<Local>) -> Self {
        Self {
            text: text.into(),
            created_at,
        }
    }
}

/// A validated three-word prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub words: [String; REEL_COUNT],
    pub created_at: DateTime<Local>,
}

impl Prompt {
    pub fn new(words: [String; REEL_COUNT], created_at: DateTime<Local>) -> Self {
        Self { words, created_at }
    }

    /// Derive a prompt from a history entry.
    ///
    /// Returns `None` unless `text` splits on single spaces into exactly
    /// `REEL_COUNT` non-empty words.
    pub fn from_entry(entry: &HistoryEntry) -> Option<Self> {
        split_words(&entry.text).map(|words| Self::new(words, entry.created_at))
    }

    /// Persisted text form: words joined by single spaces
    pub fn text(&self) -> String {
        self.words.join(WORD_SEPARATOR.to_string().as_str())
    }

    pub fn to_entry(&self) -> HistoryEntry {
        HistoryEntry::new(self.text(), self.created_at)
    }
}

/// Split prompt text into reel words.
///
/// Splitting is on single spaces, so doubled or leading spaces yield empty
/// tokens and the text is rejected.
pub fn split_words(text: &str) -> Option<[String; REEL_COUNT]> {
    let parts: Vec<&str> = text.split(WORD_SEPARATOR).collect();
    if parts.len() != REEL_COUNT || parts.iter().any(|p| p.is_empty()) {
        return None;
    }

    Some([
        parts[0].to_string(),
        parts[1].to_string(),
        parts[2].to_string(),
    ])
}

/// Number of tokens `text` splits into (for diagnostics)
pub fn word_count(text: &str) -> usize {
    text.split(WORD_SEPARATOR).count()
}

/// Eligibility snapshot, derived from history on every read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotMachineState {
    pub can_spin: bool,
    pub todays_prompt: Option<Prompt>,
    /// Start of the next calendar day; `None` while a spin is allowed
    pub next_spin_at: Option<DateTime<Local>>,
}

impl SlotMachineState {
    /// Time left until the next spin opens, if one is pending
    pub fn time_until_next_spin(&self, now: &DateTime<Local>) -> Option<chrono::Duration> {
        self.next_spin_at.map(|at| at.signed_duration_since(*now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 12, 25, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_prompt_from_valid_entry() {
        let entry = HistoryEntry::new("favourite summer mistake", at_noon());
        let prompt = Prompt::from_entry(&entry).unwrap();

        assert_eq!(prompt.words, ["favourite", "summer", "mistake"]);
        assert_eq!(prompt.text(), entry.text);
        assert_eq!(prompt.to_entry(), entry);
    }

    #[test]
    fn test_malformed_entries_rejected() {
        for text in ["", "  ", "one two", "one two three four", "one  two", " one two", "one two "] {
            let entry = HistoryEntry::new(text, at_noon());
            assert!(
                Prompt::from_entry(&entry).is_none(),
                "Expected '{}' to be rejected",
                text
            );
        }
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("a b c"), 3);
        assert_eq!(word_count("  "), 3);
        assert_eq!(word_count(""), 1);
    }

    #[test]
    fn test_history_entry_serializes_camel_case() {
        let entry = HistoryEntry::new("a b c", at_noon());
        let json = serde_json::to_value(&entry).unwrap();

        assert!(json.get("createdAt").is_some());
        assert_eq!(json["text"], "a b c");
    }

    #[test]
    fn test_time_until_next_spin() {
        let now = at_noon();
        let state = SlotMachineState {
            can_spin: false,
            todays_prompt: None,
            next_spin_at: Some(now + chrono::Duration::hours(12)),
        };
        assert_eq!(
            state.time_until_next_spin(&now),
            Some(chrono::Duration::hours(12))
        );
    }
}
