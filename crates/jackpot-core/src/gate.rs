//! Daily spin eligibility

use chrono::{DateTime, Local};
use jackpot_api::{word_count, HistoryEntry, Prompt, SlotMachineState};
use jackpot_config::DevSettings;
use jackpot_util::{is_same_day, start_of_next_day};
use tracing::warn;

/// Decides whether a spin is allowed, from history and the local date alone.
///
/// Only the chronologically last entry counts. If it was created today and
/// holds a well-formed prompt, today's spin is used up. A malformed entry
/// from today is treated as absent so a damaged record never locks the
/// user out.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpinGate {
    infinite_spins: bool,
}

impl SpinGate {
    /// Gate with no development override
    pub fn new() -> Self {
        Self::default()
    }

    /// Gate honouring `[dev] infinite_spins`, which only takes effect in
    /// debug builds. The switch is injected, never read from the
    /// environment, so gates built from default settings are unaffected.
    pub fn from_settings(dev: &DevSettings) -> Self {
        let infinite_spins = dev.infinite_spins_enabled();
        if infinite_spins {
            warn!("Development override active: unlimited spins per day");
        }
        Self { infinite_spins }
    }

    pub fn is_overridden(&self) -> bool {
        self.infinite_spins
    }

    /// Today's prompt, if the last entry is a valid prompt from today
    pub fn todays_prompt(history: &[HistoryEntry], now: &DateTime<Local>) -> Option<Prompt> {
        let latest = history.last()?;
        if !is_same_day(&latest.created_at, now) {
            return None;
        }

        let prompt = Prompt::from_entry(latest);
        if prompt.is_none() {
            warn!(
                words = word_count(&latest.text),
                text = %latest.text,
                "Today's prompt is malformed, allowing a new spin"
            );
        }
        prompt
    }

    pub fn can_spin(&self, history: &[HistoryEntry], now: &DateTime<Local>) -> bool {
        self.infinite_spins || Self::todays_prompt(history, now).is_none()
    }

    /// Start of the next local day, or `None` while a spin is allowed
    pub fn next_spin_at(
        &self,
        history: &[HistoryEntry],
        now: &DateTime<Local>,
    ) -> Option<DateTime<Local>> {
        if self.can_spin(history, now) {
            None
        } else {
            Some(start_of_next_day(now))
        }
    }

    /// Full state snapshot, derived fresh from `history`
    pub fn evaluate(&self, history: &[HistoryEntry], now: &DateTime<Local>) -> SlotMachineState {
        let todays_prompt = Self::todays_prompt(history, now);
        let can_spin = self.infinite_spins || todays_prompt.is_none();

        SlotMachineState {
            can_spin,
            next_spin_at: (!can_spin).then(|| start_of_next_day(now)),
            todays_prompt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 12, 25, 15, 0, 0).unwrap()
    }

    fn yesterday() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 12, 24, 21, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_history_can_spin() {
        let gate = SpinGate::new();
        let state = gate.evaluate(&[], &now());

        assert!(state.can_spin);
        assert!(state.todays_prompt.is_none());
        assert!(state.next_spin_at.is_none());
    }

    #[test]
    fn test_yesterdays_entry_allows_spin() {
        let gate = SpinGate::new();
        let history = vec![HistoryEntry::new("first summer meal", yesterday())];

        assert!(gate.can_spin(&history, &now()));
        assert!(gate.next_spin_at(&history, &now()).is_none());
    }

    #[test]
    fn test_todays_entry_blocks_until_midnight() {
        let gate = SpinGate::new();
        let history = vec![HistoryEntry::new(
            "first summer meal",
            Local.with_ymd_and_hms(2025, 12, 25, 8, 0, 0).unwrap(),
        )];

        let state = gate.evaluate(&history, &now());
        assert!(!state.can_spin);
        assert_eq!(
            state.todays_prompt.unwrap().words,
            ["first", "summer", "meal"]
        );

        let next = state.next_spin_at.unwrap();
        assert_eq!(next.date_naive(), now().date_naive().succ_opt().unwrap());
        assert_eq!((next.hour(), next.minute(), next.second()), (0, 0, 0));
    }

    #[test]
    fn test_whitespace_entry_for_today_reopens_spin() {
        let gate = SpinGate::new();
        let history = vec![HistoryEntry::new("  ", now())];

        let state = gate.evaluate(&history, &now());
        assert!(state.todays_prompt.is_none());
        assert!(state.can_spin);
        assert!(state.next_spin_at.is_none());
    }

    #[test]
    fn test_wrong_word_count_for_today_reopens_spin() {
        let gate = SpinGate::new();
        for text in ["", "two words", "one two three four"] {
            let history = vec![HistoryEntry::new(text, now())];
            assert!(gate.can_spin(&history, &now()), "'{}' should not block", text);
        }
    }

    #[test]
    fn test_only_last_entry_counts() {
        let gate = SpinGate::new();
        let history = vec![
            HistoryEntry::new("first summer meal", yesterday()),
            HistoryEntry::new("last winter dream", now()),
        ];

        let prompt = SpinGate::todays_prompt(&history, &now()).unwrap();
        assert_eq!(prompt.words[0], "last");
        assert!(!gate.can_spin(&history, &now()));
    }

    #[test]
    fn test_spin_reopens_after_midnight() {
        let gate = SpinGate::new();
        let spun_at = Local.with_ymd_and_hms(2025, 12, 25, 23, 59, 0).unwrap();
        let history = vec![HistoryEntry::new("first summer meal", spun_at)];

        assert!(!gate.can_spin(&history, &spun_at));
        let after_midnight = Local.with_ymd_and_hms(2025, 12, 26, 0, 0, 1).unwrap();
        assert!(gate.can_spin(&history, &after_midnight));
    }

    #[test]
    fn test_dev_override_disabled_by_default() {
        let gate = SpinGate::from_settings(&DevSettings::default());
        assert!(!gate.is_overridden());
    }

    #[test]
    fn test_requested_override_needs_debug_build() {
        let gate = SpinGate::from_settings(&DevSettings {
            infinite_spins: true,
        });
        let history = vec![HistoryEntry::new("first summer meal", now())];
        let state = gate.evaluate(&history, &now());

        // Release builds ignore the request entirely
        assert_eq!(gate.is_overridden(), cfg!(debug_assertions));
        assert_eq!(state.can_spin, cfg!(debug_assertions));
        assert!(state.todays_prompt.is_some());
        assert_eq!(state.next_spin_at.is_none(), cfg!(debug_assertions));
    }
}
