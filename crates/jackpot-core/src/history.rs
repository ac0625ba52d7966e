//! Past-prompt listing

use chrono::{DateTime, Local};
use jackpot_api::HistoryEntry;
use jackpot_util::format_relative_day;

use crate::SpinGate;

/// One row of the history list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    pub text: String,
    pub created_at: DateTime<Local>,
    /// `Today`, `Yesterday`, `N days ago`, or a short date
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryView {
    /// Newest first
    pub items: Vec<HistoryItem>,
    /// Date of the oldest entry in the whole history
    pub journey_start: Option<DateTime<Local>>,
}

impl HistoryView {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Build the list of past prompts.
///
/// The latest entry is left out only when it is today's valid prompt, which
/// is already shown on the reels. Malformed entries are listed as stored.
pub fn history_view(history: &[HistoryEntry], now: &DateTime<Local>) -> HistoryView {
    let shown = match SpinGate::todays_prompt(history, now) {
        Some(_) => &history[..history.len() - 1],
        None => history,
    };

    HistoryView {
        items: shown
            .iter()
            .rev()
            .map(|entry| HistoryItem {
                text: entry.text.clone(),
                created_at: entry.created_at,
                label: format_relative_day(&entry.created_at, now),
            })
            .collect(),
        journey_start: history.first().map(|entry| entry.created_at),
    }
}

/// Whether there is anything to list besides today's prompt
pub fn has_history(history: &[HistoryEntry], now: &DateTime<Local>) -> bool {
    !history_view(history, now).is_empty()
}
