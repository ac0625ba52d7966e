//! Time utilities for journal-jackpot
//!
//! Two clocks are in play:
//! - wall-clock time (`DateTime<Local>`) decides which calendar day a spin
//!   belongs to and when the next one opens;
//! - monotonic time (`MonotonicInstant`) drives reel animation timers and is
//!   immune to wall-clock changes.
//!
//! # Mock Time for Development
//!
//! In debug builds, the `JACKPOT_MOCK_TIME` environment variable can be set
//! to shift the wall clock returned by [`now`]. This is useful for checking
//! the once-per-day gate around midnight without waiting for it.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (e.g., `2025-12-25 23:59:30`)
//!
//! Example:
//! ```bash
//! JACKPOT_MOCK_TIME="2025-12-25 23:59:30" jackpot spin
//! ```

use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "JACKPOT_MOCK_TIME";

/// Format accepted by `JACKPOT_MOCK_TIME`
pub const MOCK_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Offset between mock time and real time, computed once at first use.
/// Mock time keeps advancing at the real rate.
static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

#[allow(clippy::disallowed_methods)] // This is the internal implementation that wraps Local::now()
fn get_mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            let mock_time_str = std::env::var(MOCK_TIME_ENV_VAR).ok()?;
            let Ok(naive_dt) = NaiveDateTime::parse_from_str(&mock_time_str, MOCK_TIME_FORMAT)
            else {
                tracing::warn!(
                    mock_time = %mock_time_str,
                    expected_format = MOCK_TIME_FORMAT,
                    "Invalid mock time format"
                );
                return None;
            };
            let Some(mock_dt) = Local.from_local_datetime(&naive_dt).single() else {
                tracing::warn!(
                    mock_time = %mock_time_str,
                    "Failed to convert mock time to local timezone"
                );
                return None;
            };
            let offset = mock_dt.signed_duration_since(chrono::Local::now());
            tracing::info!(
                mock_time = %mock_time_str,
                offset_secs = offset.num_seconds(),
                "Mock time enabled"
            );
            Some(offset)
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Returns whether mock time is currently active.
pub fn is_mock_time_active() -> bool {
    get_mock_time_offset().is_some()
}

/// Get the current local time, respecting mock time settings in debug builds.
#[allow(clippy::disallowed_methods)] // This is the wrapper that provides mock time support
pub fn now() -> DateTime<Local> {
    let real_now = chrono::Local::now();

    match get_mock_time_offset() {
        Some(offset) => real_now + offset,
        None => real_now,
    }
}

/// Whether two instants fall on the same local calendar day.
pub fn is_same_day(a: &DateTime<Local>, b: &DateTime<Local>) -> bool {
    a.date_naive() == b.date_naive()
}

/// First instant of the given local calendar day.
///
/// Normally local midnight. If midnight does not exist on that date (a DST
/// jump at 00:00), the first existing hour of the day is used instead.
pub fn start_of_day(date: NaiveDate) -> DateTime<Local> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..24)
        .find_map(|hour| {
            Local
                .from_local_datetime(&(midnight + chrono::Duration::hours(hour)))
                .earliest()
        })
        .unwrap_or_else(|| Local.from_utc_datetime(&midnight))
}

/// Local midnight that starts the calendar day after `now`.
pub fn start_of_next_day(now: &DateTime<Local>) -> DateTime<Local> {
    let today = now.date_naive();
    let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
    start_of_day(tomorrow)
}

/// Format time left until the next spin, e.g. `"3h 12m"` or `"45m"`.
///
/// Negative or zero durations render as `"0m"`.
pub fn format_countdown(remaining: chrono::Duration) -> String {
    if remaining <= chrono::Duration::zero() {
        return "0m".to_string();
    }

    let hours = remaining.num_hours();
    let minutes = remaining.num_minutes() % 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Label a past instant relative to today: `Today`, `Yesterday`,
/// `N days ago` for the last week, then a short weekday and day of month.
pub fn format_relative_day(then: &DateTime<Local>, now: &DateTime<Local>) -> String {
    let days = now
        .date_naive()
        .signed_duration_since(then.date_naive())
        .num_days();

    match days {
        d if d <= 0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        d if d <= 6 => format!("{} days ago", d),
        _ => then.format("%a %-d").to_string(),
    }
}

/// Format a DateTime for display with full date and time.
pub fn format_datetime_full(dt: &DateTime<Local>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// A point in monotonic time, used for reel timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonotonicInstant(Instant);

impl MonotonicInstant {
    pub fn now() -> Self {
        Self(Instant::now())
    }

    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }

    pub fn duration_since(&self, earlier: MonotonicInstant) -> Duration {
        self.0.saturating_duration_since(earlier.0)
    }

    pub fn checked_add(&self, duration: Duration) -> Option<MonotonicInstant> {
        self.0.checked_add(duration).map(MonotonicInstant)
    }

    /// Returns duration until `self`, or zero if `self` is in the past
    pub fn saturating_duration_until(&self, from: MonotonicInstant) -> Duration {
        self.0.saturating_duration_since(from.0)
    }

    pub fn into_std(self) -> Instant {
        self.0
    }
}

impl std::ops::Add<Duration> for MonotonicInstant {
    type Output = MonotonicInstant;

    fn add(self, rhs: Duration) -> Self::Output {
        MonotonicInstant(self.0 + rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_same_day() {
        let morning = Local.with_ymd_and_hms(2025, 12, 25, 0, 5, 0).unwrap();
        let night = Local.with_ymd_and_hms(2025, 12, 25, 23, 55, 0).unwrap();
        let next = Local.with_ymd_and_hms(2025, 12, 26, 0, 5, 0).unwrap();

        assert!(is_same_day(&morning, &night));
        assert!(!is_same_day(&night, &next));
    }

    #[test]
    fn test_start_of_next_day() {
        let now = Local.with_ymd_and_hms(2025, 12, 25, 14, 30, 0).unwrap();
        let next = start_of_next_day(&now);

        assert_eq!(next.date_naive(), NaiveDate::from_ymd_opt(2025, 12, 26).unwrap());
        assert_eq!(next.hour(), 0);
        assert_eq!(next.minute(), 0);
        assert!(next > now);
    }

    #[test]
    fn test_start_of_next_day_across_year_end() {
        let now = Local.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap();
        let next = start_of_next_day(&now);

        assert_eq!(next.year(), 2026);
        assert_eq!(next.month(), 1);
        assert_eq!(next.day(), 1);
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(chrono::Duration::minutes(45)), "45m");
        assert_eq!(
            format_countdown(chrono::Duration::minutes(3 * 60 + 12)),
            "3h 12m"
        );
        assert_eq!(format_countdown(chrono::Duration::seconds(30)), "0m");
        assert_eq!(format_countdown(chrono::Duration::zero()), "0m");
        assert_eq!(format_countdown(chrono::Duration::minutes(-5)), "0m");
    }

    #[test]
    fn test_format_relative_day() {
        let now = Local.with_ymd_and_hms(2025, 12, 25, 15, 0, 0).unwrap(); // Thursday

        let same = Local.with_ymd_and_hms(2025, 12, 25, 8, 0, 0).unwrap();
        assert_eq!(format_relative_day(&same, &now), "Today");

        let yesterday = Local.with_ymd_and_hms(2025, 12, 24, 23, 0, 0).unwrap();
        assert_eq!(format_relative_day(&yesterday, &now), "Yesterday");

        let few = Local.with_ymd_and_hms(2025, 12, 20, 12, 0, 0).unwrap();
        assert_eq!(format_relative_day(&few, &now), "5 days ago");

        let old = Local.with_ymd_and_hms(2025, 12, 15, 12, 0, 0).unwrap(); // Monday
        assert_eq!(format_relative_day(&old, &now), "Mon 15");
    }

    #[test]
    fn test_format_datetime_full() {
        let dt = Local.with_ymd_and_hms(2025, 12, 25, 14, 30, 45).unwrap();
        assert_eq!(format_datetime_full(&dt), "2025-12-25 14:30:45");
    }

    #[test]
    fn test_now_returns_time() {
        let t = now();
        assert!(t.year() >= 2020);
        assert!(t.year() <= 2100);
    }

    #[test]
    fn test_monotonic_instant() {
        let t1 = MonotonicInstant::now();
        let t2 = t1 + Duration::from_millis(80);

        assert!(t2 > t1);
        assert_eq!(t2.duration_since(t1), Duration::from_millis(80));
        assert_eq!(t2.saturating_duration_until(t1), Duration::from_millis(80));
        assert_eq!(t1.saturating_duration_until(t2), Duration::ZERO);
    }

    #[test]
    fn test_parse_mock_time_format() {
        for valid in ["2025-12-25 14:30:00", "2025-01-01 00:00:00", "2025-12-31 23:59:59"] {
            assert!(NaiveDateTime::parse_from_str(valid, MOCK_TIME_FORMAT).is_ok());
        }

        for invalid in ["2025-12-25", "14:30:00", "2025-12-25T14:30:00", "", "not a date"] {
            assert!(
                NaiveDateTime::parse_from_str(invalid, MOCK_TIME_FORMAT).is_err(),
                "Expected '{}' to fail parsing",
                invalid
            );
        }
    }
}
