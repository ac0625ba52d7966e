//! JSON encoding of the persisted history
//!
//! The history value is a JSON array of `{ "text", "createdAt" }` objects,
//! oldest first, with timestamps in ISO-8601 UTC at millisecond precision.

use chrono::{DateTime, Local, SecondsFormat, Utc};
use jackpot_api::HistoryEntry;
use serde::de::IgnoredAny;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::{StoreError, StoreResult};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredPrompt<'a> {
    text: &'a str,
    created_at: String,
}

/// Persisted timestamp form, e.g. `2025-12-25T14:30:00.000Z`
pub fn encode_timestamp(ts: &DateTime<Local>) -> String {
    ts.with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn decode_timestamp(s: &str) -> Option<DateTime<Local>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Local))
}

fn stored(entry: &HistoryEntry) -> StoredPrompt<'_> {
    StoredPrompt {
        text: &entry.text,
        created_at: encode_timestamp(&entry.created_at),
    }
}

pub fn encode_history(entries: &[HistoryEntry]) -> StoreResult<String> {
    let stored: Vec<StoredPrompt<'_>> = entries.iter().map(stored).collect();
    serde_json::to_string(&stored).map_err(StoreError::write)
}

/// Append `entry` to a persisted payload.
///
/// Existing elements are kept byte for byte, including ones `decode_history`
/// would drop or normalize. A payload that is not a JSON array is `Corrupt`
/// and no new payload is produced.
pub fn append_history(payload: Option<&str>, entry: &HistoryEntry) -> StoreResult<String> {
    let element = serde_json::to_string(&stored(entry)).map_err(StoreError::write)?;

    let Some(payload) = payload else {
        return Ok(format!("[{}]", element));
    };

    let existing: Vec<IgnoredAny> = serde_json::from_str(payload).map_err(StoreError::corrupt)?;
    if existing.is_empty() {
        return Ok(format!("[{}]", element));
    }

    let body = payload
        .trim_end()
        .strip_suffix(']')
        .ok_or_else(|| StoreError::Corrupt("history payload does not end with ']'".into()))?;
    Ok(format!("{},{}]", body, element))
}

/// Decode a persisted history payload.
///
/// Only a payload that is not a JSON array is an error. Elements are
/// tolerated individually: a missing or non-string `text` decodes as an
/// empty string, and elements without a parseable `createdAt` are dropped.
pub fn decode_history(payload: &str) -> StoreResult<Vec<HistoryEntry>> {
    let values: Vec<Value> = serde_json::from_str(payload).map_err(StoreError::corrupt)?;

    let mut entries = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        let Some(obj) = value.as_object() else {
            warn!(index, "Dropping history element that is not an object");
            continue;
        };

        let text = obj
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let Some(created_at) = obj
            .get("createdAt")
            .and_then(Value::as_str)
            .and_then(decode_timestamp)
        else {
            warn!(index, text = %text, "Dropping history element without a valid createdAt");
            continue;
        };

        entries.push(HistoryEntry { text, created_at });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_format() {
        let ts = Utc
            .with_ymd_and_hms(2025, 12, 25, 14, 30, 0)
            .unwrap()
            .with_timezone(&Local);
        assert_eq!(encode_timestamp(&ts), "2025-12-25T14:30:00.000Z");
        assert_eq!(decode_timestamp("2025-12-25T14:30:00.000Z"), Some(ts));
    }

    #[test]
    fn test_encode_decode_history() {
        let ts = Local.with_ymd_and_hms(2025, 12, 25, 9, 0, 0).unwrap();
        let entries = vec![
            HistoryEntry::new("first summer meal", ts),
            HistoryEntry::new("last winter dream", ts + chrono::Duration::days(1)),
        ];

        let payload = encode_history(&entries).unwrap();
        assert!(payload.contains("\"createdAt\""));
        assert_eq!(decode_history(&payload).unwrap(), entries);
    }

    #[test]
    fn test_container_must_be_array() {
        for payload in ["{}", "\"text\"", "not json", "[1, 2"] {
            assert!(
                matches!(decode_history(payload), Err(StoreError::Corrupt(_))),
                "Expected '{}' to be corrupt",
                payload
            );
        }
    }

    #[test]
    fn test_malformed_fields_tolerated() {
        let payload = r#"[
            {"text": "  ", "createdAt": "2025-12-25T09:00:00.000Z"},
            {"createdAt": "2025-12-25T10:00:00.000Z"},
            {"text": 42, "createdAt": "2025-12-25T11:00:00.000Z"},
            {"text": "a b c", "createdAt": "yesterday"},
            "stray",
            {"text": "a b c", "createdAt": "2025-12-25T12:00:00+01:00"}
        ]"#;

        let entries = decode_history(payload).unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].text, "  ");
        assert_eq!(entries[1].text, "");
        assert_eq!(entries[2].text, "");
        assert_eq!(entries[3].text, "a b c");
    }

    #[test]
    fn test_append_keeps_existing_elements_verbatim() {
        let seeded = r#"[{"text":"old day one","createdAt":"not-a-date"},"stray",{"text":42,"createdAt":"2025-12-20T09:00:00.000Z"},{"text":"a b c","createdAt":"2025-12-21T09:00:00.123456Z"}]"#;
        let ts = Utc
            .with_ymd_and_hms(2025, 12, 25, 9, 0, 0)
            .unwrap()
            .with_timezone(&Local);

        let payload = append_history(Some(seeded), &HistoryEntry::new("x y z", ts)).unwrap();

        assert_eq!(
            payload,
            format!(
                "{},{}]",
                &seeded[..seeded.len() - 1],
                r#"{"text":"x y z","createdAt":"2025-12-25T09:00:00.000Z"}"#
            )
        );
        let values: Vec<Value> = serde_json::from_str(&payload).unwrap();
        assert_eq!(values.len(), 5);
    }

    #[test]
    fn test_append_to_missing_or_empty_payload() {
        let ts = Local.with_ymd_and_hms(2025, 12, 25, 9, 0, 0).unwrap();
        let entry = HistoryEntry::new("a b c", ts);

        for payload in [None, Some("[]"), Some(" [ ] ")] {
            let appended = append_history(payload, &entry).unwrap();
            assert_eq!(decode_history(&appended).unwrap(), vec![entry.clone()]);
        }
    }

    #[test]
    fn test_append_rejects_corrupt_container() {
        let ts = Local.with_ymd_and_hms(2025, 12, 25, 9, 0, 0).unwrap();
        let entry = HistoryEntry::new("a b c", ts);

        for payload in ["{}", "not json", "[1, 2"] {
            assert!(matches!(
                append_history(Some(payload), &entry),
                Err(StoreError::Corrupt(_))
            ));
        }
    }

    #[test]
    fn test_empty_array() {
        assert!(decode_history("[]").unwrap().is_empty());
    }
}
