use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Asia::Taipei;
use serde_json::Value;

use crate::record::{Key, Record, first_valid};

/// Backend fields that may carry the punch time, highest priority first.
pub const TIMESTAMP_KEYS: [Key; 7] = [
    Key::Flat("tsIso"),
    Key::Flat("nowIso"),
    Key::Flat("timestampIso"),
    Key::Flat("timestamp"),
    Key::Flat("ts"),
    Key::Flat("timeIso"),
    Key::Flat("createdAt"),
];

const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parse a timestamp value.
///
/// Accepts RFC 3339 text, ISO date-times without offset and bare dates (both
/// read as UTC), and numbers as epoch milliseconds. Empty strings and zero
/// count as absent.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            let millis = n.as_f64().filter(|m| m.is_finite() && *m != 0.0)?;
            DateTime::from_timestamp_millis(millis.trunc() as i64)
        }
        Value::String(s) => parse_timestamp_text(s.trim()),
        _ => None,
    }
}

fn parse_timestamp_text(text: &str) -> Option<DateTime<Utc>> {
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// First parseable timestamp in the backend result, by [`TIMESTAMP_KEYS`] order.
pub fn pick_timestamp(result: &Record) -> Option<DateTime<Utc>> {
    first_valid(result, &TIMESTAMP_KEYS, parse_timestamp)
}

/// `YYYY/MM/DD` in Asia/Taipei.
pub fn format_date_tw(at: DateTime<Utc>) -> String {
    at.with_timezone(&Taipei).format("%Y/%m/%d").to_string()
}

/// 24-hour `HH:mm` in Asia/Taipei.
pub fn format_time_tw(at: DateTime<Utc>) -> String {
    at.with_timezone(&Taipei).format("%H:%M").to_string()
}
