//! Untyped key-value records exchanged with the client and the backend.
//!
//! Neither side publishes a schema, so fields are reached through ordered
//! alias lists and a single resolver that returns the first value passing a
//! validity check. Everything downstream works on the typed result.

use serde_json::{Map, Value};

/// A JSON object as received over the wire.
pub type Record = Map<String, Value>;

/// Location of a field inside a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Top-level key.
    Flat(&'static str),
    /// Key inside a sub-record, e.g. `fence.distanceM`.
    Nested(&'static str, &'static str),
}

impl Key {
    pub fn lookup<'a>(&self, record: &'a Record) -> Option<&'a Value> {
        match *self {
            Key::Flat(key) => record.get(key),
            Key::Nested(parent, key) => record.get(parent)?.as_object()?.get(key),
        }
    }
}

/// Walk `keys` in order and return the first value accepted by `parse`.
///
/// Absent keys, `null` and values rejected by `parse` are all skipped, so a
/// malformed alias never shadows a valid one further down the list.
pub fn first_valid<T>(
    record: &Record,
    keys: &[Key],
    parse: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    keys.iter()
        .filter_map(|key| key.lookup(record))
        .find_map(parse)
}

/// Trimmed, non-empty text. Numbers are accepted in their JSON rendering.
pub fn non_empty_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// A finite number, given either as a JSON number or as numeric text.
pub fn finite_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Loose truthiness used for the backend's `ok` flag.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Whether a backend result reports success.
pub fn is_ok(record: &Record) -> bool {
    record.get("ok").is_some_and(truthy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().expect("test record must be an object")
    }

    #[test]
    fn nested_key_reads_sub_record() {
        let r = record(json!({"fence": {"distanceM": 12}}));
        assert_eq!(
            Key::Nested("fence", "distanceM").lookup(&r),
            Some(&json!(12))
        );
        assert_eq!(Key::Nested("fence", "fenceM").lookup(&r), None);
    }

    #[test]
    fn nested_key_ignores_non_object_parent() {
        let r = record(json!({"fence": 40}));
        assert_eq!(Key::Nested("fence", "distanceM").lookup(&r), None);
    }

    #[test]
    fn first_valid_skips_invalid_aliases() {
        let r = record(json!({"distance_m": "abc", "distanceM": null, "fence": {"distanceM": "35.5"}}));
        let keys = [
            Key::Flat("distance_m"),
            Key::Flat("distanceM"),
            Key::Nested("fence", "distanceM"),
        ];
        assert_eq!(first_valid(&r, &keys, finite_number), Some(35.5));
    }

    #[test]
    fn first_valid_respects_order() {
        let r = record(json!({"a": "first", "b": "second"}));
        let keys = [Key::Flat("a"), Key::Flat("b")];
        assert_eq!(
            first_valid(&r, &keys, non_empty_text),
            Some("first".to_string())
        );
    }

    #[test]
    fn finite_number_rejects_non_finite_and_blank() {
        assert_eq!(finite_number(&json!("")), None);
        assert_eq!(finite_number(&json!("   ")), None);
        assert_eq!(finite_number(&json!("NaN")), None);
        assert_eq!(finite_number(&json!("inf")), None);
        assert_eq!(finite_number(&json!(true)), None);
        assert_eq!(finite_number(&json!(" 7 ")), Some(7.0));
        assert_eq!(finite_number(&json!(-3)), Some(-3.0));
    }

    #[test]
    fn non_empty_text_trims() {
        assert_eq!(non_empty_text(&json!("  hi  ")), Some("hi".to_string()));
        assert_eq!(non_empty_text(&json!("   ")), None);
        assert_eq!(non_empty_text(&json!(42)), Some("42".to_string()));
        assert_eq!(non_empty_text(&json!({"x": 1})), None);
    }

    #[test]
    fn ok_flag_truthiness() {
        assert!(is_ok(&record(json!({"ok": true}))));
        assert!(is_ok(&record(json!({"ok": 1}))));
        assert!(!is_ok(&record(json!({"ok": false}))));
        assert!(!is_ok(&record(json!({"ok": ""}))));
        assert!(!is_ok(&record(json!({"message": "no flag"}))));
    }
}
