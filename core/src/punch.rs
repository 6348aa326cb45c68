//! Typed view over a successful clock-in/out exchange.
//!
//! Built once from the inbound request and the backend result; every field is
//! already resolved through its alias list and defaulted, so card layout never
//! touches the raw records.

use chrono::{DateTime, Utc};

use crate::record::{Key, Record, finite_number, first_valid, non_empty_text};
use crate::time::pick_timestamp;

pub const FALLBACK_LIFF_ID: &str = "2008810311-jmqyUaTN";
pub const FALLBACK_LOCATION_NAME: &str = "H.R燈藝";

const DISTANCE_KEYS: [Key; 4] = [
    Key::Flat("distance_m"),
    Key::Flat("distanceM"),
    Key::Nested("fence", "distanceM"),
    Key::Nested("fence", "distance_m"),
];

const FENCE_KEYS: [Key; 4] = [
    Key::Flat("fence_m"),
    Key::Flat("fenceM"),
    Key::Nested("fence", "fenceM"),
    Key::Nested("fence", "fence_m"),
];

const LATE_KEYS: [Key; 4] = [
    Key::Flat("mins_late"),
    Key::Flat("late_mins"),
    Key::Flat("lateMins"),
    Key::Nested("shift", "minsLate"),
];

const LOCATION_KEYS: [Key; 2] = [Key::Flat("locationName"), Key::Flat("location_name")];

const EMPLOYEE_NAME_KEYS: [Key; 3] = [
    Key::Nested("employee", "display_name"),
    Key::Nested("employee", "name"),
    Key::Flat("name"),
];

/// Deployment-level defaults used when neither request nor result names a value.
#[derive(Clone, Debug, Default)]
pub struct CardDefaults {
    pub liff_id: Option<String>,
    pub location_name: Option<String>,
}

impl CardDefaults {
    /// Read `LIFF_ID` and `LOCATION_NAME`; blank values count as unset.
    pub fn from_env() -> Self {
        Self {
            liff_id: env_text("LIFF_ID"),
            location_name: env_text("LOCATION_NAME"),
        }
    }
}

fn env_text(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PunchAction {
    In,
    Out,
}

impl PunchAction {
    /// Case-insensitive; anything other than `OUT` is a clock-in.
    pub fn parse(text: &str) -> Self {
        if text.trim().eq_ignore_ascii_case("OUT") {
            PunchAction::Out
        } else {
            PunchAction::In
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PunchAction::In => "IN",
            PunchAction::Out => "OUT",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PunchAction::In => "上班打卡",
            PunchAction::Out => "下班打卡",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PunchView {
    pub action: PunchAction,
    pub at: DateTime<Utc>,
    pub location_name: String,
    pub distance_m: Option<f64>,
    pub fence_m: Option<f64>,
    pub mins_late: f64,
    pub note: Option<String>,
    pub employee_name: Option<String>,
    pub liff_id: String,
}

impl PunchView {
    /// Resolve every card field. `now` is used only when the result carries
    /// no parseable timestamp.
    pub fn resolve(
        request: &Record,
        result: &Record,
        defaults: &CardDefaults,
        now: DateTime<Utc>,
    ) -> Self {
        let action = first_valid(request, &[Key::Flat("action")], non_empty_text)
            .or_else(|| first_valid(result, &[Key::Flat("action")], non_empty_text))
            .map(|text| PunchAction::parse(&text))
            .unwrap_or(PunchAction::In);

        let location_name = first_valid(result, &LOCATION_KEYS, non_empty_text)
            .or_else(|| defaults.location_name.clone())
            .unwrap_or_else(|| FALLBACK_LOCATION_NAME.to_string());

        let note = first_valid(request, &[Key::Flat("note")], non_empty_text)
            .or_else(|| first_valid(result, &[Key::Flat("note")], non_empty_text));

        let liff_id = first_valid(request, &[Key::Flat("liffId")], non_empty_text)
            .or_else(|| defaults.liff_id.clone())
            .unwrap_or_else(|| FALLBACK_LIFF_ID.to_string());

        Self {
            action,
            at: pick_timestamp(result).unwrap_or(now),
            location_name,
            distance_m: first_valid(result, &DISTANCE_KEYS, finite_number),
            fence_m: first_valid(result, &FENCE_KEYS, finite_number),
            mins_late: first_valid(result, &LATE_KEYS, finite_number).unwrap_or(0.0),
            note,
            employee_name: first_valid(result, &EMPLOYEE_NAME_KEYS, non_empty_text),
            liff_id,
        }
    }

    /// `(distance, fence)` when both are known.
    pub fn fence_check(&self) -> Option<(f64, f64)> {
        Some((self.distance_m?, self.fence_m?))
    }

    /// Minutes late, only when strictly positive.
    pub fn lateness(&self) -> Option<f64> {
        (self.mins_late.is_finite() && self.mins_late > 0.0).then_some(self.mins_late)
    }
}
