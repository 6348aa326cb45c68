//! Inbound request bodies.

use thiserror::Error;

use crate::record::{Key, Record, first_valid, non_empty_text};

#[derive(Debug, Error)]
pub enum BodyError {
    #[error("request body is not valid JSON: {0}")]
    NotJson(#[from] serde_json::Error),
    #[error("request body must be a JSON object")]
    NotObject,
}

/// Parse a request body into a record. Only JSON objects are accepted.
pub fn parse_body(bytes: &[u8]) -> Result<Record, BodyError> {
    match serde_json::from_slice(bytes)? {
        serde_json::Value::Object(record) => Ok(record),
        _ => Err(BodyError::NotObject),
    }
}

/// Monthly schedule lookup for one employee.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleQuery {
    pub user_id: String,
    pub month: String,
}

impl ScheduleQuery {
    /// `None` unless both `userId` and `month` are non-blank.
    pub fn from_record(body: &Record) -> Option<Self> {
        Some(Self {
            user_id: first_valid(body, &[Key::Flat("userId")], non_empty_text)?,
            month: first_valid(body, &[Key::Flat("month")], non_empty_text)?,
        })
    }
}
