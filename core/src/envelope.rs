use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::card::FlexMessage;
use crate::record::Record;

/// Longest backend excerpt echoed back when the reply is not JSON.
pub const RAW_HEAD_LIMIT: usize = 500;

/// Failure envelope. Callers read `ok`; the HTTP status is secondary.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorEnvelope {
    /// Always `false`
    pub ok: bool,
    /// Machine-readable error code (see [`codes`])
    pub code: String,
    /// User-facing description
    pub message: String,
    /// First characters of an unparseable backend reply
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_head: Option<String>,
    /// Rendered internal error, for diagnostics only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            ok: false,
            code: code.to_string(),
            message: message.to_string(),
            raw_head: None,
            detail: None,
        }
    }

    /// Envelope for a backend reply that is not JSON.
    pub fn bad_backend_response(raw: &str) -> Self {
        Self {
            raw_head: Some(raw_head(raw)),
            ..Self::new(codes::BAD_GAS_RESPONSE, messages::BAD_GAS_RESPONSE)
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Error codes carried in `code`
pub mod codes {
    pub const NO_GAS_URL: &str = "NO_GAS_URL";
    pub const BAD_JSON: &str = "BAD_JSON";
    pub const MISSING: &str = "MISSING";
    pub const BAD_GAS_RESPONSE: &str = "BAD_GAS_RESPONSE";
    pub const CF_ERROR: &str = "CF_ERROR";
}

pub mod messages {
    pub const NO_GAS_URL: &str = "未設定 GAS_WEBAPP_URL";
    pub const BAD_JSON: &str = "請求格式錯誤";
    pub const MISSING: &str = "缺少 userId 或 month";
    pub const BAD_GAS_RESPONSE: &str = "GAS 回應非 JSON";
    pub const CF_ERROR: &str = "系統忙碌，請稍後再試";
}

/// First [`RAW_HEAD_LIMIT`] characters of `raw`.
pub fn raw_head(raw: &str) -> String {
    raw.chars().take(RAW_HEAD_LIMIT).collect()
}

/// Parse backend text; the error is the `BAD_GAS_RESPONSE` envelope to send instead.
pub fn parse_backend_reply(text: &str) -> Result<Value, ErrorEnvelope> {
    serde_json::from_str(text).map_err(|_| ErrorEnvelope::bad_backend_response(text))
}

/// Store the card under `flex`, replacing anything the backend sent there.
pub fn attach_card(result: &mut Record, card: &FlexMessage) {
    if let Ok(value) = serde_json::to_value(card) {
        result.insert("flex".to_string(), value);
    }
}
