use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use punch_core::envelope::{ErrorEnvelope, codes, messages};

use crate::reply;

/// Internal error type that converts to an `{ ok: false, ... }` envelope
#[derive(Debug)]
pub enum AppError {
    /// `GAS_WEBAPP_URL` is not configured (500)
    MissingBackendUrl,
    /// Inbound body is not a JSON object (400)
    BadJson { reason: String },
    /// Schedule query without `userId` or `month` (400)
    MissingFields,
    /// Outbound call to the backend failed (500)
    Upstream(reqwest::Error),
    /// Internal error (500)
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, envelope) = match self {
            AppError::MissingBackendUrl => {
                tracing::error!("GAS_WEBAPP_URL is not configured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorEnvelope::new(codes::NO_GAS_URL, messages::NO_GAS_URL),
                )
            }
            AppError::BadJson { reason } => {
                tracing::debug!(reason = %reason, "Rejected request body");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorEnvelope::new(codes::BAD_JSON, messages::BAD_JSON),
                )
            }
            AppError::MissingFields => (
                StatusCode::BAD_REQUEST,
                ErrorEnvelope::new(codes::MISSING, messages::MISSING),
            ),
            AppError::Upstream(err) => {
                tracing::error!("Backend request failed: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, busy(err.to_string()))
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, busy(msg))
            }
        };

        reply::envelope(status, &envelope)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Upstream(err)
    }
}

fn busy(detail: String) -> ErrorEnvelope {
    ErrorEnvelope {
        detail: Some(detail),
        ..ErrorEnvelope::new(codes::CF_ERROR, messages::CF_ERROR)
    }
}

/// `CatchPanicLayer` handler: a panicking handler still answers with `CF_ERROR`.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    AppError::Internal(detail).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{Value, json};

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should read");
        (status, serde_json::from_slice(&bytes).expect("body is JSON"))
    }

    #[tokio::test]
    async fn missing_backend_url_is_500_no_gas_url() {
        let (status, body) = render(AppError::MissingBackendUrl).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"ok": false, "code": "NO_GAS_URL", "message": "未設定 GAS_WEBAPP_URL"})
        );
    }

    #[tokio::test]
    async fn bad_json_and_missing_are_400() {
        let (status, body) = render(AppError::BadJson {
            reason: "eof".to_string(),
        })
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_JSON");

        let (status, body) = render(AppError::MissingFields).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "MISSING");
    }

    #[tokio::test]
    async fn internal_error_carries_detail() {
        let (status, body) = render(AppError::Internal("boom".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "CF_ERROR");
        assert_eq!(body["message"], "系統忙碌，請稍後再試");
        assert_eq!(body["detail"], "boom");
    }

    #[tokio::test]
    async fn panic_payload_becomes_detail() {
        let response = panic_response(Box::new("exploded"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should read");
        let body: Value = serde_json::from_slice(&bytes).expect("body is JSON");
        assert_eq!(body["detail"], "exploded");
    }
}
