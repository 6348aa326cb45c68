use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::post;
use axum::Router;
use chrono::Utc;
use punch_core::card;
use punch_core::envelope::{ErrorEnvelope, attach_card};
use punch_core::record::is_ok;
use serde_json::Value;

use crate::error::AppError;
use crate::extract::RecordBody;
use crate::middleware::cors::preflight;
use crate::reply;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/clock", post(clock).options(preflight))
}

/// Relay a clock-in/out request to the backend
///
/// The body is forwarded unchanged. When the backend reports success the
/// response gains a `flex` card describing the punch.
#[utoipa::path(
    post,
    path = "/api/clock",
    responses(
        (status = 200, description = "Backend result, with `flex` card on success; or BAD_GAS_RESPONSE", body = ErrorEnvelope),
        (status = 400, description = "Body is not a JSON object (BAD_JSON)", body = ErrorEnvelope),
        (status = 500, description = "GAS_WEBAPP_URL unset (NO_GAS_URL) or relay failure (CF_ERROR)", body = ErrorEnvelope)
    ),
    tag = "relay"
)]
pub async fn clock(
    State(state): State<AppState>,
    body: Result<RecordBody, AppError>,
) -> Result<Response, AppError> {
    let gas_url = state.config.gas_url()?;
    let RecordBody(request) = body?;

    tracing::debug!(
        action = request.get("action").and_then(serde_json::Value::as_str).unwrap_or("IN"),
        "Forwarding clock request"
    );
    let mut outcome = state.gas.forward_punch(gas_url, &request).await?;
    if let Value::Object(result) = &mut outcome {
        if is_ok(result) {
            let card =
                card::synthesize(&request, result, &state.config.card_defaults, Utc::now());
            attach_card(result, &card);
        }
    }

    Ok(reply::envelope(StatusCode::OK, &outcome))
}
