use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::post;
use axum::Router;
use punch_core::envelope::ErrorEnvelope;
use punch_core::request::ScheduleQuery;

use crate::error::AppError;
use crate::extract::RecordBody;
use crate::middleware::cors::preflight;
use crate::reply;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/schedule", post(monthly_schedule).options(preflight))
}

/// Fetch one employee's monthly schedule
///
/// Requires `userId` and `month` in the body; they are sent to the backend as
/// query parameters of a GET request.
#[utoipa::path(
    post,
    path = "/api/schedule",
    responses(
        (status = 200, description = "Backend result as returned, or BAD_GAS_RESPONSE", body = ErrorEnvelope),
        (status = 400, description = "Body is not a JSON object (BAD_JSON) or lacks userId/month (MISSING)", body = ErrorEnvelope),
        (status = 500, description = "GAS_WEBAPP_URL unset (NO_GAS_URL) or relay failure (CF_ERROR)", body = ErrorEnvelope)
    ),
    tag = "relay"
)]
pub async fn monthly_schedule(
    State(state): State<AppState>,
    body: Result<RecordBody, AppError>,
) -> Result<Response, AppError> {
    let gas_url = state.config.gas_url()?;
    let RecordBody(body) = body?;
    let query = ScheduleQuery::from_record(&body).ok_or(AppError::MissingFields)?;

    tracing::debug!(month = %query.month, "Fetching monthly schedule");
    let outcome = state.gas.monthly_schedule(gas_url, &query).await?;

    Ok(reply::envelope(StatusCode::OK, &outcome))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    use crate::routes::test_support::{Hits, json_body, post_json, spawn_backend, state_for};

    async fn echo_backend(hits: Hits) -> String {
        spawn_backend(Router::new().route(
            "/exec",
            get(move |Query(params): Query<HashMap<String, String>>| {
                let hits = hits.clone();
                async move {
                    hits.record();
                    Json(json!({"ok": true, "days": [], "params": params}))
                }
            }),
        ))
        .await
    }

    #[tokio::test]
    async fn forwards_as_get_with_query_params() {
        let hits = Hits::default();
        let url = echo_backend(hits.clone()).await;

        let (status, response) = post_json(
            state_for(Some(url)),
            "/api/schedule",
            r#"{"userId":"U 42","month":"2024-02"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body = json_body(response).await;

        assert_eq!(hits.count(), 1);
        assert_eq!(body["ok"], true);
        assert_eq!(
            body["params"],
            json!({"action": "getMonthlySchedule", "userId": "U 42", "month": "2024-02"})
        );
        assert!(body.get("flex").is_none());
    }

    #[tokio::test]
    async fn missing_fields_never_reach_backend() {
        let hits = Hits::default();
        let url = echo_backend(hits.clone()).await;

        for body in [r#"{"userId":"U1"}"#, r#"{"month":"2024-02"}"#, r#"{"userId":" ","month":"2024-02"}"#] {
            let (status, response) =
                post_json(state_for(Some(url.clone())), "/api/schedule", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json_body(response).await["code"], "MISSING");
        }
        assert_eq!(hits.count(), 0);
    }

    #[tokio::test]
    async fn unconfigured_backend_is_reported_first() {
        let (status, response) =
            post_json(state_for(None), "/api/schedule", r#"{"userId":"U1"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["code"], "NO_GAS_URL");
    }

    #[tokio::test]
    async fn html_error_page_is_truncated_into_raw_head() {
        let page = format!("<html>{}</html>", "x".repeat(800));
        let url = spawn_backend(Router::new().route(
            "/exec",
            get(move || {
                let page = page.clone();
                async move { (StatusCode::INTERNAL_SERVER_ERROR, page) }
            }),
        ))
        .await;

        let (status, response) = post_json(
            state_for(Some(url)),
            "/api/schedule",
            r#"{"userId":"U1","month":"2024-02"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["code"], "BAD_GAS_RESPONSE");
        let head = body["raw_head"].as_str().expect("raw_head is a string");
        assert_eq!(head.chars().count(), 500);
        assert!(head.starts_with("<html>xxx"));
    }
}
