//! Client for the backend web app (`GAS_WEBAPP_URL`).
//!
//! One request per call, no retries. The backend does not reliably answer with
//! JSON (HTML error pages, quota notices), so replies are normalized here:
//! non-JSON text becomes a `BAD_GAS_RESPONSE` envelope.

use punch_core::envelope::parse_backend_reply;
use punch_core::record::Record;
use punch_core::request::ScheduleQuery;
use serde_json::Value;
use url::Url;

use crate::error::AppError;

pub const SCHEDULE_ACTION: &str = "getMonthlySchedule";

#[derive(Clone, Default)]
pub struct GasClient {
    http: reqwest::Client,
}

impl GasClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// POST the clock request body unchanged.
    pub async fn forward_punch(&self, gas_url: &str, body: &Record) -> Result<Value, AppError> {
        let response = self.http.post(gas_url).json(body).send().await?;
        read_reply(response).await
    }

    /// GET the monthly schedule for one employee.
    pub async fn monthly_schedule(
        &self,
        gas_url: &str,
        query: &ScheduleQuery,
    ) -> Result<Value, AppError> {
        let url = schedule_url(gas_url, query)?;
        let response = self.http.get(url).send().await?;
        read_reply(response).await
    }
}

async fn read_reply(response: reqwest::Response) -> Result<Value, AppError> {
    let status = response.status();
    if !status.is_success() {
        tracing::warn!(status = %status, "Backend returned non-success status");
    }
    let text = response.text().await?;
    Ok(parse_backend_reply(&text).unwrap_or_else(|envelope| {
        tracing::warn!(status = %status, bytes = text.len(), "Backend reply is not JSON");
        envelope.to_value()
    }))
}

pub fn schedule_url(gas_url: &str, query: &ScheduleQuery) -> Result<Url, AppError> {
    let mut url = Url::parse(gas_url)
        .map_err(|err| AppError::Internal(format!("invalid GAS_WEBAPP_URL: {err}")))?;
    url.query_pairs_mut()
        .append_pair("action", SCHEDULE_ACTION)
        .append_pair("userId", &query.user_id)
        .append_pair("month", &query.month);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(user_id: &str, month: &str) -> ScheduleQuery {
        ScheduleQuery {
            user_id: user_id.to_string(),
            month: month.to_string(),
        }
    }

    #[test]
    fn schedule_url_appends_encoded_params() {
        let url = schedule_url(
            "https://script.google.com/macros/s/abc/exec",
            &query("U 1&2", "2024-02"),
        )
        .expect("valid url");
        assert_eq!(
            url.as_str(),
            "https://script.google.com/macros/s/abc/exec?action=getMonthlySchedule&userId=U+1%262&month=2024-02"
        );
    }

    #[test]
    fn schedule_url_keeps_existing_query() {
        let url = schedule_url("https://example.com/exec?v=2", &query("U1", "2024-02"))
            .expect("valid url");
        assert_eq!(
            url.as_str(),
            "https://example.com/exec?v=2&action=getMonthlySchedule&userId=U1&month=2024-02"
        );
    }

    #[test]
    fn schedule_url_rejects_relative_base() {
        let err = schedule_url("not a url", &query("U1", "2024-02")).expect_err("must fail");
        assert!(matches!(err, AppError::Internal(_)));
    }
}
