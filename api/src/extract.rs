//! Body extractor for the relay routes.
//!
//! Request bodies are forwarded verbatim, so they are read as untyped records
//! rather than deserialized into a schema. Anything that is not a JSON object
//! becomes `AppError::BadJson`.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use punch_core::record::Record;
use punch_core::request::parse_body;

use crate::error::AppError;

/// JSON object body.
///
/// Take it as `Result<RecordBody, AppError>` when other checks must run
/// before the body is judged.
pub struct RecordBody(pub Record);

impl<S> FromRequest<S> for RecordBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadJson {
                reason: rejection.body_text(),
            })?;

        parse_body(&bytes)
            .map(RecordBody)
            .map_err(|err| AppError::BadJson {
                reason: err.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/api/clock")
            .body(Body::from(body))
            .expect("request should build")
    }

    #[tokio::test]
    async fn object_body_is_extracted() {
        let RecordBody(record) = RecordBody::from_request(request(r#"{"action":"OUT"}"#), &())
            .await
            .expect("object body should extract");
        assert_eq!(record.get("action").and_then(|v| v.as_str()), Some("OUT"));
    }

    #[tokio::test]
    async fn malformed_body_is_bad_json() {
        for body in ["{", "null", "\"IN\""] {
            let err = RecordBody::from_request(request(body), &())
                .await
                .err()
                .expect("non-object body must be rejected");
            assert!(matches!(err, AppError::BadJson { .. }));
        }
    }
}
