use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use punch_core::punch::CardDefaults;
use serde_json::Value;
use tower::ServiceExt;

use crate::state::{AppState, RelayConfig};

/// Counts requests reaching a fake backend.
#[derive(Clone, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub fn record(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Serve `backend` on an ephemeral local port and return its `/exec` URL.
pub async fn spawn_backend(backend: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("fake backend should bind");
    let addr = listener.local_addr().expect("fake backend address");
    tokio::spawn(async move {
        axum::serve(listener, backend)
            .await
            .expect("fake backend should serve");
    });
    format!("http://{addr}/exec")
}

pub fn state_for(gas_url: Option<String>) -> AppState {
    AppState::new(RelayConfig {
        gas_url,
        card_defaults: CardDefaults {
            liff_id: Some("env-liff".to_string()),
            location_name: None,
        },
    })
}

pub async fn post_json(state: AppState, uri: &str, body: &str) -> (StatusCode, Response) {
    let response = super::app(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("request should build"),
        )
        .await
        .expect("request should succeed");
    (response.status(), response)
}

pub async fn json_body(response: Response) -> Value {
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .expect("content-type header should exist"),
        "application/json; charset=utf-8"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
