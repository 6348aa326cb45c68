use std::net::SocketAddr;

use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod error;
mod extract;
mod gas;
mod middleware;
mod reply;
mod routes;
mod state;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Punch Relay API",
        version = "0.1.0",
        description = "Relays clock-in/out and schedule requests to the attendance backend and renders punch cards."
    ),
    paths(
        routes::health::health_check,
        routes::clock::clock,
        routes::schedule::monthly_schedule,
    ),
    components(schemas(HealthResponse, punch_core::envelope::ErrorEnvelope))
)]
struct ApiDoc;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[tokio::main]
async fn main() {
    // Load .env if present (dev only)
    let _ = dotenvy::dotenv();

    // Structured JSON logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "punch_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = state::RelayConfig::from_env();
    if config.gas_url.is_none() {
        tracing::warn!("GAS_WEBAPP_URL is not set; relay routes will answer NO_GAS_URL");
    }
    let app_state = state::AppState::new(config);

    let app = routes::app(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Punch relay listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
