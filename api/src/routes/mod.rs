use axum::{Router, middleware};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod clock;
pub mod health;
pub mod schedule;

#[cfg(test)]
mod test_support;

/// All service routes with the shared layer stack.
///
/// CORS sits outermost so that every response, including panics turned into
/// `CF_ERROR`, carries the headers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(clock::router())
        .merge(schedule::router())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(crate::middleware::cors::apply))
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CatchPanicLayer::custom(crate::error::panic_response)),
        )
        .with_state(state)
}
