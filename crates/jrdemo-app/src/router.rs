//! Axum router wiring.

use axum::{middleware, routing::get, Router};
use tower_http::catch_panic::CatchPanicLayer;

use crate::{app_state::AppState, error, lifecycle, ops, routes};

pub fn build_router(state: AppState) -> Router {
    instrument(app_routes(), state)
}

/// Application routes, before instrumentation.
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(routes::hello_world))
        .route("/green", get(routes::green))
        .route("/red", get(routes::red))
        .route("/simulation", get(routes::simulation))
        .route("/healthz", get(ops::healthz))
        .fallback(routes::not_found)
}

/// Wrap `routes` with panic capture, the pull exporter, and the request
/// lifecycle (outermost).
pub fn instrument(routes: Router<AppState>, state: AppState) -> Router {
    let routes = routes.layer(CatchPanicLayer::custom(error::panic_response));
    state
        .exporter()
        .attach(routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            lifecycle::request_lifecycle,
        ))
        .with_state(state)
}
