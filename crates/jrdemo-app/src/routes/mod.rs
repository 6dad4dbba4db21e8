//! Route handlers and the global 500 backstop.

pub mod simulation;

use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use jrdemo_core::error::{DemoError, Result};

use crate::app_state::AppState;
use crate::context::RequestContext;
use crate::error::UnhandledFailure;

pub use simulation::{SimulationOutcome, SimulationPolicy, SIMULATED_ERROR};

pub async fn hello_world(
    State(app): State<AppState>,
    Extension(ctx): Extension<Arc<RequestContext>>,
) -> Response {
    app.logger()
        .log_request(&ctx, "/", 200, "Hello World endpoint hit.")
        .await;
    "JR Demo App!".into_response()
}

pub async fn green(
    State(app): State<AppState>,
    Extension(ctx): Extension<Arc<RequestContext>>,
) -> Response {
    app.logger()
        .log_request(&ctx, "/green", 200, "Green endpoint hit.")
        .await;
    "Green".into_response()
}

fn divide(a: i64, b: i64) -> Result<i64> {
    a.checked_div(b).ok_or(DemoError::DivisionByZero)
}

/// Always fails with a division by zero, handled here.
pub async fn red(
    State(app): State<AppState>,
    Extension(ctx): Extension<Arc<RequestContext>>,
) -> Response {
    match divide(1, 0) {
        Ok(_) => "Red".into_response(),
        Err(e) => {
            app.logger()
                .log_request(&ctx, "/red", 500, &format!("Error: {e}"))
                .await;
            tracing::error!(error = %e, "exception occurred in /red endpoint");
            (StatusCode::INTERNAL_SERVER_ERROR, "Red").into_response()
        }
    }
}

fn simulated_failure() -> Result<()> {
    Err(DemoError::Simulated(SIMULATED_ERROR.into()))
}

pub async fn simulation(
    State(app): State<AppState>,
    Extension(ctx): Extension<Arc<RequestContext>>,
) -> Response {
    let outcome = app.simulation().sample(&mut rand::thread_rng());
    tokio::time::sleep(outcome.delay()).await;

    if outcome.fail {
        if let Err(e) = simulated_failure() {
            app.logger()
                .log_request(&ctx, "/simulation", 500, &format!("Simulated error: {e}"))
                .await;
            tracing::error!(error = %e, "simulated exception in /simulation endpoint");
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    }

    let latency_ms = outcome.latency_ms;
    app.logger()
        .log_request(
            &ctx,
            "/simulation",
            200,
            &format!("Simulated latency: {latency_ms:.2} ms"),
        )
        .await;
    tracing::info!(latency_ms, "simulation request successful");
    format!("Request successful. Simulated latency: {latency_ms:.2} milliseconds.").into_response()
}

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

/// Global 500 handler for failures no route caught.
pub async fn handle_500(app: &AppState, ctx: &RequestContext, failure: &UnhandledFailure) -> Response {
    app.logger()
        .log_request(ctx, ctx.path(), 500, &failure.0)
        .await;
    tracing::error!(path = %ctx.path(), error = %failure.0, "500 error");
    (StatusCode::INTERNAL_SERVER_ERROR, failure.0.clone()).into_response()
}
