use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

use crate::app_state::AppState;
use crate::context::{RequestContext, RequestMeta};
use crate::error::UnhandledFailure;
use crate::routes;

/// Drive one request through hooks, handler, backstop, and teardown.
pub async fn request_lifecycle(State(app): State<AppState>, mut req: Request, next: Next) -> Response {
    let meta = RequestMeta::from_request(&req);
    let span = tracing::info_span!("request", method = %meta.method, path = %meta.path);
    let ctx = Arc::new(RequestContext::new(meta));
    req.extensions_mut().insert(Arc::clone(&ctx));

    async move {
        let response = match app.hooks().run_before(&ctx) {
            Ok(()) => next.run(req).await,
            Err(e) => routes::handle_500(&app, &ctx, &UnhandledFailure::from(e)).await,
        };

        let failure = response.extensions().get::<UnhandledFailure>().cloned();
        let response = match failure {
            Some(failure) => routes::handle_500(&app, &ctx, &failure).await,
            None => response,
        };

        let response = match app.hooks().run_after(&ctx, response) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(code = e.client_code().as_str(), error = %e, "after-request hook failed");
                routes::handle_500(&app, &ctx, &UnhandledFailure::from(e)).await
            }
        };

        if let Err(e) = ctx.teardown().await {
            tracing::warn!(error = %e, "closing database connection failed");
        }
        response
    }
    .instrument(span)
    .await
}
