//! Pull-based metrics exporter.
//!
//! Holds the scrape-side registry: the `app_info` gauge, per-route request
//! duration and count (recorded by [`track_http`]), and logger failure counts.
//! [`PullExporter::attach`] is the single integration point with the router.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    http::Method,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};

use super::metrics::{CounterVec, GaugeVec, HistogramVec};
use crate::app_state::AppState;

/// `path` label for requests that matched no route.
pub const UNMATCHED_PATH: &str = "<unmatched>";

pub struct PullExporter {
    pub app_info: GaugeVec,
    pub http_request_duration: HistogramVec,
    pub http_requests: CounterVec,
    pub request_log_errors: CounterVec,
}

impl PullExporter {
    pub fn new(app_version: &str) -> Self {
        let exporter = Self {
            app_info: GaugeVec::default(),
            http_request_duration: HistogramVec::default(),
            http_requests: CounterVec::default(),
            request_log_errors: CounterVec::default(),
        };
        exporter.app_info.set(&[("version", app_version)], 1);
        exporter
    }

    /// Mount `/metrics` and auto-instrument every route of `routes`.
    pub fn attach(self: &Arc<Self>, routes: Router<AppState>) -> Router<AppState> {
        routes
            .route("/metrics", get(crate::ops::metrics))
            .layer(middleware::from_fn_with_state(Arc::clone(self), track_http))
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.app_info.render("app_info", "Application info", &mut out);
        self.http_request_duration.render(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
            &mut out,
        );
        self.http_requests
            .render("http_request_total", "Total number of HTTP requests", &mut out);
        self.request_log_errors.render(
            "request_log_errors_total",
            "Request log writes that failed",
            &mut out,
        );
        out
    }
}

/// Record duration and count for one request.
///
/// The `path` label is the route template, so label cardinality is bounded
/// by the route table rather than by client-supplied URLs.
pub async fn track_http(
    State(exporter): State<Arc<PullExporter>>,
    req: Request,
    next: Next,
) -> Response {
    let method = method_label(req.method());
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| UNMATCHED_PATH.to_owned(), |p| p.as_str().to_owned());
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    exporter.http_request_duration.observe(
        &[("method", method), ("path", &path), ("status", &status)],
        started.elapsed(),
    );
    exporter
        .http_requests
        .inc(&[("method", method), ("status", &status)]);
    response
}

const KNOWN_METHODS: [&str; 9] = [
    "GET", "POST", "PUT", "DELETE", "HEAD", "OPTIONS", "PATCH", "CONNECT", "TRACE",
];

/// Extension methods collapse to `OTHER`.
fn method_label(method: &Method) -> &'static str {
    KNOWN_METHODS
        .iter()
        .copied()
        .find(|m| *m == method.as_str())
        .unwrap_or("OTHER")
}
