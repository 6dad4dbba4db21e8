//! HTTP mapping for failures that escape a handler.
//!
//! Handlers that return `Err(AppError)` or panic produce a bare 500 carrying an
//! [`UnhandledFailure`] marker; the lifecycle middleware turns it into the
//! logged backstop response.

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use thiserror::Error;

use jrdemo_core::error::DemoError;

/// Failure text awaiting the global 500 handler.
#[derive(Debug, Clone)]
pub struct UnhandledFailure(pub String);

impl From<DemoError> for UnhandledFailure {
    fn from(e: DemoError) -> Self {
        Self(e.to_string())
    }
}

/// Handler-facing wrapper so `?` works on `DemoError` inside routes.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct AppError(#[from] pub DemoError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        unhandled(UnhandledFailure::from(self.0))
    }
}

fn unhandled(failure: UnhandledFailure) -> Response {
    let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
    response.extensions_mut().insert(failure);
    response
}

/// `CatchPanicLayer` callback.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_owned()
    } else {
        "handler panicked".to_owned()
    };
    unhandled(UnhandledFailure(detail))
}
