//! Shared error type across jrdemo crates.

use thiserror::Error;

/// Stable error codes surfaced in logs and the backstop response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed configuration.
    BadRequest,
    /// Database connectivity or write failure.
    Database,
    /// Metrics collector could not be reached.
    MetricsTransport,
    /// Deliberately triggered application failure.
    Simulated,
    /// Lifecycle hooks were misregistered.
    HookMisuse,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::Database => "DATABASE",
            ClientCode::MetricsTransport => "METRICS_TRANSPORT",
            ClientCode::Simulated => "SIMULATED",
            ClientCode::HookMisuse => "HOOK_MISUSE",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, DemoError>;

/// Unified error type used by core and app.
#[derive(Debug, Error)]
pub enum DemoError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("database: {0}")]
    Database(String),
    #[error("metrics transport: {0}")]
    MetricsTransport(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("{0}")]
    Simulated(String),
    #[error("stop_timer ran without a prior start_timer")]
    TimerNotStarted,
    #[error("internal: {0}")]
    Internal(String),
}

impl DemoError {
    /// Map an error to its stable code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            DemoError::BadRequest(_) => ClientCode::BadRequest,
            DemoError::Database(_) => ClientCode::Database,
            DemoError::MetricsTransport(_) => ClientCode::MetricsTransport,
            DemoError::DivisionByZero | DemoError::Simulated(_) => ClientCode::Simulated,
            DemoError::TimerNotStarted => ClientCode::HookMisuse,
            DemoError::Internal(_) => ClientCode::Internal,
        }
    }
}
