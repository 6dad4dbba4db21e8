//! Request lifecycle: timer and metric hooks around every handler, plus
//! per-request connection teardown.

pub mod hooks;
pub mod middleware;

pub use hooks::{
    record_request_data, setup_metrics, start_timer, stop_timer, AfterRequest, BeforeRequest,
    LifecycleHooks,
};
pub use middleware::request_lifecycle;
