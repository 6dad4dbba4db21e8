//! Request-scoped context passed through hooks, handlers, and the logger.

pub mod request;

pub use request::{DbSlot, RequestContext, RequestMeta};
