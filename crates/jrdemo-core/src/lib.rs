//! jrdemo core: runtime-free primitives shared by the web application.
//!
//! This crate defines the error surface, the metric sample wire model, and the
//! persisted log row. It intentionally carries no transport or runtime
//! dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod record;
pub mod sample;

/// Error type and crate-wide result alias.
pub use error::{DemoError, Result};
pub use record::LogRow;
pub use sample::{MetricSample, RequestTags, SampleKind};
