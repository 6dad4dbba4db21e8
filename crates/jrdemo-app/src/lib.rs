//! jrdemo web application library.
//!
//! An instrumented demo service: every request is timed and counted to a
//! DogStatsD agent, scraped metrics are served at `/metrics`, and handlers
//! log one row per request to Postgres on a per-request connection.
//!
//! Panics, `unwrap`, and `expect` are compile-denied outside tests; handler
//! panics are still caught by the 500 backstop.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod app_state;
pub mod config;
pub mod context;
pub mod error;
pub mod lifecycle;
pub mod logger;
pub mod obs;
pub mod ops;
pub mod router;
pub mod routes;
pub mod store;
