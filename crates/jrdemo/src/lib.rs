//! Top-level facade crate for jrdemo.
//!
//! Re-exports core types and the web application library so users can depend on a single crate.

pub mod core {
    pub use jrdemo_core::*;
}

pub mod app {
    pub use jrdemo_app::*;
}
