//! # ubs-diag-ports
//!
//! Port traits for the ubs-diag hexagonal architecture.
//!
//! This crate defines the interfaces between the application and
//! infrastructure layers. It depends only on `shared`.

/// Returns the ports crate version.
#[must_use]
pub const fn ports_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub mod logger;
pub mod storage;

pub use logger::*;
pub use storage::*;
