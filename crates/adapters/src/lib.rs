//! # ubs-diag-adapters
//!
//! Adapter implementations for ports (key-value storage, logging).
//! This crate depends on `ports` and `shared`.

pub mod file_store;
pub mod logger;
pub mod memory_store;

pub use file_store::FileKeyValueStore;
pub use logger::TracingLogger;
pub use memory_store::InMemoryKeyValueStore;

/// Returns the adapters crate version.
#[must_use]
pub const fn adapters_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
