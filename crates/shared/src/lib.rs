//! # ubs-diag-shared
//!
//! Foundational types used by every other crate in the workspace:
//!
//! - [`ErrorEnvelope`] and its code/kind/class vocabulary
//! - the [`Result`] alias
//! - secret detection and the [`SecretString`] wrapper
//!
//! ## Design Principles
//!
//! 1. **No workspace dependencies** - only external crates
//! 2. **Serde-compatible** - public types serialize for CLI and log output

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod errors;
pub mod redaction;
pub mod result;

pub use errors::{ErrorClass, ErrorCode, ErrorEnvelope, ErrorKind, ErrorMetadata};
pub use redaction::{REDACTED, SecretString, is_secret_key};
pub use result::Result;

/// Returns the shared crate version.
#[must_use]
pub const fn shared_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_types_are_reexported() {
        let error = ErrorEnvelope::expected(ErrorCode::invalid_input(), "invalid");
        let result: Result<()> = Err(error);
        assert!(matches!(result, Err(ref e) if e.kind == ErrorKind::Expected));
        assert!(!shared_crate_version().is_empty());
    }
}
