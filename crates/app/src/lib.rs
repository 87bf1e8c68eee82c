//! # ubs-diag-app
//!
//! Application use cases: registration, submission checks, and the
//! authentication session.
//! This crate depends on `ports`, `domain`, and `shared`.

pub mod registration;
pub mod session;
pub mod submission;

/// Returns the crate version.
#[must_use]
pub const fn app_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub use registration::{RegisterUserDeps, register_user};
pub use session::{
    ACCESS_TOKEN_KEY, AuthSession, CURRENT_USER_KEY, SessionSnapshot, UNAUTHORIZED_STATUS,
};
pub use submission::{CheckSubmissionDeps, SubmissionCheck, check_submission, submit_draft};
