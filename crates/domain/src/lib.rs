//! # ubs-diag-domain
//!
//! Validation rules and value objects for the UBS diagnosis client.
//!
//! - **Injection** - `is_sql_risk`, `is_xss_risk`, `RiskReport`
//! - **CPF** - `Cpf`, `is_valid_cpf`
//! - **Password** - `password_violations`, `PasswordRequirement`
//! - **Registration** - `validate_registration`, `ValidationErrors`
//! - **Submission** - `validate_before_submit`, `DiagnosisDraft`, `ReportStatus`
//! - **User** - `CurrentUser`, `Role`, `LoginResponse`
//!
//! ## Dependency Rules
//!
//! - Depends only on `shared` crate
//! - No infrastructure or adapter dependencies
//! - Pure domain logic with no I/O

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub use ubs_diag_shared::shared_crate_version;

// =============================================================================
// DOMAIN MODULES
// =============================================================================

pub mod cpf;
pub mod injection;
pub mod password;
pub mod registration;
pub mod submission;
pub mod user;

pub use cpf::{CPF_DIGITS, Cpf, CpfError, is_valid_cpf};
pub use injection::{RiskReport, SQL_RISK_MARKERS, XSS_RISK_MARKERS, is_sql_risk, is_xss_risk};
pub use password::{
    MIN_PASSWORD_LENGTH, PasswordRequirement, password_error_message, password_violations,
};
pub use registration::{
    RegistrationField, RegistrationForm, ValidationErrors, validate_registration,
};
pub use submission::{
    CalendarDate, DateParseError, DiagnosisDraft, IssueCode, ReportStatus, SubmissionIssue,
    TerritoryProfile, UbsNeeds, validate_before_submit,
};
pub use user::{CurrentUser, LoginResponse, Role};

/// Returns the domain crate version.
#[must_use]
pub const fn domain_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// =============================================================================
// TESTS
// =============================================================================
