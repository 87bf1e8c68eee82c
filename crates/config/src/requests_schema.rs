//! JSON Schema exports for request DTOs.

use crate::{RegistrationRequestDto, SubmissionRequestDto};
use schemars::{Schema, schema_for};

/// JSON Schema for `RegistrationRequestDto`.
#[must_use]
pub fn registration_request_schema() -> Schema {
    schema_for!(RegistrationRequestDto)
}

/// JSON Schema for `SubmissionRequestDto`.
#[must_use]
pub fn submission_request_schema() -> Schema {
    schema_for!(SubmissionRequestDto)
}
