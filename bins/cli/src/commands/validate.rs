//! Request validation commands.
//!
//! Payload shape problems (bad JSON, wrong types, unparseable dates) are
//! rendered as errors. Rule failures are rendered as results with exit `2`.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, format_error_output, log_info, render_payload};
use serde_json::{Map, Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use ubs_diag_adapters::TracingLogger;
use ubs_diag_app::{CheckSubmissionDeps, RegisterUserDeps, check_submission, register_user};
use ubs_diag_config::{parse_registration_request_json, parse_submission_request_json};
use ubs_diag_domain::ValidationErrors;
use ubs_diag_shared::{ErrorEnvelope, Result as SharedResult};

/// Where a request payload comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidateInput {
    /// Inline JSON text.
    Json(String),
    /// Path to a JSON file.
    File(PathBuf),
}

impl ValidateInput {
    fn read(&self) -> SharedResult<String> {
        match self {
            Self::Json(text) => Ok(text.clone()),
            Self::File(path) => std::fs::read_to_string(path).map_err(|error| {
                ErrorEnvelope::from(error).with_metadata("path", path.display().to_string())
            }),
        }
    }
}

/// Validate a registration payload.
pub fn run_validate_registration(
    mode: OutputMode,
    input: &ValidateInput,
) -> Result<CliOutput, CliError> {
    let form = match input.read().and_then(|text| parse_registration_request_json(&text)) {
        Ok(form) => form,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let deps = RegisterUserDeps {
        logger: Some(Arc::new(TracingLogger::new())),
    };
    let errors = register_user(&deps, form).err().unwrap_or_default();
    let valid = errors.is_empty();

    let mut stderr = String::new();
    log_info(&mut stderr, "registration validation completed", mode.no_progress);

    let stdout = if mode.is_json() || mode.is_ndjson() {
        let payload = json!({
            "status": "ok",
            "valid": valid,
            "errors": errors_object(&errors),
        });
        render_payload(mode, "registration", payload)?
    } else {
        let mut out = format!("status: ok\nvalid: {valid}\n");
        if !valid {
            out.push_str("errors:\n");
            for (field, message) in &errors {
                out.push_str(&format!("  {field}: {message}\n"));
            }
        }
        out
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: if valid {
            ExitCode::Ok
        } else {
            ExitCode::InvalidInput
        },
    })
}

/// Check a report snapshot for submission readiness.
pub fn run_validate_submission(
    mode: OutputMode,
    input: &ValidateInput,
) -> Result<CliOutput, CliError> {
    let draft = match input.read().and_then(|text| parse_submission_request_json(&text)) {
        Ok(draft) => draft,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let deps = CheckSubmissionDeps {
        logger: Some(Arc::new(TracingLogger::new())),
    };
    let check = check_submission(&deps, &draft);

    let mut stderr = String::new();
    log_info(&mut stderr, "submission check completed", mode.no_progress);

    let stdout = if mode.is_json() || mode.is_ndjson() {
        let payload = json!({
            "status": "ok",
            "ready": check.ready,
            "issues": check.issues,
        });
        render_payload(mode, "submission", payload)?
    } else {
        let mut out = format!("status: ok\nready: {}\n", check.ready);
        if !check.ready {
            out.push_str("issues:\n");
            for issue in &check.issues {
                out.push_str(&format!(
                    "  - {} [{}]: {}\n",
                    issue.field, issue.code, issue.message
                ));
            }
        }
        out
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: if check.ready {
            ExitCode::Ok
        } else {
            ExitCode::InvalidInput
        },
    })
}

fn errors_object(errors: &ValidationErrors) -> Value {
    let map: Map<String, Value> = errors
        .iter()
        .map(|(field, message)| (field.wire_name().to_string(), Value::String(message.clone())))
        .collect();
    Value::Object(map)
}
