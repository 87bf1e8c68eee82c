//! Validate a registration form before it is sent to the backend.

use serde_json::Value;
use std::sync::Arc;
use ubs_diag_domain::{RegistrationForm, ValidationErrors, validate_registration};
use ubs_diag_ports::{LogFields, LoggerPort};

/// Dependencies required by registration.
#[derive(Clone, Default)]
pub struct RegisterUserDeps {
    /// Optional logger.
    pub logger: Option<Arc<dyn LoggerPort>>,
}

/// Run every registration rule.
///
/// Returns the form unchanged when it is ready to send, or the full error
/// map otherwise. Only failing field names are logged, never values.
#[tracing::instrument(level = "debug", name = "register_user", skip_all)]
pub fn register_user(
    deps: &RegisterUserDeps,
    form: RegistrationForm,
) -> Result<RegistrationForm, ValidationErrors> {
    let errors = validate_registration(&form);

    if let Some(logger) = deps.logger.as_ref() {
        let fields = log_fields(&errors);
        if errors.is_empty() {
            logger.info("registration.validated", "Registration form is valid", Some(fields));
        } else {
            logger.warn(
                "registration.validated",
                "Registration form has errors",
                Some(fields),
            );
        }
    }

    if errors.is_empty() {
        Ok(form)
    } else {
        Err(errors)
    }
}

fn log_fields(errors: &ValidationErrors) -> LogFields {
    let failed: Vec<Value> = errors
        .fields()
        .map(|field| Value::String(field.wire_name().to_owned()))
        .collect();
    let mut fields = LogFields::new();
    fields.insert("valid".into(), Value::Bool(errors.is_empty()));
    fields.insert("failedFields".into(), Value::Array(failed));
    fields
}
