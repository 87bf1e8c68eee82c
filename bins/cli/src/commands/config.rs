//! Config inspection commands.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, format_error_output, log_info, render_payload};
use std::path::Path;
use ubs_diag_config::{
    ClientConfig, registration_request_schema, submission_request_schema, to_pretty_json,
};

/// Request payload whose JSON Schema can be printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SchemaKind {
    /// Registration form payload.
    Registration,
    /// Report snapshot checked before submission.
    Submission,
}

impl SchemaKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Registration => "registration",
            Self::Submission => "submission",
        }
    }
}

/// Show the effective config after defaults, file, and env are merged.
pub fn run_config_show(
    mode: OutputMode,
    path: Option<&Path>,
    config: &ClientConfig,
) -> Result<CliOutput, CliError> {
    let config_json = match to_pretty_json(config) {
        Ok(json) => json,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let mut stderr = String::new();
    log_info(&mut stderr, "config show completed", mode.no_progress);

    let stdout = if mode.is_json() || mode.is_ndjson() {
        let config_value: serde_json::Value = serde_json::from_str(config_json.trim())?;
        let payload = serde_json::json!({
            "status": "ok",
            "configPath": path.map(|value| value.to_string_lossy().to_string()),
            "effectiveConfig": config_value,
        });
        render_payload(mode, "config", payload)?
    } else {
        let mut out = String::new();
        out.push_str("status: ok\nconfig:\n");
        out.push_str(&config_json);
        out
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

/// Print the JSON Schema of a request payload.
pub fn run_config_schema(mode: OutputMode, kind: SchemaKind) -> Result<CliOutput, CliError> {
    let schema = match kind {
        SchemaKind::Registration => registration_request_schema(),
        SchemaKind::Submission => submission_request_schema(),
    }
    .to_value();

    let stdout = if mode.is_ndjson() {
        let payload = serde_json::json!({
            "status": "ok",
            "request": kind.as_str(),
            "schema": schema,
        });
        render_payload(mode, "schema", payload)?
    } else {
        let mut out = serde_json::to_string_pretty(&schema)?;
        out.push('\n');
        out
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}
