//! Output format helpers for CLI commands.

use crate::CliOutput;
use crate::error::ExitCode;
use clap::{Args, ValueEnum};
use serde_json::{Map, Value};
use ubs_diag_shared::{ErrorEnvelope, REDACTED, is_secret_key};

/// Output format choices for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-friendly text output.
    Text,
    /// Machine-friendly JSON output.
    Json,
    /// Line-delimited JSON (NDJSON) output.
    Ndjson,
}

/// Output-related CLI flags.
#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Output format for command responses.
    #[arg(long, global = true, value_enum)]
    pub output: Option<OutputFormat>,
    /// Suppress progress and log output on stderr.
    #[arg(long, global = true)]
    pub no_progress: bool,
}

/// Output mode derived from CLI flags.
#[derive(Debug, Clone, Copy)]
pub struct OutputMode {
    pub format: OutputFormat,
    pub no_progress: bool,
}

impl OutputMode {
    /// Build output mode from CLI flags.
    #[must_use]
    pub const fn from_args(args: &OutputArgs) -> Self {
        let format = match args.output {
            Some(value) => value,
            None => OutputFormat::Text,
        };
        Self {
            format,
            no_progress: args.no_progress,
        }
    }

    /// Returns true when JSON output is requested.
    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Returns true when NDJSON output is requested.
    #[must_use]
    pub const fn is_ndjson(self) -> bool {
        matches!(self.format, OutputFormat::Ndjson)
    }
}

/// Render a payload for the selected machine format.
///
/// JSON output is pretty-printed; NDJSON output is one `summary` line with
/// `kind` and the payload fields merged in.
pub fn render_payload(mode: OutputMode, kind: &str, payload: Value) -> Result<String, serde_json::Error> {
    let mut output = if mode.is_ndjson() {
        let mut line = Map::new();
        line.insert("type".to_string(), Value::String("summary".to_string()));
        line.insert("kind".to_string(), Value::String(kind.to_string()));
        if let Value::Object(fields) = payload {
            line.extend(fields);
        }
        serde_json::to_string(&Value::Object(line))?
    } else {
        serde_json::to_string_pretty(&payload)?
    };
    output.push('\n');
    Ok(output)
}

/// Error payload with secret-looking metadata masked.
#[must_use]
pub fn error_payload(error: &ErrorEnvelope) -> Value {
    let meta: Map<String, Value> = error
        .metadata
        .iter()
        .map(|(key, value)| {
            let value = if is_secret_key(key) {
                REDACTED.to_string()
            } else {
                value.clone()
            };
            (key.clone(), Value::String(value))
        })
        .collect();

    let mut body = Map::new();
    body.insert("code".to_string(), Value::String(error.code.to_string()));
    body.insert("message".to_string(), Value::String(error.message.clone()));
    body.insert("kind".to_string(), Value::String(error.kind.to_string()));
    if !meta.is_empty() {
        body.insert("meta".to_string(), Value::Object(meta));
    }
    Value::Object(body)
}

/// Render an envelope as a failed command result.
pub fn format_error_output(mode: OutputMode, error: &ErrorEnvelope) -> CliOutput {
    let payload = error_payload(error);

    let mut stderr = String::new();
    log_info(&mut stderr, "command failed", mode.no_progress);

    let stdout = if mode.is_ndjson() {
        let line = serde_json::json!({
            "type": "error",
            "status": "error",
            "error": payload,
        });
        let mut out = serde_json::to_string(&line).unwrap_or_else(|_| {
            "{\"type\":\"error\",\"status\":\"error\",\"error\":{\"code\":\"core:internal\",\"message\":\"internal error\",\"kind\":\"invariant\"}}".to_string()
        });
        out.push('\n');
        out
    } else if mode.is_json() {
        let body = serde_json::json!({
            "status": "error",
            "error": payload,
        });
        // This is a CLI boundary, so JSON serialization errors are internal.
        let mut out = serde_json::to_string_pretty(&body).unwrap_or_else(|_| {
            "{\"status\":\"error\",\"error\":{\"code\":\"core:internal\",\"message\":\"internal error\",\"kind\":\"invariant\"}}".to_string()
        });
        out.push('\n');
        out
    } else {
        format_error_text(&payload)
    };

    CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::for_envelope(error),
    }
}

fn format_error_text(payload: &Value) -> String {
    let field = |name: &str| {
        payload
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let mut out = String::new();
    out.push_str("status: error\n");
    out.push_str(&format!("code: {}\n", field("code")));
    out.push_str(&format!("message: {}\n", field("message")));
    out.push_str(&format!("kind: {}\n", field("kind")));

    if let Some(meta) = payload.get("meta").and_then(Value::as_object)
        && !meta.is_empty()
    {
        out.push_str("meta:\n");
        for (key, value) in meta {
            out.push_str("  ");
            out.push_str(key);
            out.push_str(": ");
            out.push_str(value.as_str().unwrap_or_default());
            out.push('\n');
        }
    }

    out
}

/// Append a progress line to `stderr` unless progress is suppressed.
pub fn log_info(stderr: &mut String, message: &str, no_progress: bool) {
    if no_progress {
        return;
    }
    stderr.push_str("info: ");
    stderr.push_str(message);
    stderr.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use ubs_diag_shared::ErrorCode;

    fn mode(format: OutputFormat) -> OutputMode {
        OutputMode {
            format,
            no_progress: true,
        }
    }

    #[test]
    fn ndjson_payload_is_one_summary_line() -> Result<(), Box<dyn std::error::Error>> {
        let out = render_payload(
            mode(OutputFormat::Ndjson),
            "cpf",
            serde_json::json!({"status": "ok", "valid": true}),
        )?;
        assert_eq!(out.lines().count(), 1);
        let value: Value = serde_json::from_str(out.trim())?;
        assert_eq!(value["type"], "summary");
        assert_eq!(value["kind"], "cpf");
        assert_eq!(value["valid"], true);
        Ok(())
    }

    #[test]
    fn error_output_masks_secret_metadata() -> Result<(), Box<dyn std::error::Error>> {
        let mut error = ErrorEnvelope::expected(ErrorCode::new("request", "invalid_json"), "bad");
        error
            .metadata
            .insert("senha".to_string(), "Segura123".to_string());
        let output = format_error_output(mode(OutputFormat::Json), &error);
        assert_eq!(output.exit_code, ExitCode::InvalidInput);
        assert!(!output.stdout.contains("Segura123"));
        let value: Value = serde_json::from_str(output.stdout.trim())?;
        assert_eq!(value["error"]["code"], "request:invalid_json");
        assert_eq!(value["error"]["meta"]["senha"], REDACTED);
        Ok(())
    }

    #[test]
    fn text_error_lists_metadata() {
        let error = ErrorEnvelope::expected(ErrorCode::new("config", "invalid_base_url"), "bad url")
            .with_metadata("value", "localhost");
        let output = format_error_output(mode(OutputFormat::Text), &error);
        assert!(output.stdout.starts_with("status: error\ncode: config:invalid_base_url\n"));
        assert!(output.stdout.contains("  value: localhost\n"));
    }

    #[test]
    fn log_info_respects_no_progress() {
        let mut stderr = String::new();
        log_info(&mut stderr, "hidden", true);
        assert!(stderr.is_empty());
        log_info(&mut stderr, "shown", false);
        assert_eq!(stderr, "info: shown\n");
    }
}
