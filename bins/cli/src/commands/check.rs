//! Single-value checks: CPF, password policy, and injection markers.
//!
//! A failed check is a verdict, not an error: the payload reports it with
//! `status: ok` and the process exits with `2`.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, render_payload};
use serde_json::{Value, json};
use std::io::Read;
use ubs_diag_domain::{Cpf, RiskReport, password_error_message, password_violations};

/// Verify a CPF and print its canonical form.
pub fn run_check_cpf(mode: OutputMode, value: &str) -> Result<CliOutput, CliError> {
    let verdict = Cpf::parse(value);
    let valid = verdict.is_ok();

    let stdout = if mode.is_json() || mode.is_ndjson() {
        let payload = match &verdict {
            Ok(cpf) => json!({
                "status": "ok",
                "valid": true,
                "formatted": cpf.formatted(),
                "digits": cpf.digits(),
            }),
            Err(reason) => json!({
                "status": "ok",
                "valid": false,
                "reason": reason.to_string(),
            }),
        };
        render_payload(mode, "cpf", payload)?
    } else {
        match &verdict {
            Ok(cpf) => format!("status: ok\nvalid: true\nformatted: {}\n", cpf.formatted()),
            Err(reason) => format!("status: ok\nvalid: false\nreason: {reason}\n"),
        }
    };

    Ok(verdict_output(stdout, valid))
}

/// List the password requirements a value misses.
pub fn run_check_password(mode: OutputMode, password: &str) -> Result<CliOutput, CliError> {
    let violations = password_violations(password);
    let valid = violations.is_empty();

    let stdout = if mode.is_json() || mode.is_ndjson() {
        let items: Vec<Value> = violations
            .iter()
            .map(|requirement| {
                json!({
                    "requirement": requirement,
                    "message": requirement.message(),
                })
            })
            .collect();
        let payload = json!({
            "status": "ok",
            "valid": valid,
            "violations": items,
            "message": password_error_message(&violations),
        });
        render_payload(mode, "password", payload)?
    } else {
        let mut out = format!("status: ok\nvalid: {valid}\n");
        if !valid {
            out.push_str("violations:\n");
            for requirement in &violations {
                out.push_str("  - ");
                out.push_str(requirement.message());
                out.push('\n');
            }
        }
        out
    };

    Ok(verdict_output(stdout, valid))
}

/// Report SQL and script markers found in a value.
pub fn run_check_text(mode: OutputMode, text: &str) -> Result<CliOutput, CliError> {
    let report = RiskReport::scan(text);
    let suspicious = report.is_suspicious();

    let stdout = if mode.is_json() || mode.is_ndjson() {
        let payload = json!({
            "status": "ok",
            "suspicious": suspicious,
            "risk": report,
        });
        render_payload(mode, "text", payload)?
    } else {
        format!(
            "status: ok\nsuspicious: {suspicious}\nsql: {}\nxss: {}\n",
            report.sql, report.xss
        )
    };

    Ok(verdict_output(stdout, !suspicious))
}

/// Resolve the password from the argument or stdin.
///
/// Only the trailing line break is stripped from stdin; surrounding spaces
/// are part of the password.
pub fn resolve_password(from_stdin: bool, value: Option<&str>) -> Result<String, CliError> {
    if from_stdin {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(CliError::Stdin)?;
        return Ok(strip_line_break(&buf).to_string());
    }
    value
        .map(str::to_owned)
        .ok_or(CliError::MissingInput("password or --stdin"))
}

fn strip_line_break(input: &str) -> &str {
    input
        .strip_suffix("\r\n")
        .or_else(|| input.strip_suffix('\n'))
        .unwrap_or(input)
}

const fn verdict_output(stdout: String, passed: bool) -> CliOutput {
    CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: if passed {
            ExitCode::Ok
        } else {
            ExitCode::InvalidInput
        },
    }
}
