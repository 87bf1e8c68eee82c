//! Submission-readiness check for a diagnosis report.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use ubs_diag_domain::{DiagnosisDraft, ReportStatus, SubmissionIssue, validate_before_submit};
use ubs_diag_ports::{LogFields, LoggerPort};

/// Dependencies required by the submission check.
#[derive(Clone, Default)]
pub struct CheckSubmissionDeps {
    /// Optional logger.
    pub logger: Option<Arc<dyn LoggerPort>>,
}

/// Outcome of checking one draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionCheck {
    /// True when nothing blocks submission.
    pub ready: bool,
    /// Blocking issues in rule order.
    pub issues: Vec<SubmissionIssue>,
}

/// Check a draft without changing it.
#[tracing::instrument(level = "debug", name = "check_submission", skip_all)]
pub fn check_submission(deps: &CheckSubmissionDeps, draft: &DiagnosisDraft) -> SubmissionCheck {
    let issues = validate_before_submit(draft);
    log_checked(deps, &issues);
    SubmissionCheck {
        ready: issues.is_empty(),
        issues,
    }
}

/// Check a draft and move it to `Submitted` when it passes.
#[tracing::instrument(level = "debug", name = "submit_draft", skip_all)]
pub fn submit_draft(
    deps: &CheckSubmissionDeps,
    draft: &mut DiagnosisDraft,
) -> Result<ReportStatus, Vec<SubmissionIssue>> {
    let outcome = draft.submit();
    match &outcome {
        Ok(status) => {
            log_checked(deps, &[]);
            if let Some(logger) = deps.logger.as_ref() {
                let mut fields = LogFields::new();
                fields.insert("status".into(), Value::String(status.as_str().to_owned()));
                logger.info("submission.submitted", "Report submitted", Some(fields));
            }
        },
        Err(issues) => log_checked(deps, issues),
    }
    outcome
}

fn log_checked(deps: &CheckSubmissionDeps, issues: &[SubmissionIssue]) {
    let Some(logger) = deps.logger.as_ref() else {
        return;
    };
    let mut fields = LogFields::new();
    fields.insert("issueCount".into(), Value::from(issues.len()));
    fields.insert(
        "fields".into(),
        Value::Array(
            issues
                .iter()
                .map(|issue| Value::String(issue.field.clone()))
                .collect(),
        ),
    );
    if issues.is_empty() {
        logger.info("submission.checked", "Report is ready to submit", Some(fields));
    } else {
        logger.warn("submission.checked", "Report has blocking issues", Some(fields));
    }
}
