//! Submission readiness through the CLI.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn run_cli(args: &[&str]) -> io::Result<Output> {
    let mut command = Command::new(env!("CARGO_BIN_EXE_ubs-diag"));
    command.args(args).env_remove("RUST_LOG");
    for (key, _) in std::env::vars() {
        if key.starts_with("UBS_DIAG_") || key == "VITE_API_BASE_URL" {
            command.env_remove(key);
        }
    }
    command.output()
}

fn fixture_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(Path::parent)
        .map_or_else(|| manifest_dir.to_path_buf(), Path::to_path_buf)
        .join("crates")
        .join("config")
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn snapshot_fixture_reports_range_and_needs() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = fixture_path("submission.snapshot.json");
    let fixture = fixture.to_string_lossy();
    let output = run_cli(&[
        "validate",
        "submission",
        "--file",
        fixture.as_ref(),
        "--output",
        "json",
    ])?;
    assert_eq!(output.status.code(), Some(2));

    let value: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim())?;
    assert_eq!(value["ready"], false);
    let issues: Vec<(String, String)> = value["issues"]
        .as_array()
        .ok_or("issues must be an array")?
        .iter()
        .map(|issue| {
            (
                issue["field"].as_str().unwrap_or_default().to_string(),
                issue["code"].as_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    assert_eq!(
        issues,
        [
            ("numero_domicilios".to_string(), "range".to_string()),
            (
                "needs.problemas_identificados".to_string(),
                "required".to_string()
            ),
        ]
    );
    Ok(())
}

#[test]
fn empty_snapshot_lists_every_required_field() -> Result<(), Box<dyn std::error::Error>> {
    let output = run_cli(&["validate", "submission", "--input-json", "{}", "--output", "ndjson"])?;
    assert_eq!(output.status.code(), Some(2));
    let line = String::from_utf8_lossy(&output.stdout);
    assert_eq!(line.lines().count(), 1);
    let value: serde_json::Value = serde_json::from_str(line.trim())?;
    assert_eq!(value["type"], "summary");
    assert_eq!(value["issues"].as_array().map(Vec::len), Some(9));
    Ok(())
}

#[test]
fn invalid_date_is_a_request_error() -> Result<(), Box<dyn std::error::Error>> {
    let output = run_cli(&[
        "validate",
        "submission",
        "--input-json",
        r#"{"data_inauguracao":"2023-02-30"}"#,
    ])?;
    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("status: error\n"));
    assert!(stdout.contains("code: request:invalid_date"));
    assert!(stdout.contains("field: data_inauguracao"));
    Ok(())
}
