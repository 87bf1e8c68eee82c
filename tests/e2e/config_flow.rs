//! Config loading through the CLI.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn run_cli(args: &[&str], env: &[(&str, &str)]) -> io::Result<Output> {
    let mut command = Command::new(env!("CARGO_BIN_EXE_ubs-diag"));
    command.args(args).env_remove("RUST_LOG");
    for (key, _) in std::env::vars() {
        if key.starts_with("UBS_DIAG_") || key == "VITE_API_BASE_URL" {
            command.env_remove(key);
        }
    }
    for (key, value) in env {
        command.env(key, value);
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

fn effective_config(output: &Output) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let value: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim())?;
    Ok(value["effectiveConfig"].clone())
}

#[test]
fn defaults_apply_without_file_or_env() -> Result<(), Box<dyn std::error::Error>> {
    let output = run_cli(&["config", "show", "--output", "json"], &[])?;
    assert_eq!(output.status.code(), Some(0));
    let config = effective_config(&output)?;
    assert_eq!(config["api"]["baseUrl"], "http://localhost:8000");
    assert_eq!(config["logging"]["level"], "info");
    Ok(())
}

#[test]
fn toml_file_is_normalized_and_env_wins() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = fixture_path("client.valid.toml");
    let fixture = fixture.to_string_lossy();
    let args = ["config", "show", "--config", fixture.as_ref(), "--output", "json"];

    let from_file = run_cli(&args, &[])?;
    assert_eq!(from_file.status.code(), Some(0));
    let config = effective_config(&from_file)?;
    assert_eq!(config["api"]["baseUrl"], "https://diagnostico.ubs.example/api");
    assert_eq!(config["logging"]["format"], "json");

    let from_env = run_cli(
        &args,
        &[("VITE_API_BASE_URL", "https://staging.ubs.example")],
    )?;
    let config = effective_config(&from_env)?;
    assert_eq!(config["api"]["baseUrl"], "https://staging.ubs.example");
    Ok(())
}

#[test]
fn invalid_base_url_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = fixture_path("client.invalid-url.json");
    let fixture = fixture.to_string_lossy();
    let output = run_cli(&["config", "show", "--config", fixture.as_ref()], &[])?;
    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("status: error\n"));
    assert!(stdout.contains("code: config:"));
    Ok(())
}

#[test]
fn schema_command_prints_request_schema() -> Result<(), Box<dyn std::error::Error>> {
    let output = run_cli(&["config", "schema", "submission"], &[])?;
    assert_eq!(output.status.code(), Some(0));
    let schema: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim())?;
    assert!(schema["properties"].get("numero_domicilios").is_some());
    Ok(())
}
