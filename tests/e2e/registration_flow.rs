//! Registration validation through the CLI.

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
fn weak_fixture_fails_every_field_but_security() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = fixture_path("registration.weak.json");
    let fixture = fixture.to_string_lossy();
    let output = run_cli(&[
        "validate",
        "registration",
        "--file",
        fixture.as_ref(),
        "--output",
        "json",
        "--no-progress",
    ])?;
    assert_eq!(output.status.code(), Some(2));

    let value: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim())?;
    assert_eq!(value["valid"], false);
    let errors = value["errors"].as_object().ok_or("errors must be an object")?;
    let mut keys: Vec<&str> = errors.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, ["confirmarSenha", "cpf", "email", "nome", "senha"]);
    Ok(())
}

#[test]
fn valid_registration_exits_zero() -> Result<(), Box<dyn std::error::Error>> {
    let payload = r#"{"nome":"Joana Prado","email":"joana@ubs.gov.br","cpf":"529.982.247-25","senha":"Segura123","confirmarSenha":"Segura123"}"#;
    let output = run_cli(&["validate", "registration", "--input-json", payload])?;
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("valid: true"));
    Ok(())
}

#[test]
fn injection_in_name_reports_security() -> Result<(), Box<dyn std::error::Error>> {
    let payload = r#"{"nome":"Robert DROP table","email":"r@ubs.gov.br","cpf":"529.982.247-25","senha":"Segura123","confirmarSenha":"Segura123"}"#;
    let output = run_cli(&[
        "validate",
        "registration",
        "--input-json",
        payload,
        "--output",
        "json",
    ])?;
    assert_eq!(output.status.code(), Some(2));
    let value: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim())?;
    assert!(value["errors"].get("seguranca").is_some());
    Ok(())
}

#[test]
fn passwords_never_reach_stderr_logs() -> Result<(), Box<dyn std::error::Error>> {
    let payload = r#"{"nome":"Joana Prado","email":"joana@ubs.gov.br","cpf":"529.982.247-25","senha":"Segura123","confirmarSenha":"Outra1234"}"#;
    let output = Command::new(env!("CARGO_BIN_EXE_ubs-diag"))
        .args(["validate", "registration", "--input-json", payload])
        .env("RUST_LOG", "debug")
        .output()?;
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("registration.validated"));
    assert!(!stderr.contains("Segura123"));
    assert!(!stderr.contains("Outra1234"));
    assert!(!stderr.contains("529.982.247-25"));
    Ok(())
}
