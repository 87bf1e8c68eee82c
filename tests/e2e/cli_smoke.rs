//! CLI smoke tests: info, version, and single-value checks.

use std::io;
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

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn info_json_is_deterministic() -> Result<(), Box<dyn std::error::Error>> {
    let first = run_cli(&["info", "--output", "json"])?;
    let second = run_cli(&["info", "--output", "json"])?;
    assert!(first.status.success());
    assert_eq!(stdout_of(&first), stdout_of(&second));

    let value: serde_json::Value = serde_json::from_str(stdout_of(&first).trim())?;
    assert_eq!(value["status"], "ok");
    assert!(value["build"]["version"].as_str().is_some_and(|v| !v.is_empty()));
    Ok(())
}

#[test]
fn version_flag_prints_binary_name() -> Result<(), Box<dyn std::error::Error>> {
    let output = run_cli(&["--version"])?;
    assert!(output.status.success());
    assert!(stdout_of(&output).starts_with("ubs-diag "));
    Ok(())
}

#[test]
fn cpf_check_exit_codes() -> Result<(), Box<dyn std::error::Error>> {
    let valid = run_cli(&["check", "cpf", "52998224725"])?;
    assert_eq!(valid.status.code(), Some(0));
    assert!(stdout_of(&valid).contains("formatted: 529.982.247-25"));

    let zeros = run_cli(&["check", "cpf", "00000000000"])?;
    assert_eq!(zeros.status.code(), Some(2));
    assert!(stdout_of(&zeros).contains("valid: false"));
    Ok(())
}

#[test]
fn password_check_reads_stdin() -> Result<(), Box<dyn std::error::Error>> {
    use std::io::Write;
    use std::process::Stdio;

    let mut child = Command::new(env!("CARGO_BIN_EXE_ubs-diag"))
        .args(["check", "password", "--stdin", "--output", "ndjson"])
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(b"Abcdefg1\n")?;
    }
    let output = child.wait_with_output()?;
    assert_eq!(output.status.code(), Some(0));

    let line = stdout_of(&output);
    assert_eq!(line.lines().count(), 1);
    let value: serde_json::Value = serde_json::from_str(line.trim())?;
    assert_eq!(value["kind"], "password");
    assert_eq!(value["valid"], true);
    Ok(())
}

#[test]
fn text_check_flags_sql_keywords_case_insensitively() -> Result<(), Box<dyn std::error::Error>> {
    let risky = run_cli(&["check", "text", "SELECT * FROM users", "--output", "json"])?;
    assert_eq!(risky.status.code(), Some(2));
    let value: serde_json::Value = serde_json::from_str(stdout_of(&risky).trim())?;
    assert_eq!(value["risk"]["sql"], true);

    let clean = run_cli(&["check", "text", "Selecionar opção"])?;
    assert_eq!(clean.status.code(), Some(0));
    Ok(())
}
