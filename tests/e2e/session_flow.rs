//! Session inspection and logout through the CLI.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};
use ubs_diag_adapters::FileKeyValueStore;
use ubs_diag_ports::KeyValueStore;

fn run_cli_with_session(session_path: &Path, args: &[&str]) -> io::Result<Output> {
    let mut command = Command::new(env!("CARGO_BIN_EXE_ubs-diag"));
    command.args(args).env_remove("RUST_LOG");
    for (key, _) in std::env::vars() {
        if key.starts_with("UBS_DIAG_") || key == "VITE_API_BASE_URL" {
            command.env_remove(key);
        }
    }
    command.env("UBS_DIAG_SESSION_PATH", session_path);
    command.output()
}

fn temp_session_path(label: &str) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_nanos())
        .unwrap_or_default();
    std::env::temp_dir()
        .join(format!("ubs-diag-e2e-{label}-{unique}"))
        .join("session.json")
}

#[test]
fn show_reports_user_without_leaking_token() -> Result<(), Box<dyn std::error::Error>> {
    let path = temp_session_path("show");
    let store = FileKeyValueStore::new(&path);
    store.set("access_token", "secret-bearer-value")?;
    store.set(
        "current_user",
        r#"{"id":5,"nome":"Ana Lima","email":"ana@ubs.gov.br","is_profissional":false}"#,
    )?;

    let output = run_cli_with_session(&path, &["session", "show", "--output", "json"])?;
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("secret-bearer-value"));

    let value: serde_json::Value = serde_json::from_str(stdout.trim())?;
    assert_eq!(value["session"]["authenticated"], true);
    assert_eq!(value["session"]["role"], "usuario");
    assert_eq!(value["session"]["user"]["nome"], "Ana Lima");

    let _ = std::fs::remove_dir_all(path.parent().unwrap_or(&path));
    Ok(())
}

#[test]
fn logout_empties_the_store() -> Result<(), Box<dyn std::error::Error>> {
    let path = temp_session_path("logout");
    let store = FileKeyValueStore::new(&path);
    store.set("access_token", "tok")?;
    store.set("current_user", r#"{"nome":"Ana"}"#)?;

    let output = run_cli_with_session(&path, &["session", "logout", "--no-progress"])?;
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(store.get("access_token")?, None);
    assert_eq!(store.get("current_user")?, None);

    let after = run_cli_with_session(&path, &["session", "show"])?;
    assert!(String::from_utf8_lossy(&after.stdout).contains("authenticated: false"));

    let _ = std::fs::remove_dir_all(path.parent().unwrap_or(&path));
    Ok(())
}

#[test]
fn missing_session_file_means_no_session() -> Result<(), Box<dyn std::error::Error>> {
    let path = temp_session_path("missing");
    let output = run_cli_with_session(&path, &["session", "show", "--output", "ndjson"])?;
    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim())?;
    assert_eq!(value["session"]["authenticated"], false);
    assert!(!path.exists());
    Ok(())
}

#[test]
fn logout_on_a_missing_store_creates_no_files() -> Result<(), Box<dyn std::error::Error>> {
    let path = temp_session_path("logout-missing");
    let output = run_cli_with_session(&path, &["session", "logout", "--no-progress"])?;
    let created = path.parent().is_some_and(Path::exists);
    let _ = std::fs::remove_dir_all(path.parent().unwrap_or(&path));

    assert_eq!(output.status.code(), Some(0));
    assert!(!created, "logout must not create the session directory");
    Ok(())
}
