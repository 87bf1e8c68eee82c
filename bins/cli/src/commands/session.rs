//! Session inspection commands.
//!
//! The session lives in the JSON file named by `session.path`. Without a
//! path the store is in-memory, so `show` always reports no session.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, format_error_output, log_info, render_payload};
use std::sync::Arc;
use ubs_diag_adapters::{FileKeyValueStore, InMemoryKeyValueStore, TracingLogger};
use ubs_diag_app::{AuthSession, SessionSnapshot};
use ubs_diag_config::ClientConfig;
use ubs_diag_ports::KeyValueStore;

/// Print what the stored session contains, never the token itself.
pub fn run_session_show(mode: OutputMode, config: &ClientConfig) -> Result<CliOutput, CliError> {
    let session = open_session(config);
    let snapshot = match session.snapshot() {
        Ok(snapshot) => snapshot,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let mut stderr = String::new();
    log_info(&mut stderr, "session loaded", mode.no_progress);

    let stdout = if mode.is_json() || mode.is_ndjson() {
        let payload = serde_json::json!({
            "status": "ok",
            "store": store_label(config),
            "session": snapshot,
        });
        render_payload(mode, "session", payload)?
    } else {
        format_snapshot_text(&snapshot, &store_label(config))
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

/// Remove the stored token and user.
pub fn run_session_logout(mode: OutputMode, config: &ClientConfig) -> Result<CliOutput, CliError> {
    let session = open_session(config);
    if let Err(error) = session.clear() {
        return Ok(format_error_output(mode, &error));
    }

    let mut stderr = String::new();
    log_info(&mut stderr, "session cleared", mode.no_progress);

    let stdout = if mode.is_json() || mode.is_ndjson() {
        let payload = serde_json::json!({
            "status": "ok",
            "store": store_label(config),
            "cleared": true,
        });
        render_payload(mode, "logout", payload)?
    } else {
        "status: ok\ncleared: true\n".to_string()
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

fn open_session(config: &ClientConfig) -> AuthSession<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.session.path.as_ref() {
        Some(path) => Arc::new(FileKeyValueStore::new(path)),
        None => Arc::new(InMemoryKeyValueStore::new()),
    };
    AuthSession::new(store).with_logger(Arc::new(TracingLogger::new()))
}

fn store_label(config: &ClientConfig) -> String {
    config
        .session
        .path
        .as_ref()
        .map_or_else(|| "memory".to_string(), |path| path.display().to_string())
}

fn format_snapshot_text(snapshot: &SessionSnapshot, store: &str) -> String {
    let mut out = format!(
        "status: ok\nstore: {store}\nauthenticated: {}\n",
        snapshot.authenticated
    );
    if let Some(role) = snapshot.role {
        out.push_str(&format!("role: {role}\n"));
    }
    if let Some(user) = snapshot.user.as_ref() {
        if let Some(nome) = user.nome.as_deref() {
            out.push_str(&format!("name: {nome}\n"));
        }
        if let Some(email) = user.email.as_deref() {
            out.push_str(&format!("email: {email}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::OutputFormat;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};
    use ubs_diag_app::{ACCESS_TOKEN_KEY, CURRENT_USER_KEY};

    fn temp_session_path(label: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_nanos())
            .unwrap_or_default();
        std::env::temp_dir().join(format!("ubs-diag-cli-{label}-{unique}.json"))
    }

    fn config_at(path: &PathBuf) -> ClientConfig {
        let mut config = ClientConfig::default();
        config.session.path = Some(path.clone());
        config
    }

    const fn text_mode() -> OutputMode {
        OutputMode {
            format: OutputFormat::Text,
            no_progress: true,
        }
    }

    #[test]
    fn in_memory_store_reports_no_session() -> Result<(), Box<dyn std::error::Error>> {
        let output = run_session_show(text_mode(), &ClientConfig::default())?;
        assert_eq!(output.exit_code, ExitCode::Ok);
        assert!(output.stdout.contains("store: memory\n"));
        assert!(output.stdout.contains("authenticated: false\n"));
        Ok(())
    }

    #[test]
    fn show_then_logout_over_a_file() -> Result<(), Box<dyn std::error::Error>> {
        let path = temp_session_path("logout");
        let store = FileKeyValueStore::new(&path);
        store.set(ACCESS_TOKEN_KEY, "tok-123")?;
        store.set(
            CURRENT_USER_KEY,
            r#"{"nome":"Davi","is_profissional":true,"role":"profissional"}"#,
        )?;
        let config = config_at(&path);

        let shown = run_session_show(text_mode(), &config)?;
        assert!(shown.stdout.contains("authenticated: true\n"));
        assert!(shown.stdout.contains("role: profissional\n"));
        assert!(!shown.stdout.contains("tok-123"));

        let logout = run_session_logout(text_mode(), &config)?;
        assert_eq!(logout.exit_code, ExitCode::Ok);
        assert_eq!(store.get(ACCESS_TOKEN_KEY)?, None);

        let _ = std::fs::remove_file(&path);
        Ok(())
    }

    #[test]
    fn corrupt_store_file_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
        let path = temp_session_path("corrupt");
        std::fs::write(&path, "[1, 2]")?;
        let output = run_session_show(text_mode(), &config_at(&path))?;
        assert_eq!(output.exit_code, ExitCode::InvalidInput);
        assert!(output.stdout.contains("code: storage:corrupt_store"));
        let _ = std::fs::remove_file(&path);
        Ok(())
    }
}
