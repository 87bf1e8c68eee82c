//! Info command handler.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, render_payload};
use ubs_diag_app::app_crate_version;
use ubs_diag_core::{BuildInfo, build_info};

/// Run the info command.
pub fn run_info(mode: OutputMode) -> Result<CliOutput, CliError> {
    let build = build_info();
    let app_version = app_crate_version();

    let stdout = if mode.is_json() || mode.is_ndjson() {
        let payload = serde_json::json!({
            "status": "ok",
            "build": {
                "name": build.name,
                "version": build.version,
                "appVersion": app_version,
                "rustVersion": build.rust_version,
                "profile": build.profile,
                "gitHash": build.git_hash,
                "userAgent": build.user_agent(),
            }
        });
        render_payload(mode, "info", payload)?
    } else {
        format_info_text(&build, app_version)
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}

fn format_info_text(build: &BuildInfo, app_version: &str) -> String {
    format!(
        "status: ok\nname: {}\nversion: {}\napp: {}\nrust: {}\nprofile: {}\ngit: {}\n",
        build.name,
        build.version,
        app_version,
        build.rust_version,
        build.profile,
        build.git_hash.unwrap_or("none"),
    )
}
