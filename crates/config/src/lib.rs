//! # ubs-diag-config
//!
//! Configuration schema, env/file loading, and request DTOs for the CLI.
//! This crate depends on `domain` and `shared` only.

/// Environment variable parsing and merging.
pub mod env;
/// Config loading helpers (env + file + overrides).
pub mod load;
/// Request DTOs and conversion.
pub mod requests;
/// JSON Schema exports for request DTOs.
pub mod requests_schema;
/// Configuration schema types and helpers.
pub mod schema;

pub use env::{
    ClientEnv, ENV_API_BASE_URL, ENV_API_BASE_URL_ALIAS, ENV_LOG_FORMAT, ENV_LOG_LEVEL,
    ENV_SESSION_PATH, EnvParseError, apply_env_overrides,
};
pub use load::{
    load_client_config_from_path, load_client_config_from_sources, load_client_config_std_env,
    to_pretty_json, to_pretty_toml,
};
pub use requests::{
    RegistrationRequestDto, RequestValidationError, SubmissionRequestDto, TerritoryProfileDto,
    UbsNeedsDto, parse_registration_request_json, parse_submission_request_json,
};
pub use requests_schema::{registration_request_schema, submission_request_schema};
pub use schema::{
    ApiConfig, CURRENT_CONFIG_VERSION, ClientConfig, ConfigSchemaError, DEFAULT_API_BASE_URL,
    LogFormat, LogLevelSetting, LoggingConfig, SessionConfig, ValidatedClientConfig,
    parse_client_config_json, parse_client_config_toml,
};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
