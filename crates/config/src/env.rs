//! Environment variable parsing and env-to-config merging.
//!
//! Env parsing is strict: a variable that is present but blank or malformed
//! fails instead of silently falling back to the file or default value.

use crate::schema::{ClientConfig, LogFormat, LogLevelSetting, ValidatedClientConfig};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use ubs_diag_shared::{ErrorCode, ErrorEnvelope, REDACTED, is_secret_key};
use url::Url;

/// Env var: backend API base URL.
pub const ENV_API_BASE_URL: &str = "UBS_DIAG_API_BASE_URL";
/// Env var: backend API base URL (alias shared with the web front end).
pub const ENV_API_BASE_URL_ALIAS: &str = "VITE_API_BASE_URL";
/// Env var: session store file.
pub const ENV_SESSION_PATH: &str = "UBS_DIAG_SESSION_PATH";
/// Env var: minimum log level.
pub const ENV_LOG_LEVEL: &str = "UBS_DIAG_LOG_LEVEL";
/// Env var: log output format.
pub const ENV_LOG_FORMAT: &str = "UBS_DIAG_LOG_FORMAT";

const ALL_VARS: [&str; 5] = [
    ENV_API_BASE_URL,
    ENV_API_BASE_URL_ALIAS,
    ENV_SESSION_PATH,
    ENV_LOG_LEVEL,
    ENV_LOG_FORMAT,
];

/// Parsed environment overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientEnv {
    /// API base URL override.
    pub api_base_url: Option<Box<str>>,
    /// Session file override.
    pub session_path: Option<PathBuf>,
    /// Log level override.
    pub log_level: Option<LogLevelSetting>,
    /// Log format override.
    pub log_format: Option<LogFormat>,
}

impl ClientEnv {
    /// Parse overrides from a variable map.
    ///
    /// When both the primary and the alias base-URL variables are set, the
    /// primary one wins.
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        let api_base_url =
            parse_optional_url_string_any(map, &[ENV_API_BASE_URL, ENV_API_BASE_URL_ALIAS])?;
        let session_path =
            parse_optional_trimmed_string(map, ENV_SESSION_PATH)?.map(|path| PathBuf::from(&*path));
        let log_level = parse_optional_enum(map, ENV_LOG_LEVEL)?;
        let log_format = parse_optional_enum(map, ENV_LOG_FORMAT)?;

        Ok(Self {
            api_base_url,
            session_path,
            log_level,
            log_format,
        })
    }

    /// Parse overrides from the process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let mut map = BTreeMap::new();
        for name in ALL_VARS {
            if let Ok(value) = std::env::var(name) {
                map.insert(name.to_string(), value);
            }
        }
        Self::from_map(&map)
    }
}

/// Apply env overrides on top of `base`, then validate the result.
pub fn apply_env_overrides(
    base: ClientConfig,
    env: &ClientEnv,
) -> Result<ValidatedClientConfig, ErrorEnvelope> {
    let mut config = base;
    if let Some(base_url) = &env.api_base_url {
        config.api.base_url = base_url.clone();
    }
    if let Some(path) = &env.session_path {
        config.session.path = Some(path.clone());
    }
    if let Some(level) = env.log_level {
        config.logging.level = level;
    }
    if let Some(format) = env.log_format {
        config.logging.format = format;
    }

    config.validate_and_normalize().map_err(Into::into)
}

/// Env parsing failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// URL env var had an invalid value.
    InvalidUrl {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Enum env var had an invalid value.
    InvalidEnum {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
}

impl EnvParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } => ErrorCode::new("config", "empty_env_var"),
            Self::InvalidUrl { .. } => ErrorCode::new("config", "invalid_env_url"),
            Self::InvalidEnum { .. } => ErrorCode::new("config", "invalid_env_enum"),
        }
    }
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } => write!(formatter, "{var} must be non-empty"),
            Self::InvalidUrl { var, .. } => write!(formatter, "{var} must be a valid http(s) URL"),
            Self::InvalidEnum { var, .. } => write!(formatter, "{var} has an unsupported value"),
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let envelope = Self::expected(code, message);

        match error {
            EnvParseError::EmptyValue { var } => envelope.with_metadata("env_var", var),
            EnvParseError::InvalidUrl { var, value } | EnvParseError::InvalidEnum { var, value } => {
                envelope
                    .with_metadata("env_var", var)
                    .with_metadata("value", redact_value(var, &value))
            },
        }
    }
}

fn parse_optional_trimmed_string(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<Box<str>>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    Ok(Some(trimmed.to_owned().into_boxed_str()))
}

fn parse_optional_url_string(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<Box<str>>, EnvParseError> {
    let Some(trimmed) = parse_optional_trimmed_string(map, var)? else {
        return Ok(None);
    };

    let invalid = || EnvParseError::InvalidUrl {
        var,
        value: trimmed.to_string(),
    };
    let parsed = Url::parse(&trimmed).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }

    Ok(Some(trimmed))
}

fn parse_optional_url_string_any(
    map: &BTreeMap<String, String>,
    vars: &[&'static str],
) -> Result<Option<Box<str>>, EnvParseError> {
    for var in vars {
        if map.contains_key(*var) {
            return parse_optional_url_string(map, var);
        }
    }
    Ok(None)
}

fn parse_optional_enum<T: std::str::FromStr>(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<T>, EnvParseError> {
    let Some(trimmed) = parse_optional_trimmed_string(map, var)? else {
        return Ok(None);
    };
    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|_| EnvParseError::InvalidEnum {
            var,
            value: trimmed.to_string(),
        })
}

fn redact_value(var: &str, value: &str) -> String {
    if is_secret_key(var) {
        REDACTED.to_string()
    } else {
        value.to_string()
    }
}
