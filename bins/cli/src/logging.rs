//! Tracing subscriber setup for the CLI process.
//!
//! Events go to stderr so stdout stays machine-readable. `RUST_LOG` wins
//! over the configured level; `--no-progress` silences everything unless
//! `RUST_LOG` is set.

use std::io;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};
use ubs_diag_config::{LogFormat, LoggingConfig};

/// Install the global subscriber. A second call is a no-op.
pub fn init_tracing(logging: &LoggingConfig, no_progress: bool) {
    let filter = build_filter(logging, no_progress);
    let result = match logging.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(false)
                    .with_writer(io::stderr),
            )
            .try_init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(io::stderr))
            .try_init(),
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

fn build_filter(logging: &LoggingConfig, no_progress: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if no_progress {
            EnvFilter::new("off")
        } else {
            EnvFilter::new(default_directive(logging))
        }
    })
}

fn default_directive(logging: &LoggingConfig) -> &'static str {
    logging.level.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ubs_diag_config::LogLevelSetting;

    #[test]
    fn configured_level_is_the_default_directive() {
        let logging = LoggingConfig {
            level: LogLevelSetting::Warn,
            format: LogFormat::Text,
        };
        assert_eq!(default_directive(&logging), "warn");
    }

    #[test]
    fn repeated_init_does_not_panic() {
        let logging = LoggingConfig::default();
        init_tracing(&logging, true);
        init_tracing(&logging, true);
    }
}
